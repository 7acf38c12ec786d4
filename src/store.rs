//! JSON state store
//!
//! The persistence boundary: the whole [`LedgerState`] loads and saves as one
//! JSON document. Wire DTOs are kept separate from the domain types so the
//! stored format can stay stable while the domain evolves.
//!
//! Loading is lenient: an absent file is not an error (the ledger starts
//! empty), a missing top-level field falls back to its empty default, an
//! unparseable target weight or unknown cycle key is dropped. Saving is
//! best-effort mirroring - a failure is reported to the caller but the
//! in-memory state remains the source of truth.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::Compound;
use crate::error::LedgerResult;
use crate::ledger::injections::{InjectionLedger, InjectionRecord};
use crate::ledger::inventory::{InventoryLedger, Vial};
use crate::ledger::weight::{WeightLedger, WeightRecord};
use crate::ledger::{CycleConfig, LedgerState};

/// Wire form of an injection record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InjectionDto {
    id: u64,
    date: NaiveDate,
    compound: Compound,
    dose: f64,
    #[serde(rename = "vialId")]
    vial_id: u64,
}

/// Wire form of a vial
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VialDto {
    id: u64,
    compound: Compound,
    #[serde(rename = "totalCapacity")]
    total_capacity: f64,
    remaining: f64,
    #[serde(rename = "addedDate")]
    added_date: NaiveDate,
}

/// Wire form of a weight record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WeightDto {
    id: u64,
    date: NaiveDate,
    weight: f64,
}

/// Wire form of the whole state. Every field defaults so a partially
/// written or hand-edited file degrades per-field instead of failing the
/// whole load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StateDto {
    #[serde(default)]
    injections: Vec<InjectionDto>,
    #[serde(default)]
    weights: Vec<WeightDto>,
    #[serde(default)]
    inventory: Vec<VialDto>,
    /// Keyed by compound identifier; unknown keys are dropped on load
    #[serde(default)]
    cycles: BTreeMap<String, u32>,
    /// Stored as a string, empty for "no target" (legacy format)
    #[serde(default, rename = "targetWeight")]
    target_weight: String,
}

impl StateDto {
    fn from_state(state: &LedgerState) -> Self {
        Self {
            injections: state
                .injections
                .all()
                .iter()
                .map(|r| InjectionDto {
                    id: r.id,
                    date: r.date,
                    compound: r.compound,
                    dose: r.dose,
                    vial_id: r.vial_id,
                })
                .collect(),
            weights: state
                .weights
                .all()
                .iter()
                .map(|r| WeightDto {
                    id: r.id,
                    date: r.date,
                    weight: r.weight,
                })
                .collect(),
            inventory: state
                .inventory
                .all()
                .iter()
                .map(|v| VialDto {
                    id: v.id,
                    compound: v.compound,
                    total_capacity: v.total,
                    remaining: v.remaining,
                    added_date: v.added,
                })
                .collect(),
            cycles: state
                .cycles
                .iter()
                .map(|(c, days)| (c.to_string(), *days))
                .collect(),
            target_weight: state
                .target_weight
                .map(|t| t.to_string())
                .unwrap_or_default(),
        }
    }

    fn into_state(self) -> LedgerState {
        let inventory = InventoryLedger::from_vials(
            self.inventory
                .into_iter()
                .map(|v| Vial {
                    id: v.id,
                    compound: v.compound,
                    total: v.total_capacity,
                    remaining: v.remaining,
                    added: v.added_date,
                })
                .collect(),
        );
        let injections = InjectionLedger::from_records(
            self.injections
                .into_iter()
                .map(|r| InjectionRecord {
                    id: r.id,
                    date: r.date,
                    compound: r.compound,
                    dose: r.dose,
                    vial_id: r.vial_id,
                })
                .collect(),
        );
        let weights = WeightLedger::from_records(
            self.weights
                .into_iter()
                .map(|r| WeightRecord {
                    id: r.id,
                    date: r.date,
                    weight: r.weight,
                })
                .collect(),
        );
        let cycles: CycleConfig = self
            .cycles
            .into_iter()
            .filter_map(|(name, days)| Some((name.parse::<Compound>().ok()?, days)))
            .collect();
        let target_weight = self.target_weight.trim().parse::<f64>().ok();

        LedgerState::from_parts(inventory, injections, weights, cycles, target_weight)
    }
}

/// File-backed store for the ledger state
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved state. An absent file yields an empty ledger.
    pub fn load(&self) -> LedgerResult<LedgerState> {
        if !self.path.exists() {
            return Ok(LedgerState::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        let dto: StateDto = serde_json::from_str(&content)?;
        Ok(dto.into_state())
    }

    /// Load the saved state, falling back to an empty ledger on any failure
    pub fn load_or_default(&self) -> LedgerState {
        self.load().unwrap_or_else(|_| LedgerState::new())
    }

    /// Persist the full state, creating parent directories as needed
    pub fn save(&self, state: &LedgerState) -> LedgerResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let dto = StateDto::from_state(state);
        let content = serde_json::to_string_pretty(&dto)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

/// Default state file location: `~/.doselog/state.json`
pub fn default_state_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".doselog").join("state.json"))
}
