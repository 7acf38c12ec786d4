//! The ledger state
//!
//! [`LedgerState`] is the single aggregate that owns every record collection:
//! vials, dose records, weight records, cycle overrides, and the optional
//! target weight. It is the unit of persistence and is passed explicitly
//! wherever it is needed - there is no ambient or static session state.
//!
//! Operations that touch two ledgers at once (admitting a dose consumes vial
//! inventory; revoking one restores it) live here.

pub mod injections;
pub mod inventory;
pub mod weight;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::catalog::{self, Compound};
use crate::error::{LedgerError, LedgerResult};
use injections::{InjectionLedger, InjectionRecord};
use inventory::InventoryLedger;
use weight::WeightLedger;

/// Per-compound override of the dose interval, in days.
/// Absent entries fall back to the compound's catalog default.
pub type CycleConfig = BTreeMap<Compound, u32>;

/// Outcome of revoking a dose record
#[derive(Debug, Clone, PartialEq)]
pub struct Revoked {
    pub record: InjectionRecord,
    /// False when the record's vial had been deleted, so its consumption
    /// could not be restored. An integrity note, not an error.
    pub capacity_restored: bool,
}

/// The complete in-memory session state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerState {
    pub inventory: InventoryLedger,
    pub injections: InjectionLedger,
    pub weights: WeightLedger,
    pub cycles: CycleConfig,
    pub target_weight: Option<f64>,
    next_id: u64,
}

impl LedgerState {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Reassemble state from persisted collections. The id counter resumes
    /// past the largest id seen in any collection.
    pub fn from_parts(
        inventory: InventoryLedger,
        injections: InjectionLedger,
        weights: WeightLedger,
        cycles: CycleConfig,
        target_weight: Option<f64>,
    ) -> Self {
        let max_id = inventory
            .all()
            .iter()
            .map(|v| v.id)
            .chain(injections.all().iter().map(|r| r.id))
            .chain(weights.all().iter().map(|r| r.id))
            .max()
            .unwrap_or(0);
        Self {
            inventory,
            injections,
            weights,
            cycles,
            target_weight,
            next_id: max_id + 1,
        }
    }

    /// Allocate the next record identifier
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Effective dose interval for a compound: the configured override, or
    /// the catalog default
    pub fn cycle_days(&self, compound: Compound) -> u32 {
        self.cycles
            .get(&compound)
            .copied()
            .unwrap_or(catalog::get(compound).default_cycle_days)
    }

    /// Register a new full vial dated `today`
    pub fn add_vial(
        &mut self,
        compound: Compound,
        total: f64,
        today: NaiveDate,
    ) -> LedgerResult<u64> {
        let id = self.next_id();
        match self.inventory.create_vial(id, compound, total, today) {
            Ok(()) => Ok(id),
            Err(e) => {
                // the id was never used; give it back
                self.next_id -= 1;
                Err(e)
            }
        }
    }

    /// Admit a dose record, consuming vial inventory.
    ///
    /// All validation happens before any mutation: a rejected admission
    /// leaves every vial's remaining content untouched.
    pub fn admit(
        &mut self,
        date: NaiveDate,
        compound: Compound,
        dose: f64,
        vial_id: Option<u64>,
    ) -> LedgerResult<u64> {
        // must reject NaN too: a NaN dose passes both `<= 0.0` and the
        // capacity comparison and would poison the vial's remaining content
        if !dose.is_finite() || dose <= 0.0 {
            return Err(LedgerError::InvalidDose { dose });
        }
        let vial_id = vial_id.ok_or(LedgerError::NoVialSelected)?;
        let vial = self
            .inventory
            .get(vial_id)
            .ok_or(LedgerError::VialNotFound { id: vial_id })?;
        if dose > vial.remaining {
            return Err(LedgerError::InsufficientCapacity {
                requested: dose,
                remaining: vial.remaining,
            });
        }

        self.inventory.allocate(vial_id, dose)?;
        let id = self.next_id();
        self.injections.insert(InjectionRecord {
            id,
            date,
            compound,
            dose,
            vial_id,
        });
        Ok(id)
    }

    /// Remove a dose record, restoring its consumption to the source vial.
    ///
    /// When the vial no longer exists the release is skipped - capacity
    /// cannot be restored to a deleted vial - and the record is still
    /// removed; the outcome reports which case occurred.
    pub fn revoke(&mut self, record_id: u64) -> LedgerResult<Revoked> {
        let record = self.injections.take(record_id)?;
        // a corrupt stored dose (hand-edited state) cannot be restored
        // either; the record is still removed
        let capacity_restored = match self.inventory.release(record.vial_id, record.dose) {
            Ok(()) => true,
            Err(LedgerError::VialNotFound { .. } | LedgerError::InvalidAmount { .. }) => false,
            Err(e) => return Err(e),
        };
        Ok(Revoked {
            record,
            capacity_restored,
        })
    }
}
