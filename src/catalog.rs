//! Compound catalog
//!
//! Static reference data for the fixed set of trackable compounds: identity,
//! display metadata, default cycle length, permitted dose amounts, and
//! permitted vial sizes. Defined at process start and never mutated; every
//! other module consumes it read-only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Identifier for a trackable compound
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compound {
    Mounjaro,
    Tesamorelin,
    Retatrutide,
}

impl Compound {
    /// All compounds in catalog order
    pub const ALL: [Compound; 3] = [
        Compound::Mounjaro,
        Compound::Tesamorelin,
        Compound::Retatrutide,
    ];

    /// Lowercase identifier as used on the wire and the CLI
    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Mounjaro => "mounjaro",
            Compound::Tesamorelin => "tesamorelin",
            Compound::Retatrutide => "retatrutide",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Compound {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mounjaro" => Ok(Compound::Mounjaro),
            "tesamorelin" => Ok(Compound::Tesamorelin),
            "retatrutide" => Ok(Compound::Retatrutide),
            other => Err(LedgerError::UnknownCompound {
                name: other.to_string(),
            }),
        }
    }
}

/// Immutable catalog entry for one compound
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundDefinition {
    pub compound: Compound,
    /// Human-readable display name
    pub name: &'static str,
    /// Display color (hex), used by presentation layers
    pub color: &'static str,
    /// Default interval between doses, in days
    pub default_cycle_days: u32,
    /// Permitted dose amounts, in mg, ascending
    pub doses: &'static [f64],
    /// Permitted vial sizes, in mg, ascending
    pub vial_sizes: &'static [f64],
    /// Whether a non-catalog vial size may be registered
    pub allows_custom_vial: bool,
}

static CATALOG: [CompoundDefinition; 3] = [
    CompoundDefinition {
        compound: Compound::Mounjaro,
        name: "Mounjaro",
        color: "#3b82f6",
        default_cycle_days: 7,
        doses: &[2.5, 5.0, 7.5, 10.0, 12.5, 15.0],
        vial_sizes: &[50.0, 60.0, 80.0],
        allows_custom_vial: false,
    },
    CompoundDefinition {
        compound: Compound::Tesamorelin,
        name: "Tesamorelin",
        color: "#10b981",
        default_cycle_days: 1,
        doses: &[1.0, 2.0],
        vial_sizes: &[2.0, 5.0, 10.0],
        allows_custom_vial: false,
    },
    CompoundDefinition {
        compound: Compound::Retatrutide,
        name: "Retatrutide",
        color: "#f59e0b",
        default_cycle_days: 7,
        doses: &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        vial_sizes: &[10.0, 30.0],
        allows_custom_vial: true,
    },
];

/// Look up the definition for a compound
pub fn get(compound: Compound) -> &'static CompoundDefinition {
    match compound {
        Compound::Mounjaro => &CATALOG[0],
        Compound::Tesamorelin => &CATALOG[1],
        Compound::Retatrutide => &CATALOG[2],
    }
}

/// Look up a definition by string identifier
pub fn find(name: &str) -> LedgerResult<&'static CompoundDefinition> {
    Ok(get(name.parse()?))
}

/// All catalog entries in catalog order
pub fn all() -> &'static [CompoundDefinition] {
    &CATALOG
}
