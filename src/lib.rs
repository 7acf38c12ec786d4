//! Doselog - personal dosing and vial-inventory tracker
//!
//! Doselog keeps a ledger of doses drawn from physical vials for a small
//! fixed catalog of compounds, tracks the remaining content of each vial,
//! projects the next due date per compound from a configurable cycle, and
//! follows body-weight trend against an optional target.

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod schedule;
pub mod store;

// Re-exports for convenience
pub use catalog::{Compound, CompoundDefinition};
pub use error::{LedgerError, LedgerResult};
pub use ledger::injections::{InjectionLedger, InjectionRecord};
pub use ledger::inventory::{InventoryLedger, Vial};
pub use ledger::weight::{clamped_progress, WeightLedger, WeightRecord};
pub use ledger::{CycleConfig, LedgerState, Revoked};
pub use schedule::{project, Projection, Urgency};
pub use store::{default_state_path, StateStore};
