//! Injection ledger
//!
//! Owns the dose records. Records are kept sorted ascending by date after
//! every insertion (stable tie-break: equal dates keep insertion order).
//! The schedule projector relies on this ordering - the chronologically last
//! record per compound is the most recent dose.
//!
//! Admission and revocation also touch the inventory ledger, so those
//! operations live on [`crate::ledger::LedgerState`], which owns both.

use chrono::NaiveDate;

use crate::catalog::Compound;
use crate::error::{LedgerError, LedgerResult};

/// One recorded dose, drawn from a vial
#[derive(Debug, Clone, PartialEq)]
pub struct InjectionRecord {
    pub id: u64,
    pub date: NaiveDate,
    pub compound: Compound,
    /// Dose amount in mg
    pub dose: f64,
    /// Lookup key into the inventory ledger. The vial may have been deleted
    /// since; consumers must treat a failed lookup as a handled outcome.
    pub vial_id: u64,
}

/// Owns all dose records, sorted ascending by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjectionLedger {
    records: Vec<InjectionRecord>,
}

impl InjectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records, re-sorting in case the saved state
    /// was edited by hand
    pub fn from_records(mut records: Vec<InjectionRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Append a record and restore date order. sort_by_key is stable, so
    /// records with equal dates keep their relative insertion order.
    pub(crate) fn insert(&mut self, record: InjectionRecord) {
        self.records.push(record);
        self.records.sort_by_key(|r| r.date);
    }

    pub(crate) fn take(&mut self, id: u64) -> LedgerResult<InjectionRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::RecordNotFound { id })?;
        Ok(self.records.remove(pos))
    }

    /// All records, ledger order
    pub fn all(&self) -> &[InjectionRecord] {
        &self.records
    }

    /// Records for one compound, ledger order preserved
    pub fn list_by_compound(&self, compound: Compound) -> impl Iterator<Item = &InjectionRecord> {
        self.records.iter().filter(move |r| r.compound == compound)
    }

    /// Most recent dose of a compound, by date
    pub fn last_for_compound(&self, compound: Compound) -> Option<&InjectionRecord> {
        self.list_by_compound(compound).last()
    }
}
