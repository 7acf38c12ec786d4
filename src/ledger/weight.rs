//! Weight ledger
//!
//! Body-weight observations, kept sorted ascending by date, plus the trend
//! statistics derived from them. Earliest and most recent records are
//! identified by date, never by insertion order. All statistics are computed
//! on demand from the current records; nothing derived is cached.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};

/// One body-weight observation
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRecord {
    pub id: u64,
    pub date: NaiveDate,
    /// Weight in kg, always positive
    pub weight: f64,
}

/// Owns all weight records, sorted ascending by date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightLedger {
    records: Vec<WeightRecord>,
}

impl WeightLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted records, re-sorting in case the saved state
    /// was edited by hand
    pub fn from_records(mut records: Vec<WeightRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Record an observation. Stable re-sort, same tie-break as injections.
    pub fn record(&mut self, id: u64, date: NaiveDate, weight: f64) -> LedgerResult<()> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(LedgerError::InvalidWeight { weight });
        }
        self.records.push(WeightRecord { id, date, weight });
        self.records.sort_by_key(|r| r.date);
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> LedgerResult<WeightRecord> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::RecordNotFound { id })?;
        Ok(self.records.remove(pos))
    }

    pub fn all(&self) -> &[WeightRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest observation by date
    pub fn start(&self) -> LedgerResult<&WeightRecord> {
        self.records.first().ok_or(LedgerError::NoData)
    }

    /// Most recent observation by date
    pub fn current(&self) -> LedgerResult<&WeightRecord> {
        self.records.last().ok_or(LedgerError::NoData)
    }

    /// `current - start`, negative when weight was lost
    pub fn net_change(&self) -> LedgerResult<f64> {
        Ok(self.current()?.weight - self.start()?.weight)
    }

    /// Net change as a percentage of the start weight.
    ///
    /// A zero start weight is excluded by the insertion guard, but loaded
    /// state may have been edited by hand.
    pub fn percent_change(&self) -> LedgerResult<f64> {
        let start = self.start()?.weight;
        if start == 0.0 {
            return Err(LedgerError::NoData);
        }
        Ok(self.net_change()? / start * 100.0)
    }

    /// Percentage of the way from the start weight to `target`, unclamped.
    ///
    /// `(start - current) / (start - target) * 100`. Values outside
    /// `[0, 100]` are meaningful (regression or overshoot); use
    /// [`clamped_progress`] for display.
    pub fn progress_toward(&self, target: f64) -> LedgerResult<f64> {
        let start = self.start()?.weight;
        let current = self.current()?.weight;
        if start == target {
            return Err(LedgerError::DegenerateTarget { start });
        }
        Ok((start - current) / (start - target) * 100.0)
    }
}

/// Bound a raw progress percentage to `[0, 100]` for display
pub fn clamped_progress(raw: f64) -> f64 {
    raw.clamp(0.0, 100.0)
}
