//! Schedule projector
//!
//! Pure computation over the current ledger state: for every compound with at
//! least one dose record, the next due date is the most recent record's date
//! plus the effective cycle length. Nothing here is cached or persisted;
//! projections are recomputed at read time so there is no derived state to
//! keep in sync.

use chrono::{Days, NaiveDate};

use crate::catalog::Compound;
use crate::ledger::LedgerState;

/// Projected next dose for one compound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub compound: Compound,
    pub next_due: NaiveDate,
    /// Whole days until the due date, negative when overdue
    pub days_until: i64,
}

/// Informal urgency bands for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Due today or overdue
    DueNow,
    /// Due within the next three days
    Soon,
    Later,
}

impl Urgency {
    pub fn for_days_until(days: i64) -> Self {
        if days <= 0 {
            Urgency::DueNow
        } else if days <= 3 {
            Urgency::Soon
        } else {
            Urgency::Later
        }
    }
}

impl Projection {
    pub fn urgency(&self) -> Urgency {
        Urgency::for_days_until(self.days_until)
    }
}

/// Project the next due date for every compound with a dose history.
/// Compounds with no records are omitted.
pub fn project(state: &LedgerState, today: NaiveDate) -> Vec<Projection> {
    Compound::ALL
        .iter()
        .filter_map(|&compound| {
            let last = state.injections.last_for_compound(compound)?;
            let cycle = state.cycle_days(compound);
            let next_due = last.date + Days::new(u64::from(cycle));
            Some(Projection {
                compound,
                next_due,
                days_until: (next_due - today).num_days(),
            })
        })
        .collect()
}
