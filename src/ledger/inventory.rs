//! Inventory ledger
//!
//! Owns the set of vials. The only path that can reduce a vial's remaining
//! content is [`InventoryLedger::allocate`], which rejects over-draws before
//! mutating, so `0 <= remaining <= total` holds for every vial at all times.

use chrono::NaiveDate;

use crate::catalog::Compound;
use crate::error::{LedgerError, LedgerResult};

/// A physical container of finite compound content
#[derive(Debug, Clone, PartialEq)]
pub struct Vial {
    pub id: u64,
    pub compound: Compound,
    /// Total capacity in mg, fixed at creation
    pub total: f64,
    /// Remaining content in mg, `0 <= remaining <= total`
    pub remaining: f64,
    pub added: NaiveDate,
}

impl Vial {
    /// Fraction of content remaining, in `[0, 1]`
    pub fn fill_fraction(&self) -> f64 {
        self.remaining / self.total
    }
}

/// Owns all vials, in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryLedger {
    vials: Vec<Vial>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted vials, preserving their order
    pub fn from_vials(vials: Vec<Vial>) -> Self {
        Self { vials }
    }

    /// Register a new full vial
    pub fn create_vial(
        &mut self,
        id: u64,
        compound: Compound,
        total: f64,
        added: NaiveDate,
    ) -> LedgerResult<()> {
        // NaN compares false against everything, so the guard must be
        // written to reject it, not just non-positive values
        if !total.is_finite() || total <= 0.0 {
            return Err(LedgerError::InvalidCapacity { capacity: total });
        }
        self.vials.push(Vial {
            id,
            compound,
            total,
            remaining: total,
            added,
        });
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&Vial> {
        self.vials.iter().find(|v| v.id == id)
    }

    fn get_mut(&mut self, id: u64) -> LedgerResult<&mut Vial> {
        self.vials
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(LedgerError::VialNotFound { id })
    }

    /// All vials, insertion order
    pub fn all(&self) -> &[Vial] {
        &self.vials
    }

    /// Vials of a compound with content left, insertion order
    pub fn list_available(&self, compound: Compound) -> impl Iterator<Item = &Vial> {
        self.vials
            .iter()
            .filter(move |v| v.compound == compound && v.remaining > 0.0)
    }

    /// Draw `amount` from a vial. Sole capacity-reducing operation.
    pub fn allocate(&mut self, id: u64, amount: f64) -> LedgerResult<()> {
        let vial = self.get_mut(id)?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        if amount > vial.remaining {
            return Err(LedgerError::InsufficientCapacity {
                requested: amount,
                remaining: vial.remaining,
            });
        }
        vial.remaining -= amount;
        Ok(())
    }

    /// Return `amount` to a vial, clamped at its total capacity.
    ///
    /// Reversing an admission is exact; the clamp only guards against state
    /// that was corrupted by manual edits.
    pub fn release(&mut self, id: u64, amount: f64) -> LedgerResult<()> {
        let vial = self.get_mut(id)?;
        // a negative or non-finite amount would breach the lower bound,
        // which the upper-bound clamp alone cannot prevent
        if !amount.is_finite() || amount < 0.0 {
            return Err(LedgerError::InvalidAmount { amount });
        }
        vial.remaining = (vial.remaining + amount).min(vial.total);
        Ok(())
    }

    /// Administrative correction of a vial's remaining content
    pub fn set_remaining(&mut self, id: u64, value: f64) -> LedgerResult<()> {
        let vial = self.get_mut(id)?;
        if !value.is_finite() || value < 0.0 || value > vial.total {
            return Err(LedgerError::OutOfRange {
                value,
                total: vial.total,
            });
        }
        vial.remaining = value;
        Ok(())
    }

    /// Sum of remaining content across all vials of a compound
    pub fn total_by_compound(&self, compound: Compound) -> f64 {
        self.vials
            .iter()
            .filter(|v| v.compound == compound)
            .map(|v| v.remaining)
            .sum()
    }

    /// Remove a vial unconditionally. Injection records referencing it are
    /// left orphaned; consumers resolve vial ids as lookups, not references.
    pub fn delete_vial(&mut self, id: u64) -> LedgerResult<Vial> {
        let pos = self
            .vials
            .iter()
            .position(|v| v.id == id)
            .ok_or(LedgerError::VialNotFound { id })?;
        Ok(self.vials.remove(pos))
    }
}
