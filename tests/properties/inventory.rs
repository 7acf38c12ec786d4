//! Property tests for the inventory invariant: a vial's remaining content
//! never leaves `[0, total]`, no matter what sequence of operations runs.
//!
//! Amounts are generated in quarter-mg steps. Those are exactly
//! representable in f64, so the exact-restore property can be asserted
//! bitwise instead of approximately.

use chrono::NaiveDate;
use proptest::prelude::*;

use doselog::{Compound, InventoryLedger, LedgerState};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Positive amount in quarter-mg steps, up to 100mg
fn quarter_mg() -> impl Strategy<Value = f64> {
    (1u32..=400).prop_map(|n| f64::from(n) / 4.0)
}

/// One randomly chosen inventory operation
#[derive(Debug, Clone)]
enum Op {
    Allocate(f64),
    Release(f64),
    SetRemaining(f64),
}

/// Amounts a hand-edited state file could smuggle in: negative, NaN,
/// infinite. Every operation must reject these without mutating.
fn hostile_amount() -> impl Strategy<Value = f64> {
    prop_oneof![
        (1u32..=400).prop_map(|n| f64::from(n) / -4.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => quarter_mg().prop_map(Op::Allocate),
        4 => quarter_mg().prop_map(Op::Release),
        4 => (-40i32..=400).prop_map(|n| Op::SetRemaining(f64::from(n) / 4.0)),
        1 => hostile_amount().prop_map(Op::Allocate),
        1 => hostile_amount().prop_map(Op::Release),
        1 => hostile_amount().prop_map(Op::SetRemaining),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: after any operation sequence, `0 <= remaining <= total`.
    /// Failed operations must not mutate either.
    #[test]
    fn property_remaining_stays_in_bounds(
        total in quarter_mg(),
        ops in proptest::collection::vec(op_strategy(), 0..40)
    ) {
        let mut ledger = InventoryLedger::new();
        ledger.create_vial(1, Compound::Mounjaro, total, start_date()).unwrap();

        for op in ops {
            let before = ledger.get(1).unwrap().remaining;
            let result = match op {
                Op::Allocate(amount) => ledger.allocate(1, amount),
                Op::Release(amount) => ledger.release(1, amount),
                Op::SetRemaining(value) => ledger.set_remaining(1, value),
            };
            let vial = ledger.get(1).unwrap();
            prop_assert!(vial.remaining >= 0.0, "remaining went negative: {}", vial.remaining);
            prop_assert!(vial.remaining <= vial.total, "remaining {} exceeds total {}", vial.remaining, vial.total);
            if result.is_err() {
                prop_assert_eq!(vial.remaining, before, "failed operation mutated the vial");
            }
        }
    }

    /// PROPERTY: admit followed immediately by revoke restores the vial's
    /// remaining content exactly.
    #[test]
    fn property_admit_revoke_round_trips(
        total in quarter_mg(),
        dose in quarter_mg(),
    ) {
        prop_assume!(dose <= total);

        let mut state = LedgerState::new();
        let vial_id = state.add_vial(Compound::Retatrutide, total, start_date()).unwrap();
        let before = state.inventory.get(vial_id).unwrap().remaining;

        let record_id = state.admit(start_date(), Compound::Retatrutide, dose, Some(vial_id)).unwrap();
        let revoked = state.revoke(record_id).unwrap();

        prop_assert!(revoked.capacity_restored);
        prop_assert_eq!(state.inventory.get(vial_id).unwrap().remaining, before);
        prop_assert!(state.injections.all().is_empty());
    }

    /// PROPERTY: an over-capacity admission is rejected and leaves every
    /// vial untouched.
    #[test]
    fn property_over_draw_never_mutates(
        total in quarter_mg(),
        excess in quarter_mg(),
    ) {
        let mut state = LedgerState::new();
        let vial_id = state.add_vial(Compound::Mounjaro, total, start_date()).unwrap();
        let other = state.add_vial(Compound::Mounjaro, total, start_date()).unwrap();

        let result = state.admit(start_date(), Compound::Mounjaro, total + excess, Some(vial_id));

        prop_assert!(result.is_err());
        prop_assert_eq!(state.inventory.get(vial_id).unwrap().remaining, total);
        prop_assert_eq!(state.inventory.get(other).unwrap().remaining, total);
        prop_assert!(state.injections.all().is_empty());
    }

    /// PROPERTY: total_by_compound equals the sum over exactly the matching
    /// vials, independent of creation order.
    #[test]
    fn property_total_by_compound_is_order_independent(
        sizes in proptest::collection::vec((0usize..3, 1u32..=400), 1..10)
    ) {
        let compounds = [Compound::Mounjaro, Compound::Tesamorelin, Compound::Retatrutide];

        let mut ledger = InventoryLedger::new();
        let mut expected = [0.0f64; 3];
        for (id, (which, quarters)) in sizes.iter().enumerate() {
            let size = f64::from(*quarters) / 4.0;
            ledger.create_vial(id as u64 + 1, compounds[*which], size, start_date()).unwrap();
            expected[*which] += size;
        }

        for (which, compound) in compounds.iter().enumerate() {
            prop_assert_eq!(ledger.total_by_compound(*compound), expected[which]);
        }
    }
}
