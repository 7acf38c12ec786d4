//! Property tests for date ordering: injection and weight collections end
//! sorted ascending by date after any insertion order, with equal dates
//! keeping their relative insertion order.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use doselog::{Compound, LedgerState, WeightLedger};

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

/// Day offsets from a base date; duplicates are common on purpose so the
/// stable tie-break gets exercised.
fn day_offsets() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0u64..60, 1..25)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: injections are sorted ascending by date after every admit,
    /// and ids with equal dates appear in admission order.
    #[test]
    fn property_injections_stay_date_sorted(offsets in day_offsets()) {
        let mut state = LedgerState::new();
        let vial_id = state.add_vial(Compound::Mounjaro, 10_000.0, base_date()).unwrap();

        for offset in &offsets {
            let date = base_date() + Days::new(*offset);
            state.admit(date, Compound::Mounjaro, 1.0, Some(vial_id)).unwrap();

            let records = state.injections.all();
            prop_assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
            prop_assert!(
                records.windows(2).all(|w| w[0].date < w[1].date || w[0].id < w[1].id),
                "equal dates must keep insertion order"
            );
        }
    }

    /// PROPERTY: weight records are sorted ascending by date after every
    /// insertion, regardless of insertion order.
    #[test]
    fn property_weights_stay_date_sorted(offsets in day_offsets()) {
        let mut ledger = WeightLedger::new();

        for (i, offset) in offsets.iter().enumerate() {
            let date = base_date() + Days::new(*offset);
            ledger.record(i as u64 + 1, date, 80.0).unwrap();

            let records = ledger.all();
            prop_assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
            prop_assert!(
                records.windows(2).all(|w| w[0].date < w[1].date || w[0].id < w[1].id),
                "equal dates must keep insertion order"
            );
        }
    }

    /// PROPERTY: start() and current() are the date extremes, never the
    /// first or last inserted.
    #[test]
    fn property_start_and_current_are_date_extremes(offsets in day_offsets()) {
        let mut ledger = WeightLedger::new();
        for (i, offset) in offsets.iter().enumerate() {
            let date = base_date() + Days::new(*offset);
            ledger.record(i as u64 + 1, date, 80.0).unwrap();
        }

        let min = base_date() + Days::new(*offsets.iter().min().unwrap());
        let max = base_date() + Days::new(*offsets.iter().max().unwrap());
        prop_assert_eq!(ledger.start().unwrap().date, min);
        prop_assert_eq!(ledger.current().unwrap().date, max);
    }
}
