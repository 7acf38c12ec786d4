//! Property tests for weight-progress arithmetic: the degenerate-target
//! guard means a caller can never observe infinity or NaN.

use chrono::NaiveDate;
use proptest::prelude::*;

use doselog::{clamped_progress, LedgerError, WeightLedger};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn ledger(start: f64, current: f64) -> WeightLedger {
    let mut ledger = WeightLedger::new();
    ledger.record(1, date("2024-01-01"), start).unwrap();
    ledger.record(2, date("2024-02-01"), current).unwrap();
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: progress_toward never yields infinity or NaN - the
    /// degenerate case is an error, everything else is finite.
    #[test]
    fn property_progress_is_finite_or_degenerate_error(
        start in 1.0f64..300.0,
        current in 1.0f64..300.0,
        target in 1.0f64..300.0,
    ) {
        match ledger(start, current).progress_toward(target) {
            Ok(raw) => prop_assert!(raw.is_finite(), "progress must be finite, got {raw}"),
            Err(LedgerError::DegenerateTarget { start: s }) => {
                prop_assert_eq!(s, start);
                prop_assert_eq!(start, target);
            }
            Err(e) => prop_assert!(false, "unexpected error: {e}"),
        }
    }

    /// PROPERTY: the display clamp stays in [0, 100] and is the identity
    /// for values already in range.
    #[test]
    fn property_clamped_progress_bounds(raw in -1_000.0f64..1_000.0) {
        let clamped = clamped_progress(raw);
        prop_assert!((0.0..=100.0).contains(&clamped));
        if (0.0..=100.0).contains(&raw) {
            prop_assert_eq!(clamped, raw);
        }
    }

    /// PROPERTY: percent_change is finite for any valid ledger (insertion
    /// rejects non-positive weights, so the start weight is never zero).
    #[test]
    fn property_percent_change_is_finite(
        start in 1.0f64..300.0,
        current in 1.0f64..300.0,
    ) {
        let percent = ledger(start, current).percent_change().unwrap();
        prop_assert!(percent.is_finite());
    }
}
