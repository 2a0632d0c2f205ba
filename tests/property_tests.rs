//! Property-based checks over the pure stock rules.

use comercio_api::domain::stock::{apply_delta, derive_status, StockStatus};
use proptest::prelude::*;

proptest! {
    /// Replaying any sequence of deltas: the running quantity equals the sum
    /// of the accepted deltas and never dips below zero; rejected deltas
    /// leave the quantity untouched.
    #[test]
    fn quantity_equals_sum_of_accepted_deltas(deltas in prop::collection::vec(-50i32..50, 0..64)) {
        let mut quantity: i32 = 0;
        let mut accepted_sum: i64 = 0;

        for delta in deltas {
            match apply_delta(quantity, delta) {
                Ok(applied) => {
                    prop_assert_eq!(applied.stock_before, quantity);
                    prop_assert_eq!(applied.stock_after - applied.stock_before, delta);
                    prop_assert!(applied.stock_after >= 0);
                    quantity = applied.stock_after;
                    accepted_sum += delta as i64;
                }
                Err(_) => {
                    // Rejected: zero delta or a result below zero
                    prop_assert!(delta == 0 || (quantity as i64 + delta as i64) < 0);
                }
            }
            prop_assert_eq!(quantity as i64, accepted_sum);
        }
    }

    /// The status bands partition the quantity axis: CRITICO at or below
    /// half the threshold, BAJO strictly below it, NORMAL at or above.
    #[test]
    fn status_bands_are_consistent(quantity in 0i32..10_000, threshold in 1i32..1_000) {
        let status = derive_status(quantity, Some(threshold));
        match status {
            StockStatus::Critico => prop_assert!(quantity <= threshold / 2),
            StockStatus::Bajo => {
                prop_assert!(quantity > threshold / 2);
                prop_assert!(quantity < threshold);
            }
            StockStatus::Normal => prop_assert!(quantity >= threshold),
        }
    }

    /// Without a positive threshold the status is always NORMAL.
    #[test]
    fn no_threshold_never_alerts(quantity in 0i32..10_000) {
        prop_assert_eq!(derive_status(quantity, None), StockStatus::Normal);
        prop_assert_eq!(derive_status(quantity, Some(0)), StockStatus::Normal);
    }
}
