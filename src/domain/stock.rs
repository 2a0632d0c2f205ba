use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Outcome of applying a signed delta to a warehouse stock quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDelta {
    pub stock_before: i32,
    pub stock_after: i32,
    pub delta: i32,
}

/// Why a delta could not be applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StockRuleViolation {
    #[error("adjustment quantity must be a nonzero integer")]
    ZeroDelta,
    #[error("resulting stock would be negative: current {current}, adjustment {delta}")]
    NegativeResult { current: i32, delta: i32 },
}

/// Applies a signed, nonzero delta to the current quantity.
///
/// The per-warehouse quantity must never go negative; a delta that would
/// take it below zero is rejected without effect. This is the one invariant
/// enforced in application code rather than by the schema.
pub fn apply_delta(current: i32, delta: i32) -> Result<AppliedDelta, StockRuleViolation> {
    if delta == 0 {
        return Err(StockRuleViolation::ZeroDelta);
    }
    let after = current
        .checked_add(delta)
        .ok_or(StockRuleViolation::NegativeResult { current, delta })?;
    if after < 0 {
        return Err(StockRuleViolation::NegativeResult { current, delta });
    }
    Ok(AppliedDelta {
        stock_before: current,
        stock_after: after,
        delta,
    })
}

/// Derived stock status shown on stock listings and alert queries
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum StockStatus {
    #[serde(rename = "NORMAL")]
    #[strum(serialize = "NORMAL")]
    Normal,
    #[serde(rename = "BAJO")]
    #[strum(serialize = "BAJO")]
    Bajo,
    #[serde(rename = "CRITICO")]
    #[strum(serialize = "CRITICO")]
    Critico,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Bajo => "BAJO",
            Self::Critico => "CRITICO",
        }
    }

    pub fn is_alert(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

/// Derives the stock status from the quantity and the effective minimum
/// threshold. CRITICO at or below half the threshold, BAJO below it,
/// NORMAL otherwise. A missing or non-positive threshold never alerts.
pub fn derive_status(quantity: i32, min_stock: Option<i32>) -> StockStatus {
    let threshold = match min_stock {
        Some(t) if t > 0 => t,
        _ => return StockStatus::Normal,
    };
    // Integer halving rounds down: threshold 5 -> critical at <= 2
    if quantity <= threshold / 2 {
        StockStatus::Critico
    } else if quantity < threshold {
        StockStatus::Bajo
    } else {
        StockStatus::Normal
    }
}

/// Resolves the effective minimum threshold for a stock row: the row-level
/// override wins over the product-level threshold.
pub fn effective_min_stock(row_override: Option<i32>, product_min: i32) -> Option<i32> {
    match row_override {
        Some(v) => Some(v),
        None if product_min > 0 => Some(product_min),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn apply_delta_tracks_before_and_after() {
        let applied = apply_delta(10, -5).unwrap();
        assert_eq!(applied.stock_before, 10);
        assert_eq!(applied.stock_after, 5);
        assert_eq!(applied.delta, -5);
    }

    #[test]
    fn apply_delta_rejects_negative_result_without_effect() {
        let err = apply_delta(10, -15).unwrap_err();
        assert_eq!(
            err,
            StockRuleViolation::NegativeResult {
                current: 10,
                delta: -15
            }
        );
    }

    #[test]
    fn apply_delta_rejects_zero() {
        assert_eq!(apply_delta(10, 0).unwrap_err(), StockRuleViolation::ZeroDelta);
    }

    #[test]
    fn apply_delta_allows_draining_to_zero() {
        let applied = apply_delta(7, -7).unwrap();
        assert_eq!(applied.stock_after, 0);
    }

    #[test]
    fn apply_delta_from_missing_row_defaults_to_zero() {
        // A lazily-created stock row starts at 0; only positive deltas apply.
        assert!(apply_delta(0, -1).is_err());
        assert_eq!(apply_delta(0, 4).unwrap().stock_after, 4);
    }

    #[rstest]
    #[case(10, Some(5), StockStatus::Normal)]
    #[case(5, Some(5), StockStatus::Normal)]
    #[case(4, Some(5), StockStatus::Bajo)]
    #[case(3, Some(5), StockStatus::Bajo)]
    #[case(2, Some(5), StockStatus::Critico)]
    #[case(0, Some(5), StockStatus::Critico)]
    #[case(5, Some(10), StockStatus::Critico)]
    #[case(0, None, StockStatus::Normal)]
    #[case(0, Some(0), StockStatus::Normal)]
    fn status_derivation(
        #[case] quantity: i32,
        #[case] min_stock: Option<i32>,
        #[case] expected: StockStatus,
    ) {
        assert_eq!(derive_status(quantity, min_stock), expected);
    }

    #[test]
    fn row_override_wins_over_product_threshold() {
        assert_eq!(effective_min_stock(Some(20), 5), Some(20));
        assert_eq!(effective_min_stock(None, 5), Some(5));
        assert_eq!(effective_min_stock(None, 0), None);
    }
}
