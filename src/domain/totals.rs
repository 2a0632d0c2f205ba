use rust_decimal::Decimal;

/// A purchase line as seen by the totals computation
#[derive(Debug, Clone, Copy)]
pub struct LineAmount {
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Computed purchase amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

/// Why the totals could not be computed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TotalsError {
    #[error("line quantity must be at least 1")]
    NonPositiveQuantity,
    #[error("unit price cannot be negative")]
    NegativePrice,
    #[error("discount cannot be negative")]
    NegativeDiscount,
    #[error("discount {discount} exceeds subtotal {subtotal}")]
    DiscountExceedsSubtotal { subtotal: Decimal, discount: Decimal },
}

/// Computes `subtotal = Σ quantity · unit_price` and `total = subtotal − discount`.
pub fn compute_totals(lines: &[LineAmount], discount: Decimal) -> Result<PurchaseTotals, TotalsError> {
    if discount < Decimal::ZERO {
        return Err(TotalsError::NegativeDiscount);
    }

    let mut subtotal = Decimal::ZERO;
    for line in lines {
        if line.quantity < 1 {
            return Err(TotalsError::NonPositiveQuantity);
        }
        if line.unit_price < Decimal::ZERO {
            return Err(TotalsError::NegativePrice);
        }
        subtotal += Decimal::from(line.quantity) * line.unit_price;
    }

    if discount > subtotal {
        return Err(TotalsError::DiscountExceedsSubtotal { subtotal, discount });
    }

    Ok(PurchaseTotals {
        subtotal,
        discount,
        total: subtotal - discount,
    })
}

/// Line total for a single purchase item
pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
    Decimal::from(quantity) * unit_price
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn totals_follow_line_items_and_discount() {
        let lines = [
            LineAmount {
                quantity: 2,
                unit_price: dec!(10),
            },
            LineAmount {
                quantity: 1,
                unit_price: dec!(5),
            },
        ];
        let totals = compute_totals(&lines, dec!(5)).unwrap();
        assert_eq!(totals.subtotal, dec!(25));
        assert_eq!(totals.discount, dec!(5));
        assert_eq!(totals.total, dec!(20));
    }

    #[test]
    fn zero_discount_keeps_subtotal() {
        let lines = [LineAmount {
            quantity: 3,
            unit_price: dec!(7.50),
        }];
        let totals = compute_totals(&lines, Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, dec!(22.50));
        assert_eq!(totals.total, dec!(22.50));
    }

    #[test]
    fn discount_larger_than_subtotal_is_rejected() {
        let lines = [LineAmount {
            quantity: 1,
            unit_price: dec!(10),
        }];
        assert_eq!(
            compute_totals(&lines, dec!(11)).unwrap_err(),
            TotalsError::DiscountExceedsSubtotal {
                subtotal: dec!(10),
                discount: dec!(11),
            }
        );
    }

    #[test]
    fn invalid_lines_are_rejected() {
        assert_eq!(
            compute_totals(
                &[LineAmount {
                    quantity: 0,
                    unit_price: dec!(1),
                }],
                Decimal::ZERO
            )
            .unwrap_err(),
            TotalsError::NonPositiveQuantity
        );
        assert_eq!(
            compute_totals(
                &[LineAmount {
                    quantity: 1,
                    unit_price: dec!(-1),
                }],
                Decimal::ZERO
            )
            .unwrap_err(),
            TotalsError::NegativePrice
        );
    }
}
