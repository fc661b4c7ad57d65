use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::loan::effective::validate_amount;
use crate::types::{with_metadata, ComputationOutput, Money, MONTHS_PER_YEAR};
use crate::MortgageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub old_payment: Money,
    pub new_payment: Money,
    /// Closing costs and fees of the refinance.
    pub refinancing_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    pub monthly_savings: Money,
    /// `refinancing_cost / monthly_savings`, unrounded.
    pub break_even_months: Decimal,
    /// Whole months of savings needed to recoup the cost.
    pub months_to_recoup: u32,
    pub break_even_years: Decimal,
}

/// Months of payment savings needed to recover the cost of refinancing.
///
/// Fails with `NoBreakEven` when the new payment is not lower than the old
/// one, since savings never accrue.
pub fn compute_break_even_months(
    input: &BreakEvenInput,
) -> MortgageResult<ComputationOutput<BreakEvenOutput>> {
    let start = Instant::now();
    let output = break_even(input.old_payment, input.new_payment, input.refinancing_cost)?;
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance Break-Even (cost / monthly savings)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

pub(crate) fn break_even(
    old_payment: Money,
    new_payment: Money,
    refinancing_cost: Money,
) -> MortgageResult<BreakEvenOutput> {
    validate(old_payment, new_payment, refinancing_cost)?;

    let monthly_savings = old_payment - new_payment;
    if monthly_savings <= Decimal::ZERO {
        return Err(MortgageError::NoBreakEven {
            old_payment,
            new_payment,
        });
    }

    let break_even_months = refinancing_cost
        .checked_div(monthly_savings)
        .ok_or_else(|| MortgageError::invalid("refinancing_cost", "Break-even exceeds decimal precision"))?;
    let months_to_recoup = break_even_months.ceil().to_u32().unwrap_or(u32::MAX);

    Ok(BreakEvenOutput {
        monthly_savings,
        break_even_months,
        months_to_recoup,
        break_even_years: break_even_months / Decimal::from(MONTHS_PER_YEAR),
    })
}

fn validate(old_payment: Money, new_payment: Money, refinancing_cost: Money) -> MortgageResult<()> {
    if old_payment <= Decimal::ZERO {
        return Err(MortgageError::invalid("old_payment", "Old payment must be positive"));
    }
    if new_payment <= Decimal::ZERO {
        return Err(MortgageError::invalid("new_payment", "New payment must be positive"));
    }
    if refinancing_cost < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "refinancing_cost",
            "Refinancing cost cannot be negative",
        ));
    }
    validate_amount(old_payment, "old_payment")?;
    validate_amount(new_payment, "new_payment")?;
    validate_amount(refinancing_cost, "refinancing_cost")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn run(old: Decimal, new: Decimal, cost: Decimal) -> MortgageResult<BreakEvenOutput> {
        compute_break_even_months(&BreakEvenInput {
            old_payment: old,
            new_payment: new,
            refinancing_cost: cost,
        })
        .map(|o| o.result)
    }

    #[test]
    fn test_break_even_twenty_months() {
        let out = run(dec!(1200), dec!(1000), dec!(4000)).unwrap();
        assert_eq!(out.monthly_savings, dec!(200));
        assert_eq!(out.break_even_months, dec!(20));
        assert_eq!(out.months_to_recoup, 20);
    }

    #[test]
    fn test_break_even_rounds_up_partial_month() {
        let out = run(dec!(1200), dec!(1050), dec!(4000)).unwrap();
        // 4000 / 150 = 26.67
        assert_eq!(out.months_to_recoup, 27);
    }

    #[test]
    fn test_no_break_even_when_payment_rises() {
        let err = run(dec!(1000), dec!(1200), dec!(4000)).unwrap_err();
        assert!(matches!(err, MortgageError::NoBreakEven { .. }));
    }

    #[test]
    fn test_no_break_even_when_equal() {
        assert!(matches!(
            run(dec!(1000), dec!(1000), dec!(4000)),
            Err(MortgageError::NoBreakEven { .. })
        ));
    }

    #[test]
    fn test_free_refinance_breaks_even_immediately() {
        let out = run(dec!(1200), dec!(1000), Decimal::ZERO).unwrap();
        assert_eq!(out.months_to_recoup, 0);
    }

    #[test]
    fn test_negative_cost_rejected() {
        assert!(matches!(
            run(dec!(1200), dec!(1000), dec!(-1)),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_vanishing_savings_is_invalid() {
        let err = run(dec!(1.0000000000000000000000000001), dec!(1), dec!(1000000000000000)).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { .. }));
    }

    #[test]
    fn test_payment_above_ceiling_is_invalid() {
        let err = run(Decimal::MAX, dec!(1000), dec!(4000)).unwrap_err();
        match err {
            MortgageError::InvalidInput { field, .. } => assert_eq!(field, "old_payment"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
