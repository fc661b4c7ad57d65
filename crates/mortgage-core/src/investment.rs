use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::loan::RateInput;
use crate::time_value::future_value;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

/// Lump sum compounded once a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthInput {
    pub principal: Money,
    pub annual_rate: RateInput,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthYear {
    pub year: u32,
    pub balance: Money,
    /// Change from the previous year.
    pub growth: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthOutput {
    pub final_balance: Money,
    pub total_growth: Money,
    pub yearly: Vec<GrowthYear>,
}

/// Year-by-year balance of `principal` growing at `annual_rate`.
///
/// Balances compound on the unrounded amount and are rounded only for
/// display, so `final_balance` equals the closed-form future value.
pub fn project_growth(input: &GrowthInput) -> MortgageResult<ComputationOutput<GrowthOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.principal <= Decimal::ZERO {
        return Err(MortgageError::invalid("principal", "Principal must be positive"));
    }
    if input.years == 0 {
        return Err(MortgageError::invalid("years", "Projection needs at least one year"));
    }
    let rate = input.annual_rate.to_fraction();
    if rate < Decimal::ZERO {
        warnings.push("Negative growth rate: balance declines every year".into());
    }

    let mut yearly = Vec::with_capacity(input.years as usize);
    let mut previous = round_cents(input.principal);
    for year in 1..=input.years {
        let balance = round_cents(future_value(input.principal, rate, year)?);
        yearly.push(GrowthYear {
            year,
            balance,
            growth: balance - previous,
        });
        previous = balance;
    }

    let final_balance = previous;
    let output = GrowthOutput {
        final_balance,
        total_growth: final_balance - round_cents(input.principal),
        yearly,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annual Compound Growth",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_three_years_at_ten_percent() {
        let out = project_growth(&GrowthInput {
            principal: dec!(1000),
            annual_rate: RateInput::Percentage(dec!(10)),
            years: 3,
        })
        .unwrap()
        .result;

        let balances: Vec<Money> = out.yearly.iter().map(|y| y.balance).collect();
        assert_eq!(balances, vec![dec!(1100), dec!(1210), dec!(1331)]);
        assert_eq!(out.yearly[2].growth, dec!(121));
        assert_eq!(out.total_growth, dec!(331));
    }

    #[test]
    fn test_rate_below_minus_one_rejected() {
        let result = project_growth(&GrowthInput {
            principal: dec!(1000),
            annual_rate: RateInput::Fraction(dec!(-1.5)),
            years: 2,
        });
        assert!(matches!(result, Err(MortgageError::InvalidInput { .. })));
    }

    #[test]
    fn test_zero_years_rejected() {
        let result = project_growth(&GrowthInput {
            principal: dec!(1000),
            annual_rate: RateInput::Fraction(dec!(0.05)),
            years: 0,
        });
        assert!(result.is_err());
    }
}
