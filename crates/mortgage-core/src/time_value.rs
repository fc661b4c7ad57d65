use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::MortgageError;
use crate::types::{Money, Rate};
use crate::MortgageResult;

/// `lhs * rhs`, reporting overflow of the decimal range as invalid `field`.
pub(crate) fn checked_product(lhs: Decimal, rhs: Decimal, field: &str) -> MortgageResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| {
        MortgageError::invalid(field, format!("{lhs} * {rhs} exceeds decimal precision"))
    })
}

/// Level payment that fully amortizes `principal` over `nper` periods.
///
/// Standard annuity formula `P * r / (1 - (1 + r)^-n)`, evaluated as
/// `P * r * (f / (f - 1))` with `f = (1 + r)^n` to avoid a negative power.
/// The ratio is taken first so a large `f` cannot overflow the product.
/// A zero periodic rate falls back to straight-line `P / n`. The result is
/// not rounded.
pub fn level_payment(principal: Money, periodic_rate: Rate, nper: u32) -> MortgageResult<Money> {
    if nper == 0 {
        return Err(MortgageError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound_factor(periodic_rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    let ratio = factor
        .checked_div(denominator)
        .ok_or_else(|| MortgageError::DivisionByZero {
            context: "level payment annuity factor".into(),
        })?;
    let interest = checked_product(principal, periodic_rate, "rate")?;
    checked_product(interest, ratio, "rate")
}

/// `(1 + r)^n`, failing instead of overflowing the decimal range.
pub fn compound_factor(periodic_rate: Rate, nper: u32) -> MortgageResult<Decimal> {
    (Decimal::ONE + periodic_rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| MortgageError::InvalidInput {
            field: "rate".into(),
            reason: format!("(1 + {periodic_rate})^{nper} exceeds decimal precision"),
        })
}

/// Exact (fractional) number of periods a fixed payment needs to retire
/// `principal`: `-ln(1 - r * P / pmt) / ln(1 + r)`.
///
/// The payment must exceed the first period's interest, otherwise the
/// balance never falls and there is no finite answer.
pub fn periods_to_payoff(principal: Money, periodic_rate: Rate, payment: Money) -> MortgageResult<Decimal> {
    if payment <= Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "payment".into(),
            reason: "Payment must be positive".into(),
        });
    }

    if periodic_rate.is_zero() {
        return Ok(principal / payment);
    }

    let interest_share = checked_product(periodic_rate, principal, "rate")?
        .checked_div(payment)
        .ok_or_else(|| MortgageError::invalid("payment", "Payment is too small to divide by"))?;
    if interest_share >= Decimal::ONE {
        return Err(MortgageError::NonConvergent {
            function: "periods_to_payoff".into(),
            iterations: 0,
            remaining_balance: principal,
        });
    }

    let growth = (Decimal::ONE + periodic_rate).ln();
    if growth.is_zero() {
        return Err(MortgageError::DivisionByZero {
            context: "payoff period log growth".into(),
        });
    }

    Ok(-(Decimal::ONE - interest_share).ln() / growth)
}

/// Future value of a single amount compounded once per period.
pub fn future_value(present_value: Money, rate: Rate, nper: u32) -> MortgageResult<Money> {
    if rate <= Decimal::NEGATIVE_ONE {
        return Err(MortgageError::InvalidInput {
            field: "rate".into(),
            reason: "Growth rate must be greater than -100%".into(),
        });
    }
    checked_product(present_value, compound_factor(rate, nper)?, "principal")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_level_payment_thirty_year() {
        let result = level_payment(dec!(200000), dec!(0.05) / dec!(12), 360).unwrap();
        // 200k at 5% over 30 years: 1,073.64 per month
        assert!((result - dec!(1073.64)).abs() < dec!(0.005));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let result = level_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        assert!(level_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_periods_to_payoff_matches_level_payment() {
        let rate = dec!(0.06) / dec!(12);
        let pmt = level_payment(dec!(100000), rate, 180).unwrap();
        let n = periods_to_payoff(dec!(100000), rate, pmt).unwrap();
        assert!((n - dec!(180)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_periods_to_payoff_interest_only() {
        // 0.5% of 100k is exactly 500: the balance never moves
        let result = periods_to_payoff(dec!(100000), dec!(0.005), dec!(500));
        assert!(matches!(result, Err(MortgageError::NonConvergent { .. })));
    }

    #[test]
    fn test_level_payment_large_factor() {
        // 600% a year over 12 years: (1.5)^144 is ~3e25, P * r * f alone would overflow
        let result = level_payment(dec!(1000000), dec!(0.5), 144).unwrap();
        assert_eq!(result.round_dp(2), dec!(500000));
    }

    #[test]
    fn test_level_payment_product_overflow() {
        let result = level_payment(dec!(70000000000000000000000000000), dec!(2), 12);
        assert!(matches!(result, Err(MortgageError::InvalidInput { .. })));
    }

    #[test]
    fn test_future_value_overflow_is_invalid() {
        let result = future_value(dec!(1000000000000000000000), dec!(1), 80);
        assert!(matches!(result, Err(MortgageError::InvalidInput { .. })));
    }

    #[test]
    fn test_future_value_basic() {
        let result = future_value(dec!(1000), dec!(0.10), 2).unwrap();
        assert_eq!(result, dec!(1210));
    }
}
