//! Extra-payment payoff simulation.
//!
//! Unlike the fixed-horizon schedule, this loop has no term: it runs until
//! the balance is gone. Escrow is taken out of the base payment first, the
//! remainder pays interest, and the extra amount goes straight to principal.
//! A budget that cannot cover the interest never converges, so the loop
//! checks every month and is also capped at [`MAX_PAYOFF_MONTHS`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::error::MortgageError;
use crate::loan::effective::{
    resolve_down_payment, resolve_optional_rate, resolve_rate, validate_amount, validate_principal,
};
use crate::loan::{AmountInput, RateInput};
use crate::time_value::checked_product;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Rate, MONTHS_PER_YEAR};
use crate::MortgageResult;

/// Safety ceiling on simulated months (100 years).
pub const MAX_PAYOFF_MONTHS: u32 = 1_200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub principal: Money,
    pub annual_rate: RateInput,
    #[serde(default)]
    pub tax_rate: Option<RateInput>,
    #[serde(default)]
    pub insurance_rate: Option<RateInput>,
    /// Regular monthly payment, escrow included.
    pub base_payment: Money,
    #[serde(default)]
    pub down_payment: AmountInput,
    /// Additional principal paid every month.
    #[serde(default)]
    pub extra_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentOutput {
    /// Principal plus interest paid until the balance reached zero.
    pub total_paid: Money,
    pub total_interest: Money,
    pub months_to_payoff: u32,
    pub years: u32,
    pub remaining_months: u32,
    /// Base payment less escrow.
    pub principal_and_interest_budget: Money,
    /// Same budget without the extra payment; `None` if that never pays off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<PayoffRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_saved: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_saved: Option<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffRun {
    pub total_paid: Money,
    pub total_interest: Money,
    pub months: u32,
}

/// Simulate paying `extra_payment` on top of the regular payment every month
/// until the loan is retired.
pub fn simulate_prepayment(
    input: &PrepaymentInput,
) -> MortgageResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate(input)?;

    let down_payment = resolve_down_payment(input.principal, input.down_payment)?;
    let financed = input.principal - down_payment;
    let monthly_rate = resolve_rate(input.annual_rate, "annual_rate")? / Decimal::from(MONTHS_PER_YEAR);
    let months = Decimal::from(MONTHS_PER_YEAR);
    let tax_rate = resolve_optional_rate(input.tax_rate, "tax_rate")?;
    let insurance_rate = resolve_optional_rate(input.insurance_rate, "insurance_rate")?;
    let monthly_tax = checked_product(financed, tax_rate, "tax_rate")? / months;
    let monthly_insurance = checked_product(financed, insurance_rate, "insurance_rate")? / months;

    let budget = input.base_payment - monthly_tax - monthly_insurance;
    if budget <= Decimal::ZERO {
        warnings.push("Base payment does not cover escrow; only the extra payment reduces principal".into());
    }

    let run = run_payoff(financed, monthly_rate, budget, input.extra_payment)?;

    let baseline = if input.extra_payment.is_zero() {
        None
    } else {
        match run_payoff(financed, monthly_rate, budget, Decimal::ZERO) {
            Ok(b) => Some(b),
            Err(MortgageError::NonConvergent { .. }) => {
                warnings.push("Without the extra payment the loan would never be paid off".into());
                None
            }
            Err(e) => return Err(e),
        }
    };

    debug!(months = run.months, total_paid = %run.total_paid, "prepayment simulated");

    let output = PrepaymentOutput {
        total_paid: run.total_paid,
        total_interest: run.total_interest,
        months_to_payoff: run.months,
        years: run.months / MONTHS_PER_YEAR,
        remaining_months: run.months % MONTHS_PER_YEAR,
        principal_and_interest_budget: round_cents(budget),
        months_saved: baseline.map(|b| b.months.saturating_sub(run.months)),
        interest_saved: baseline.map(|b| b.total_interest - run.total_interest),
        baseline,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Extra-Payment Payoff Simulation",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Month-by-month payoff at a fixed P&I budget plus extra principal.
pub(crate) fn run_payoff(
    financed: Money,
    monthly_rate: Rate,
    budget: Money,
    extra: Money,
) -> MortgageResult<PayoffRun> {
    let mut balance = round_cents(financed);
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut month = 0u32;

    while balance > Decimal::ZERO {
        if month >= MAX_PAYOFF_MONTHS {
            warn!(month, balance = %balance, "payoff exceeded safety ceiling");
            return Err(non_convergent(month, balance));
        }

        let interest = round_cents(checked_product(balance, monthly_rate, "annual_rate")?);
        let mut principal = round_cents(budget - interest + extra);
        if principal <= Decimal::ZERO {
            return Err(non_convergent(month, balance));
        }
        if principal > balance {
            principal = balance;
        }

        balance -= principal;
        total_paid += principal + interest;
        total_interest += interest;
        month += 1;
    }

    Ok(PayoffRun {
        total_paid,
        total_interest,
        months: month,
    })
}

fn non_convergent(month: u32, balance: Money) -> MortgageError {
    MortgageError::NonConvergent {
        function: "simulate_prepayment".into(),
        iterations: month,
        remaining_balance: balance,
    }
}

fn validate(input: &PrepaymentInput) -> MortgageResult<()> {
    validate_principal(input.principal)?;
    if input.base_payment <= Decimal::ZERO {
        return Err(MortgageError::invalid("base_payment", "Base payment must be positive"));
    }
    if input.extra_payment < Decimal::ZERO {
        return Err(MortgageError::invalid("extra_payment", "Extra payment cannot be negative"));
    }
    validate_amount(input.base_payment, "base_payment")?;
    validate_amount(input.extra_payment, "extra_payment")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn standard_input(extra: Decimal) -> PrepaymentInput {
        PrepaymentInput {
            principal: dec!(200000),
            annual_rate: RateInput::Fraction(dec!(0.05)),
            tax_rate: None,
            insurance_rate: None,
            base_payment: dec!(1073.64),
            down_payment: AmountInput::default(),
            extra_payment: extra,
        }
    }

    fn run(input: &PrepaymentInput) -> PrepaymentOutput {
        simulate_prepayment(input).unwrap().result
    }

    #[test]
    fn test_no_extra_matches_term() {
        let out = run(&standard_input(Decimal::ZERO));
        // The rounded level payment retires the loan in (about) the full term
        assert!((359..=361).contains(&out.months_to_payoff), "got {}", out.months_to_payoff);
        assert!(out.baseline.is_none());
        assert!((out.total_paid - out.total_interest - dec!(200000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_extra_payment_shortens_loan() {
        let out = run(&standard_input(dec!(200)));
        let baseline = out.baseline.unwrap();
        assert!(out.months_to_payoff < baseline.months);
        assert!(out.total_interest < baseline.total_interest);
        assert_eq!(out.months_saved, Some(baseline.months - out.months_to_payoff));
        assert!(out.interest_saved.unwrap() > dec!(40000));
        assert_eq!(out.years * 12 + out.remaining_months, out.months_to_payoff);
    }

    #[test]
    fn test_principal_repaid_exactly() {
        let out = run(&standard_input(dec!(500)));
        assert_eq!(out.total_paid - out.total_interest, dec!(200000));
    }

    #[test]
    fn test_escrow_deducted_from_base_payment() {
        let mut input = standard_input(Decimal::ZERO);
        input.tax_rate = Some(RateInput::Percentage(dec!(1.2)));
        input.base_payment = dec!(1273.64);
        let out = run(&input);
        // 200k * 1.2% / 12 = 200 of escrow
        assert_eq!(out.principal_and_interest_budget, dec!(1073.64));
        assert!((359..=361).contains(&out.months_to_payoff));
    }

    #[test]
    fn test_interest_only_budget_non_convergent() {
        let mut input = standard_input(Decimal::ZERO);
        input.base_payment = dec!(833.33);
        let err = simulate_prepayment(&input).unwrap_err();
        assert!(matches!(err, MortgageError::NonConvergent { .. }));
    }

    #[test]
    fn test_extra_rescues_short_budget() {
        let mut input = standard_input(dec!(300));
        input.base_payment = dec!(800);
        let out = simulate_prepayment(&input).unwrap();
        assert!(out.result.baseline.is_none());
        assert!(out.warnings.iter().any(|w| w.contains("never be paid off")));
    }

    #[test]
    fn test_safety_ceiling() {
        // Principal of one cent a month on a large balance exceeds 100 years
        let result = run_payoff(dec!(100000), Decimal::ZERO, dec!(0.01), Decimal::ZERO);
        match result {
            Err(MortgageError::NonConvergent { iterations, .. }) => {
                assert_eq!(iterations, MAX_PAYOFF_MONTHS)
            }
            other => panic!("Expected NonConvergent, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let mut input = standard_input(dec!(-1));
        assert!(matches!(
            simulate_prepayment(&input),
            Err(MortgageError::InvalidInput { .. })
        ));
        input.extra_payment = Decimal::ZERO;
        input.base_payment = Decimal::ZERO;
        assert!(matches!(
            simulate_prepayment(&input),
            Err(MortgageError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_out_of_range_amounts_are_invalid() {
        let mut input = standard_input(Decimal::MAX);
        assert!(matches!(
            simulate_prepayment(&input),
            Err(MortgageError::InvalidInput { .. })
        ));

        input.extra_payment = Decimal::ZERO;
        input.down_payment = AmountInput::Percentage(Decimal::MAX);
        assert!(matches!(
            simulate_prepayment(&input),
            Err(MortgageError::InvalidInput { .. })
        ));
    }
}
