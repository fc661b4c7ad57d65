use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::loan::effective::{resolve_down_payment, resolve_rate, validate_amount, validate_principal};
use crate::loan::{AmountInput, RateInput};
use crate::time_value::{checked_product, periods_to_payoff};
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, MONTHS_PER_YEAR};
use crate::MortgageResult;

use super::extra_payment::MAX_PAYOFF_MONTHS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffInput {
    pub principal: Money,
    pub annual_rate: RateInput,
    /// Fixed principal-and-interest payment.
    pub monthly_payment: Money,
    #[serde(default)]
    pub down_payment: AmountInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoffMonth {
    pub month: u32,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffOutput {
    pub financed_amount: Money,
    /// Whole months, rounded up from the closed-form solution.
    pub months: u32,
    pub years: u32,
    pub remaining_months: u32,
    /// Sum of the payments actually made; the last one is only as large as
    /// the remaining balance plus its interest.
    pub total_paid: Money,
    pub total_interest: Money,
    pub monthly_detail: Vec<PayoffMonth>,
}

/// How long a fixed monthly payment takes to retire the loan.
///
/// The month count comes from `n = -ln(1 - rP/pmt) / ln(1 + r)` rounded up;
/// the detail rows replay the payments with cent rounding.
pub fn compute_payoff_timeline(input: &PayoffInput) -> MortgageResult<ComputationOutput<PayoffOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_principal(input.principal)?;
    if input.monthly_payment <= Decimal::ZERO {
        return Err(MortgageError::invalid("monthly_payment", "Monthly payment must be positive"));
    }
    validate_amount(input.monthly_payment, "monthly_payment")?;
    let down_payment = resolve_down_payment(input.principal, input.down_payment)?;
    let financed = input.principal - down_payment;
    let monthly_rate = resolve_rate(input.annual_rate, "annual_rate")? / Decimal::from(MONTHS_PER_YEAR);

    let exact = periods_to_payoff(financed, monthly_rate, input.monthly_payment).map_err(|e| match e {
        MortgageError::NonConvergent { .. } => MortgageError::NonConvergent {
            function: "compute_payoff_timeline: payment does not cover interest".into(),
            iterations: 0,
            remaining_balance: financed,
        },
        other => other,
    })?;

    let months = exact
        .ceil()
        .to_u32()
        .filter(|m| *m <= MAX_PAYOFF_MONTHS)
        .ok_or_else(|| MortgageError::NonConvergent {
            function: "compute_payoff_timeline".into(),
            iterations: MAX_PAYOFF_MONTHS,
            remaining_balance: financed,
        })?;

    let mut monthly_detail = Vec::with_capacity(months as usize);
    let mut balance = round_cents(financed);
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    for month in 1..=months {
        if balance.is_zero() {
            break;
        }
        let interest = round_cents(checked_product(balance, monthly_rate, "annual_rate")?);
        let principal = round_cents(input.monthly_payment - interest).min(balance);
        balance -= principal;
        total_paid += principal + interest;
        total_interest += interest;
        monthly_detail.push(PayoffMonth {
            month,
            interest,
            principal,
            balance,
        });
    }

    // Cent rounding can retire the balance before the closed-form count
    let months = monthly_detail.len() as u32;
    if !balance.is_zero() {
        warnings.push(format!(
            "Cent rounding leaves {balance} outstanding after month {months}"
        ));
    }

    let output = PayoffOutput {
        financed_amount: financed,
        months,
        years: months / MONTHS_PER_YEAR,
        remaining_months: months % MONTHS_PER_YEAR,
        total_paid,
        total_interest,
        monthly_detail,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-Form Payoff Timeline (logarithmic NPER)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
