use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loan::{AmountInput, LoanParameters, RateInput};
use crate::types::{format_money, round_cents, with_metadata, ComputationOutput, Money, Rate};
use crate::MortgageResult;

/// Input for the bare monthly payment (no escrow).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyPaymentInput {
    pub principal: Money,
    pub annual_rate: RateInput,
    pub years: u32,
    #[serde(default)]
    pub down_payment: AmountInput,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyPaymentOutput {
    /// Level principal-and-interest payment, rounded to cents.
    pub monthly_payment: Money,
    /// `monthly_payment` as `$1,234.56`.
    pub formatted_payment: String,
    pub financed_amount: Money,
    pub down_payment: Money,
    pub monthly_rate: Rate,
    pub total_periods: u32,
    /// Sum of all scheduled payments at the rounded amount.
    pub total_of_payments: Money,
}

/// Level monthly payment on `principal - down_payment`.
///
/// Positive rates use the annuity formula; a zero rate is straight-line
/// (`financed / (years * 12)`). Escrow is not included.
pub fn compute_monthly_payment(
    input: &MonthlyPaymentInput,
) -> MortgageResult<ComputationOutput<MonthlyPaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = LoanParameters::new(input.principal, input.annual_rate, input.years, input.down_payment)
        .normalize()?;

    let methodology = if loan.is_zero_rate() {
        warnings.push("Zero interest rate: payment is straight-line principal only".into());
        "Straight-Line Repayment (zero rate)"
    } else {
        "Level-Payment Annuity"
    };

    let monthly_payment = round_cents(loan.principal_and_interest);
    let output = MonthlyPaymentOutput {
        monthly_payment,
        formatted_payment: format!("${}", format_money(monthly_payment)),
        financed_amount: loan.financed_amount,
        down_payment: loan.down_payment,
        monthly_rate: loan.monthly_rate,
        total_periods: loan.total_periods,
        total_of_payments: monthly_payment * Decimal::from(loan.total_periods),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, warnings, elapsed, output))
}
