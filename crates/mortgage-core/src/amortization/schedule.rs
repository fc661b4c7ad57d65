use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use super::ledger::{Ledger, PeriodLedgerEntry};
use crate::error::MortgageError;
use crate::loan::LoanParameters;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

/// Full fixed-payment schedule for one loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub financed_amount: Money,
    /// Level payment including escrow, rounded to cents.
    pub monthly_payment: Money,
    /// Principal-and-interest part of `monthly_payment`.
    pub principal_and_interest: Money,
    pub monthly_tax: Money,
    pub monthly_insurance: Money,
    /// Periods in the loan term (years * 12).
    pub scheduled_periods: u32,
    /// Periods actually in `entries`.
    pub periods: u32,
    /// True when the balance reached zero before the last scheduled period.
    pub terminated_early: bool,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_tax: Money,
    pub total_insurance: Money,
    pub total_paid: Money,
    pub final_balance: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub entries: Vec<PeriodLedgerEntry>,
}

/// Build the month-by-month schedule for a fixed-rate loan.
pub fn compute_amortization_schedule(
    input: &LoanParameters,
) -> MortgageResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = input.normalize()?;

    let mut entries: Vec<PeriodLedgerEntry> = Ledger::new(&loan).collect();
    if let Some(first_date) = loan.start_date {
        for entry in entries.iter_mut() {
            entry.payment_date = Some(payment_date(first_date, entry.period)?);
        }
    }

    let periods = entries.len() as u32;
    let terminated_early = periods < loan.total_periods;
    let final_balance = entries.last().map_or(loan.financed_amount, |e| e.balance);

    if terminated_early {
        warn!(periods, scheduled = loan.total_periods, "schedule terminated early");
        warnings.push(format!(
            "Balance reached zero after {periods} of {} scheduled periods",
            loan.total_periods
        ));
    } else if !final_balance.is_zero() {
        warnings.push(format!(
            "Cent rounding leaves a residual balance of {final_balance} after the final period"
        ));
    }

    let sum = |f: fn(&PeriodLedgerEntry) -> Money| entries.iter().map(f).sum::<Decimal>();
    let total_principal = sum(|e| e.principal);
    let total_interest = sum(|e| e.interest);
    let total_tax = sum(|e| e.tax);
    let total_insurance = sum(|e| e.insurance);

    debug!(periods, total_interest = %total_interest, "amortization schedule built");

    let output = AmortizationSchedule {
        financed_amount: loan.financed_amount,
        monthly_payment: round_cents(loan.monthly_payment()),
        principal_and_interest: round_cents(loan.principal_and_interest),
        monthly_tax: round_cents(loan.monthly_tax),
        monthly_insurance: round_cents(loan.monthly_insurance),
        scheduled_periods: loan.total_periods,
        periods,
        terminated_early,
        total_principal,
        total_interest,
        total_tax,
        total_insurance,
        total_paid: total_principal + total_interest + total_tax + total_insurance,
        final_balance,
        payoff_date: entries.last().and_then(|e| e.payment_date),
        entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortization Schedule (cent-rounded)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Date of `period` (1-based) when the first payment falls on `first`.
/// Day-of-month clamps to the end of shorter months.
pub fn payment_date(first: NaiveDate, period: u32) -> MortgageResult<NaiveDate> {
    first
        .checked_add_months(Months::new(period.saturating_sub(1)))
        .ok_or_else(|| {
            MortgageError::DateError(format!("Payment date for period {period} is out of range"))
        })
}
