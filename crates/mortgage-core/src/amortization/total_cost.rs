use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::ledger::Ledger;
use crate::loan::LoanParameters;
use crate::types::{format_money, with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

/// One category of the total-cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub amount: Money,
    /// `amount` as `1,234.56`.
    pub formatted: String,
}

impl CostLine {
    fn new(amount: Money) -> Self {
        CostLine {
            amount,
            formatted: format_money(amount),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub principal: CostLine,
    pub interest: CostLine,
    pub tax: CostLine,
    pub insurance: CostLine,
    pub down_payment: CostLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalCostOutput {
    pub total_cost: Money,
    /// `total_cost` as `1,234.56`.
    pub formatted_total_cost: String,
    pub breakdown: CostBreakdown,
    /// Months actually paid (may be below the term on early payoff).
    pub months_paid: u32,
}

#[derive(Default)]
struct RunningTotals {
    principal: Money,
    interest: Money,
    tax: Money,
    insurance: Money,
    months: u32,
}

/// Total cost of ownership over the loan term.
///
/// Replays the schedule recurrence accumulating principal, interest, tax
/// and insurance without keeping the rows. Tax and insurance are fixed at
/// the rate applied to the original financed amount for every month; they
/// are not re-assessed on the declining balance.
pub fn compute_total_cost(input: &LoanParameters) -> MortgageResult<ComputationOutput<TotalCostOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = input.normalize()?;
    if input.tax_rate.is_none() && input.insurance_rate.is_none() {
        warnings.push("No tax or insurance rate supplied: escrow excluded from total cost".into());
    }

    let totals = Ledger::new(&loan).fold(RunningTotals::default(), |mut acc, entry| {
        acc.principal += entry.principal;
        acc.interest += entry.interest;
        acc.tax += entry.tax;
        acc.insurance += entry.insurance;
        acc.months += 1;
        acc
    });

    let total_cost: Decimal =
        totals.principal + totals.interest + totals.tax + totals.insurance + loan.down_payment;

    let output = TotalCostOutput {
        total_cost,
        formatted_total_cost: format_money(total_cost),
        breakdown: CostBreakdown {
            principal: CostLine::new(totals.principal),
            interest: CostLine::new(totals.interest),
            tax: CostLine::new(totals.tax),
            insurance: CostLine::new(totals.insurance),
            down_payment: CostLine::new(loan.down_payment),
        },
        months_paid: totals.months,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Total Cost of Ownership (fixed escrow on financed amount)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
