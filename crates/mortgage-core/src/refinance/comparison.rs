use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::break_even::{break_even, BreakEvenOutput};
use crate::amortization::ledger::Ledger;
use crate::error::MortgageError;
use crate::loan::effective::resolve_rate;
use crate::loan::{AmountInput, EffectiveLoan, LoanParameters, RateInput};
use crate::types::{round_cents, with_metadata, ComputationOutput, Money};
use crate::MortgageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceInput {
    pub principal: Money,
    pub old_rate: RateInput,
    pub new_rate: RateInput,
    pub years: u32,
    #[serde(default)]
    pub down_payment: AmountInput,
    #[serde(default)]
    pub tax_rate: Option<RateInput>,
    #[serde(default)]
    pub insurance_rate: Option<RateInput>,
    /// When present, the break-even point is computed as well.
    #[serde(default)]
    pub refinancing_cost: Option<Money>,
}

/// Totals for one side of the comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTotals {
    /// Level payment including escrow, rounded to cents.
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// Principal plus interest over the term.
    pub total_paid: Money,
    pub periods: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinanceOutput {
    pub financed_amount: Money,
    pub old: LoanTotals,
    pub new: LoanTotals,
    pub monthly_savings: Money,
    /// `old.total_paid - new.total_paid`; negative when the new rate costs more.
    pub total_savings: Money,
    /// `old.total_interest - new.total_interest`.
    pub interest_savings: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_even: Option<BreakEvenOutput>,
}

/// Compare total principal and interest under the current and a candidate
/// rate, holding the financed amount, term and escrow fixed.
pub fn compute_refinance_comparison(
    input: &RefinanceInput,
) -> MortgageResult<ComputationOutput<RefinanceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let old_loan = LoanParameters {
        principal: input.principal,
        annual_rate: input.old_rate,
        years: input.years,
        down_payment: input.down_payment,
        tax_rate: input.tax_rate,
        insurance_rate: input.insurance_rate,
        start_date: None,
    }
    .normalize()?;
    let new_loan = old_loan.with_annual_rate(resolve_rate(input.new_rate, "new_rate")?)?;

    let old = totals(&old_loan);
    let new = totals(&new_loan);
    let monthly_savings = old.monthly_payment - new.monthly_payment;
    let total_savings = old.total_paid - new.total_paid;
    let interest_savings = old.total_interest - new.total_interest;

    if new_loan.annual_rate >= old_loan.annual_rate {
        warnings.push(format!(
            "New rate {} is not below the current rate {}; refinancing does not reduce interest",
            new_loan.annual_rate, old_loan.annual_rate
        ));
    }

    let break_even = match input.refinancing_cost {
        Some(cost) => match break_even(old.monthly_payment, new.monthly_payment, cost) {
            Ok(b) => Some(b),
            Err(MortgageError::NoBreakEven { .. }) => {
                warnings.push("No break-even: the new payment is not lower".into());
                None
            }
            Err(e) => return Err(e),
        },
        None => None,
    };

    debug!(
        old_total = %old.total_paid,
        new_total = %new.total_paid,
        "refinance comparison"
    );

    let output = RefinanceOutput {
        financed_amount: old_loan.financed_amount,
        old,
        new,
        monthly_savings,
        total_savings,
        interest_savings,
        break_even,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Refinance Comparison (level-payment schedules at old and new rate)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn totals(loan: &EffectiveLoan) -> LoanTotals {
    let (principal, interest, periods) = Ledger::new(loan).fold(
        (Decimal::ZERO, Decimal::ZERO, 0u32),
        |(p, i, n), entry| (p + entry.principal, i + entry.interest, n + 1),
    );
    LoanTotals {
        monthly_payment: round_cents(loan.monthly_payment()),
        total_interest: interest,
        total_paid: principal + interest,
        periods,
    }
}
