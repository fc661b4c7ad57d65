use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::inputs::{AmountInput, RateInput};
use crate::error::MortgageError;
use crate::time_value::{checked_product, level_payment};
use crate::types::{Money, Rate, MONTHS_PER_YEAR};
use crate::MortgageResult;

/// Longest term accepted, in years.
pub const MAX_TERM_YEARS: u32 = 100;

/// Largest principal or payment accepted (one quadrillion).
pub const MAX_AMOUNT: Money = dec!(1000000000000000);

/// Largest annual rate accepted, as a fraction (1000%).
pub const MAX_ANNUAL_RATE: Rate = dec!(10);

/// Loan terms as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Purchase price / original principal before the down payment.
    pub principal: Money,
    /// Annual nominal rate, e.g. `0.05` or `"5%"`.
    pub annual_rate: RateInput,
    /// Loan term in whole years.
    pub years: u32,
    /// Absolute amount or percentage of `principal`.
    #[serde(default)]
    pub down_payment: AmountInput,
    /// Annual property-tax rate on the financed amount.
    #[serde(default)]
    pub tax_rate: Option<RateInput>,
    /// Annual insurance rate on the financed amount.
    #[serde(default)]
    pub insurance_rate: Option<RateInput>,
    /// Date of the first payment.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Loan after normalization. Immutable; every calculation reads from it and
/// none writes back, so the down payment is subtracted exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveLoan {
    pub principal: Money,
    pub down_payment: Money,
    pub financed_amount: Money,
    pub annual_rate: Rate,
    pub monthly_rate: Rate,
    pub years: u32,
    pub total_periods: u32,
    pub annual_tax_rate: Rate,
    pub annual_insurance_rate: Rate,
    /// Fixed for the life of the loan: financed amount * tax rate / 12.
    pub monthly_tax: Money,
    /// Fixed for the life of the loan: financed amount * insurance rate / 12.
    pub monthly_insurance: Money,
    /// Unrounded level principal-and-interest payment.
    pub principal_and_interest: Money,
    pub start_date: Option<NaiveDate>,
}

impl LoanParameters {
    /// Loan without escrow or start date.
    pub fn new(principal: Money, annual_rate: RateInput, years: u32, down_payment: AmountInput) -> Self {
        LoanParameters {
            principal,
            annual_rate,
            years,
            down_payment,
            tax_rate: None,
            insurance_rate: None,
            start_date: None,
        }
    }

    /// Validate and resolve into an [`EffectiveLoan`].
    pub fn normalize(&self) -> MortgageResult<EffectiveLoan> {
        validate_principal(self.principal)?;
        validate_term(self.years)?;
        let annual_rate = resolve_rate(self.annual_rate, "annual_rate")?;
        let down_payment = resolve_down_payment(self.principal, self.down_payment)?;
        let annual_tax_rate = resolve_optional_rate(self.tax_rate, "tax_rate")?;
        let annual_insurance_rate = resolve_optional_rate(self.insurance_rate, "insurance_rate")?;

        let loan = EffectiveLoan::build(
            self.principal,
            down_payment,
            annual_rate,
            self.years,
            annual_tax_rate,
            annual_insurance_rate,
            self.start_date,
        )?;

        debug!(
            financed = %loan.financed_amount,
            monthly_rate = %loan.monthly_rate,
            periods = loan.total_periods,
            payment = %loan.monthly_payment(),
            "normalized loan"
        );
        Ok(loan)
    }
}

impl EffectiveLoan {
    fn build(
        principal: Money,
        down_payment: Money,
        annual_rate: Rate,
        years: u32,
        annual_tax_rate: Rate,
        annual_insurance_rate: Rate,
        start_date: Option<NaiveDate>,
    ) -> MortgageResult<Self> {
        let months = Decimal::from(MONTHS_PER_YEAR);
        let financed_amount = principal - down_payment;
        let monthly_rate = annual_rate / months;
        let total_periods = years * MONTHS_PER_YEAR;

        Ok(EffectiveLoan {
            principal,
            down_payment,
            financed_amount,
            annual_rate,
            monthly_rate,
            years,
            total_periods,
            annual_tax_rate,
            annual_insurance_rate,
            monthly_tax: checked_product(financed_amount, annual_tax_rate, "tax_rate")? / months,
            monthly_insurance: checked_product(financed_amount, annual_insurance_rate, "insurance_rate")?
                / months,
            principal_and_interest: level_payment(financed_amount, monthly_rate, total_periods)?,
            start_date,
        })
    }

    /// Same loan re-priced at a different annual rate. Financed amount, term
    /// and escrow are unchanged.
    pub fn with_annual_rate(&self, annual_rate: Rate) -> MortgageResult<Self> {
        validate_rate(annual_rate, "annual_rate")?;
        EffectiveLoan::build(
            self.principal,
            self.down_payment,
            annual_rate,
            self.years,
            self.annual_tax_rate,
            self.annual_insurance_rate,
            self.start_date,
        )
    }

    pub fn monthly_escrow(&self) -> Money {
        self.monthly_tax + self.monthly_insurance
    }

    /// Level principal-and-interest plus escrow, unrounded.
    pub fn monthly_payment(&self) -> Money {
        self.principal_and_interest + self.monthly_escrow()
    }

    pub fn is_zero_rate(&self) -> bool {
        self.monthly_rate.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Shared validation, also used by entry points that do not carry a term
// ---------------------------------------------------------------------------

pub(crate) fn validate_principal(principal: Money) -> MortgageResult<()> {
    if principal <= Decimal::ZERO {
        return Err(MortgageError::invalid("principal", "Principal must be positive"));
    }
    validate_amount(principal, "principal")
}

/// Upper bound shared by principals and payments; the sign is checked by
/// each caller.
pub(crate) fn validate_amount(amount: Money, field: &str) -> MortgageResult<()> {
    if amount > MAX_AMOUNT {
        return Err(MortgageError::invalid(field, format!("Amount cannot exceed {MAX_AMOUNT}")));
    }
    Ok(())
}

fn validate_term(years: u32) -> MortgageResult<()> {
    if years == 0 {
        return Err(MortgageError::invalid("years", "Loan term must be at least one year"));
    }
    if years > MAX_TERM_YEARS {
        return Err(MortgageError::invalid(
            "years",
            format!("Loan term cannot exceed {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(())
}

/// Resolve a rate; zero is allowed, negative is not.
pub(crate) fn resolve_rate(input: RateInput, field: &str) -> MortgageResult<Rate> {
    let rate = input.to_fraction();
    validate_rate(rate, field)?;
    Ok(rate)
}

fn validate_rate(rate: Rate, field: &str) -> MortgageResult<()> {
    if rate < Decimal::ZERO {
        return Err(MortgageError::invalid(field, "Rate cannot be negative"));
    }
    if rate > MAX_ANNUAL_RATE {
        return Err(MortgageError::invalid(field, "Rate cannot exceed 1000% a year"));
    }
    Ok(())
}

pub(crate) fn resolve_optional_rate(input: Option<RateInput>, field: &str) -> MortgageResult<Rate> {
    input.map_or(Ok(Decimal::ZERO), |r| resolve_rate(r, field))
}

/// Resolve the down payment and require it to leave something to finance.
pub(crate) fn resolve_down_payment(principal: Money, input: AmountInput) -> MortgageResult<Money> {
    let down_payment = input.resolve(principal)?;
    if down_payment < Decimal::ZERO {
        return Err(MortgageError::invalid("down_payment", "Down payment cannot be negative"));
    }
    if down_payment >= principal {
        return Err(MortgageError::invalid(
            "down_payment",
            "Down payment must be less than the principal",
        ));
    }
    Ok(down_payment)
}
