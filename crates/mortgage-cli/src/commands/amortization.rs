use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::amortization::payment::{self, MonthlyPaymentInput};
use mortgage_core::amortization::{schedule, total_cost};
use mortgage_core::{AmountInput, LoanParameters, RateInput};

use crate::config::MortgageConfig;
use crate::input::{self, required};

/// Loan terms shared by the schedule and total-cost commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Purchase price before the down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate, as a fraction (0.05) or percentage (5%)
    #[arg(long, alias = "annual-rate")]
    pub rate: Option<RateInput>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Down payment, absolute (20000) or percent of principal (10%)
    #[arg(long)]
    pub down_payment: Option<AmountInput>,

    /// Annual property-tax rate on the financed amount
    #[arg(long)]
    pub tax_rate: Option<RateInput>,

    /// Annual insurance rate on the financed amount
    #[arg(long)]
    pub insurance_rate: Option<RateInput>,

    /// Take tax and insurance rates for this region from the rates file
    #[arg(long)]
    pub region: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the bare monthly payment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaymentArgs {
    /// Purchase price before the down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate, as a fraction (0.05) or percentage (5%)
    #[arg(long, alias = "annual-rate")]
    pub rate: Option<RateInput>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Down payment, absolute (20000) or percent of principal (10%)
    #[arg(long)]
    pub down_payment: Option<AmountInput>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Date of the first payment (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for total cost of ownership
#[derive(Args)]
pub struct TotalCostArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

impl LoanArgs {
    pub fn into_parameters(
        self,
        config: &MortgageConfig,
        start_date: Option<NaiveDate>,
    ) -> Result<LoanParameters, Box<dyn std::error::Error>> {
        if let Some(params) = input::from_file_or_stdin::<LoanParameters>(self.input.as_deref())? {
            return Ok(params);
        }

        let (tax_rate, insurance_rate) =
            config.escrow(self.region.as_deref(), self.tax_rate, self.insurance_rate)?;
        Ok(LoanParameters {
            principal: required(self.principal, "principal")?,
            annual_rate: required(self.rate, "rate")?,
            years: required(self.years, "years")?,
            down_payment: config.down_payment(self.down_payment),
            tax_rate,
            insurance_rate,
            start_date,
        })
    }
}

pub fn run_payment(args: PaymentArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: MonthlyPaymentInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(i) => i,
        None => MonthlyPaymentInput {
            principal: required(args.principal, "principal")?,
            annual_rate: required(args.rate, "rate")?,
            years: required(args.years, "years")?,
            down_payment: config.down_payment(args.down_payment),
        },
    };
    let result = payment::compute_monthly_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.into_parameters(config, args.start_date)?;
    let result = schedule::compute_amortization_schedule(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_total_cost(args: TotalCostArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let params = args.loan.into_parameters(config, None)?;
    let result = total_cost::compute_total_cost(&params)?;
    Ok(serde_json::to_value(result)?)
}
