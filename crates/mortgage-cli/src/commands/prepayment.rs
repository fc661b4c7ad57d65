use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::prepayment::extra_payment::{self, PrepaymentInput};
use mortgage_core::prepayment::payoff::{self, PayoffInput};
use mortgage_core::{AmountInput, RateInput};

use crate::config::MortgageConfig;
use crate::input::{self, required};

/// Arguments for the extra-payment payoff simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PrepayArgs {
    /// Purchase price before the down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate, as a fraction (0.05) or percentage (5%)
    #[arg(long, alias = "annual-rate")]
    pub rate: Option<RateInput>,

    /// Regular monthly payment including escrow
    #[arg(long)]
    pub base_payment: Option<Decimal>,

    /// Extra principal paid every month
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// Down payment, absolute or percent of principal
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

/// Arguments for the closed-form payoff timeline
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PayoffArgs {
    /// Purchase price before the down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate, as a fraction (0.05) or percentage (5%)
    #[arg(long, alias = "annual-rate")]
    pub rate: Option<RateInput>,

    /// Fixed principal-and-interest payment
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Down payment, absolute or percent of principal
    #[arg(long)]
    pub down_payment: Option<AmountInput>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_prepay(args: PrepayArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let prepay_input: PrepaymentInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(i) => i,
        None => {
            let (tax_rate, insurance_rate) =
                config.escrow(args.region.as_deref(), args.tax_rate, args.insurance_rate)?;
            PrepaymentInput {
                principal: required(args.principal, "principal")?,
                annual_rate: required(args.rate, "rate")?,
                tax_rate,
                insurance_rate,
                base_payment: required(args.base_payment, "base_payment")?,
                down_payment: config.down_payment(args.down_payment),
                extra_payment: args.extra_payment,
            }
        }
    };
    let result = extra_payment::simulate_prepayment(&prepay_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payoff(args: PayoffArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: PayoffInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(i) => i,
        None => PayoffInput {
            principal: required(args.principal, "principal")?,
            annual_rate: required(args.rate, "rate")?,
            monthly_payment: required(args.monthly_payment, "monthly_payment")?,
            down_payment: config.down_payment(args.down_payment),
        },
    };
    let result = payoff::compute_payoff_timeline(&payoff_input)?;
    Ok(serde_json::to_value(result)?)
}
