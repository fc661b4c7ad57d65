use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::refinance::break_even::{self, BreakEvenInput};
use mortgage_core::refinance::comparison::{self, RefinanceInput};
use mortgage_core::{AmountInput, RateInput};

use crate::config::MortgageConfig;
use crate::input::{self, required};

/// Arguments for an old-rate vs new-rate comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RefinanceArgs {
    /// Purchase price before the down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Current annual rate (0.065 or 6.5%)
    #[arg(long)]
    pub old_rate: Option<RateInput>,

    /// Candidate annual rate (0.055 or 5.5%)
    #[arg(long)]
    pub new_rate: Option<RateInput>,

    /// Loan term in years
    #[arg(long)]
    pub years: Option<u32>,

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

    /// Closing costs; adds a break-even estimate
    #[arg(long)]
    pub refinancing_cost: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the refinance break-even point
#[derive(Args)]
pub struct BreakEvenArgs {
    /// Current monthly payment
    #[arg(long)]
    pub old_payment: Option<Decimal>,

    /// Monthly payment after refinancing
    #[arg(long)]
    pub new_payment: Option<Decimal>,

    /// Closing costs and fees of the refinance
    #[arg(long)]
    pub refinancing_cost: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_refinance(args: RefinanceArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let refi_input: RefinanceInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(i) => i,
        None => {
            let (tax_rate, insurance_rate) =
                config.escrow(args.region.as_deref(), args.tax_rate, args.insurance_rate)?;
            RefinanceInput {
                principal: required(args.principal, "principal")?,
                old_rate: required(args.old_rate, "old_rate")?,
                new_rate: required(args.new_rate, "new_rate")?,
                years: required(args.years, "years")?,
                down_payment: config.down_payment(args.down_payment),
                tax_rate,
                insurance_rate,
                refinancing_cost: args.refinancing_cost.or(config.defaults.refinancing_cost),
            }
        }
    };
    let result = comparison::compute_refinance_comparison(&refi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_break_even(args: BreakEvenArgs, config: &MortgageConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let be_input: BreakEvenInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(i) => i,
        None => BreakEvenInput {
            old_payment: required(args.old_payment, "old_payment")?,
            new_payment: required(args.new_payment, "new_payment")?,
            refinancing_cost: required(
                args.refinancing_cost.or(config.defaults.refinancing_cost),
                "refinancing_cost",
            )?,
        },
    };
    let result = break_even::compute_break_even_months(&be_input)?;
    Ok(serde_json::to_value(result)?)
}
