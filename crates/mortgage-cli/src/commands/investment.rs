use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_core::investment::{self, GrowthInput};
use mortgage_core::RateInput;

use crate::input::{self, required};

/// Arguments for annual compound growth
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct GrowArgs {
    /// Starting amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate of return (0.07 or 7%)
    #[arg(long)]
    pub rate: Option<RateInput>,

    /// Years to project
    #[arg(long)]
    pub years: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_grow(args: GrowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input: GrowthInput = match input::from_file_or_stdin(args.input.as_deref())? {
        Some(i) => i,
        None => GrowthInput {
            principal: required(args.principal, "principal")?,
            annual_rate: required(args.rate, "rate")?,
            years: required(args.years, "years")?,
        },
    };
    let result = investment::project_growth(&growth_input)?;
    Ok(serde_json::to_value(result)?)
}
