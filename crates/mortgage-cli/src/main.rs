mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::amortization::{PaymentArgs, ScheduleArgs, TotalCostArgs};
use commands::investment::GrowArgs;
use commands::prepayment::{PayoffArgs, PrepayArgs};
use commands::refinance::{BreakEvenArgs, RefinanceArgs};
use config::MortgageConfig;

/// Fixed-rate mortgage calculations
#[derive(Parser)]
#[command(
    name = "mtg",
    version,
    about = "Fixed-rate mortgage calculations",
    long_about = "A CLI for fixed-rate mortgage calculations with decimal precision. \
                  Supports monthly payments, amortization schedules, total cost of \
                  ownership, refinance comparison, break-even and prepayment payoff."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format [default: json, or `output` from the config file]
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Config file [default: ./mtg.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly principal-and-interest payment
    Payment(PaymentArgs),
    /// Print the month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Total cost of the loan including tax, insurance and down payment
    TotalCost(TotalCostArgs),
    /// Compare the loan at its current rate against a new rate
    Refinance(RefinanceArgs),
    /// Months until refinance savings recover the closing costs
    BreakEven(BreakEvenArgs),
    /// Payoff time and interest with an extra monthly payment
    Prepay(PrepayArgs),
    /// Payoff timeline for a fixed monthly payment
    Payoff(PayoffArgs),
    /// Project annual compound growth of an investment
    Grow(GrowArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "mortgage_core=debug,mtg=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout carries the result; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config: &MortgageConfig) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    match command {
        Commands::Payment(args) => commands::amortization::run_payment(args, config),
        Commands::Schedule(args) => commands::amortization::run_schedule(args, config),
        Commands::TotalCost(args) => commands::amortization::run_total_cost(args, config),
        Commands::Refinance(args) => commands::refinance::run_refinance(args, config),
        Commands::BreakEven(args) => commands::refinance::run_break_even(args, config),
        Commands::Prepay(args) => commands::prepayment::run_prepay(args, config),
        Commands::Payoff(args) => commands::prepayment::run_payoff(args, config),
        Commands::Grow(args) => commands::investment::run_grow(args),
        Commands::Version => Ok(serde_json::json!({ "version": env!("CARGO_PKG_VERSION") })),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("mtg {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    init_logging(cli.verbose);

    let config = match MortgageConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let format = cli.output.or(config.output).unwrap_or(OutputFormat::Json);

    match run(cli.command, &config) {
        Ok(value) => {
            output::format_output(format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
