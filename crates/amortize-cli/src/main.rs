mod commands;
mod input;
mod logging;
mod output;

use amortize_core::types::Currency;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::depreciation::DepreciationArgs;
use commands::loans::{ArmArgs, GraduatedArgs, ProjectArgs, ScheduleArgs};
use commands::tiered::TieredArgs;

/// Loan amortization, ARM and depreciation projections
#[derive(Parser)]
#[command(
    name = "amz",
    version,
    about = "Loan amortization, ARM and depreciation projections",
    long_about = "A CLI for period-by-period loan projections with decimal precision. \
                  Supports fixed-rate amortization schedules, adjustable-rate mortgages \
                  with periodic and lifetime caps, graduated payment mortgages, \
                  depreciation schedules and tiered-rate interest."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency used when formatting amounts in table and minimal output
    #[arg(long, default_value = "usd", global = true)]
    currency: CurrencyArg,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed-rate amortization schedule
    Schedule(ScheduleArgs),
    /// Adjustable-rate mortgage projection
    Arm(ArmArgs),
    /// Graduated payment mortgage projection
    Graduated(GraduatedArgs),
    /// Run the period projector on explicit rate regimes
    Project(ProjectArgs),
    /// Depreciation schedule (sum-of-years-digits, straight-line, declining balance)
    Depreciation(DepreciationArgs),
    /// Tiered-rate interest projection
    Tiered(TieredArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CurrencyArg {
    Usd,
    Gbp,
    Eur,
    Chf,
    Jpy,
    Cad,
    Aud,
    Inr,
}

impl From<CurrencyArg> for Currency {
    fn from(c: CurrencyArg) -> Self {
        match c {
            CurrencyArg::Usd => Currency::USD,
            CurrencyArg::Gbp => Currency::GBP,
            CurrencyArg::Eur => Currency::EUR,
            CurrencyArg::Chf => Currency::CHF,
            CurrencyArg::Jpy => Currency::JPY,
            CurrencyArg::Cad => Currency::CAD,
            CurrencyArg::Aud => Currency::AUD,
            CurrencyArg::Inr => Currency::INR,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let _logger = logging::init(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::loans::run_schedule(args),
        Commands::Arm(args) => commands::loans::run_arm(args),
        Commands::Graduated(args) => commands::loans::run_graduated(args),
        Commands::Project(args) => commands::loans::run_project(args),
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::Tiered(args) => commands::tiered::run_tiered(args),
        Commands::Version => {
            println!("amz {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &cli.currency.into(), &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
