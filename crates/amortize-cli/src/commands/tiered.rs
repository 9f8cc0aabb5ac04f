use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use amortize_core::tiered::{self, TierMode, TieredInput};

use super::{load_input, to_value};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TierModeArg {
    /// Each tier's rate applies to the slice of balance inside it
    Marginal,
    /// The rate of the tier holding the whole balance applies to all of it
    Flat,
}

impl From<TierModeArg> for TierMode {
    fn from(m: TierModeArg) -> Self {
        match m {
            TierModeArg::Marginal => TierMode::Marginal,
            TierModeArg::Flat => TierMode::Flat,
        }
    }
}

/// Arguments for a tiered-rate interest projection.
/// Custom tier tables are only accepted through `--input`.
#[derive(Args)]
pub struct TieredArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Opening balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// How tier rates apply to the balance
    #[arg(long, value_enum, default_value = "marginal")]
    pub mode: TierModeArg,

    /// Years to project
    #[arg(long, default_value_t = 1)]
    pub years: u32,

    /// Deposit added at the end of each month
    #[arg(long)]
    pub contribution: Option<Decimal>,
}

pub fn run_tiered(args: TieredArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tiered_input: TieredInput = load_input(args.input.as_deref(), || {
        Ok(TieredInput {
            balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            tiers: Vec::new(),
            mode: args.mode.into(),
            years: args.years,
            monthly_contribution: args.contribution.unwrap_or(Decimal::ZERO),
        })
    })?;
    to_value(tiered::tiered_interest(&tiered_input)?)
}
