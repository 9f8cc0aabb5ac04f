use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use amortize_core::depreciation::{self, DepreciationInput, DepreciationMethod};

use super::{load_input, to_value};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Sum-of-years-digits
    Syd,
    /// Straight-line
    StraightLine,
    /// Declining balance at `--factor` times the straight-line rate
    DecliningBalance,
}

/// Arguments for a depreciation schedule
#[derive(Args)]
pub struct DepreciationArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Asset cost
    #[arg(long)]
    pub cost: Option<Decimal>,

    /// Salvage value at the end of the useful life
    #[arg(long)]
    pub salvage: Option<Decimal>,

    /// Useful life in years
    #[arg(long)]
    pub life: Option<u32>,

    /// Depreciation method
    #[arg(long, value_enum, default_value = "syd")]
    pub method: MethodArg,

    /// Declining-balance factor (2 = double declining)
    #[arg(long)]
    pub factor: Option<Decimal>,

    /// Switch declining balance to straight-line once that is larger
    #[arg(long)]
    pub switch: bool,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dep_input: DepreciationInput = load_input(args.input.as_deref(), || {
        let method = match args.method {
            MethodArg::Syd => DepreciationMethod::SumOfYearsDigits,
            MethodArg::StraightLine => DepreciationMethod::StraightLine,
            MethodArg::DecliningBalance => DepreciationMethod::DecliningBalance {
                factor: args.factor.unwrap_or(dec!(2)),
                switch_to_straight_line: args.switch,
            },
        };
        Ok(DepreciationInput {
            cost: args.cost.ok_or("--cost is required (or provide --input)")?,
            salvage_value: args.salvage.unwrap_or(Decimal::ZERO),
            useful_life_years: args.life.ok_or("--life is required (or provide --input)")?,
            method,
        })
    })?;
    to_value(depreciation::depreciation_schedule(&dep_input)?)
}
