use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use amortize_core::loans::arm::{self, ArmInput};
use amortize_core::loans::graduated::{self, GraduatedInput};
use amortize_core::loans::schedule::{self, ScheduleInput};
use amortize_core::projection::{self, ProjectionInput};
use amortize_core::types::PaymentFrequency;

use super::{load_input, to_value};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Weekly => PaymentFrequency::Weekly,
            FrequencyArg::Biweekly => PaymentFrequency::BiWeekly,
            FrequencyArg::SemiMonthly => PaymentFrequency::SemiMonthly,
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::Quarterly => PaymentFrequency::Quarterly,
            FrequencyArg::SemiAnnual => PaymentFrequency::SemiAnnual,
            FrequencyArg::Annual => PaymentFrequency::Annual,
        }
    }
}

/// Arguments for a fixed-rate amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate as a decimal (0.06 = 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Extra principal paid every period
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Show one row per year instead of one per payment
    #[arg(long)]
    pub annual: bool,

    /// First day of the loan (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = load_input(args.input.as_deref(), || {
        let frequency = PaymentFrequency::from(args.frequency);
        Ok(ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years.ok_or("--years is required (or provide --input)")?,
            frequency,
            extra_payment: args.extra.unwrap_or(Decimal::ZERO),
            reporting_interval: args.annual.then(|| frequency.periods_per_year()),
            start_date: args.start_date,
        })
    })?;
    to_value(schedule::amortization_schedule(&schedule_input)?)
}

/// Arguments for an adjustable-rate mortgage projection
#[derive(Args)]
pub struct ArmArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Initial (fixed-period) rate as a decimal
    #[arg(long)]
    pub initial_rate: Option<Decimal>,

    /// Term in years
    #[arg(long, default_value_t = 30)]
    pub years: u32,

    /// Initial fixed period in years
    #[arg(long, default_value_t = 5)]
    pub fixed_years: u32,

    /// Months between rate resets
    #[arg(long, default_value_t = 12)]
    pub adjust_every: u32,

    /// Index rate as a decimal
    #[arg(long)]
    pub index: Option<Decimal>,

    /// Margin over the index as a decimal
    #[arg(long)]
    pub margin: Option<Decimal>,

    /// Index value at each reset (comma-separated, e.g. "0.04,0.045,0.05")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub index_path: Option<Vec<Decimal>>,

    /// Maximum move per reset
    #[arg(long)]
    pub periodic_cap: Option<Decimal>,

    /// Maximum move at the first reset
    #[arg(long)]
    pub first_cap: Option<Decimal>,

    /// Maximum move from the initial rate over the life of the loan
    #[arg(long)]
    pub lifetime_cap: Option<Decimal>,

    /// Lowest rate the loan may reset to
    #[arg(long)]
    pub floor: Option<Decimal>,

    /// Show one row per month instead of one per year
    #[arg(long)]
    pub monthly: bool,

    /// First day of the loan (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

pub fn run_arm(args: ArmArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let arm_input: ArmInput = load_input(args.input.as_deref(), || {
        Ok(ArmInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            initial_rate: args
                .initial_rate
                .ok_or("--initial-rate is required (or provide --input)")?,
            term_years: args.years,
            fixed_years: args.fixed_years,
            adjustment_interval_months: args.adjust_every,
            index_rate: args.index.ok_or("--index is required (or provide --input)")?,
            margin: args.margin.ok_or("--margin is required (or provide --input)")?,
            index_path: args.index_path.unwrap_or_default(),
            periodic_cap: args.periodic_cap,
            first_adjustment_cap: args.first_cap,
            lifetime_cap: args.lifetime_cap,
            rate_floor: args.floor,
            reporting_interval: args.monthly.then_some(1),
            start_date: args.start_date,
        })
    })?;
    to_value(arm::project_arm(&arm_input)?)
}

/// Arguments for a graduated payment mortgage projection
#[derive(Args)]
pub struct GraduatedArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual rate as a decimal
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long, default_value_t = 30)]
    pub years: u32,

    /// Yearly payment increase as a decimal (0.075 = 7.5%)
    #[arg(long)]
    pub graduation_rate: Option<Decimal>,

    /// Years over which payments rise
    #[arg(long, default_value_t = 5)]
    pub graduation_years: u32,

    /// Show one row per month instead of one per year
    #[arg(long)]
    pub monthly: bool,
}

pub fn run_graduated(args: GraduatedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let gpm_input: GraduatedInput = load_input(args.input.as_deref(), || {
        Ok(GraduatedInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years,
            graduation_rate: args
                .graduation_rate
                .ok_or("--graduation-rate is required (or provide --input)")?,
            graduation_years: args.graduation_years,
            reporting_interval: args.monthly.then_some(1),
            start_date: None,
        })
    })?;
    to_value(graduated::project_graduated(&gpm_input)?)
}

/// Arguments for a raw regime projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let projection_input: ProjectionInput = load_input(args.input.as_deref(), || {
        Err("--input <file.json> or stdin required for a regime projection".into())
    })?;
    to_value(projection::run_projection(&projection_input)?)
}
