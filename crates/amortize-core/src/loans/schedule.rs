use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::projection::{
    project, PeriodRecord, ProjectionInput, RateRegime, MAX_ANNUAL_RATE, MAX_TERM_YEARS,
};
use crate::types::*;
use crate::validation::Validator;
use crate::AmortizeResult;

/// Input for a fixed-rate amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Nominal annual rate (0.06 = 6%).
    pub annual_rate: Rate,
    pub term_years: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// Extra principal paid with every scheduled payment.
    #[serde(default)]
    pub extra_payment: Money,
    /// Periods between schedule rows; defaults to one row per payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// Amortization schedule output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// Level payment per period, before any extra principal.
    pub scheduled_payment: Money,
    pub term_periods: u32,
    /// Periods until the balance reaches zero.
    pub periods_to_payoff: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    pub total_interest: Money,
    pub total_paid: Money,
    /// Interest avoided by the extra payments, against the same loan without them.
    pub interest_saved: Money,
    pub periods_saved: u32,
    pub schedule: Vec<PeriodRecord>,
}

/// Build a fixed-rate amortization schedule.
pub fn amortization_schedule(
    input: &ScheduleInput,
) -> AmortizeResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_schedule(input)?;

    let term_periods = input.term_years * input.frequency.periods_per_year();
    let projection_input = ProjectionInput {
        principal: input.principal,
        term_periods,
        regimes: vec![RateRegime::recast(input.annual_rate, term_periods)],
        frequency: input.frequency,
        reporting_interval: input.reporting_interval.unwrap_or(1),
        extra_principal: input.extra_payment,
        start_date: input.start_date,
    };
    let projection = project(&projection_input)?;

    let (interest_saved, periods_saved) = if input.extra_payment > Decimal::ZERO {
        let baseline = project(&ProjectionInput {
            extra_principal: Decimal::ZERO,
            ..projection_input.clone()
        })?;
        (
            baseline.total_interest - projection.total_interest,
            baseline.periods_elapsed - projection.periods_elapsed,
        )
    } else {
        (Decimal::ZERO, 0)
    };

    if input.annual_rate.is_zero() {
        warnings.push("Zero interest rate: payments are straight-line principal".into());
    }
    if input.extra_payment >= input.principal {
        warnings.push("Extra payment retires the whole loan in the first period".into());
    }

    let payoff_date = match input.start_date {
        Some(d) => Some(
            input
                .frequency
                .payment_date(d, projection.periods_elapsed)?,
        ),
        None => None,
    };

    let output = ScheduleOutput {
        scheduled_payment: projection.initial_payment,
        term_periods,
        periods_to_payoff: projection.periods_elapsed,
        payoff_date,
        total_interest: projection.total_interest,
        total_paid: projection.total_paid,
        interest_saved,
        periods_saved,
        schedule: projection.records,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Amortization Schedule",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate": input.annual_rate.to_string(),
            "term_years": input.term_years,
            "frequency": input.frequency,
            "extra_payment": input.extra_payment.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_schedule(input: &ScheduleInput) -> AmortizeResult<()> {
    let mut v = Validator::new();
    v.positive("principal", input.principal)
        .in_range("annual_rate", input.annual_rate, Decimal::ZERO, MAX_ANNUAL_RATE)
        .nonzero("term_years", input.term_years)
        .count_at_most("term_years", input.term_years, MAX_TERM_YEARS)
        .non_negative("extra_payment", input.extra_payment);
    if let Some(interval) = input.reporting_interval {
        v.nonzero("reporting_interval", interval);
    }
    v.finish()
}
