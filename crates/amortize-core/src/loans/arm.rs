//! Adjustable-rate mortgage projection.
//!
//! The loan carries `initial_rate` for `fixed_years`, then resets every
//! `adjustment_interval_months` toward `index + margin`. Each reset moves by at
//! most the periodic cap (the first reset may have its own cap) and stays
//! within `initial_rate ± lifetime_cap`. At every reset the payment is recast
//! from the remaining balance over the months remaining in the whole loan.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::projection::{
    adjust_rate, project, PaymentChange, PeriodRecord, ProjectionInput, RateCaps, RateRegime,
    MAX_ANNUAL_RATE, MAX_TERM_YEARS,
};
use crate::types::*;
use crate::validation::Validator;
use crate::AmortizeResult;

/// ARM projection input. All rates and caps are decimals (0.02 = 2 points).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmInput {
    pub principal: Money,
    /// Teaser / start rate held through the fixed period.
    pub initial_rate: Rate,
    pub term_years: u32,
    /// Length of the initial fixed-rate period in years.
    pub fixed_years: u32,
    /// Months between resets after the fixed period.
    #[serde(default = "default_adjustment_interval")]
    pub adjustment_interval_months: u32,
    /// Index value used for every reset unless `index_path` is given.
    pub index_rate: Rate,
    pub margin: Rate,
    /// Index value at each successive reset; the last value carries forward.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_path: Vec<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic_cap: Option<Rate>,
    /// Cap on the first reset only; falls back to `periodic_cap`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_adjustment_cap: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_cap: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_floor: Option<Rate>,
    /// Months between schedule rows; defaults to yearly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

fn default_adjustment_interval() -> u32 {
    12
}

/// One rate reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustment {
    /// 1-indexed reset number.
    pub adjustment: u32,
    /// First month the new rate applies to.
    pub period: u32,
    pub index_rate: Rate,
    /// Fully indexed rate (`index + margin`).
    pub target_rate: Rate,
    pub previous_rate: Rate,
    pub applied_rate: Rate,
    /// True when a cap or floor kept the rate away from the target.
    pub capped: bool,
}

/// ARM projection output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArmOutput {
    pub initial_payment: Money,
    pub max_payment: Money,
    pub max_rate: Rate,
    /// Highest rate the caps allow over the life of the loan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_ceiling: Option<Rate>,
    pub total_interest: Money,
    pub total_paid: Money,
    pub adjustments: Vec<RateAdjustment>,
    pub payment_changes: Vec<PaymentChange>,
    pub schedule: Vec<PeriodRecord>,
}

/// Project an adjustable-rate mortgage.
pub fn project_arm(input: &ArmInput) -> AmortizeResult<ComputationOutput<ArmOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_arm(input)?;

    let term = input.term_years * MONTHS_PER_YEAR;
    let (regimes, adjustments) = build_arm_regimes(input);

    if input.fixed_years >= input.term_years {
        warnings.push("Fixed period covers the whole term; the loan never resets".into());
    }
    if input.periodic_cap.is_none() && input.first_adjustment_cap.is_none() {
        warnings.push("No periodic cap: each reset moves straight to index + margin".into());
    }
    if input.initial_rate < input.index_rate + input.margin - dec!(0.03) {
        warnings.push(format!(
            "Initial rate {} is well below the fully indexed rate {}; expect payment shock",
            input.initial_rate,
            input.index_rate + input.margin
        ));
    }

    let projection = project(&ProjectionInput {
        principal: input.principal,
        term_periods: term,
        regimes,
        frequency: PaymentFrequency::Monthly,
        reporting_interval: input.reporting_interval.unwrap_or(MONTHS_PER_YEAR),
        extra_principal: Decimal::ZERO,
        start_date: input.start_date,
    })?;

    let max_payment = projection
        .payment_changes
        .iter()
        .map(|c| c.payment)
        .max()
        .unwrap_or(projection.initial_payment);
    let max_rate = adjustments
        .iter()
        .map(|a| a.applied_rate)
        .fold(input.initial_rate, Decimal::max);

    let output = ArmOutput {
        initial_payment: projection.initial_payment,
        max_payment,
        max_rate,
        lifetime_ceiling: input.lifetime_cap.map(|c| input.initial_rate + c),
        total_interest: projection.total_interest,
        total_paid: projection.total_paid,
        adjustments,
        payment_changes: projection.payment_changes,
        schedule: projection.records,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Adjustable-Rate Mortgage Projection (capped resets, recast payment)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Split the term into the fixed regime followed by one regime per reset.
fn build_arm_regimes(input: &ArmInput) -> (Vec<RateRegime>, Vec<RateAdjustment>) {
    let term = input.term_years * MONTHS_PER_YEAR;
    let fixed = input.fixed_years.saturating_mul(MONTHS_PER_YEAR).min(term);

    let mut regimes = vec![RateRegime::recast(input.initial_rate, fixed)];
    let mut adjustments = Vec::new();

    let mut covered = fixed;
    let mut rate = input.initial_rate;
    let mut n = 0usize;

    while covered < term {
        let index_rate = input
            .index_path
            .get(n)
            .or_else(|| input.index_path.last())
            .copied()
            .unwrap_or(input.index_rate);
        let target = index_rate + input.margin;

        let caps = RateCaps {
            periodic_cap: if n == 0 {
                input.first_adjustment_cap.or(input.periodic_cap)
            } else {
                input.periodic_cap
            },
            lifetime_cap: input.lifetime_cap,
            floor: input.rate_floor,
        };
        let next = adjust_rate(rate, target, input.initial_rate, &caps);
        let span = input.adjustment_interval_months.min(term - covered);

        debug!(
            "ARM reset {} at month {}: target {} applied {}",
            n + 1,
            covered + 1,
            target,
            next
        );

        adjustments.push(RateAdjustment {
            adjustment: (n + 1) as u32,
            period: covered + 1,
            index_rate,
            target_rate: target,
            previous_rate: rate,
            applied_rate: next,
            capped: next != target,
        });
        regimes.push(RateRegime::recast(next, span));

        rate = next;
        covered += span;
        n += 1;
    }

    (regimes, adjustments)
}

fn validate_arm(input: &ArmInput) -> AmortizeResult<()> {
    let mut v = Validator::new();
    v.positive("principal", input.principal)
        .in_range("initial_rate", input.initial_rate, Decimal::ZERO, MAX_ANNUAL_RATE)
        .nonzero("term_years", input.term_years)
        .count_at_most("term_years", input.term_years, MAX_TERM_YEARS)
        .nonzero("fixed_years", input.fixed_years)
        .count_at_most("fixed_years", input.fixed_years, MAX_TERM_YEARS)
        .nonzero("adjustment_interval_months", input.adjustment_interval_months)
        .in_range("index_rate", input.index_rate, dec!(-0.05), MAX_ANNUAL_RATE)
        .in_range("margin", input.margin, Decimal::ZERO, MAX_ANNUAL_RATE);

    for (i, idx) in input.index_path.iter().enumerate() {
        v.in_range(&format!("index_path[{i}]"), *idx, dec!(-0.05), MAX_ANNUAL_RATE);
    }
    if let Some(c) = input.periodic_cap {
        v.non_negative("periodic_cap", c);
    }
    if let Some(c) = input.first_adjustment_cap {
        v.non_negative("first_adjustment_cap", c);
    }
    if let Some(c) = input.lifetime_cap {
        v.non_negative("lifetime_cap", c)
            .at_most("lifetime_cap", input.initial_rate + c, MAX_ANNUAL_RATE);
    }
    if let Some(f) = input.rate_floor {
        v.non_negative("rate_floor", f)
            .at_most("rate_floor", f, input.initial_rate);
    }
    if let Some(interval) = input.reporting_interval {
        v.nonzero("reporting_interval", interval);
    }
    v.finish()
}
