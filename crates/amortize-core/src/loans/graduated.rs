//! Graduated payment mortgage (GPM).
//!
//! Payments start low and rise by `graduation_rate` at each anniversary for
//! `graduation_years`, then stay level for the rest of the term. Early
//! payments can fall short of the accruing interest, so the balance may grow
//! before it amortizes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::projection::{
    project, PaymentChange, PeriodRecord, ProjectionInput, RateRegime, MAX_ANNUAL_RATE,
    MAX_TERM_YEARS,
};
use crate::presenter::round_money;
use crate::time_value::{
    annuity_pv_factor, compound_factor, discount_factor, level_payment, mul_or_overflow,
};
use crate::types::*;
use crate::validation::Validator;
use crate::AmortizeResult;

/// Largest yearly payment step accepted (50%).
const MAX_GRADUATION_RATE: Rate = dec!(0.5);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduatedInput {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_years: u32,
    /// Yearly payment increase during graduation (0.075 = 7.5%).
    pub graduation_rate: Rate,
    pub graduation_years: u32,
    /// Months between schedule rows; defaults to yearly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraduatedOutput {
    pub initial_payment: Money,
    /// Level payment once graduation ends.
    pub final_payment: Money,
    /// Payment on a standard level loan with the same terms, for comparison.
    pub level_payment_equivalent: Money,
    pub payment_steps: Vec<PaymentChange>,
    pub peak_balance: Money,
    pub negative_amortization_periods: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub schedule: Vec<PeriodRecord>,
}

/// Project a graduated payment mortgage.
pub fn project_graduated(
    input: &GraduatedInput,
) -> AmortizeResult<ComputationOutput<GraduatedOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_graduated(input)?;

    let term = input.term_years * MONTHS_PER_YEAR;
    let r = input.annual_rate / Decimal::from(MONTHS_PER_YEAR);
    let initial_payment = initial_graduated_payment(input)?;

    let mut regimes = Vec::with_capacity(input.graduation_years as usize + 1);
    for year in 0..input.graduation_years {
        let step = compound_factor(input.graduation_rate, year)?;
        let payment = mul_or_overflow(initial_payment, step, "graduated payment step")?;
        regimes.push(RateRegime::fixed(input.annual_rate, MONTHS_PER_YEAR, payment));
    }
    // The level tail is recast, which settles any rounding left by the steps.
    regimes.push(RateRegime::recast(
        input.annual_rate,
        term - input.graduation_years * MONTHS_PER_YEAR,
    ));

    let projection = project(&ProjectionInput {
        principal: input.principal,
        term_periods: term,
        regimes,
        frequency: PaymentFrequency::Monthly,
        reporting_interval: input.reporting_interval.unwrap_or(MONTHS_PER_YEAR),
        extra_principal: Decimal::ZERO,
        start_date: input.start_date,
    })?;

    if projection.negative_amortization_periods > 0 {
        warnings.push(format!(
            "Negative amortization for {} months; balance peaks at {}",
            projection.negative_amortization_periods,
            round_money(projection.peak_balance)
        ));
    }

    let final_payment = projection
        .payment_changes
        .last()
        .map(|c| c.payment)
        .unwrap_or(initial_payment);

    let output = GraduatedOutput {
        initial_payment,
        final_payment,
        level_payment_equivalent: level_payment(input.principal, r, term)?,
        payment_steps: projection.payment_changes,
        peak_balance: projection.peak_balance,
        negative_amortization_periods: projection.negative_amortization_periods,
        total_interest: projection.total_interest,
        total_paid: projection.total_paid,
        schedule: projection.records,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Graduated Payment Mortgage (annual step-up, level tail)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// First-year payment such that the graduated stream has a present value
/// equal to the principal.
///
/// PV = P0 * [ sum_{k<n} (1+g)^k * a(12) * v^(12k) + (1+g)^n * a(T-12n) * v^(12n) ]
pub fn initial_graduated_payment(input: &GraduatedInput) -> AmortizeResult<Money> {
    let r = input.annual_rate / Decimal::from(MONTHS_PER_YEAR);
    let n = input.graduation_years;
    let term = input.term_years * MONTHS_PER_YEAR;
    let year_annuity = annuity_pv_factor(r, MONTHS_PER_YEAR)?;

    let mut factor = Decimal::ZERO;
    for k in 0..n {
        factor += compound_factor(input.graduation_rate, k)?
            * year_annuity
            * discount_factor(r, k * MONTHS_PER_YEAR)?;
    }
    factor += compound_factor(input.graduation_rate, n)?
        * annuity_pv_factor(r, term - n * MONTHS_PER_YEAR)?
        * discount_factor(r, n * MONTHS_PER_YEAR)?;

    if factor.is_zero() {
        return Err(crate::AmortizeError::DivisionByZero {
            context: "graduated payment factor".into(),
        });
    }
    Ok(input.principal / factor)
}

fn validate_graduated(input: &GraduatedInput) -> AmortizeResult<()> {
    let mut v = Validator::new();
    v.positive("principal", input.principal)
        .in_range("annual_rate", input.annual_rate, Decimal::ZERO, MAX_ANNUAL_RATE)
        .nonzero("term_years", input.term_years)
        .count_at_most("term_years", input.term_years, MAX_TERM_YEARS)
        .in_range(
            "graduation_rate",
            input.graduation_rate,
            Decimal::ZERO,
            MAX_GRADUATION_RATE,
        )
        .check(
            input.graduation_years < input.term_years,
            "graduation_years",
            "must be shorter than the term",
        );
    if let Some(interval) = input.reporting_interval {
        v.nonzero("reporting_interval", interval);
    }
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fha_plan() -> GraduatedInput {
        GraduatedInput {
            principal: dec!(100000),
            annual_rate: dec!(0.09),
            term_years: 30,
            graduation_rate: dec!(0.075),
            graduation_years: 5,
            reporting_interval: None,
            start_date: None,
        }
    }

    #[test]
    fn test_payments_step_up_then_level() {
        let out = project_graduated(&fha_plan()).unwrap().result;
        assert_eq!(out.payment_steps.len(), 6);
        for pair in out.payment_steps.windows(2) {
            assert!(pair[1].payment > pair[0].payment);
        }
        assert!(out.initial_payment < out.level_payment_equivalent);
        assert!(out.final_payment > out.level_payment_equivalent);
    }

    #[test]
    fn test_step_ratio_matches_graduation_rate() {
        let out = project_graduated(&fha_plan()).unwrap().result;
        let ratio = out.payment_steps[1].payment / out.payment_steps[0].payment;
        assert!((ratio - dec!(1.075)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_level_tail_matches_last_step() {
        // The recast tail payment equals P0 * (1+g)^n up to rounding.
        let out = project_graduated(&fha_plan()).unwrap().result;
        let expected = out.initial_payment * compound_factor(dec!(0.075), 5).unwrap();
        assert!((out.final_payment - expected).abs() < dec!(0.0001));
    }

    #[test]
    fn test_negative_amortization_and_payoff() {
        let out = project_graduated(&fha_plan()).unwrap().result;
        assert!(out.negative_amortization_periods > 0);
        assert!(out.peak_balance > dec!(100000));
        let last = out.schedule.last().unwrap();
        assert_eq!(last.period, 360);
        assert!(last.balance < dec!(0.0001));
    }

    #[test]
    fn test_zero_graduation_is_level_loan() {
        let mut input = fha_plan();
        input.graduation_rate = Decimal::ZERO;
        let out = project_graduated(&input).unwrap().result;
        assert!((out.initial_payment - out.level_payment_equivalent).abs() < dec!(0.0001));
        assert_eq!(out.negative_amortization_periods, 0);
    }

    #[test]
    fn test_graduation_longer_than_term_rejected() {
        let mut input = fha_plan();
        input.graduation_years = 30;
        assert!(project_graduated(&input).is_err());
    }
}
