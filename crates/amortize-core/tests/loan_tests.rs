use amortize_core::loans::arm::{self, ArmInput};
use amortize_core::loans::graduated::{self, GraduatedInput};
use amortize_core::loans::schedule::{self, ScheduleInput};
use amortize_core::types::PaymentFrequency;
use amortize_core::AmortizeError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn arm_input() -> ArmInput {
    ArmInput {
        principal: dec!(300000),
        initial_rate: dec!(0.05),
        term_years: 30,
        fixed_years: 5,
        adjustment_interval_months: 12,
        index_rate: dec!(0.04),
        margin: dec!(0.025),
        index_path: Vec::new(),
        periodic_cap: Some(dec!(0.02)),
        first_adjustment_cap: None,
        lifetime_cap: Some(dec!(0.05)),
        rate_floor: None,
        reporting_interval: None,
        start_date: None,
    }
}

// ===========================================================================
// ARM
// ===========================================================================

#[test]
fn test_arm_year_six_rate_is_min_of_target_and_cap() {
    let input = arm_input();
    let out = arm::project_arm(&input).unwrap().result;
    let target = input.index_rate + input.margin;
    let capped = input.initial_rate + input.periodic_cap.unwrap();
    assert_eq!(out.adjustments[0].applied_rate, target.min(capped));
    assert_eq!(out.adjustments[0].applied_rate, dec!(0.065));

    // Yearly rows: row 6 is the first year at the reset rate.
    assert_eq!(out.schedule[4].rate, dec!(0.05));
    assert_eq!(out.schedule[5].rate, dec!(0.065));
}

#[test]
fn test_arm_caps_hold_on_volatile_index() {
    let mut input = arm_input();
    input.index_path = vec![
        dec!(0.09),
        dec!(0.01),
        dec!(0.12),
        dec!(0.00),
        dec!(0.15),
        dec!(0.02),
    ];
    let out = arm::project_arm(&input).unwrap().result;
    let ceiling = input.initial_rate + input.lifetime_cap.unwrap();
    for adj in &out.adjustments {
        assert!(adj.applied_rate <= ceiling, "rate {} above ceiling", adj.applied_rate);
        assert!(
            (adj.applied_rate - adj.previous_rate).abs() <= input.periodic_cap.unwrap(),
            "move from {} to {} exceeds periodic cap",
            adj.previous_rate,
            adj.applied_rate
        );
        assert!(adj.applied_rate >= Decimal::ZERO);
    }
    assert_eq!(out.lifetime_ceiling, Some(dec!(0.10)));
    assert!(out.max_rate <= ceiling);
}

#[test]
fn test_arm_amortizes_to_zero() {
    let out = arm::project_arm(&arm_input()).unwrap().result;
    let last = out.schedule.last().unwrap();
    assert_eq!(last.period, 360);
    assert!(last.balance < dec!(0.0001));
    assert!(out.max_payment > out.initial_payment);
}

#[test]
fn test_arm_with_dates_and_monthly_rows() {
    let mut input = arm_input();
    input.reporting_interval = Some(1);
    input.start_date = NaiveDate::from_ymd_opt(2025, 6, 1);
    let out = arm::project_arm(&input).unwrap().result;
    assert_eq!(out.schedule.len(), 360);
    assert_eq!(out.schedule[0].date, NaiveDate::from_ymd_opt(2025, 7, 1));
    assert_eq!(out.schedule[60].rate, dec!(0.065));
}

#[test]
fn test_arm_rejects_bad_caps() {
    let mut input = arm_input();
    input.periodic_cap = Some(dec!(-0.01));
    input.principal = Decimal::ZERO;
    match arm::project_arm(&input) {
        Err(AmortizeError::Validation(errors)) => assert_eq!(errors.len(), 2),
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn test_arm_rejects_fixed_period_beyond_term_limit() {
    let mut input = arm_input();
    input.fixed_years = 357_913_942;
    match arm::project_arm(&input) {
        Err(AmortizeError::InvalidInput { field, .. }) => assert_eq!(field, "fixed_years"),
        other => panic!("expected fixed_years rejection, got {other:?}"),
    }
}

// ===========================================================================
// Graduated payment
// ===========================================================================

#[test]
fn test_gpm_negative_amortization_then_payoff() {
    let input = GraduatedInput {
        principal: dec!(100000),
        annual_rate: dec!(0.09),
        term_years: 30,
        graduation_rate: dec!(0.075),
        graduation_years: 5,
        reporting_interval: None,
        start_date: None,
    };
    let out = graduated::project_graduated(&input).unwrap();
    assert!(!out.warnings.is_empty());
    let r = out.result;
    assert!((r.initial_payment - dec!(607.88)).abs() < dec!(0.01));
    assert!(r.schedule[0].balance > dec!(100000));
    assert!(r.schedule.last().unwrap().balance < dec!(0.0001));
}

// ===========================================================================
// Fixed-rate schedule
// ===========================================================================

#[test]
fn test_biweekly_schedule() {
    let input = ScheduleInput {
        principal: dec!(100000),
        annual_rate: dec!(0.06),
        term_years: 30,
        frequency: PaymentFrequency::BiWeekly,
        extra_payment: Decimal::ZERO,
        reporting_interval: Some(26),
        start_date: None,
    };
    let out = schedule::amortization_schedule(&input).unwrap().result;
    assert_eq!(out.term_periods, 780);
    assert_eq!(out.schedule.len(), 30);
    assert!(out.scheduled_payment < dec!(599.55) / dec!(2));
}

#[test]
fn test_schedule_extra_payment_summary() {
    let input = ScheduleInput {
        principal: dec!(100000),
        annual_rate: dec!(0.06),
        term_years: 30,
        frequency: PaymentFrequency::Monthly,
        extra_payment: dec!(100),
        reporting_interval: Some(12),
        start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
    };
    let out = schedule::amortization_schedule(&input).unwrap().result;
    assert!(out.periods_saved > 0);
    assert_eq!(out.periods_to_payoff + out.periods_saved, 360);
    assert!(out.interest_saved > Decimal::ZERO);
    assert!(out.payoff_date.unwrap() < NaiveDate::from_ymd_opt(2055, 1, 1).unwrap());
    assert_eq!(out.schedule.last().unwrap().balance, Decimal::ZERO);
}
