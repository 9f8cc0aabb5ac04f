use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::regime::{PaymentRule, RateRegime};
use crate::presenter::round_money;
use crate::time_value::{add_or_overflow, level_payment, mul_or_overflow};
use crate::types::*;
use crate::validation::Validator;
use crate::AmortizeResult;

/// Highest nominal annual rate accepted (100%).
pub const MAX_ANNUAL_RATE: Rate = Decimal::ONE;

/// Longest loan accepted, in years of the chosen payment frequency.
pub const MAX_TERM_YEARS: u32 = 50;

/// Input to the period projector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Opening balance.
    pub principal: Money,
    /// Total number of payment periods in the loan.
    pub term_periods: u32,
    /// Ordered regimes; their spans must add up to `term_periods`.
    pub regimes: Vec<RateRegime>,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// Emit a record every `reporting_interval` periods (1 = every period).
    #[serde(default = "default_reporting_interval")]
    pub reporting_interval: u32,
    /// Additional principal paid every period on top of the scheduled payment.
    #[serde(default)]
    pub extra_principal: Money,
    /// Loan origination date; payment dates are derived from it when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

fn default_reporting_interval() -> u32 {
    1
}

/// One snapshot per reporting boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Period index (1-indexed) at which the snapshot was taken.
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Annual rate in force during the period.
    pub rate: Rate,
    /// Scheduled payment made in this period (excluding extra principal).
    pub payment: Money,
    /// Interest accrued since the previous record.
    pub interest: Money,
    /// Scheduled principal repaid since the previous record; negative under
    /// negative amortization.
    pub principal: Money,
    /// Extra principal repaid since the previous record.
    pub extra_principal: Money,
    /// Balance after this period.
    pub balance: Money,
}

/// Payment reset at the start of a regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentChange {
    /// First period the payment applies to.
    pub period: u32,
    pub rate: Rate,
    pub payment: Money,
    /// Balance the payment was computed from.
    pub balance: Money,
}

/// Result of a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub records: Vec<PeriodRecord>,
    pub payment_changes: Vec<PaymentChange>,
    /// Periods actually run; below the term when the loan is paid off early.
    pub periods_elapsed: u32,
    pub initial_payment: Money,
    pub total_interest: Money,
    /// Scheduled plus extra principal.
    pub total_principal: Money,
    pub total_extra_principal: Money,
    pub total_paid: Money,
    pub final_balance: Money,
    pub paid_off_early: bool,
    pub peak_balance: Money,
    pub negative_amortization_periods: u32,
}

/// Mutable state threaded through the fold.
struct PeriodState {
    period: u32,
    balance: Money,
    rate: Rate,
    payment: Money,
}

#[derive(Default)]
struct IntervalTotals {
    interest: Money,
    principal: Money,
    extra: Money,
}

/// Run the period projector.
///
/// For each regime the payment is set once (recast from the remaining balance
/// over the periods left in the whole loan, or fixed), then each period
/// accrues `balance * r`, applies the payment and any extra principal, and
/// floors the balance at zero. Stops as soon as the balance is retired.
pub fn project(input: &ProjectionInput) -> AmortizeResult<Projection> {
    validate_projection(input)?;

    let ppy = Decimal::from(input.frequency.periods_per_year());
    let term = input.term_periods;
    let interval = input.reporting_interval;

    debug!(
        "projecting {} over {} periods in {} regimes",
        input.principal,
        term,
        input.regimes.len()
    );

    let mut state = PeriodState {
        period: 0,
        balance: input.principal,
        rate: input.regimes[0].annual_rate,
        payment: Decimal::ZERO,
    };

    let mut records = Vec::with_capacity((term / interval + 1) as usize);
    let mut payment_changes = Vec::with_capacity(input.regimes.len());
    let mut acc = IntervalTotals::default();

    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut total_extra = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut peak_balance = input.principal;
    let mut negative_amortization_periods = 0u32;
    let mut paid_off_early = false;

    'regimes: for regime in &input.regimes {
        let r = regime.annual_rate / ppy;
        let remaining = term - state.period;

        state.rate = regime.annual_rate;
        state.payment = match regime.payment {
            PaymentRule::Recast => level_payment(state.balance, r, remaining)?,
            PaymentRule::Fixed(p) => p,
        };

        payment_changes.push(PaymentChange {
            period: state.period + 1,
            rate: state.rate,
            payment: state.payment,
            balance: state.balance,
        });
        debug!(
            "period {}: rate {} payment {} on balance {}",
            state.period + 1,
            state.rate,
            state.payment,
            state.balance
        );

        for _ in 0..regime.periods {
            state.period += 1;

            let interest = mul_or_overflow(state.balance, r, "period interest")?;
            let owed = add_or_overflow(state.balance, interest, "period balance")?;
            let payment = state.payment.min(owed);
            let principal = payment - interest;

            let mut balance = state.balance - principal;
            let extra = input.extra_principal.min(balance).max(Decimal::ZERO);
            balance -= extra;
            if balance < Decimal::ZERO {
                balance = Decimal::ZERO;
            }

            if principal < Decimal::ZERO {
                negative_amortization_periods += 1;
            }
            if balance > peak_balance {
                peak_balance = balance;
            }

            acc.interest = add_or_overflow(acc.interest, interest, "interval interest")?;
            acc.principal += principal;
            acc.extra += extra;
            total_interest = add_or_overflow(total_interest, interest, "total interest")?;
            total_principal += principal + extra;
            total_extra += extra;
            total_paid = add_or_overflow(total_paid, payment + extra, "total paid")?;
            state.balance = balance;

            let retired = state.balance.is_zero() && state.period < term;
            if state.period % interval == 0 || state.period == term || retired {
                let date = match input.start_date {
                    Some(start) => Some(input.frequency.payment_date(start, state.period)?),
                    None => None,
                };
                records.push(PeriodRecord {
                    period: state.period,
                    date,
                    rate: state.rate,
                    payment,
                    interest: acc.interest,
                    principal: acc.principal,
                    extra_principal: acc.extra,
                    balance: state.balance,
                });
                acc = IntervalTotals::default();
            }

            if retired {
                debug!("balance retired at period {} of {}", state.period, term);
                paid_off_early = true;
                break 'regimes;
            }
        }
    }

    Ok(Projection {
        records,
        initial_payment: payment_changes
            .first()
            .map(|c| c.payment)
            .unwrap_or(Decimal::ZERO),
        payment_changes,
        periods_elapsed: state.period,
        total_interest,
        total_principal,
        total_extra_principal: total_extra,
        total_paid,
        final_balance: state.balance,
        paid_off_early,
        peak_balance,
        negative_amortization_periods,
    })
}

/// Run the projector and wrap the result in the standard output envelope.
pub fn run_projection(
    input: &ProjectionInput,
) -> AmortizeResult<ComputationOutput<Projection>> {
    let start = Instant::now();
    let projection = project(input)?;

    let mut warnings = Vec::new();
    if projection.final_balance > BALANCE_EPSILON {
        warnings.push(format!(
            "Balance of {} remains at the end of the term",
            round_money(projection.final_balance)
        ));
    }
    if projection.negative_amortization_periods > 0 {
        warnings.push(format!(
            "Negative amortization in {} periods (peak balance {})",
            projection.negative_amortization_periods,
            round_money(projection.peak_balance)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Period Projection (regime-based amortization)",
        input,
        warnings,
        elapsed,
        projection,
    ))
}

pub(crate) fn validate_projection(input: &ProjectionInput) -> AmortizeResult<()> {
    let max_periods = MAX_TERM_YEARS * input.frequency.periods_per_year();
    let mut v = Validator::new();

    v.positive("principal", input.principal)
        .nonzero("term_periods", input.term_periods)
        .count_at_most("term_periods", input.term_periods, max_periods)
        .nonzero("reporting_interval", input.reporting_interval)
        .non_negative("extra_principal", input.extra_principal)
        .check(!input.regimes.is_empty(), "regimes", "at least one rate regime is required");

    let mut covered: u64 = 0;
    for (i, regime) in input.regimes.iter().enumerate() {
        let field = format!("regimes[{i}]");
        covered += regime.periods as u64;
        v.nonzero(&format!("{field}.periods"), regime.periods)
            .in_range(
                &format!("{field}.annual_rate"),
                regime.annual_rate,
                Decimal::ZERO,
                MAX_ANNUAL_RATE,
            );
        if let PaymentRule::Fixed(p) = regime.payment {
            v.positive(&format!("{field}.payment"), p);
        }
    }
    v.check(
        input.regimes.is_empty() || covered == input.term_periods as u64,
        "regimes",
        format!(
            "regime spans cover {covered} periods but the term is {}",
            input.term_periods
        ),
    );

    v.finish()
}
