//! Tiered-rate interest.
//!
//! A tier table is an ascending list of balance ceilings, each with an annual
//! rate; the last tier is open-ended. `Marginal` applies each tier's rate to
//! the slice of the balance inside that tier, `Flat` applies the rate of the
//! tier holding the whole balance.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortizeError;
use crate::projection::MAX_ANNUAL_RATE;
use crate::time_value::{add_or_overflow, mul_or_overflow};
use crate::types::*;
use crate::validation::Validator;
use crate::AmortizeResult;

/// Compile-time tier definition used by the built-in tables.
#[derive(Debug, Clone, Copy)]
pub struct TierDef {
    pub up_to: Option<Money>,
    pub rate: Rate,
    pub label: &'static str,
}

/// Savings-account tiers used when the caller supplies none.
pub const DEFAULT_SAVINGS_TIERS: &[TierDef] = &[
    TierDef {
        up_to: Some(dec!(10000)),
        rate: dec!(0.01),
        label: "Standard",
    },
    TierDef {
        up_to: Some(dec!(50000)),
        rate: dec!(0.02),
        label: "Preferred",
    },
    TierDef {
        up_to: None,
        rate: dec!(0.03),
        label: "Premium",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    /// Inclusive upper bound of the tier; `None` for the open top tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_to: Option<Money>,
    pub rate: Rate,
    #[serde(default)]
    pub label: String,
}

impl From<&TierDef> for RateTier {
    fn from(def: &TierDef) -> Self {
        RateTier {
            up_to: def.up_to,
            rate: def.rate,
            label: def.label.to_string(),
        }
    }
}

pub fn default_savings_tiers() -> Vec<RateTier> {
    DEFAULT_SAVINGS_TIERS.iter().map(RateTier::from).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierMode {
    #[default]
    Marginal,
    Flat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieredInput {
    /// Opening balance.
    pub balance: Money,
    /// Tier table; the built-in savings tiers are used when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<RateTier>,
    #[serde(default)]
    pub mode: TierMode,
    /// Years to project with monthly compounding.
    #[serde(default = "default_years")]
    pub years: u32,
    /// Deposit added at the end of each month.
    #[serde(default)]
    pub monthly_contribution: Money,
}

fn default_years() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredYear {
    pub year: u32,
    pub opening_balance: Money,
    pub interest: Money,
    pub contributions: Money,
    pub closing_balance: Money,
    /// Interest over the opening balance.
    pub effective_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieredOutput {
    /// Blended annual rate on the opening balance.
    pub blended_rate: Rate,
    /// Label of the tier the opening balance falls in.
    pub tier_label: String,
    pub total_interest: Money,
    pub total_contributions: Money,
    pub final_balance: Money,
    pub schedule: Vec<TieredYear>,
}

/// Rate of the tier containing `balance`.
pub fn rate_for_balance(balance: Money, tiers: &[RateTier]) -> Option<&RateTier> {
    tiers
        .iter()
        .find(|t| t.up_to.map_or(true, |cap| balance <= cap))
}

/// Annual interest on `balance` under the tier table.
pub fn tiered_rate(balance: Money, tiers: &[RateTier], mode: TierMode) -> AmortizeResult<Money> {
    match mode {
        TierMode::Flat => {
            let tier = rate_for_balance(balance, tiers).ok_or_else(|| {
                AmortizeError::FinancialImpossibility(format!(
                    "no tier covers a balance of {balance}"
                ))
            })?;
            mul_or_overflow(balance, tier.rate, "flat tier interest")
        }
        TierMode::Marginal => {
            let mut interest = Decimal::ZERO;
            let mut floor = Decimal::ZERO;
            for tier in tiers {
                let ceiling = tier.up_to.map_or(balance, |cap| cap.min(balance));
                if ceiling > floor {
                    let slice =
                        mul_or_overflow(ceiling - floor, tier.rate, "marginal tier interest")?;
                    interest = add_or_overflow(interest, slice, "marginal tier interest")?;
                }
                match tier.up_to {
                    Some(cap) if cap < balance => floor = cap,
                    _ => break,
                }
            }
            Ok(interest)
        }
    }
}

/// Project a balance earning tiered interest, compounded monthly.
pub fn tiered_interest(input: &TieredInput) -> AmortizeResult<ComputationOutput<TieredOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let tiers = if input.tiers.is_empty() {
        warnings.push("No tiers supplied; using the default savings tiers".into());
        default_savings_tiers()
    } else {
        input.tiers.clone()
    };
    validate_tiered(input, &tiers)?;

    let months = Decimal::from(MONTHS_PER_YEAR);
    let mut balance = input.balance;
    let mut schedule = Vec::with_capacity(input.years as usize);
    let mut total_interest = Decimal::ZERO;
    let mut total_contributions = Decimal::ZERO;

    for year in 1..=input.years {
        let opening = balance;
        let mut interest = Decimal::ZERO;
        for _ in 0..MONTHS_PER_YEAR {
            let month_interest = tiered_rate(balance, &tiers, input.mode)? / months;
            interest = add_or_overflow(interest, month_interest, "yearly interest")?;
            balance = add_or_overflow(balance, month_interest, "tiered balance")?;
            balance = add_or_overflow(balance, input.monthly_contribution, "tiered balance")?;
        }
        let contributions = mul_or_overflow(input.monthly_contribution, months, "contributions")?;
        total_interest = add_or_overflow(total_interest, interest, "total interest")?;
        total_contributions =
            add_or_overflow(total_contributions, contributions, "contributions")?;

        schedule.push(TieredYear {
            year,
            opening_balance: opening,
            interest,
            contributions,
            closing_balance: balance,
            effective_rate: if opening.is_zero() {
                Decimal::ZERO
            } else {
                interest / opening
            },
        });
    }

    let blended_rate = if input.balance.is_zero() {
        Decimal::ZERO
    } else {
        tiered_rate(input.balance, &tiers, input.mode)? / input.balance
    };
    let tier_label = rate_for_balance(input.balance, &tiers)
        .map(|t| t.label.clone())
        .unwrap_or_default();

    let output = TieredOutput {
        blended_rate,
        tier_label,
        total_interest,
        total_contributions,
        final_balance: balance,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        match input.mode {
            TierMode::Marginal => "Tiered Interest (marginal tiers, monthly compounding)",
            TierMode::Flat => "Tiered Interest (flat tier rate, monthly compounding)",
        },
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "mode": input.mode,
            "years": input.years,
            "tiers": tiers,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_tiered(input: &TieredInput, tiers: &[RateTier]) -> AmortizeResult<()> {
    let mut v = Validator::new();
    v.non_negative("balance", input.balance)
        .non_negative("monthly_contribution", input.monthly_contribution)
        .nonzero("years", input.years)
        .count_at_most("years", input.years, 100);

    let mut previous: Option<Money> = None;
    for (i, tier) in tiers.iter().enumerate() {
        let last = i + 1 == tiers.len();
        v.in_range(&format!("tiers[{i}].rate"), tier.rate, Decimal::ZERO, MAX_ANNUAL_RATE);
        match tier.up_to {
            Some(cap) => {
                v.check(!last, &format!("tiers[{i}].up_to"), "the last tier must be open-ended");
                if let Some(prev) = previous {
                    v.check(
                        cap > prev,
                        &format!("tiers[{i}].up_to"),
                        "tier ceilings must be strictly ascending",
                    );
                }
                v.positive(&format!("tiers[{i}].up_to"), cap);
                previous = Some(cap);
            }
            None => {
                v.check(last, &format!("tiers[{i}].up_to"), "only the last tier may be open-ended");
            }
        }
    }
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marginal_vs_flat() {
        let tiers = default_savings_tiers();
        // 10000*1% + 40000*2% + 10000*3% = 1200
        let marginal = tiered_rate(dec!(60000), &tiers, TierMode::Marginal).unwrap();
        assert_eq!(marginal, dec!(1200));
        let flat = tiered_rate(dec!(60000), &tiers, TierMode::Flat).unwrap();
        assert_eq!(flat, dec!(1800));
    }

    #[test]
    fn test_boundary_belongs_to_lower_tier() {
        let tiers = default_savings_tiers();
        assert_eq!(rate_for_balance(dec!(10000), &tiers).unwrap().label, "Standard");
        assert_eq!(rate_for_balance(dec!(10000.01), &tiers).unwrap().label, "Preferred");
    }

    #[test]
    fn test_marginal_inside_first_tier() {
        let tiers = default_savings_tiers();
        assert_eq!(
            tiered_rate(dec!(5000), &tiers, TierMode::Marginal).unwrap(),
            dec!(50)
        );
    }

    #[test]
    fn test_projection_compounds() {
        let input = TieredInput {
            balance: dec!(5000),
            tiers: Vec::new(),
            mode: TierMode::Marginal,
            years: 2,
            monthly_contribution: Decimal::ZERO,
        };
        let out = tiered_interest(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
        let y = &out.result.schedule;
        assert!(y[0].interest > dec!(50) && y[0].interest < dec!(50.3));
        assert!(y[1].interest > y[0].interest);
    }

    #[test]
    fn test_bounded_last_tier_rejected() {
        let input = TieredInput {
            balance: dec!(100),
            tiers: vec![RateTier {
                up_to: Some(dec!(1000)),
                rate: dec!(0.01),
                label: "Only".into(),
            }],
            mode: TierMode::Flat,
            years: 1,
            monthly_contribution: Decimal::ZERO,
        };
        assert!(tiered_interest(&input).is_err());
    }

    #[test]
    fn test_runaway_compounding_reports_overflow() {
        // 100 years of monthly compounding at 100% is ~e^96 times the balance.
        let input = TieredInput {
            balance: dec!(1000),
            tiers: vec![RateTier {
                up_to: None,
                rate: Decimal::ONE,
                label: "Top".into(),
            }],
            mode: TierMode::Flat,
            years: 100,
            monthly_contribution: Decimal::ZERO,
        };
        let err = tiered_interest(&input).unwrap_err();
        assert!(matches!(err, AmortizeError::Overflow { .. }), "got {err:?}");
    }
}
