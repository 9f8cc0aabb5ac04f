use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// How the periodic payment is set when a regime begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PaymentRule {
    /// Level payment recomputed from the remaining balance over the periods
    /// remaining in the whole loan (not just this regime).
    #[default]
    Recast,
    /// Payment held at a given amount for the regime; may be below the
    /// accruing interest, in which case the balance grows.
    Fixed(Money),
}

/// A contiguous span of periods at one annual rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRegime {
    /// Nominal annual rate (0.06 = 6%).
    pub annual_rate: Rate,
    /// Number of periods the regime lasts.
    pub periods: u32,
    #[serde(default)]
    pub payment: PaymentRule,
}

impl RateRegime {
    pub fn recast(annual_rate: Rate, periods: u32) -> Self {
        Self {
            annual_rate,
            periods,
            payment: PaymentRule::Recast,
        }
    }

    pub fn fixed(annual_rate: Rate, periods: u32, payment: Money) -> Self {
        Self {
            annual_rate,
            periods,
            payment: PaymentRule::Fixed(payment),
        }
    }
}

/// Limits applied to each rate reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateCaps {
    /// Maximum absolute move at a single adjustment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic_cap: Option<Rate>,
    /// Maximum cumulative move away from the initial rate, in either direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_cap: Option<Rate>,
    /// Lowest rate the loan may reset to. Rates never go below zero regardless.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<Rate>,
}

/// Step from `previous` toward `target`, respecting the caps.
///
/// `next = previous + sign(target - previous) * min(periodic_cap, |target - previous|)`,
/// then held within `initial ± lifetime_cap` and at or above the floor.
pub fn adjust_rate(previous: Rate, target: Rate, initial: Rate, caps: &RateCaps) -> Rate {
    let delta = target - previous;
    let step = match caps.periodic_cap {
        Some(cap) => delta.abs().min(cap),
        None => delta.abs(),
    };

    let mut next = if delta < Decimal::ZERO {
        previous - step
    } else {
        previous + step
    };

    if let Some(life) = caps.lifetime_cap {
        next = next.min(initial + life).max(initial - life);
    }

    let floor = caps.floor.unwrap_or(Decimal::ZERO).max(Decimal::ZERO);
    next.max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn caps(periodic: Rate, lifetime: Rate) -> RateCaps {
        RateCaps {
            periodic_cap: Some(periodic),
            lifetime_cap: Some(lifetime),
            floor: None,
        }
    }

    #[test]
    fn test_move_within_periodic_cap() {
        // 5% -> target 6.5%, cap 2% => full move
        let r = adjust_rate(dec!(0.05), dec!(0.065), dec!(0.05), &caps(dec!(0.02), dec!(0.05)));
        assert_eq!(r, dec!(0.065));
    }

    #[test]
    fn test_periodic_cap_limits_upward_move() {
        let r = adjust_rate(dec!(0.05), dec!(0.09), dec!(0.05), &caps(dec!(0.02), dec!(0.05)));
        assert_eq!(r, dec!(0.07));
    }

    #[test]
    fn test_periodic_cap_limits_downward_move() {
        let r = adjust_rate(dec!(0.08), dec!(0.03), dec!(0.06), &caps(dec!(0.02), dec!(0.05)));
        assert_eq!(r, dec!(0.06));
    }

    #[test]
    fn test_lifetime_cap_binds() {
        // Already at 9%, initial 5%, lifetime 5% => ceiling 10%
        let r = adjust_rate(dec!(0.09), dec!(0.14), dec!(0.05), &caps(dec!(0.02), dec!(0.05)));
        assert_eq!(r, dec!(0.10));
    }

    #[test]
    fn test_lifetime_cap_is_symmetric() {
        let r = adjust_rate(dec!(0.03), dec!(0.0), dec!(0.06), &caps(dec!(0.05), dec!(0.04)));
        assert_eq!(r, dec!(0.02));
    }

    #[test]
    fn test_floor_and_zero_bound() {
        let mut c = RateCaps::default();
        assert_eq!(adjust_rate(dec!(0.01), dec!(-0.02), dec!(0.01), &c), Decimal::ZERO);
        c.floor = Some(dec!(0.025));
        assert_eq!(adjust_rate(dec!(0.04), dec!(0.01), dec!(0.04), &c), dec!(0.025));
    }

    #[test]
    fn test_no_caps_jumps_to_target() {
        let r = adjust_rate(dec!(0.04), dec!(0.071), dec!(0.04), &RateCaps::default());
        assert_eq!(r, dec!(0.071));
    }
}
