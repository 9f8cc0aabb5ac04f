use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::AmortizeError;
use crate::types::{Money, Rate};
use crate::AmortizeResult;

/// Compound growth factor `(1 + rate)^periods`.
pub fn compound_factor(rate: Rate, periods: u32) -> AmortizeResult<Decimal> {
    let base = Decimal::ONE + rate;
    if base <= Decimal::ZERO {
        return Err(AmortizeError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }
    base.checked_powu(periods as u64)
        .ok_or_else(|| AmortizeError::Overflow {
            context: format!("compound factor over {periods} periods"),
            base,
        })
}

/// Level payment that retires `balance` over `periods` at `rate` per period.
///
/// `payment = balance * r * (1+r)^m / ((1+r)^m - 1)`; a zero rate falls back
/// to straight-line `balance / m`.
pub fn level_payment(balance: Money, rate: Rate, periods: u32) -> AmortizeResult<Money> {
    if periods == 0 {
        return Err(AmortizeError::InvalidInput {
            field: "periods".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(balance / Decimal::from(periods));
    }

    let factor = compound_factor(rate, periods)?;
    let denom = factor - Decimal::ONE;
    if denom.is_zero() {
        return Err(AmortizeError::DivisionByZero {
            context: "level payment annuity factor".into(),
        });
    }

    let interest_share = mul_or_overflow(balance, rate, "level payment")?;
    let numerator = mul_or_overflow(interest_share, factor, "level payment")?;
    numerator
        .checked_div(denom)
        .ok_or_else(|| AmortizeError::Overflow {
            context: "level payment".into(),
            base: numerator,
        })
}

/// Present value of 1 paid at the end of each of `periods` periods.
pub fn annuity_pv_factor(rate: Rate, periods: u32) -> AmortizeResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(periods));
    }
    let factor = compound_factor(rate, periods)?;
    Ok((Decimal::ONE - Decimal::ONE / factor) / rate)
}

/// Discount factor `(1 + rate)^-periods`.
pub fn discount_factor(rate: Rate, periods: u32) -> AmortizeResult<Decimal> {
    Ok(Decimal::ONE / compound_factor(rate, periods)?)
}

/// `a * b`, reported as [`AmortizeError::Overflow`] when it leaves Decimal range.
pub fn mul_or_overflow(a: Decimal, b: Decimal, context: &str) -> AmortizeResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| AmortizeError::Overflow {
        context: context.to_string(),
        base: a,
    })
}

/// `a + b`, reported as [`AmortizeError::Overflow`] when it leaves Decimal range.
pub fn add_or_overflow(a: Decimal, b: Decimal, context: &str) -> AmortizeResult<Decimal> {
    a.checked_add(b).ok_or_else(|| AmortizeError::Overflow {
        context: context.to_string(),
        base: a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_level_payment_standard_mortgage() {
        // 100k at 6% for 30 years => ~599.55 per month
        let p = level_payment(dec!(100000), dec!(0.005), 360).unwrap();
        assert!((p - dec!(599.55)).abs() < dec!(0.01), "got {p}");
    }

    #[test]
    fn test_level_payment_zero_rate() {
        let p = level_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(p, dec!(100));
    }

    #[test]
    fn test_level_payment_zero_periods() {
        assert!(level_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_annuity_pv_factor_inverts_payment() {
        let r = dec!(0.01);
        let pmt = level_payment(dec!(1000), r, 24).unwrap();
        let pv = pmt * annuity_pv_factor(r, 24).unwrap();
        assert!((pv - dec!(1000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_level_payment_overflow_is_an_error() {
        // (1 + 1/12)^600 is ~7e20, so 1e10 * r * factor leaves Decimal range.
        let err = level_payment(dec!(10000000000), Decimal::ONE / dec!(12), 600).unwrap_err();
        assert!(matches!(err, AmortizeError::Overflow { .. }), "got {err:?}");
    }

    #[test]
    fn test_add_or_overflow_at_max() {
        assert!(add_or_overflow(Decimal::MAX, Decimal::ONE, "sum").is_err());
        assert_eq!(add_or_overflow(dec!(1), dec!(2), "sum").unwrap(), dec!(3));
    }

    #[test]
    fn test_discount_factor_one_period() {
        let df = discount_factor(dec!(0.25), 1).unwrap();
        assert_eq!(df, dec!(0.8));
    }
}
