use rust_decimal::RoundingStrategy;
use rust_decimal_macros::dec;

use crate::types::{Currency, Money, Rate};

/// Round a monetary amount to cents, half away from zero.
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with the currency symbol and thousands separators,
/// e.g. `$1,234,567.89` or `-€12.50`.
pub fn format_money(amount: Money, currency: &Currency) -> String {
    let dp = currency.minor_units();
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.*}", dp as usize, rounded.abs());

    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match frac {
        Some(f) => format!("{sign}{}{grouped}.{f}", currency.symbol()),
        None => format!("{sign}{}{grouped}", currency.symbol()),
    }
}

/// Format a decimal rate as a percentage with up to three decimals (0.065 -> "6.5%").
pub fn format_rate(rate: Rate) -> String {
    let pct = (rate * dec!(100))
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if pct.is_zero() {
        return "0%".to_string();
    }
    format!("{pct}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(dec!(599.555)), dec!(599.56));
        assert_eq!(round_money(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn test_format_money_grouping() {
        assert_eq!(format_money(dec!(1234567.891), &Currency::USD), "$1,234,567.89");
        assert_eq!(format_money(dec!(999), &Currency::GBP), "£999.00");
        assert_eq!(format_money(dec!(-12.5), &Currency::EUR), "-€12.50");
    }

    #[test]
    fn test_format_money_no_minor_units() {
        assert_eq!(format_money(dec!(1500000.4), &Currency::JPY), "¥1,500,000");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(dec!(0.065)), "6.5%");
        assert_eq!(format_rate(dec!(0.05)), "5%");
        assert_eq!(format_rate(Decimal::ZERO), "0%");
    }
}
