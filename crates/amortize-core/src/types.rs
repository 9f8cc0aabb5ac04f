use chrono::{Duration, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AmortizeError;
use crate::AmortizeResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;


/// Currency code
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    GBP,
    #[default]
    USD,
    EUR,
    CHF,
    JPY,
    CAD,
    AUD,
    INR,
    Other(String),
}

impl Currency {
    pub fn symbol(&self) -> &str {
        match self {
            Currency::GBP => "£",
            Currency::USD | Currency::CAD | Currency::AUD => "$",
            Currency::EUR => "€",
            Currency::CHF => "CHF ",
            Currency::JPY => "¥",
            Currency::INR => "₹",
            Currency::Other(code) => code.as_str(),
        }
    }

    /// Minor units shown when formatting (JPY has none).
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

/// How often payments fall due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    Weekly,
    BiWeekly,
    SemiMonthly,
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::BiWeekly => 26,
            PaymentFrequency::SemiMonthly => 24,
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    /// Periodic rate for a nominal annual rate.
    pub fn periodic_rate(self, annual_rate: Rate) -> Rate {
        annual_rate / Decimal::from(self.periods_per_year())
    }

    /// Date on which payment `period` (1-indexed) falls, counting from `start`.
    pub fn payment_date(self, start: NaiveDate, period: u32) -> AmortizeResult<NaiveDate> {
        let date = match self {
            PaymentFrequency::Weekly => start.checked_add_signed(Duration::weeks(period as i64)),
            PaymentFrequency::BiWeekly => {
                start.checked_add_signed(Duration::weeks(2 * period as i64))
            }
            PaymentFrequency::SemiMonthly => {
                // Two payments per calendar month: on the start day and 15 days later.
                let months = start.checked_add_months(Months::new(period / 2));
                if period % 2 == 1 {
                    months.and_then(|d| d.checked_add_signed(Duration::days(15)))
                } else {
                    months
                }
            }
            PaymentFrequency::Monthly => start.checked_add_months(Months::new(period)),
            PaymentFrequency::Quarterly => start.checked_add_months(Months::new(3 * period)),
            PaymentFrequency::SemiAnnual => start.checked_add_months(Months::new(6 * period)),
            PaymentFrequency::Annual => start.checked_add_months(Months::new(12 * period)),
        };
        date.ok_or_else(|| {
            AmortizeError::DateError(format!("payment date for period {period} is out of range"))
        })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Months in a year, used by the monthly calculators.
pub const MONTHS_PER_YEAR: u32 = 12;

/// Tolerance under which a residual balance is treated as settled.
pub const BALANCE_EPSILON: Money = dec!(0.000001);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_periodic_rate_monthly() {
        assert_eq!(
            PaymentFrequency::Monthly.periodic_rate(dec!(0.06)),
            dec!(0.005)
        );
    }

    #[test]
    fn test_payment_date_month_end_clamps() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let d = PaymentFrequency::Monthly.payment_date(start, 1).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_payment_date_biweekly() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d = PaymentFrequency::BiWeekly.payment_date(start, 2).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
    }

    #[test]
    fn test_semi_monthly_alternates() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let f = PaymentFrequency::SemiMonthly;
        assert_eq!(
            f.payment_date(start, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 16).unwrap()
        );
        assert_eq!(
            f.payment_date(start, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );
    }
}
