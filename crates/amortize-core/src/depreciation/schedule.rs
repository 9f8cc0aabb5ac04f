use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::validation::Validator;
use crate::AmortizeResult;

/// Longest useful life accepted, in years.
const MAX_USEFUL_LIFE: u32 = 100;

/// Depreciation method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DepreciationMethod {
    /// Charge for year k is `(cost - salvage) * (n - k + 1) / (n(n+1)/2)`.
    SumOfYearsDigits,
    /// Equal charge every year.
    StraightLine,
    /// `factor / n` of the opening book value each year (factor 2 = double
    /// declining). Optionally switches to straight-line once that is larger.
    DecliningBalance {
        factor: Decimal,
        #[serde(default)]
        switch_to_straight_line: bool,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    pub cost: Money,
    #[serde(default)]
    pub salvage_value: Money,
    pub useful_life_years: u32,
    pub method: DepreciationMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationYear {
    pub year: u32,
    pub opening_book_value: Money,
    pub depreciation: Money,
    /// Charge as a fraction of the depreciable base (`cost - salvage`).
    pub fraction: Rate,
    pub accumulated_depreciation: Money,
    pub closing_book_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationOutput {
    pub depreciable_base: Money,
    pub total_depreciation: Money,
    /// First year in which the declining-balance schedule moved to straight-line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switch_year: Option<u32>,
    pub schedule: Vec<DepreciationYear>,
}

/// Build a yearly depreciation schedule. Book value never drops below salvage,
/// and the final year takes whatever remains above salvage.
pub fn depreciation_schedule(
    input: &DepreciationInput,
) -> AmortizeResult<ComputationOutput<DepreciationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_depreciation(input)?;

    let n = input.useful_life_years;
    let base = input.cost - input.salvage_value;
    let digits_sum = Decimal::from(n) * Decimal::from(n + 1) / dec!(2);

    if base.is_zero() {
        warnings.push("Salvage value equals cost; nothing to depreciate".into());
    }

    let mut schedule = Vec::with_capacity(n as usize);
    let mut book = input.cost;
    let mut accumulated = Decimal::ZERO;
    let mut switch_year = None;

    for year in 1..=n {
        let remaining_years = Decimal::from(n - year + 1);
        let above_salvage = book - input.salvage_value;

        let charge = if year == n {
            above_salvage
        } else {
            let raw = match &input.method {
                DepreciationMethod::SumOfYearsDigits => base * remaining_years / digits_sum,
                DepreciationMethod::StraightLine => base / Decimal::from(n),
                DepreciationMethod::DecliningBalance {
                    factor,
                    switch_to_straight_line,
                } => {
                    let declining = book * factor / Decimal::from(n);
                    let straight = above_salvage / remaining_years;
                    if *switch_to_straight_line && straight > declining {
                        switch_year.get_or_insert(year);
                        straight
                    } else {
                        declining
                    }
                }
            };
            raw.min(above_salvage).max(Decimal::ZERO)
        };

        let opening = book;
        book -= charge;
        accumulated += charge;

        schedule.push(DepreciationYear {
            year,
            opening_book_value: opening,
            depreciation: charge,
            fraction: if base.is_zero() {
                Decimal::ZERO
            } else {
                charge / base
            },
            accumulated_depreciation: accumulated,
            closing_book_value: book,
        });
    }

    if let [.., prev, last] = schedule.as_slice() {
        if matches!(input.method, DepreciationMethod::DecliningBalance { .. })
            && last.depreciation > prev.depreciation
        {
            warnings.push(format!(
                "Final-year catch-up charge of {} exceeds the prior year; consider switching to straight-line",
                last.depreciation
            ));
        }
    }

    let output = DepreciationOutput {
        depreciable_base: base,
        total_depreciation: accumulated,
        switch_year,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        method_name(&input.method),
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn method_name(method: &DepreciationMethod) -> &'static str {
    match method {
        DepreciationMethod::SumOfYearsDigits => "Sum-of-Years-Digits Depreciation",
        DepreciationMethod::StraightLine => "Straight-Line Depreciation",
        DepreciationMethod::DecliningBalance { .. } => "Declining-Balance Depreciation",
    }
}

fn validate_depreciation(input: &DepreciationInput) -> AmortizeResult<()> {
    let mut v = Validator::new();
    v.positive("cost", input.cost)
        .non_negative("salvage_value", input.salvage_value)
        .at_most("salvage_value", input.salvage_value, input.cost)
        .nonzero("useful_life_years", input.useful_life_years)
        .count_at_most("useful_life_years", input.useful_life_years, MAX_USEFUL_LIFE);
    if let DepreciationMethod::DecliningBalance { factor, .. } = &input.method {
        v.in_range("method.factor", *factor, dec!(0.5), dec!(4));
    }
    v.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(method: DepreciationMethod) -> DepreciationInput {
        DepreciationInput {
            cost: dec!(15000),
            salvage_value: dec!(0),
            useful_life_years: 5,
            method,
        }
    }

    #[test]
    fn test_syd_textbook() {
        // Digits sum 15 => charges 5000, 4000, 3000, 2000, 1000
        let out = depreciation_schedule(&machine(DepreciationMethod::SumOfYearsDigits))
            .unwrap()
            .result;
        let charges: Vec<Money> = out.schedule.iter().map(|y| y.depreciation).collect();
        assert_eq!(
            charges,
            vec![dec!(5000), dec!(4000), dec!(3000), dec!(2000), dec!(1000)]
        );
        assert_eq!(out.total_depreciation, dec!(15000));
    }

    #[test]
    fn test_straight_line_with_salvage() {
        let mut input = machine(DepreciationMethod::StraightLine);
        input.salvage_value = dec!(3000);
        let out = depreciation_schedule(&input).unwrap().result;
        assert!(out.schedule.iter().all(|y| y.depreciation == dec!(2400)));
        assert_eq!(out.schedule[4].closing_book_value, dec!(3000));
    }

    #[test]
    fn test_double_declining_switch() {
        let input = DepreciationInput {
            cost: dec!(10000),
            salvage_value: Decimal::ZERO,
            useful_life_years: 5,
            method: DepreciationMethod::DecliningBalance {
                factor: dec!(2),
                switch_to_straight_line: true,
            },
        };
        let out = depreciation_schedule(&input).unwrap().result;
        // 4000, 2400, 1440, then 2160 spread straight-line over two years
        assert_eq!(out.schedule[0].depreciation, dec!(4000));
        assert_eq!(out.schedule[1].depreciation, dec!(2400));
        assert_eq!(out.schedule[2].depreciation, dec!(1440));
        assert_eq!(out.switch_year, Some(4));
        assert_eq!(out.schedule[3].depreciation, dec!(1080));
        assert_eq!(out.schedule[4].depreciation, dec!(1080));
        assert_eq!(out.schedule[4].closing_book_value, Decimal::ZERO);
    }

    #[test]
    fn test_declining_without_switch_warns_on_catch_up() {
        let input = DepreciationInput {
            cost: dec!(10000),
            salvage_value: dec!(1000),
            useful_life_years: 5,
            method: DepreciationMethod::DecliningBalance {
                factor: dec!(2),
                switch_to_straight_line: false,
            },
        };
        let out = depreciation_schedule(&input).unwrap();
        // Year 4 leaves a book value of 1296, so year 5 takes the 296 above salvage.
        assert_eq!(out.result.schedule[4].depreciation, dec!(296));
        assert!(out.result.switch_year.is_none());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_salvage_above_cost_rejected() {
        let mut input = machine(DepreciationMethod::StraightLine);
        input.salvage_value = dec!(20000);
        assert!(depreciation_schedule(&input).is_err());
    }
}
