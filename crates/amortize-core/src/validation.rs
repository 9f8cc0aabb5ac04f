//! Input collection: field-level range checks gathered before any computation.
//!
//! Every calculator runs its input through a [`Validator`] first. All failures
//! are collected so a caller can show one message per offending field, and the
//! projector never sees a value that failed a check.

use rust_decimal::Decimal;

use crate::error::{AmortizeError, FieldError};
use crate::AmortizeResult;

/// Accumulates field errors for one input struct.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, reason: impl Into<String>) -> &mut Self {
        if !ok {
            self.errors.push(FieldError {
                field: field.to_string(),
                reason: reason.into(),
            });
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(value > Decimal::ZERO, field, "must be positive")
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(value >= Decimal::ZERO, field, "cannot be negative")
    }

    pub fn at_most(&mut self, field: &str, value: Decimal, max: Decimal) -> &mut Self {
        self.check(value <= max, field, format!("must not exceed {max}"))
    }

    pub fn in_range(&mut self, field: &str, value: Decimal, min: Decimal, max: Decimal) -> &mut Self {
        self.check(
            value >= min && value <= max,
            field,
            format!("must be between {min} and {max}"),
        )
    }

    pub fn nonzero(&mut self, field: &str, value: u32) -> &mut Self {
        self.check(value > 0, field, "must be greater than zero")
    }

    pub fn count_at_most(&mut self, field: &str, value: u32, max: u32) -> &mut Self {
        self.check(value <= max, field, format!("must not exceed {max}"))
    }

    /// A single failure keeps the `InvalidInput` shape; several become `Validation`.
    pub fn finish(self) -> AmortizeResult<()> {
        let mut errors = self.errors;
        match errors.len() {
            0 => Ok(()),
            1 => {
                let e = errors.remove(0);
                Err(AmortizeError::InvalidInput {
                    field: e.field,
                    reason: e.reason,
                })
            }
            _ => Err(AmortizeError::Validation(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clean_input_passes() {
        let mut v = Validator::new();
        v.positive("principal", dec!(1000)).nonzero("term", 12);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_single_failure_is_invalid_input() {
        let mut v = Validator::new();
        v.positive("principal", Decimal::ZERO);
        match v.finish() {
            Err(AmortizeError::InvalidInput { field, .. }) => assert_eq!(field, "principal"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_all_failures_collected() {
        let mut v = Validator::new();
        v.positive("principal", dec!(-1))
            .in_range("annual_rate", dec!(2), Decimal::ZERO, Decimal::ONE)
            .nonzero("term", 0);
        let err = v.finish().unwrap_err();
        let fields: Vec<String> = err.field_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["principal", "annual_rate", "term"]);
    }
}
