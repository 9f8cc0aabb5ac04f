use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.field, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum AmortizeError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Numeric overflow in {context} (base: {base})")]
    Overflow { context: String, base: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AmortizeError {
    /// Field-level errors carried by this error, if it is an input rejection.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            AmortizeError::InvalidInput { field, reason } => vec![FieldError {
                field: field.clone(),
                reason: reason.clone(),
            }],
            AmortizeError::Validation(errors) => errors.clone(),
            _ => Vec::new(),
        }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<serde_json::Error> for AmortizeError {
    fn from(e: serde_json::Error) -> Self {
        AmortizeError::SerializationError(e.to_string())
    }
}
