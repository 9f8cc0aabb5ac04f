pub mod error;
pub mod presenter;
pub mod projection;
pub mod time_value;
pub mod types;
pub mod validation;

/// Loan calculators. `schedule` is always built; `arm` and `graduated` sit behind their features.
pub mod loans;

#[cfg(feature = "depreciation")]
pub mod depreciation;

#[cfg(feature = "tiered")]
pub mod tiered;

pub use error::{AmortizeError, FieldError};
pub use types::*;

/// Standard result type for all amortize operations
pub type AmortizeResult<T> = Result<T, AmortizeError>;
