//! The period projector shared by every loan calculator.
//!
//! A loan is described as an ordered list of [`RateRegime`]s, each holding an
//! annual rate for a contiguous span of periods. [`project`] folds over those
//! periods, carrying the outstanding balance, and emits one [`PeriodRecord`]
//! per reporting boundary. [`adjust_rate`] is the cap-respecting rate step
//! used to build adjustable-rate regimes.

pub mod projector;
pub mod regime;

pub use projector::{
    project, run_projection, PaymentChange, PeriodRecord, Projection, ProjectionInput,
    MAX_ANNUAL_RATE, MAX_TERM_YEARS,
};
pub use regime::{adjust_rate, PaymentRule, RateCaps, RateRegime};
