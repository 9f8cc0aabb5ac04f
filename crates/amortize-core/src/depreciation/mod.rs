pub mod schedule;

pub use schedule::{
    depreciation_schedule, DepreciationInput, DepreciationMethod, DepreciationOutput,
    DepreciationYear,
};
