pub mod tiers;

pub use tiers::{
    default_savings_tiers, rate_for_balance, tiered_interest, tiered_rate, RateTier, TierDef,
    TierMode, TieredInput, TieredOutput, TieredYear, DEFAULT_SAVINGS_TIERS,
};
