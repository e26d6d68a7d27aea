//! Analytics over canonical products: ABC tiers and dashboard aggregates.
//! Everything here is a pure function of its inputs.

pub mod abc;
pub mod stats;

pub use abc::{
    classify, sales_score, summarize, AbcClass, AbcClassifiedProduct, AbcSummary, TierSummary,
};
pub use stats::{dashboard_stats, snapshot_row};
