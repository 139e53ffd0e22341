//! curate-scoring
//!
//! Turns the backend's partial score calculations and the schema's scoring
//! configuration into display values: total, classification, color, a
//! near-threshold flag and a progress percentage. Methodology-agnostic; any
//! label set and any thresholds work.

pub mod memo;
pub mod summary;

pub use crate::memo::ScoreMemo;
pub use crate::summary::{ClassificationColor, NEAR_THRESHOLD_WINDOW, ScoreSummary, evaluate, total_score};
