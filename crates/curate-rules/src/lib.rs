//! curate-rules
//!
//! Compiles field constraints into ordered, pure validation rules and runs
//! them over an evidence tree. Rules never raise: a failing constraint is a
//! message, a malformed constraint is a rule that always fails.

pub mod rule;
pub mod ruleset;

pub use crate::rule::{Rule, RuleKind, RuleOutcome, compile, first_failure};
pub use crate::ruleset::{RuleSet, validate};
