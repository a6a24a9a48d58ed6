//! Policy engine.
//!
//! This module provides privilege evaluation over the attribute graph and
//! filtering of domain records against the result.

mod aggregator;
mod evaluator;
pub mod filter;

pub use aggregator::Privileges;
pub use evaluator::PolicyEvaluator;
pub use filter::{filter, Redactable};
