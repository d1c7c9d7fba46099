//! Tax-scenario calculation modules.
//!
//! Evaluated bottom-up: the bracket engine computes progressive tax for one
//! jurisdiction, the breakdown calculator assembles the full federal, state
//! and FICA picture, and the impact module quantifies per-strategy and
//! combined savings on top of it.

pub mod brackets;
pub mod breakdown;
pub mod catalog;
pub mod common;
pub mod impact;

pub use brackets::{BracketTax, compute_bracket_tax};
pub use breakdown::calculate_tax_breakdown;
pub use catalog::applicable_strategies;
pub use impact::{
    StrategyImpact, StrategySavings, calculate_combined_impact, calculate_strategy_impact,
};
