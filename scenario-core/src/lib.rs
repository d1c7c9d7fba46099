pub mod calculations;
pub mod models;

pub use calculations::{
    BracketTax, StrategyImpact, StrategySavings, applicable_strategies, calculate_combined_impact,
    calculate_strategy_impact, calculate_tax_breakdown, compute_bracket_tax,
};
pub use models::*;
