use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bracket's share of a jurisdiction's tax.
///
/// `max` is `None` for the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub rate: Decimal,
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub taxable: Decimal,
    pub tax: Decimal,
}

/// Itemized tax liability for one (profile, rates, strategy-set) evaluation.
///
/// A value object recomputed fresh on every call. Invariants:
/// `total == federal + state + fica` and
/// `fica == social_security + medicare + self_employment`; the bracket
/// slices for each jurisdiction sum to that jurisdiction's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub federal: Decimal,
    pub state: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
    pub self_employment: Decimal,
    pub fica: Decimal,
    pub total: Decimal,
    /// Total tax as a percentage of total income, rounded to 2 decimals.
    pub effective_rate: Decimal,
    pub federal_brackets: Vec<BracketSlice>,
    pub state_brackets: Vec<BracketSlice>,
    pub total_income: Decimal,
    pub taxable_income: Decimal,
    pub shifted_income: Decimal,
    /// Standard or custom deduction before the ceiling is applied.
    pub base_deduction: Decimal,
    /// Strategy-contributed deductions before the ceiling is applied.
    pub strategy_deductions: Decimal,
    /// Combined deduction actually subtracted from federal taxable income.
    pub applied_deduction: Decimal,
    /// True when the 80%-of-income deduction ceiling clamped the total.
    pub deduction_limit_reached: bool,
}

impl TaxBreakdown {
    /// All-zero breakdown, returned when profile or rates are missing so
    /// callers can render a "not yet computed" state uniformly.
    pub fn zero() -> Self {
        Self {
            federal: Decimal::ZERO,
            state: Decimal::ZERO,
            social_security: Decimal::ZERO,
            medicare: Decimal::ZERO,
            self_employment: Decimal::ZERO,
            fica: Decimal::ZERO,
            total: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
            federal_brackets: Vec::new(),
            state_brackets: Vec::new(),
            total_income: Decimal::ZERO,
            taxable_income: Decimal::ZERO,
            shifted_income: Decimal::ZERO,
            base_deduction: Decimal::ZERO,
            strategy_deductions: Decimal::ZERO,
            applied_deduction: Decimal::ZERO,
            deduction_limit_reached: false,
        }
    }
}
