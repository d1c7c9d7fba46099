use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Strategy categories, in combined-application order.
///
/// [`StrategyCategory::processing_order`] defines the fixed sequence used
/// when several strategies are applied together: income shifting first, so
/// deduction and payroll calculations see the reduced income base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyCategory {
    IncomeShifted,
    NewDeductions,
    IncomeDeferred,
    NewCredits,
}

impl StrategyCategory {
    pub fn processing_order(&self) -> u8 {
        match self {
            Self::IncomeShifted => 0,
            Self::NewDeductions => 1,
            Self::IncomeDeferred => 2,
            Self::NewCredits => 3,
        }
    }
}

/// Category-specific detail payload for one strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyDetails {
    AugustaRule {
        days_rented: u32,
        daily_rate: Decimal,
    },
    HireChildren {
        total_salaries: Decimal,
    },
    FamilyManagementCompany {
        total_salaries: Decimal,
    },
    CharitableDonation {
        donation_amount: Decimal,
        fmv_multiplier: Decimal,
        deduction_value: Decimal,
    },
    CostSegregation {
        property_value: Decimal,
        current_year_deduction: Decimal,
    },
    Reinsurance {
        user_contribution: Decimal,
    },
}

/// One selectable tax-reduction technique.
///
/// A strategy contributes to the breakdown only while `enabled`; its
/// contribution is determined entirely by its category and details, so a
/// strategy with no details contributes nothing. `estimated_savings` is an
/// output field filled in by callers from impact calculations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: String,
    pub name: String,
    pub category: StrategyCategory,
    pub enabled: bool,
    pub details: Option<StrategyDetails>,
    pub estimated_savings: Decimal,
    pub high_income: bool,
}

impl Strategy {
    /// Deduction contributed to the tax base while enabled.
    ///
    /// Only deduction-bearing payloads contribute; everything else is zero.
    pub fn deduction_amount(&self) -> Decimal {
        if !self.enabled {
            return Decimal::ZERO;
        }
        match &self.details {
            Some(StrategyDetails::CharitableDonation {
                deduction_value, ..
            }) => *deduction_value,
            Some(StrategyDetails::CostSegregation {
                current_year_deduction,
                ..
            }) => *current_year_deduction,
            _ => Decimal::ZERO,
        }
    }

    /// Income shifted out of the tax and wage bases while enabled.
    ///
    /// Only counts for strategies in the income-shifted category.
    pub fn shifted_income(&self) -> Decimal {
        if !self.enabled || self.category != StrategyCategory::IncomeShifted {
            return Decimal::ZERO;
        }
        match &self.details {
            Some(StrategyDetails::AugustaRule {
                days_rented,
                daily_rate,
            }) => Decimal::from(*days_rented) * *daily_rate,
            Some(StrategyDetails::HireChildren { total_salaries })
            | Some(StrategyDetails::FamilyManagementCompany { total_salaries }) => *total_salaries,
            Some(StrategyDetails::Reinsurance { user_contribution }) => *user_contribution,
            _ => Decimal::ZERO,
        }
    }
}
