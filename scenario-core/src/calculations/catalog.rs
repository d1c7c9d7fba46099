//! Strategy catalog.
//!
//! Proposes the strategies applicable to a profile from its flags and the
//! current breakdown: business ownership unlocks the income-shifting and
//! property strategies, dependents unlock hiring children, and income or
//! total-tax thresholds gate the rest. Pure; the caller toggles `enabled`
//! and fills in detail payloads afterwards.

use rust_decimal::Decimal;

use crate::models::{
    Strategy, StrategyCategory, StrategyDetails, TaxBreakdown, TaxpayerProfile,
};

/// Default per-child salary offered by the hire-children strategy.
fn default_child_salary() -> Decimal {
    Decimal::from(13_850)
}

fn strategy(
    id: &str,
    name: &str,
    category: StrategyCategory,
    details: Option<StrategyDetails>,
) -> Strategy {
    Strategy {
        id: id.to_string(),
        name: name.to_string(),
        category,
        enabled: false,
        details,
        estimated_savings: Decimal::ZERO,
        high_income: false,
    }
}

/// Returns the strategies offered to this profile, all disabled and with
/// default detail payloads where the strategy has one.
pub fn applicable_strategies(
    profile: &TaxpayerProfile,
    breakdown: &TaxBreakdown,
) -> Vec<Strategy> {
    let mut strategies = Vec::new();

    if profile.business_owner {
        strategies.push(strategy(
            "augusta_rule",
            "Augusta Rule",
            StrategyCategory::IncomeShifted,
            Some(StrategyDetails::AugustaRule {
                days_rented: 14,
                daily_rate: Decimal::from(1500),
            }),
        ));

        strategies.push(strategy(
            "family_management_company",
            "Family Management Company",
            StrategyCategory::IncomeShifted,
            Some(StrategyDetails::FamilyManagementCompany {
                total_salaries: Decimal::ZERO,
            }),
        ));

        if profile.dependents > 0 {
            strategies.push(strategy(
                "hire_children",
                "Hire Your Children",
                StrategyCategory::IncomeShifted,
                Some(StrategyDetails::HireChildren {
                    total_salaries: default_child_salary() * Decimal::from(profile.dependents),
                }),
            ));
        }
    }

    let total_income = profile.total_income();
    if total_income > Decimal::from(100_000) {
        let mut charitable = strategy(
            "charitable_donation",
            "Charitable Donation Strategy",
            StrategyCategory::NewDeductions,
            Some(StrategyDetails::CharitableDonation {
                donation_amount: Decimal::ZERO,
                fmv_multiplier: Decimal::from(5),
                deduction_value: Decimal::ZERO,
            }),
        );
        charitable.high_income = total_income >= Decimal::from(500_000);
        strategies.push(charitable);
    }

    if profile.business_owner && breakdown.total > Decimal::from(150_000) {
        strategies.push(strategy(
            "reinsurance",
            "Reinsurance Options",
            StrategyCategory::IncomeDeferred,
            None,
        ));
    }

    if profile.business_owner {
        strategies.push(strategy(
            "cost_segregation",
            "Cost Segregation",
            StrategyCategory::NewDeductions,
            Some(StrategyDetails::CostSegregation {
                property_value: Decimal::from(1_000_000),
                current_year_deduction: Decimal::ZERO,
            }),
        ));

        strategies.push(strategy(
            "research_credit",
            "R&D Tax Credit",
            StrategyCategory::NewCredits,
            None,
        ));

        strategies.push(strategy(
            "work_opportunity",
            "Work Opportunity Credit",
            StrategyCategory::NewCredits,
            None,
        ));
    }

    if breakdown.total > Decimal::from(75_000) {
        strategies.push(strategy(
            "energy_credit",
            "Energy Tax Credits",
            StrategyCategory::NewCredits,
            None,
        ));
    }

    strategies
}
