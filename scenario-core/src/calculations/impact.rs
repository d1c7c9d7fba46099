//! Strategy impact and composition.
//!
//! Quantifies the tax savings from one strategy in isolation and from an
//! enabled set applied together. Shift and deduction strategies derive a
//! modified profile copy; deferrals and credits leave the current-year
//! profile untouched. The original profile is never mutated.
//!
//! Combined application runs in a fixed category order (income shifting,
//! then new deductions, then deferrals, then credits) so each strategy sees
//! the income-reduced state left by the ones before it. The authoritative
//! "after strategies" figure remains the one-shot
//! [`calculate_tax_breakdown`] with the full strategy list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::breakdown::calculate_tax_breakdown;
use crate::models::{RateTable, Strategy, StrategyCategory, TaxBreakdown, TaxpayerProfile};

/// Wage income is reduced only down to this floor before an income shift
/// spills over into ordinary K-1 income.
fn wage_shift_floor() -> Decimal {
    Decimal::from(160_000)
}

fn deduction_ceiling_ratio() -> Decimal {
    Decimal::new(8, 1)
}

/// Per-tax-type savings from applying a strategy. Never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySavings {
    pub federal: Decimal,
    pub state: Decimal,
    pub fica: Decimal,
    pub total: Decimal,
}

/// Result of applying one strategy to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyImpact {
    pub modified_profile: TaxpayerProfile,
    pub savings: StrategySavings,
}

/// Computes a strategy's isolated savings against `profile`.
///
/// The strategy is applied as if enabled regardless of its `enabled` flag,
/// matching how callers preview a candidate strategy. Savings are the
/// before/after difference per tax type, clamped at zero.
pub fn calculate_strategy_impact(
    strategy: &Strategy,
    profile: &TaxpayerProfile,
    rates: &RateTable,
) -> StrategyImpact {
    let enabled = Strategy {
        enabled: true,
        ..strategy.clone()
    };

    let before = calculate_tax_breakdown(Some(profile), Some(rates), &[]);

    let modified_profile = match enabled.category {
        StrategyCategory::IncomeShifted => apply_income_shift(&enabled, profile),
        StrategyCategory::NewDeductions => apply_deduction(&enabled, profile, rates),
        // Deferrals move liability across years, not out of this year's
        // bases; credits never touch the income base. Both leave the
        // profile as-is, so sequential application stays consistent with
        // one-shot evaluation.
        StrategyCategory::IncomeDeferred | StrategyCategory::NewCredits => profile.clone(),
    };

    let after = calculate_tax_breakdown(Some(&modified_profile), Some(rates), &[]);

    StrategyImpact {
        modified_profile,
        savings: StrategySavings {
            federal: (before.federal - after.federal).max(Decimal::ZERO),
            state: (before.state - after.state).max(Decimal::ZERO),
            fica: (before.fica - after.fica).max(Decimal::ZERO),
            total: (before.total - after.total).max(Decimal::ZERO),
        },
    }
}

/// Applies an enabled strategy set in the fixed category order and returns
/// the breakdown of the fully-modified profile.
///
/// The sort is stable, so strategies within a category keep their given
/// order. Savings from each step feed the next through the running profile.
pub fn calculate_combined_impact(
    strategies: &[Strategy],
    profile: &TaxpayerProfile,
    rates: &RateTable,
) -> TaxBreakdown {
    let mut ordered: Vec<&Strategy> = strategies.iter().collect();
    ordered.sort_by_key(|s| s.category.processing_order());

    let mut current = profile.clone();
    for strategy in ordered {
        current = calculate_strategy_impact(strategy, &current, rates).modified_profile;
    }

    calculate_tax_breakdown(Some(&current), Some(rates), &[])
}

/// Two-tier income-shift reduction: wages are reduced first, but only down
/// to the $160,000 floor; the remainder spills into ordinary K-1 income.
/// Profiles at or below the floor shift entirely out of K-1 income.
fn apply_income_shift(strategy: &Strategy, profile: &TaxpayerProfile) -> TaxpayerProfile {
    let shift = strategy.shifted_income();
    let mut modified = profile.clone();

    if modified.wages_income > wage_shift_floor() {
        let wage_reduction = (modified.wages_income - wage_shift_floor()).min(shift);
        modified.wages_income -= wage_reduction;

        let remaining = shift - wage_reduction;
        if remaining > Decimal::ZERO && modified.ordinary_k1() > Decimal::ZERO {
            modified.ordinary_k1_income =
                Some((modified.ordinary_k1() - remaining).max(Decimal::ZERO));
        }
    } else if modified.ordinary_k1() > Decimal::ZERO {
        modified.ordinary_k1_income = Some((modified.ordinary_k1() - shift).max(Decimal::ZERO));
    }

    modified
}

/// Applies a deduction strategy by reducing the income it offsets: ordinary
/// K-1 income when present, wages otherwise. The deduction is first clamped
/// so base plus strategy deductions stay within 80% of total income.
fn apply_deduction(
    strategy: &Strategy,
    profile: &TaxpayerProfile,
    rates: &RateTable,
) -> TaxpayerProfile {
    let mut amount = strategy.deduction_amount();
    let mut modified = profile.clone();

    let total_income = profile.total_income();
    let base_deduction = if profile.uses_standard_deduction {
        rates
            .federal
            .standard_deduction
            .amount(profile.filing_status)
    } else {
        profile.custom_deduction.unwrap_or_default()
    };

    let max_allowed = total_income * deduction_ceiling_ratio();
    if base_deduction + amount > max_allowed {
        warn!(
            proposed = %(base_deduction + amount),
            ceiling = %max_allowed,
            strategy = %strategy.id,
            "strategy deduction clamped to 80% ceiling"
        );
        amount = (max_allowed - base_deduction).max(Decimal::ZERO);
    }

    if modified.ordinary_k1() > Decimal::ZERO {
        modified.ordinary_k1_income = Some((modified.ordinary_k1() - amount).max(Decimal::ZERO));
    } else {
        modified.wages_income = (modified.wages_income - amount).max(Decimal::ZERO);
    }

    modified
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{
        EntityType, FicaConfig, FilingStatus, JurisdictionSchedule, RateBracket,
        StandardDeductions, StrategyDetails,
    };

    fn bracket(
        rate: Decimal,
        single: Option<Decimal>,
        joint: Option<Decimal>,
        separate: Option<Decimal>,
        hoh: Option<Decimal>,
    ) -> RateBracket {
        RateBracket {
            rate,
            single,
            married_joint: joint,
            married_separate: separate,
            head_of_household: hoh,
        }
    }

    fn rates_2023() -> RateTable {
        let federal = JurisdictionSchedule {
            brackets: vec![
                bracket(
                    dec!(0.10),
                    Some(dec!(11000)),
                    Some(dec!(22000)),
                    Some(dec!(11000)),
                    Some(dec!(15700)),
                ),
                bracket(
                    dec!(0.12),
                    Some(dec!(44725)),
                    Some(dec!(89450)),
                    Some(dec!(44725)),
                    Some(dec!(59850)),
                ),
                bracket(
                    dec!(0.22),
                    Some(dec!(95375)),
                    Some(dec!(190750)),
                    Some(dec!(95375)),
                    Some(dec!(95350)),
                ),
                bracket(
                    dec!(0.24),
                    Some(dec!(182100)),
                    Some(dec!(364200)),
                    Some(dec!(182100)),
                    Some(dec!(182100)),
                ),
                bracket(
                    dec!(0.32),
                    Some(dec!(231250)),
                    Some(dec!(462500)),
                    Some(dec!(231250)),
                    Some(dec!(231250)),
                ),
                bracket(dec!(0.37), None, None, None, None),
            ],
            standard_deduction: StandardDeductions {
                single: dec!(13850),
                married_joint: dec!(27700),
                married_separate: dec!(13850),
                head_of_household: dec!(20800),
            },
        };

        let california = JurisdictionSchedule {
            brackets: vec![
                bracket(
                    dec!(0.01),
                    Some(dec!(10099)),
                    Some(dec!(20198)),
                    Some(dec!(10099)),
                    Some(dec!(20212)),
                ),
                bracket(
                    dec!(0.06),
                    Some(dec!(52455)),
                    Some(dec!(104910)),
                    Some(dec!(52455)),
                    Some(dec!(76397)),
                ),
                bracket(
                    dec!(0.093),
                    Some(dec!(338639)),
                    Some(dec!(677278)),
                    Some(dec!(338639)),
                    Some(dec!(460547)),
                ),
                bracket(dec!(0.123), None, None, None, None),
            ],
            standard_deduction: StandardDeductions {
                single: dec!(5363),
                married_joint: dec!(10726),
                married_separate: dec!(5363),
                head_of_household: dec!(10726),
            },
        };

        let mut states = HashMap::new();
        states.insert("CA".to_string(), california);

        RateTable {
            year: 2023,
            federal,
            states,
            fica: FicaConfig {
                social_security_rate: dec!(0.062),
                social_security_wage_base: dec!(160200),
                medicare_rate: dec!(0.0145),
                medicare_additional_rate: dec!(0.009),
                medicare_additional_threshold: dec!(200000),
            },
            self_employment_rate: dec!(0.153),
        }
    }

    fn business_owner_profile(wages: Decimal, ordinary_k1: Option<Decimal>) -> TaxpayerProfile {
        TaxpayerProfile {
            filing_status: FilingStatus::Single,
            state: "CA".to_string(),
            uses_standard_deduction: true,
            custom_deduction: None,
            wages_income: wages,
            passive_income: dec!(0),
            unearned_income: dec!(0),
            capital_gains: dec!(0),
            business_owner: true,
            entity_type: Some(EntityType::Llc),
            ordinary_k1_income: ordinary_k1,
            guaranteed_k1_income: None,
            dependents: 2,
        }
    }

    fn augusta_rule() -> Strategy {
        Strategy {
            id: "augusta_rule".to_string(),
            name: "Augusta Rule".to_string(),
            category: StrategyCategory::IncomeShifted,
            enabled: true,
            details: Some(StrategyDetails::AugustaRule {
                days_rented: 14,
                daily_rate: dec!(1500),
            }),
            estimated_savings: dec!(0),
            high_income: false,
        }
    }

    fn cost_segregation(deduction: Decimal) -> Strategy {
        Strategy {
            id: "cost_segregation".to_string(),
            name: "Cost Segregation".to_string(),
            category: StrategyCategory::NewDeductions,
            enabled: true,
            details: Some(StrategyDetails::CostSegregation {
                property_value: dec!(1000000),
                current_year_deduction: deduction,
            }),
            estimated_savings: dec!(0),
            high_income: false,
        }
    }

    // =========================================================================
    // Income-shift application
    // =========================================================================

    #[test]
    fn augusta_rule_shifts_entirely_out_of_wages_above_floor() {
        let profile = business_owner_profile(dec!(200000), None);
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&augusta_rule(), &profile, &rates);

        // 200000 − 160000 = 40000 headroom ≥ 21000 shift.
        assert_eq!(impact.modified_profile.wages_income, dec!(179000));
        assert!(impact.savings.federal > dec!(0));
        assert!(impact.savings.state > dec!(0));
        assert!(impact.savings.fica > dec!(0));
    }

    #[test]
    fn income_shift_spills_into_k1_at_wage_floor() {
        let profile = business_owner_profile(dec!(170000), Some(dec!(50000)));
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&augusta_rule(), &profile, &rates);

        // 10000 comes from wages, the remaining 11000 from K-1.
        assert_eq!(impact.modified_profile.wages_income, dec!(160000));
        assert_eq!(impact.modified_profile.ordinary_k1_income, Some(dec!(39000)));
    }

    #[test]
    fn income_shift_below_floor_reduces_k1_only() {
        let profile = business_owner_profile(dec!(120000), Some(dec!(50000)));
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&augusta_rule(), &profile, &rates);

        assert_eq!(impact.modified_profile.wages_income, dec!(120000));
        assert_eq!(impact.modified_profile.ordinary_k1_income, Some(dec!(29000)));
    }

    #[test]
    fn income_shift_without_k1_below_floor_is_a_no_op() {
        let profile = business_owner_profile(dec!(120000), None);
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&augusta_rule(), &profile, &rates);

        assert_eq!(impact.modified_profile, profile);
        assert_eq!(impact.savings.total, dec!(0));
    }

    // =========================================================================
    // Deduction application
    // =========================================================================

    #[test]
    fn deduction_strategy_reduces_k1_when_present() {
        let profile = business_owner_profile(dec!(200000), Some(dec!(100000)));
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&cost_segregation(dec!(30000)), &profile, &rates);

        assert_eq!(impact.modified_profile.ordinary_k1_income, Some(dec!(70000)));
        assert_eq!(impact.modified_profile.wages_income, dec!(200000));
        assert!(impact.savings.federal > dec!(0));
    }

    #[test]
    fn deduction_strategy_falls_back_to_wages() {
        let profile = business_owner_profile(dec!(200000), None);
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&cost_segregation(dec!(30000)), &profile, &rates);

        assert_eq!(impact.modified_profile.wages_income, dec!(170000));
    }

    #[test]
    fn deduction_strategy_clamps_to_ceiling_before_applying() {
        // Total income 50000, ceiling 40000, standard deduction 13850:
        // at most 26150 of the proposed 40000 deduction can apply.
        let profile = business_owner_profile(dec!(50000), None);
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&cost_segregation(dec!(40000)), &profile, &rates);

        assert_eq!(impact.modified_profile.wages_income, dec!(23850));
    }

    #[test]
    fn savings_are_never_negative() {
        // A deferral with no detail payload changes nothing.
        let strategy = Strategy {
            id: "reinsurance".to_string(),
            name: "Reinsurance Options".to_string(),
            category: StrategyCategory::IncomeDeferred,
            enabled: true,
            details: None,
            estimated_savings: dec!(0),
            high_income: false,
        };
        let profile = business_owner_profile(dec!(150000), Some(dec!(40000)));
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&strategy, &profile, &rates);

        assert_eq!(impact.savings.federal, dec!(0));
        assert_eq!(impact.savings.state, dec!(0));
        assert_eq!(impact.savings.fica, dec!(0));
        assert_eq!(impact.savings.total, dec!(0));
    }

    #[test]
    fn deferred_reinsurance_leaves_current_year_tax_unchanged() {
        let strategy = Strategy {
            id: "reinsurance".to_string(),
            name: "Reinsurance Options".to_string(),
            category: StrategyCategory::IncomeDeferred,
            enabled: true,
            details: Some(StrategyDetails::Reinsurance {
                user_contribution: dec!(50000),
            }),
            estimated_savings: dec!(0),
            high_income: false,
        };
        let profile = business_owner_profile(dec!(100000), Some(dec!(80000)));
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&strategy, &profile, &rates);

        assert_eq!(impact.modified_profile, profile);
        assert_eq!(impact.savings.total, dec!(0));

        // Sequential and one-shot evaluation agree on the deferral.
        let strategies = vec![strategy];
        let combined = calculate_combined_impact(&strategies, &profile, &rates);
        let one_shot = calculate_tax_breakdown(Some(&profile), Some(&rates), &strategies);
        assert_eq!(combined.total, one_shot.total);
    }

    #[test]
    fn credit_strategies_leave_profile_untouched() {
        let strategy = Strategy {
            id: "research_credit".to_string(),
            name: "R&D Tax Credit".to_string(),
            category: StrategyCategory::NewCredits,
            enabled: true,
            details: None,
            estimated_savings: dec!(0),
            high_income: false,
        };
        let profile = business_owner_profile(dec!(200000), Some(dec!(50000)));
        let rates = rates_2023();

        let impact = calculate_strategy_impact(&strategy, &profile, &rates);

        assert_eq!(impact.modified_profile, profile);
    }

    // =========================================================================
    // Combined application
    // =========================================================================

    #[test]
    fn combined_impact_matches_one_shot_breakdown() {
        // Wages stay above the floor after the shift and the deduction is
        // absorbed by K-1, so sequential application and the one-shot
        // strategy-list evaluation agree on total tax.
        let profile = business_owner_profile(dec!(500000), Some(dec!(100000)));
        let rates = rates_2023();
        let strategies = vec![cost_segregation(dec!(30000)), augusta_rule()];

        let combined = calculate_combined_impact(&strategies, &profile, &rates);
        let one_shot = calculate_tax_breakdown(Some(&profile), Some(&rates), &strategies);

        assert_eq!(combined.total, one_shot.total);
        assert_eq!(combined.federal, one_shot.federal);
        assert_eq!(combined.state, one_shot.state);
        assert_eq!(combined.fica, one_shot.fica);
    }

    #[test]
    fn combined_impact_orders_shift_before_deduction() {
        // With no K-1 income, order is observable: shifting first leaves
        // wages at 160000 before the deduction takes its 30000, while a
        // deduction-first run would drop wages below the shift floor and
        // make the shift a no-op.
        let profile = business_owner_profile(dec!(170000), None);
        let rates = rates_2023();
        let shuffled = vec![cost_segregation(dec!(30000)), augusta_rule()];
        let ordered = vec![augusta_rule(), cost_segregation(dec!(30000))];

        let from_shuffled = calculate_combined_impact(&shuffled, &profile, &rates);
        let from_ordered = calculate_combined_impact(&ordered, &profile, &rates);

        assert_eq!(from_shuffled, from_ordered);
        // Shift first: wages 170000 → 160000, then the deduction → 130000.
        assert_eq!(from_shuffled.total_income, dec!(130000));
    }

    #[test]
    fn combined_impact_of_empty_set_is_plain_breakdown() {
        let profile = business_owner_profile(dec!(200000), Some(dec!(50000)));
        let rates = rates_2023();

        let combined = calculate_combined_impact(&[], &profile, &rates);
        let plain = calculate_tax_breakdown(Some(&profile), Some(&rates), &[]);

        assert_eq!(combined, plain);
    }
}
