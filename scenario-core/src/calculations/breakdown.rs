//! Full tax-breakdown calculator.
//!
//! Orchestrates income aggregation, deduction computation with the
//! 80%-of-income ceiling, income-shifting aggregation, federal and state
//! bracket invocation, and FICA/self-employment tax, then assembles the
//! itemized [`TaxBreakdown`].
//!
//! The calculator favors defensive zero-returns over errors: missing
//! profile or rates yield [`TaxBreakdown::zero`], and a state with no rate
//! schedule simply contributes no state tax.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use scenario_core::calculations::calculate_tax_breakdown;
//!
//! let breakdown = calculate_tax_breakdown(None, None, &[]);
//!
//! assert_eq!(breakdown.total, dec!(0));
//! assert!(breakdown.federal_brackets.is_empty());
//! ```

use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::brackets::compute_bracket_tax;
use crate::calculations::common::{round_two, round_whole};
use crate::models::{
    BracketSlice, EntityType, RateTable, Strategy, TaxBreakdown, TaxpayerProfile,
};

/// Combined deductions may not exceed this share of total income.
fn deduction_ceiling_ratio() -> Decimal {
    Decimal::new(8, 1)
}

/// Computes the itemized tax liability for one profile under one rate table.
///
/// `strategies` feed the calculation through their enabled contributions:
/// deduction payloads raise the combined deduction (subject to the 80%
/// ceiling) and income-shifted payloads shrink both the bracket base and the
/// FICA wage base. Disabled strategies contribute nothing.
///
/// Passing `None` for the profile or the rates returns the all-zero
/// breakdown so callers can render a "not yet computed" state without
/// special-casing; this function never panics.
pub fn calculate_tax_breakdown(
    profile: Option<&TaxpayerProfile>,
    rates: Option<&RateTable>,
    strategies: &[Strategy],
) -> TaxBreakdown {
    let (Some(profile), Some(rates)) = (profile, rates) else {
        return TaxBreakdown::zero();
    };

    let total_income = round_whole(profile.total_income());

    let base_deduction = federal_base_deduction(profile, rates);
    let strategy_deductions: Decimal = strategies.iter().map(Strategy::deduction_amount).sum();

    let max_allowed_deduction = total_income * deduction_ceiling_ratio();
    let proposed = base_deduction + strategy_deductions;
    let (applied_deduction, deduction_limit_reached) = if proposed > max_allowed_deduction {
        warn!(
            proposed = %proposed,
            ceiling = %max_allowed_deduction,
            "combined deductions exceed 80% of income; clamping to ceiling"
        );
        (max_allowed_deduction, true)
    } else {
        (proposed, false)
    };

    let shifted_income: Decimal = strategies.iter().map(Strategy::shifted_income).sum();

    let taxable_income =
        (total_income - shifted_income - applied_deduction).max(Decimal::ZERO);

    let federal = compute_bracket_tax(taxable_income, profile.filing_status, &rates.federal.brackets);

    let (state_tax, state_slices) = state_tax(
        profile,
        rates,
        total_income,
        shifted_income,
        strategy_deductions,
        max_allowed_deduction,
    );

    // FICA bases see the post-shift wage figure, floored at zero.
    let wage_base_income = (profile.wages_income - shifted_income).max(Decimal::ZERO);

    let social_security = round_whole(
        wage_base_income.min(rates.fica.social_security_wage_base)
            * rates.fica.social_security_rate,
    );

    let medicare_rate = if wage_base_income > rates.fica.medicare_additional_threshold {
        rates.fica.medicare_rate + rates.fica.medicare_additional_rate
    } else {
        rates.fica.medicare_rate
    };
    let medicare = round_whole(wage_base_income * medicare_rate);

    let self_employment = self_employment_tax(profile, rates, shifted_income);

    let fica = social_security + medicare + self_employment;
    let total = federal.total + state_tax + fica;

    let effective_rate = if total_income > Decimal::ZERO {
        round_two(total / total_income * Decimal::from(100))
    } else {
        Decimal::ZERO
    };

    TaxBreakdown {
        federal: federal.total,
        state: state_tax,
        social_security,
        medicare,
        self_employment,
        fica,
        total,
        effective_rate,
        federal_brackets: federal.slices,
        state_brackets: state_slices,
        total_income,
        taxable_income,
        shifted_income,
        base_deduction,
        strategy_deductions,
        applied_deduction,
        deduction_limit_reached,
    }
}

/// Standard deduction for the filing status, or the custom amount when the
/// profile itemizes (defaulting to zero if unset).
fn federal_base_deduction(profile: &TaxpayerProfile, rates: &RateTable) -> Decimal {
    if profile.uses_standard_deduction {
        rates
            .federal
            .standard_deduction
            .amount(profile.filing_status)
    } else {
        profile.custom_deduction.unwrap_or_default()
    }
}

/// State tax under the state's own schedule.
///
/// Mirrors the profile's deduction mode with the state's amounts: standard
/// mode uses the state standard deduction, itemized mode the custom amount.
/// Strategy deductions apply in either mode and the combined state deduction
/// is clamped to the same 80% ceiling. A state with no schedule contributes
/// zero tax.
fn state_tax(
    profile: &TaxpayerProfile,
    rates: &RateTable,
    total_income: Decimal,
    shifted_income: Decimal,
    strategy_deductions: Decimal,
    max_allowed_deduction: Decimal,
) -> (Decimal, Vec<BracketSlice>) {
    let Some(schedule) = rates.state(&profile.state) else {
        warn!(state = %profile.state, "no rate schedule for state; state tax is zero");
        return (Decimal::ZERO, Vec::new());
    };

    let state_base = if profile.uses_standard_deduction {
        schedule.standard_deduction.amount(profile.filing_status)
    } else {
        profile.custom_deduction.unwrap_or_default()
    };
    let state_deduction = (state_base + strategy_deductions).min(max_allowed_deduction);

    let state_taxable = (total_income - shifted_income - state_deduction).max(Decimal::ZERO);
    let result = compute_bracket_tax(state_taxable, profile.filing_status, &schedule.brackets);
    (result.total, result.slices)
}

/// Self-employment tax applies only to sole-proprietor business owners with
/// ordinary K-1 income; shifted income reduces the base.
fn self_employment_tax(
    profile: &TaxpayerProfile,
    rates: &RateTable,
    shifted_income: Decimal,
) -> Decimal {
    let sole_prop = profile.business_owner
        && profile.entity_type == Some(EntityType::SoleProprietorship)
        && profile.ordinary_k1() > Decimal::ZERO;
    if !sole_prop {
        return Decimal::ZERO;
    }
    let base = (profile.ordinary_k1() - shifted_income).max(Decimal::ZERO);
    round_whole(base * rates.self_employment_rate)
}
