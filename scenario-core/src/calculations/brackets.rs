//! Progressive-bracket tax engine.
//!
//! Computes the tax owed on a taxable-income amount for one jurisdiction
//! (federal or a single state) given an ordered bracket schedule. This is
//! the leaf component of the calculator; it has no knowledge of deductions,
//! strategies or payroll taxes.
//!
//! Tax is rounded to the nearest whole currency unit *per bracket*, not once
//! at the end, so the per-bracket slices always sum to the reported total.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use scenario_core::models::{FilingStatus, RateBracket};
//! use scenario_core::calculations::compute_bracket_tax;
//!
//! let brackets = vec![
//!     RateBracket {
//!         rate: dec!(0.10),
//!         single: Some(dec!(11000)),
//!         married_joint: Some(dec!(22000)),
//!         married_separate: Some(dec!(11000)),
//!         head_of_household: Some(dec!(15700)),
//!     },
//!     RateBracket {
//!         rate: dec!(0.12),
//!         single: Some(dec!(44725)),
//!         married_joint: Some(dec!(89450)),
//!         married_separate: Some(dec!(44725)),
//!         head_of_household: Some(dec!(59850)),
//!     },
//! ];
//!
//! let result = compute_bracket_tax(dec!(20000), FilingStatus::Single, &brackets);
//!
//! // 11000 × 10% + 9000 × 12%
//! assert_eq!(result.total, dec!(2180));
//! assert_eq!(result.slices.len(), 2);
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_whole;
use crate::models::{BracketSlice, FilingStatus, RateBracket};

/// Result of a progressive-bracket computation for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketTax {
    pub total: Decimal,
    pub slices: Vec<BracketSlice>,
}

impl BracketTax {
    fn zero() -> Self {
        Self {
            total: Decimal::ZERO,
            slices: Vec::new(),
        }
    }
}

/// Computes progressive-bracket tax on `taxable_income`.
///
/// Walks `brackets` in ascending order; each bracket taxes the portion of
/// income between the previous bracket's threshold and its own, rounded to
/// whole currency at the bracket level. Brackets beyond the income level are
/// omitted from the output entirely. An empty schedule or zero income yields
/// zero tax with no slices; callers treat a missing state schedule as "no
/// state tax" rather than an error.
pub fn compute_bracket_tax(
    taxable_income: Decimal,
    filing_status: FilingStatus,
    brackets: &[RateBracket],
) -> BracketTax {
    if taxable_income <= Decimal::ZERO || brackets.is_empty() {
        return BracketTax::zero();
    }

    let mut total = Decimal::ZERO;
    let mut slices = Vec::new();
    let mut remaining = taxable_income;
    let mut floor = Decimal::ZERO;

    for bracket in brackets {
        let ceiling = bracket.threshold(filing_status);
        let taxable_in_bracket = match ceiling {
            Some(max) => remaining.min(max - floor),
            // Unbounded top bracket absorbs whatever is left.
            None => remaining,
        };

        if taxable_in_bracket > Decimal::ZERO {
            let tax = round_whole(taxable_in_bracket * bracket.rate);
            slices.push(BracketSlice {
                rate: bracket.rate,
                min: floor,
                max: ceiling,
                taxable: round_whole(taxable_in_bracket),
                tax,
            });
            total += tax;
            remaining -= taxable_in_bracket;
        }

        if remaining <= Decimal::ZERO {
            break;
        }
        match ceiling {
            Some(max) => floor = max,
            None => break,
        }
    }

    BracketTax { total, slices }
}
