use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::filing_status::FilingStatus;

/// Errors detected by [`RateTable::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateTableError {
    /// A bracket rate must be between 0 and 1.
    #[error("bracket rate must be between 0 and 1, got {0}")]
    InvalidBracketRate(Decimal),

    /// Bracket thresholds must be ascending within a schedule.
    #[error("brackets for {jurisdiction} are not ordered by ascending {status:?} threshold")]
    UnorderedBrackets {
        jurisdiction: String,
        status: FilingStatus,
    },

    /// A FICA rate must be between 0 and 1.
    #[error("FICA rate must be between 0 and 1, got {0}")]
    InvalidFicaRate(Decimal),

    /// The social security wage base must be positive.
    #[error("social security wage base must be positive, got {0}")]
    InvalidWageBase(Decimal),

    /// The self-employment rate must be between 0 and 1.
    #[error("self-employment rate must be between 0 and 1, got {0}")]
    InvalidSelfEmploymentRate(Decimal),
}

/// One marginal rate with its upper income threshold per filing status.
///
/// A `None` threshold marks the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBracket {
    pub rate: Decimal,
    pub single: Option<Decimal>,
    pub married_joint: Option<Decimal>,
    pub married_separate: Option<Decimal>,
    pub head_of_household: Option<Decimal>,
}

impl RateBracket {
    /// Upper threshold of this bracket for the given filing status.
    pub fn threshold(&self, status: FilingStatus) -> Option<Decimal> {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedJoint => self.married_joint,
            FilingStatus::MarriedSeparate => self.married_separate,
            FilingStatus::HeadOfHousehold => self.head_of_household,
        }
    }
}

/// Standard-deduction amount per filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeductions {
    pub single: Decimal,
    pub married_joint: Decimal,
    pub married_separate: Decimal,
    pub head_of_household: Decimal,
}

impl StandardDeductions {
    pub fn amount(&self, status: FilingStatus) -> Decimal {
        match status {
            FilingStatus::Single => self.single,
            FilingStatus::MarriedJoint => self.married_joint,
            FilingStatus::MarriedSeparate => self.married_separate,
            FilingStatus::HeadOfHousehold => self.head_of_household,
        }
    }
}

/// Ordered bracket schedule plus standard deductions for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSchedule {
    pub brackets: Vec<RateBracket>,
    pub standard_deduction: StandardDeductions,
}

/// Payroll-tax parameters for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaConfig {
    pub social_security_rate: Decimal,
    pub social_security_wage_base: Decimal,
    pub medicare_rate: Decimal,
    pub medicare_additional_rate: Decimal,
    pub medicare_additional_threshold: Decimal,
}

/// Jurisdiction-year tax-rate schedule.
///
/// Immutable configuration looked up by year; state schedules are keyed by
/// state code. A state with no entry has no income tax as far as the
/// calculator is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pub year: i32,
    pub federal: JurisdictionSchedule,
    pub states: HashMap<String, JurisdictionSchedule>,
    pub fica: FicaConfig,
    pub self_employment_rate: Decimal,
}

impl RateTable {
    /// Looks up a state's schedule by code.
    pub fn state(&self, code: &str) -> Option<&JurisdictionSchedule> {
        self.states.get(code)
    }

    /// Validates rates and bracket ordering across all schedules.
    ///
    /// # Errors
    ///
    /// Returns [`RateTableError`] if any rate falls outside [0, 1], the
    /// social security wage base is not positive, or a schedule's
    /// thresholds are not ascending for some filing status.
    pub fn validate(&self) -> Result<(), RateTableError> {
        validate_schedule("federal", &self.federal)?;
        for (code, schedule) in &self.states {
            validate_schedule(code, schedule)?;
        }

        for rate in [
            self.fica.social_security_rate,
            self.fica.medicare_rate,
            self.fica.medicare_additional_rate,
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(RateTableError::InvalidFicaRate(rate));
            }
        }
        if self.fica.social_security_wage_base <= Decimal::ZERO {
            return Err(RateTableError::InvalidWageBase(
                self.fica.social_security_wage_base,
            ));
        }
        if self.self_employment_rate < Decimal::ZERO || self.self_employment_rate > Decimal::ONE {
            return Err(RateTableError::InvalidSelfEmploymentRate(
                self.self_employment_rate,
            ));
        }
        Ok(())
    }
}

fn validate_schedule(
    jurisdiction: &str,
    schedule: &JurisdictionSchedule,
) -> Result<(), RateTableError> {
    for bracket in &schedule.brackets {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(RateTableError::InvalidBracketRate(bracket.rate));
        }
    }

    for status in [
        FilingStatus::Single,
        FilingStatus::MarriedJoint,
        FilingStatus::MarriedSeparate,
        FilingStatus::HeadOfHousehold,
    ] {
        let mut prev = Decimal::ZERO;
        for bracket in &schedule.brackets {
            match bracket.threshold(status) {
                Some(threshold) => {
                    if threshold <= prev {
                        return Err(RateTableError::UnorderedBrackets {
                            jurisdiction: jurisdiction.to_string(),
                            status,
                        });
                    }
                    prev = threshold;
                }
                // Unbounded top bracket; nothing after it to order.
                None => break,
            }
        }
    }
    Ok(())
}
