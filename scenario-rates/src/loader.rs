//! CSV rate-table loading.
//!
//! Rate tables are static configuration, one file set per tax year:
//!
//! - `brackets_<year>.csv`: `jurisdiction,rate,single,married_joint,married_separate,head_household`
//!   where `jurisdiction` is `federal` or a state code, rows per jurisdiction
//!   are ordered by ascending threshold, and an empty threshold cell marks
//!   the unbounded top bracket.
//! - `deductions_<year>.csv`: `jurisdiction,single,married_joint,married_separate,head_household`
//!   standard-deduction amounts.
//! - `fica_<year>.csv`: a single row of payroll-tax parameters.
//!
//! [`RateTableLoader`] parses the three files and assembles a validated
//! [`RateTable`].

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use scenario_core::models::{
    FicaConfig, JurisdictionSchedule, RateBracket, RateTable, RateTableError, StandardDeductions,
};
use serde::Deserialize;
use thiserror::Error;

/// Jurisdiction key for the federal schedule in the CSV files.
const FEDERAL: &str = "federal";

/// Errors that can occur when loading rate-table data.
#[derive(Debug, Error)]
pub enum RateLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("no federal brackets in rate data")]
    MissingFederalBrackets,

    #[error("no FICA parameter row in rate data")]
    MissingFica,

    #[error("no standard deductions for jurisdiction '{0}'")]
    MissingDeductions(String),

    #[error("invalid rate table: {0}")]
    Invalid(#[from] RateTableError),
}

impl From<csv::Error> for RateLoaderError {
    fn from(err: csv::Error) -> Self {
        RateLoaderError::CsvParse(err.to_string())
    }
}

/// One bracket row. Empty threshold cells deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BracketRecord {
    pub jurisdiction: String,
    pub rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub single: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub married_joint: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub married_separate: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub head_household: Option<Decimal>,
}

/// One standard-deduction row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeductionRecord {
    pub jurisdiction: String,
    pub single: Decimal,
    pub married_joint: Decimal,
    pub married_separate: Decimal,
    pub head_household: Decimal,
}

/// The single FICA parameter row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FicaRecord {
    pub ss_rate: Decimal,
    pub ss_wage_base: Decimal,
    pub medicare_rate: Decimal,
    pub medicare_additional_rate: Decimal,
    pub medicare_additional_threshold: Decimal,
    pub self_employment_rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for rate-table CSV data.
pub struct RateTableLoader;

impl RateTableLoader {
    /// Parses bracket rows from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, RateLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        csv_reader
            .deserialize()
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Parses standard-deduction rows from a CSV reader.
    pub fn parse_deductions<R: Read>(reader: R) -> Result<Vec<DeductionRecord>, RateLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        csv_reader
            .deserialize()
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Parses the FICA parameter row from a CSV reader.
    pub fn parse_fica<R: Read>(reader: R) -> Result<FicaRecord, RateLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        csv_reader
            .deserialize()
            .next()
            .ok_or(RateLoaderError::MissingFica)?
            .map_err(Into::into)
    }

    /// Assembles parsed records into a validated [`RateTable`].
    ///
    /// Bracket row order within a jurisdiction is preserved; every
    /// jurisdiction with brackets must have a deduction row.
    ///
    /// # Errors
    ///
    /// Returns [`RateLoaderError`] if the federal schedule or FICA row is
    /// missing, a jurisdiction lacks deductions, or validation fails.
    pub fn assemble(
        year: i32,
        brackets: &[BracketRecord],
        deductions: &[DeductionRecord],
        fica: &FicaRecord,
    ) -> Result<RateTable, RateLoaderError> {
        let deductions_by_jurisdiction: HashMap<&str, &DeductionRecord> = deductions
            .iter()
            .map(|d| (d.jurisdiction.as_str(), d))
            .collect();

        // Group brackets by jurisdiction, preserving file order.
        let mut schedules: Vec<(String, Vec<RateBracket>)> = Vec::new();
        for record in brackets {
            let bracket = RateBracket {
                rate: record.rate,
                single: record.single,
                married_joint: record.married_joint,
                married_separate: record.married_separate,
                head_of_household: record.head_household,
            };
            match schedules.iter_mut().find(|(j, _)| *j == record.jurisdiction) {
                Some((_, list)) => list.push(bracket),
                None => schedules.push((record.jurisdiction.clone(), vec![bracket])),
            }
        }

        let mut federal = None;
        let mut states = HashMap::new();
        for (jurisdiction, brackets) in schedules {
            let deduction = deductions_by_jurisdiction
                .get(jurisdiction.as_str())
                .ok_or_else(|| RateLoaderError::MissingDeductions(jurisdiction.clone()))?;
            let schedule = JurisdictionSchedule {
                brackets,
                standard_deduction: StandardDeductions {
                    single: deduction.single,
                    married_joint: deduction.married_joint,
                    married_separate: deduction.married_separate,
                    head_of_household: deduction.head_household,
                },
            };
            if jurisdiction == FEDERAL {
                federal = Some(schedule);
            } else {
                states.insert(jurisdiction, schedule);
            }
        }

        let table = RateTable {
            year,
            federal: federal.ok_or(RateLoaderError::MissingFederalBrackets)?,
            states,
            fica: FicaConfig {
                social_security_rate: fica.ss_rate,
                social_security_wage_base: fica.ss_wage_base,
                medicare_rate: fica.medicare_rate,
                medicare_additional_rate: fica.medicare_additional_rate,
                medicare_additional_threshold: fica.medicare_additional_threshold,
            },
            self_employment_rate: fica.self_employment_rate,
        };
        table.validate()?;
        Ok(table)
    }

    /// Loads `brackets_<year>.csv`, `deductions_<year>.csv` and
    /// `fica_<year>.csv` from `dir` and assembles the year's table.
    pub fn load_year(dir: &Path, year: i32) -> Result<RateTable, RateLoaderError> {
        let open = |name: String| -> Result<File, RateLoaderError> {
            let path = dir.join(&name);
            File::open(&path).map_err(|source| RateLoaderError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        let brackets = Self::parse_brackets(open(format!("brackets_{year}.csv"))?)?;
        let deductions = Self::parse_deductions(open(format!("deductions_{year}.csv"))?)?;
        let fica = Self::parse_fica(open(format!("fica_{year}.csv"))?)?;
        Self::assemble(year, &brackets, &deductions, &fica)
    }
}
