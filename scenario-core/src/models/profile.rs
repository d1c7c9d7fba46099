use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filing_status::FilingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Llc,
    SCorp,
    CCorp,
    SoleProprietorship,
    Partnership,
}

/// A taxpayer's financial and filing facts for one tax year.
///
/// All income fields are non-negative amounts. K-1 income fields count
/// toward total income only when `business_owner` is true. The calculator
/// treats profiles as immutable input; strategy application returns a
/// modified copy and never mutates the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub filing_status: FilingStatus,
    pub state: String,
    pub uses_standard_deduction: bool,
    pub custom_deduction: Option<Decimal>,
    pub wages_income: Decimal,
    pub passive_income: Decimal,
    pub unearned_income: Decimal,
    pub capital_gains: Decimal,
    pub business_owner: bool,
    pub entity_type: Option<EntityType>,
    pub ordinary_k1_income: Option<Decimal>,
    pub guaranteed_k1_income: Option<Decimal>,
    pub dependents: u32,
}

impl TaxpayerProfile {
    /// Ordinary K-1 income, defaulting absent to zero.
    pub fn ordinary_k1(&self) -> Decimal {
        self.ordinary_k1_income.unwrap_or_default()
    }

    /// Guaranteed K-1 income, defaulting absent to zero.
    pub fn guaranteed_k1(&self) -> Decimal {
        self.guaranteed_k1_income.unwrap_or_default()
    }

    /// Sum of all income sources that enter the tax base.
    ///
    /// K-1 income is included only for business owners.
    pub fn total_income(&self) -> Decimal {
        let k1 = if self.business_owner {
            self.ordinary_k1() + self.guaranteed_k1()
        } else {
            Decimal::ZERO
        };
        self.wages_income + self.passive_income + self.unearned_income + self.capital_gains + k1
    }
}
