mod breakdown;
mod filing_status;
mod profile;
mod rate_table;
mod strategy;

pub use breakdown::{BracketSlice, TaxBreakdown};
pub use filing_status::FilingStatus;
pub use profile::{EntityType, TaxpayerProfile};
pub use rate_table::{
    FicaConfig, JurisdictionSchedule, RateBracket, RateTable, RateTableError, StandardDeductions,
};
pub use strategy::{Strategy, StrategyCategory, StrategyDetails};
