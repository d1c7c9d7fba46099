pub mod loader;

pub use loader::{
    BracketRecord, DeductionRecord, FicaRecord, RateLoaderError, RateTableLoader,
};
