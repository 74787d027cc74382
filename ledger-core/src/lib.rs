pub mod error;
pub mod model;
pub mod profit;

pub use error::{LedgerError, Result};
