use std::path::PathBuf;
use thiserror::Error;

/// Global error type for the seeder tool.
#[derive(Error, Debug)]
pub enum SeedError {
    /// Fixture parameters that cannot produce a usable ledger.
    #[error("Invalid fixture parameters: {0}")]
    InvalidParams(String),

    /// The output snapshot already exists and --force was not given.
    #[error("Refusing to overwrite existing snapshot at {0} (pass --force)")]
    SnapshotExists(PathBuf),

    /// Failure from the ledger while executing fixture allocations or
    /// writing the snapshot.
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_core::error::LedgerError),
}

/// A specialized Result type for seeder operations.
pub type Result<T> = std::result::Result<T, SeedError>;
