use thiserror::Error;

/// Errors surfaced by ledger operations.
///
/// Financial mutations either fully succeed or fail with one of these and
/// leave no partial effect behind.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Input rejected before any state was touched.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A compare-and-set race was lost (e.g. a request that is no longer
    /// pending execution).
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// A best-effort collaborator (notification delivery) failed. Never
    /// fatal to the financial path.
    #[error("external service failure: {0}")]
    ExternalService(String),

    /// Underlying IO failure (snapshot persistence).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A specialized Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
