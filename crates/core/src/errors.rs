use thiserror::Error;

/// Unified error type for the entire expense-tracker-core library.
///
/// Aggregation and search never fail; errors only come from ledger
/// mutations, preset resolution, configuration files and external sources.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration / File ────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── External sources ────────────────────────────────────────────
    #[error("Source error ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
