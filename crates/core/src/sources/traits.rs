use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::settings::Settings;
use crate::models::transaction::Transaction;

/// Where the full transaction collection comes from (a database, a sync
/// service, an in-memory list in tests).
///
/// If the backing store changes, only the implementation is replaced; the
/// pipeline is untouched.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Current transactions. `None` means "no collection yet" and is treated
    /// the same as an empty one.
    async fn transactions(&self) -> Result<Option<Vec<Transaction>>, CoreError>;
}

/// Where the user's selected range preset and granularity come from.
#[async_trait]
pub trait RangePreferenceSource: Send + Sync {
    fn name(&self) -> &str;

    async fn settings(&self) -> Result<Settings, CoreError>;
}
