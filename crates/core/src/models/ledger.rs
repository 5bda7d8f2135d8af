use serde::{Deserialize, Serialize};

use super::settings::Settings;
use super::transaction::Transaction;

/// The in-memory data container the facade works on.
///
/// Held only for the lifetime of the process; saving it is the host's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// All transactions, kept sorted by `occurred_at` (oldest first)
    pub transactions: Vec<Transaction>,

    pub settings: Settings,

    /// Transactions that have been removed but can be restored (undo support).
    #[serde(default)]
    pub trash: Vec<Transaction>,
}
