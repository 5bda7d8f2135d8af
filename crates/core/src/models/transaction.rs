use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::{Category, CategoryKind};

/// A single recorded income, expense or transfer.
///
/// Owned by the caller; aggregation and search only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,

    /// Local wall-clock time the transaction happened at
    pub occurred_at: NaiveDateTime,

    /// Signed amount. Whether it counts as income or expense comes from the category.
    pub amount: f64,

    pub category: Category,

    /// Account the money moved from/to, if tracked
    #[serde(default)]
    pub account_id: Option<Uuid>,

    /// Free-text note (e.g., "Grocery run")
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    pub fn new(occurred_at: NaiveDateTime, amount: f64, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at,
            amount,
            category,
            account_id: None,
            note: String::new(),
        }
    }

    /// Create a transaction with a note attached.
    pub fn with_note(
        occurred_at: NaiveDateTime,
        amount: f64,
        category: Category,
        note: impl Into<String>,
    ) -> Self {
        Self {
            note: note.into(),
            ..Self::new(occurred_at, amount, category)
        }
    }

    /// Builder-style setter for the account.
    #[must_use]
    pub fn on_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    #[must_use]
    pub fn kind(&self) -> CategoryKind {
        self.category.kind
    }
}
