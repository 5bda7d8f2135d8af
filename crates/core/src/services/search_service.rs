use uuid::Uuid;

use crate::models::category::CategoryKind;
use crate::models::transaction::Transaction;

/// Structured narrowing applied before charting.
///
/// Each list is a whitelist; an empty list places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category_ids: Vec<Uuid>,
    pub account_ids: Vec<Uuid>,
    pub kinds: Vec<CategoryKind>,
}

impl TransactionFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category_ids.is_empty() && self.account_ids.is_empty() && self.kinds.is_empty()
    }

    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        let category_ok =
            self.category_ids.is_empty() || self.category_ids.contains(&transaction.category.id);
        // A transaction without an account never satisfies an account restriction.
        let account_ok = self.account_ids.is_empty()
            || transaction
                .account_id
                .is_some_and(|id| self.account_ids.contains(&id));
        let kind_ok = self.kinds.is_empty() || self.kinds.contains(&transaction.kind());
        category_ok && account_ok && kind_ok
    }
}

/// Text search and structured filtering over transactions. Order is always preserved.
pub struct SearchService;

impl SearchService {
    pub fn new() -> Self {
        Self
    }

    /// Keep transactions whose note or category name contains `query`,
    /// ignoring case. A blank or absent query returns every transaction.
    #[must_use]
    pub fn filter(&self, query: Option<&str>, transactions: Option<&[Transaction]>) -> Vec<Transaction> {
        let transactions = transactions.unwrap_or_default();

        let needle = match query {
            Some(q) if !q.trim().is_empty() => q.to_lowercase(),
            _ => return transactions.to_vec(),
        };

        let matched: Vec<Transaction> = transactions
            .iter()
            .filter(|t| {
                t.note.to_lowercase().contains(&needle)
                    || t.category.name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        tracing::debug!(
            query = %needle,
            matched = matched.len(),
            total = transactions.len(),
            "searched transactions"
        );
        matched
    }

    /// Keep transactions matching every non-empty criterion of `filter`.
    #[must_use]
    pub fn apply_filter(
        &self,
        filter: &TransactionFilter,
        transactions: Option<&[Transaction]>,
    ) -> Vec<Transaction> {
        let transactions = transactions.unwrap_or_default();
        if filter.is_empty() {
            return transactions.to_vec();
        }
        transactions
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }
}

impl Default for SearchService {
    fn default() -> Self {
        Self::new()
    }
}
