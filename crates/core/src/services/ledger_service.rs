use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::ledger::Ledger;
use crate::models::transaction::Transaction;

/// Manages the in-memory transaction collection.
///
/// Pure business logic — no I/O. Keeps `ledger.transactions` sorted by
/// `occurred_at` (oldest first) so range queries stay cheap.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Add a transaction after validating it.
    pub fn add_transaction(&self, ledger: &mut Ledger, transaction: Transaction) -> Result<(), CoreError> {
        self.validate_transaction(&transaction)?;
        if ledger.transactions.iter().any(|t| t.id == transaction.id) {
            return Err(CoreError::ValidationError(format!(
                "Transaction {} already exists",
                transaction.id
            )));
        }
        Self::binary_insert(&mut ledger.transactions, transaction);
        Ok(())
    }

    /// Replace the transaction with `id` by `updated`, keeping the original id.
    pub fn update_transaction(
        &self,
        ledger: &mut Ledger,
        id: Uuid,
        updated: Transaction,
    ) -> Result<(), CoreError> {
        let updated = Transaction { id, ..updated };
        self.validate_transaction(&updated)?;

        let idx = Self::position(ledger, id)?;
        ledger.transactions.remove(idx);
        Self::binary_insert(&mut ledger.transactions, updated);
        Ok(())
    }

    /// Remove a transaction by id and return it.
    pub fn remove_transaction(&self, ledger: &mut Ledger, id: Uuid) -> Result<Transaction, CoreError> {
        let idx = Self::position(ledger, id)?;
        Ok(ledger.transactions.remove(idx))
    }

    /// All transactions, newest first (display order).
    pub fn get_transactions<'a>(&self, ledger: &'a Ledger) -> Vec<&'a Transaction> {
        ledger.transactions.iter().rev().collect()
    }

    /// Date of the oldest transaction, if any.
    pub fn earliest_date(&self, ledger: &Ledger) -> Option<NaiveDate> {
        ledger.transactions.first().map(|t| t.occurred_at.date())
    }

    /// Rules:
    /// - Amount must be a finite number
    /// - Category name must not be blank
    fn validate_transaction(&self, transaction: &Transaction) -> Result<(), CoreError> {
        if !transaction.amount.is_finite() {
            return Err(CoreError::ValidationError(format!(
                "Transaction amount must be a finite number, got {}",
                transaction.amount
            )));
        }
        if transaction.category.name.trim().is_empty() {
            return Err(CoreError::ValidationError(
                "Transaction category name must not be blank".into(),
            ));
        }
        Ok(())
    }

    fn position(ledger: &Ledger, id: Uuid) -> Result<usize, CoreError> {
        ledger
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TransactionNotFound(id.to_string()))
    }

    /// Insert after any existing transactions with the same timestamp, so
    /// insertion order breaks ties.
    fn binary_insert(transactions: &mut Vec<Transaction>, transaction: Transaction) {
        let pos = transactions.partition_point(|t| t.occurred_at <= transaction.occurred_at);
        transactions.insert(pos, transaction);
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
