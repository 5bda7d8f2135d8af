use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::errors::CoreError;
use crate::models::settings::Settings;
use crate::models::transaction::Transaction;

use super::traits::{RangePreferenceSource, TransactionSource};

const SOURCE_NAME: &str = "InMemory";

/// A source backed by process memory that announces every mutation.
///
/// Each change bumps a revision counter published on a `watch` channel;
/// [`AnalysisPipeline::run`](super::pipeline::AnalysisPipeline::run) listens
/// on it to recompute.
pub struct InMemorySource {
    transactions: RwLock<Option<Vec<Transaction>>>,
    settings: RwLock<Settings>,
    revision: watch::Sender<u64>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::with_state(None, Settings::default())
    }

    pub fn with_state(transactions: Option<Vec<Transaction>>, settings: Settings) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            transactions: RwLock::new(transactions),
            settings: RwLock::new(settings),
            revision,
        }
    }

    /// Receiver that observes a new revision after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision (number of mutations so far).
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Replace the whole collection. `None` marks it as absent.
    pub fn set_transactions(&self, transactions: Option<Vec<Transaction>>) -> Result<(), CoreError> {
        *self.transactions.write().map_err(poisoned)? = transactions;
        self.bump();
        Ok(())
    }

    /// Append one transaction, creating the collection if absent.
    pub fn push_transaction(&self, transaction: Transaction) -> Result<(), CoreError> {
        self.transactions
            .write()
            .map_err(poisoned)?
            .get_or_insert_with(Vec::new)
            .push(transaction);
        self.bump();
        Ok(())
    }

    pub fn set_settings(&self, settings: Settings) -> Result<(), CoreError> {
        *self.settings.write().map_err(poisoned)? = settings;
        self.bump();
        Ok(())
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
        tracing::trace!(revision = *self.revision.borrow(), "in-memory source changed");
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionSource for InMemorySource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn transactions(&self) -> Result<Option<Vec<Transaction>>, CoreError> {
        Ok(self.transactions.read().map_err(poisoned)?.clone())
    }
}

#[async_trait]
impl RangePreferenceSource for InMemorySource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn settings(&self) -> Result<Settings, CoreError> {
        Ok(self.settings.read().map_err(poisoned)?.clone())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CoreError {
    CoreError::Source {
        source_name: SOURCE_NAME.into(),
        message: "lock poisoned by a panicking writer".into(),
    }
}
