pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod services;
pub mod sources;

use chrono::NaiveDate;
use models::{
    bucket::Granularity,
    chart::{Aggregation, ChartData},
    date_range::{DateRange, DateRangeType, RangeEnd},
    ledger::Ledger,
    settings::Settings,
    transaction::Transaction,
};
use services::{
    chart_service::ChartService,
    date_range_service::DateRangeService,
    ledger_service::LedgerService,
    search_service::{SearchService, TransactionFilter},
};
use uuid::Uuid;

use errors::CoreError;

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    logging::init_tracing();
    tracing::info!("Expense tracker core tracing initialized.");
}

/// Main entry point for the expense tracker core library.
/// Holds the in-memory ledger and all services needed to operate on it.
#[must_use]
pub struct ExpenseTracker {
    ledger: Ledger,
    ledger_service: LedgerService,
    chart_service: ChartService,
    search_service: SearchService,
    date_range_service: DateRangeService,
}

impl std::fmt::Debug for ExpenseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpenseTracker")
            .field("transactions", &self.ledger.transactions.len())
            .field("settings", &self.ledger.settings)
            .field("trash", &self.ledger.trash.len())
            .finish()
    }
}

impl ExpenseTracker {
    /// Create an empty ledger with default settings.
    pub fn create_new() -> Self {
        Self::build(Ledger::default())
    }

    /// Create a tracker with pre-loaded settings (e.g., from [`config::load_settings`]).
    pub fn with_settings(settings: Settings) -> Self {
        Self::build(Ledger {
            settings,
            ..Ledger::default()
        })
    }

    // ── Transaction Management ──────────────────────────────────────

    /// Add a transaction. Returns its id.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid, CoreError> {
        let id = transaction.id;
        self.ledger_service
            .add_transaction(&mut self.ledger, transaction)?;
        Ok(id)
    }

    /// Replace an existing transaction's contents, keeping its id.
    pub fn update_transaction(&mut self, id: Uuid, updated: Transaction) -> Result<(), CoreError> {
        self.ledger_service
            .update_transaction(&mut self.ledger, id, updated)
    }

    /// Remove a transaction permanently.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.ledger_service
            .remove_transaction(&mut self.ledger, id)?;
        Ok(())
    }

    /// Get a single transaction by id.
    #[must_use]
    pub fn get_transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.ledger.transactions.iter().find(|t| t.id == id)
    }

    /// Get all transactions, newest first.
    #[must_use]
    pub fn get_transactions(&self) -> Vec<&Transaction> {
        self.ledger_service.get_transactions(&self.ledger)
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.ledger.transactions.len()
    }

    /// Date of the oldest transaction.
    #[must_use]
    pub fn earliest_transaction_date(&self) -> Option<NaiveDate> {
        self.ledger_service.earliest_date(&self.ledger)
    }

    // ── Undo (Trash) ────────────────────────────────────────────────

    /// Remove a transaction and keep it in the trash for potential undo.
    pub fn remove_transaction_to_trash(&mut self, id: Uuid) -> Result<Transaction, CoreError> {
        let removed = self
            .ledger_service
            .remove_transaction(&mut self.ledger, id)?;
        self.ledger.trash.push(removed.clone());
        Ok(removed)
    }

    /// Restore the most recently trashed transaction.
    /// Returns `None` if the trash is empty.
    pub fn undo_last_removal(&mut self) -> Result<Option<Transaction>, CoreError> {
        let transaction = match self.ledger.trash.pop() {
            Some(t) => t,
            None => return Ok(None),
        };

        if let Err(e) = self
            .ledger_service
            .add_transaction(&mut self.ledger, transaction.clone())
        {
            // Keep it recoverable
            self.ledger.trash.push(transaction);
            return Err(e);
        }
        Ok(Some(transaction))
    }

    #[must_use]
    pub fn get_trash(&self) -> &[Transaction] {
        &self.ledger.trash
    }

    pub fn clear_trash(&mut self) {
        self.ledger.trash.clear();
    }

    // ── Search & Filtering ──────────────────────────────────────────

    /// Search by note or category name (case-insensitive substring).
    /// A blank query returns every transaction, oldest first.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Transaction> {
        self.search_service
            .filter(Some(query), Some(&self.ledger.transactions))
    }

    /// Transactions matching a structured filter, oldest first.
    #[must_use]
    pub fn filter(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        self.search_service
            .apply_filter(filter, Some(&self.ledger.transactions))
    }

    // ── Analysis ────────────────────────────────────────────────────

    /// Resolve the configured preset as of `today` into a concrete range.
    pub fn current_range(&self, today: NaiveDate) -> Result<DateRange, CoreError> {
        let settings = &self.ledger.settings;
        self.date_range_service.to_date_range(
            &settings.date_range,
            today,
            self.earliest_transaction_date(),
            settings.granularity,
            settings.range_end,
        )
    }

    /// Chart data for the configured preset as of `today`.
    pub fn analysis(&self, today: NaiveDate) -> Result<Aggregation, CoreError> {
        self.analysis_with_filter(today, &TransactionFilter::default())
    }

    /// Chart data for the configured preset, over filtered transactions only.
    ///
    /// The "All" preset starts from the earliest transaction in the whole
    /// ledger, whatever the filter.
    pub fn analysis_with_filter(
        &self,
        today: NaiveDate,
        filter: &TransactionFilter,
    ) -> Result<Aggregation, CoreError> {
        let settings = &self.ledger.settings;
        let range = self.current_range(today)?;
        let selected = self.date_range_service.clip(
            &settings.date_range,
            today,
            self.earliest_transaction_date(),
            &self.filter(filter),
        )?;
        Ok(self
            .chart_service
            .aggregate(&range, settings.range_end, Some(&selected)))
    }

    /// Chart data for an explicit range, using the configured end policy.
    #[must_use]
    pub fn analysis_for(&self, range: &DateRange) -> Aggregation {
        self.chart_service.aggregate(
            range,
            self.ledger.settings.range_end,
            Some(&self.ledger.transactions),
        )
    }

    /// Serialize an aggregation into the flat JSON shape a chart renderer consumes.
    pub fn analysis_to_json(aggregation: &Aggregation) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&ChartData::from(aggregation))
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize chart data: {e}")))
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    /// Select the preset range shown by [`analysis`](Self::analysis).
    /// Custom ranges are validated up front.
    pub fn set_date_range(&mut self, range_type: DateRangeType) -> Result<(), CoreError> {
        if let DateRangeType::Custom { from, to } = &range_type {
            if from > to {
                return Err(CoreError::ValidationError(format!(
                    "'from' date ({from}) must not be after 'to' date ({to})"
                )));
            }
        }
        self.ledger.settings.date_range = range_type;
        Ok(())
    }

    /// Override (or with `None`, restore) the preset's default granularity.
    pub fn set_granularity(&mut self, granularity: Option<Granularity>) {
        self.ledger.settings.granularity = granularity;
    }

    pub fn set_range_end(&mut self, range_end: RangeEnd) {
        self.ledger.settings.range_end = range_end;
    }

    /// Set the display currency passed to collaborators.
    /// Currency code must be a 3-letter alphabetic string.
    pub fn set_default_currency(&mut self, currency: String) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., USD, EUR, PLN)"
            )));
        }
        self.ledger.settings.default_currency = trimmed;
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(ledger: Ledger) -> Self {
        Self {
            ledger,
            ledger_service: LedgerService::new(),
            chart_service: ChartService::new(),
            search_service: SearchService::new(),
            date_range_service: DateRangeService::new(),
        }
    }
}

impl Default for ExpenseTracker {
    fn default() -> Self {
        Self::create_new()
    }
}
