use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use crate::errors::CoreError;
use crate::models::chart::Aggregation;
use crate::services::chart_service::ChartService;
use crate::services::date_range_service::{Clock, DateRangeService, SystemClock};
use crate::services::search_service::{SearchService, TransactionFilter};

use super::traits::{RangePreferenceSource, TransactionSource};

/// Pull-based recomputation of chart data from external sources.
///
/// Holds no cache: every [`recompute`](Self::recompute) reads both sources
/// afresh, so identical source state always yields an identical result.
pub struct AnalysisPipeline {
    transactions: Arc<dyn TransactionSource>,
    preferences: Arc<dyn RangePreferenceSource>,
    clock: Arc<dyn Clock>,
    filter: TransactionFilter,
    chart_service: ChartService,
    date_range_service: DateRangeService,
    search_service: SearchService,
}

impl AnalysisPipeline {
    pub fn new(
        transactions: Arc<dyn TransactionSource>,
        preferences: Arc<dyn RangePreferenceSource>,
    ) -> Self {
        Self {
            transactions,
            preferences,
            clock: Arc::new(SystemClock),
            filter: TransactionFilter::default(),
            chart_service: ChartService::new(),
            date_range_service: DateRangeService::new(),
            search_service: SearchService::new(),
        }
    }

    /// Use a fixed or fake clock instead of the system one.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Narrow transactions before aggregation.
    #[must_use]
    pub fn with_filter(mut self, filter: TransactionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Read both sources and aggregate once.
    ///
    /// 1. Fetch settings (preset, granularity override, end policy)
    /// 2. Fetch transactions, defaulting an absent collection to empty
    /// 3. Resolve the preset against today; "All" starts from the earliest
    ///    transaction before filtering
    /// 4. Apply the structured filter, keep the preset's days and walk the range
    pub async fn recompute(&self) -> Result<Aggregation, CoreError> {
        let settings = self.preferences.settings().await?;
        let transactions = self.transactions.transactions().await?.unwrap_or_default();

        let today = self.clock.today();
        let earliest = transactions.iter().map(|t| t.occurred_at.date()).min();
        let range = self.date_range_service.to_date_range(
            &settings.date_range,
            today,
            earliest,
            settings.granularity,
            settings.range_end,
        )?;

        let filtered = self
            .search_service
            .apply_filter(&self.filter, Some(&transactions));
        let selected = self
            .date_range_service
            .clip(&settings.date_range, today, earliest, &filtered)?;

        Ok(self
            .chart_service
            .aggregate(&range, settings.range_end, Some(&selected)))
    }

    /// Recompute once immediately and again after every change notification,
    /// sending each result to `out`.
    ///
    /// A failed recompute is logged and skipped; the loop keeps listening.
    /// Returns when the change channel's sender is dropped or `out` is closed.
    pub async fn run(&self, mut changes: watch::Receiver<u64>, out: mpsc::Sender<Aggregation>) {
        loop {
            match self.recompute().await {
                Ok(aggregation) => {
                    if out.send(aggregation).await.is_err() {
                        tracing::debug!("analysis receiver dropped, stopping pipeline");
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        source = self.transactions.name(),
                        error = %e,
                        "failed to recompute analysis"
                    );
                }
            }

            if changes.changed().await.is_err() {
                tracing::debug!("change channel closed, stopping pipeline");
                return;
            }
        }
    }
}
