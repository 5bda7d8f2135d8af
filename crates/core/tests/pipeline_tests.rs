// ═══════════════════════════════════════════════════════════════════
// Pipeline Tests — sources, InMemorySource, AnalysisPipeline
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

use expense_tracker_core::errors::CoreError;
use expense_tracker_core::models::bucket::Granularity;
use expense_tracker_core::models::category::{Category, CategoryKind};
use expense_tracker_core::models::date_range::{DateRangeType, RangeEnd};
use expense_tracker_core::models::settings::Settings;
use expense_tracker_core::models::transaction::Transaction;
use expense_tracker_core::services::date_range_service::Clock;
use expense_tracker_core::services::search_service::TransactionFilter;
use expense_tracker_core::sources::memory::InMemorySource;
use expense_tracker_core::sources::pipeline::AnalysisPipeline;
use expense_tracker_core::sources::traits::{RangePreferenceSource, TransactionSource};

// ═══════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        let naive = self.0.and_hms_opt(12, 0, 0).unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// A source that always fails (for testing error propagation).
struct FailingSource;

#[async_trait]
impl TransactionSource for FailingSource {
    fn name(&self) -> &str {
        "Failing"
    }

    async fn transactions(&self) -> Result<Option<Vec<Transaction>>, CoreError> {
        Err(CoreError::Source {
            source_name: "Failing".into(),
            message: "backend offline".into(),
        })
    }
}

fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 13).unwrap()
}

fn pipeline_for(source: &Arc<InMemorySource>) -> AnalysisPipeline {
    AnalysisPipeline::new(source.clone(), source.clone()).with_clock(Arc::new(FixedClock(today())))
}

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

// ═══════════════════════════════════════════════════════════════════
// InMemorySource
// ═══════════════════════════════════════════════════════════════════

mod in_memory_source {
    use super::*;

    #[tokio::test]
    async fn starts_absent_with_default_settings() {
        let source = InMemorySource::new();
        assert!(source.transactions().await.unwrap().is_none());
        assert_eq!(source.settings().await.unwrap(), Settings::default());
        assert_eq!(source.revision(), 0);
    }

    #[tokio::test]
    async fn push_creates_collection_and_bumps_revision() {
        let source = InMemorySource::new();
        source
            .push_transaction(Transaction::new(noon(2024, 3, 1), 5.0, Category::expense("Food")))
            .unwrap();
        assert_eq!(source.transactions().await.unwrap().unwrap().len(), 1);
        assert_eq!(source.revision(), 1);
    }

    #[tokio::test]
    async fn every_mutation_notifies_subscribers() {
        let source = InMemorySource::new();
        let mut rx = source.subscribe();

        source.set_settings(Settings::default()).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        source.set_transactions(Some(Vec::new())).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[test]
    fn names() {
        let source = InMemorySource::default();
        assert_eq!(TransactionSource::name(&source), "InMemory");
        assert_eq!(RangePreferenceSource::name(&source), "InMemory");
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalysisPipeline::recompute
// ═══════════════════════════════════════════════════════════════════

mod recompute {
    use super::*;

    #[tokio::test]
    async fn absent_transactions_yield_zeroed_month() {
        let source = Arc::new(InMemorySource::new());
        let agg = pipeline_for(&source).recompute().await.unwrap();
        assert_eq!(agg.len(), 31); // March 2024, by day
        assert_eq!(agg.total_expense(), 0.0);
        assert_eq!(agg.total_income(), 0.0);
    }

    #[tokio::test]
    async fn follows_settings() {
        let settings = Settings {
            date_range: DateRangeType::ThisYear,
            ..Settings::default()
        };
        let source = Arc::new(InMemorySource::with_state(
            Some(vec![
                Transaction::new(noon(2024, 2, 10), 40.0, Category::expense("Food")),
                Transaction::new(noon(2024, 2, 25), 1000.0, Category::income("Salary")),
            ]),
            settings,
        ));

        let agg = pipeline_for(&source).recompute().await.unwrap();
        assert_eq!(agg.len(), 12);
        assert_eq!(agg.labels()[1], "02/2024");
        assert_eq!(agg.expense_series()[1], 40.0);
        assert_eq!(agg.income_series()[1], 1000.0);
    }

    #[tokio::test]
    async fn granularity_override_and_inclusive_end() {
        let settings = Settings {
            date_range: DateRangeType::Custom {
                from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                to: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            },
            granularity: Some(Granularity::Month),
            range_end: RangeEnd::Inclusive,
            ..Settings::default()
        };
        let source = Arc::new(InMemorySource::with_state(None, settings));

        // Inclusive ends on Jan 31 00:00, so February is not charted
        let agg = pipeline_for(&source).recompute().await.unwrap();
        assert_eq!(agg.labels(), vec!["01/2024"]);
    }

    #[tokio::test]
    async fn custom_month_range_counts_only_selected_days() {
        let settings = Settings {
            date_range: DateRangeType::Custom {
                from: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                to: NaiveDate::from_ymd_opt(2024, 4, 10).unwrap(),
            },
            ..Settings::default()
        };
        let source = Arc::new(InMemorySource::with_state(
            Some(vec![
                Transaction::new(noon(2024, 1, 5), 7.0, Category::expense("Food")),
                Transaction::new(noon(2024, 4, 5), 100.0, Category::expense("Food")),
            ]),
            settings,
        ));

        let agg = pipeline_for(&source).recompute().await.unwrap();
        assert_eq!(agg.labels(), vec!["01/2024", "02/2024", "03/2024", "04/2024"]);
        assert_eq!(agg.expense_series(), vec![0.0, 0.0, 0.0, 100.0]);
    }

    #[tokio::test]
    async fn all_range_ignores_filter_for_earliest_year() {
        let settings = Settings {
            date_range: DateRangeType::All,
            ..Settings::default()
        };
        let source = Arc::new(InMemorySource::with_state(
            Some(vec![
                Transaction::new(noon(2022, 5, 5), 900.0, Category::income("Salary")),
                Transaction::new(noon(2024, 2, 1), 9.0, Category::expense("Food")),
            ]),
            settings,
        ));
        let pipeline = pipeline_for(&source).with_filter(TransactionFilter {
            kinds: vec![CategoryKind::Expense],
            ..Default::default()
        });

        let agg = pipeline.recompute().await.unwrap();
        assert_eq!(agg.labels(), vec!["2022", "2023", "2024"]);
        assert_eq!(agg.expense_series(), vec![0.0, 0.0, 9.0]);
        assert_eq!(agg.total_income(), 0.0);
    }

    #[tokio::test]
    async fn all_range_uses_earliest_transaction() {
        let settings = Settings {
            date_range: DateRangeType::All,
            ..Settings::default()
        };
        let source = Arc::new(InMemorySource::with_state(
            Some(vec![Transaction::new(noon(2022, 5, 5), 9.0, Category::expense("Food"))]),
            settings,
        ));
        let agg = pipeline_for(&source).recompute().await.unwrap();
        assert_eq!(agg.labels(), vec!["2022", "2023", "2024"]);
        assert_eq!(agg.expense_series(), vec![9.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn filter_is_applied_before_aggregation() {
        let source = Arc::new(InMemorySource::with_state(
            Some(vec![
                Transaction::new(noon(2024, 3, 1), 10.0, Category::expense("Food")),
                Transaction::new(noon(2024, 3, 1), 50.0, Category::income("Salary")),
            ]),
            Settings::default(),
        ));
        let pipeline = pipeline_for(&source).with_filter(TransactionFilter {
            kinds: vec![CategoryKind::Expense],
            ..Default::default()
        });

        let agg = pipeline.recompute().await.unwrap();
        assert_eq!(agg.total_expense(), 10.0);
        assert_eq!(agg.total_income(), 0.0);
        assert_eq!(agg.visible_transactions().len(), 1);
    }

    #[tokio::test]
    async fn is_idempotent() {
        let source = Arc::new(InMemorySource::with_state(
            Some(vec![Transaction::new(noon(2024, 3, 5), 3.0, Category::expense("Food"))]),
            Settings::default(),
        ));
        let pipeline = pipeline_for(&source);
        let a = pipeline.recompute().await.unwrap();
        let b = pipeline.recompute().await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn source_error_propagates() {
        let prefs = Arc::new(InMemorySource::new());
        let pipeline = AnalysisPipeline::new(Arc::new(FailingSource), prefs)
            .with_clock(Arc::new(FixedClock(today())));

        match pipeline.recompute().await {
            Err(CoreError::Source { source_name, .. }) => assert_eq!(source_name, "Failing"),
            other => panic!("Expected Source error, got {:?}", other),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalysisPipeline::run
// ═══════════════════════════════════════════════════════════════════

mod run {
    use super::*;

    #[tokio::test]
    async fn emits_initially_and_after_each_change() {
        let source = Arc::new(InMemorySource::new());
        let pipeline = Arc::new(pipeline_for(&source));
        let (tx, mut rx) = mpsc::channel(4);

        let changes = source.subscribe();
        let task = {
            let pipeline = pipeline.clone();
            tokio::spawn(async move { pipeline.run(changes, tx).await })
        };

        let first = tokio::time::timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(first.total_expense(), 0.0);

        source
            .push_transaction(Transaction::new(noon(2024, 3, 2), 25.0, Category::expense("Food")))
            .unwrap();

        let second = tokio::time::timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap();
        assert_eq!(second.total_expense(), 25.0);
        assert_eq!(second.expense_series()[1], 25.0);

        // Closing the receiver stops the loop at the next send
        drop(rx);
        source.set_settings(Settings::default()).unwrap();
        tokio::time::timeout(RECV_TIMEOUT, task).await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn stops_when_change_channel_closes() {
        let source = Arc::new(InMemorySource::new());
        let pipeline = pipeline_for(&source);
        let (change_tx, change_rx) = watch::channel(0u64);
        let (tx, mut rx) = mpsc::channel(4);

        drop(change_tx);
        tokio::time::timeout(RECV_TIMEOUT, pipeline.run(change_rx, tx))
            .await
            .unwrap();

        // Exactly the initial computation was delivered
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn failed_recompute_is_skipped() {
        let prefs = Arc::new(InMemorySource::new());
        let pipeline = AnalysisPipeline::new(Arc::new(FailingSource), prefs)
            .with_clock(Arc::new(FixedClock(today())));
        let (change_tx, change_rx) = watch::channel(0u64);
        let (tx, mut rx) = mpsc::channel(4);

        change_tx.send(1).unwrap();
        drop(change_tx);
        tokio::time::timeout(RECV_TIMEOUT, pipeline.run(change_rx, tx))
            .await
            .unwrap();

        assert!(rx.recv().await.is_none());
    }
}
