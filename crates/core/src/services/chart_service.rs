use std::collections::HashMap;

use crate::models::bucket::BucketKey;
use crate::models::chart::{Aggregation, Bucket};
use crate::models::date_range::{DateRange, RangeEnd};
use crate::models::transaction::Transaction;

/// Turns a transaction list into time-bucketed income/expense series.
///
/// Pure business logic — no I/O, no state between calls. The walk is driven
/// solely by the date range, so an empty transaction list still yields one
/// zeroed bucket per calendar unit.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate `transactions` over `range`.
    ///
    /// For each bucket from `range.start` while the cursor is inside the range
    /// (per `range_end`):
    /// 1. Look up transactions sharing the cursor's bucket key
    /// 2. Sum expense-kind and income-kind amounts separately
    /// 3. Advance the cursor by one calendar unit
    ///
    /// Transfers land in the bucket's transactions but in neither sum.
    /// Transactions whose key is never walked are dropped. `None` is treated
    /// as an empty collection.
    #[must_use]
    pub fn aggregate(
        &self,
        range: &DateRange,
        range_end: RangeEnd,
        transactions: Option<&[Transaction]>,
    ) -> Aggregation {
        let transactions = transactions.unwrap_or_default();

        // Index transactions by bucket key for O(1) lookup per bucket
        let mut by_key: HashMap<BucketKey, Vec<&Transaction>> = HashMap::new();
        for transaction in transactions {
            by_key
                .entry(BucketKey::for_timestamp(
                    transaction.occurred_at,
                    range.granularity,
                ))
                .or_default()
                .push(transaction);
        }

        let mut buckets = Vec::new();
        let mut cursor = range.start;

        while range_end.admits(cursor, range.end) {
            let key = BucketKey::for_timestamp(cursor, range.granularity);
            let matching = by_key.get(&key).map(Vec::as_slice).unwrap_or_default();

            // fold from +0.0: an empty f64 sum() is -0.0
            buckets.push(Bucket {
                key,
                expense_total: matching
                    .iter()
                    .filter(|t| t.kind().is_expense())
                    .fold(0.0, |acc, t| acc + t.amount),
                income_total: matching
                    .iter()
                    .filter(|t| t.kind().is_income())
                    .fold(0.0, |acc, t| acc + t.amount),
                transactions: matching.iter().map(|t| (*t).clone()).collect(),
            });

            cursor = match range.granularity.step(cursor) {
                Some(next) => next,
                None => break,
            };
        }

        tracing::debug!(
            granularity = %range.granularity,
            buckets = buckets.len(),
            input = transactions.len(),
            "aggregated transactions"
        );

        Aggregation { buckets }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
