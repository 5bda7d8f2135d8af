use serde::{Deserialize, Serialize};

use super::bucket::BucketKey;
use super::transaction::Transaction;

/// One time-unit slot of the chart.
///
/// Totals are final here; a renderer only draws them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub key: BucketKey,

    /// Sum of expense-kind amounts in this bucket
    pub expense_total: f64,

    /// Sum of income-kind amounts in this bucket
    pub income_total: f64,

    /// Every transaction attributed to this bucket, transfers included
    pub transactions: Vec<Transaction>,
}

/// A single point of a chart series: bucket index on x, amount on y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEntry {
    pub x: usize,
    pub y: f64,
}

/// Result of walking a date range: buckets in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub buckets: Vec<Bucket>,
}

impl Aggregation {
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket labels in walk order (x-axis of the chart).
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.key.label()).collect()
    }

    #[must_use]
    pub fn expense_series(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.expense_total).collect()
    }

    #[must_use]
    pub fn income_series(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.income_total).collect()
    }

    /// All transactions attributed to a walked bucket, flattened in bucket order.
    #[must_use]
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        self.buckets
            .iter()
            .flat_map(|b| b.transactions.iter())
            .collect()
    }

    /// Expense and income series as indexed chart entries, in that order.
    #[must_use]
    pub fn chart_entries(&self) -> (Vec<ChartEntry>, Vec<ChartEntry>) {
        self.buckets
            .iter()
            .enumerate()
            .map(|(x, b)| {
                (
                    ChartEntry {
                        x,
                        y: b.expense_total,
                    },
                    ChartEntry {
                        x,
                        y: b.income_total,
                    },
                )
            })
            .unzip()
    }

    #[must_use]
    pub fn total_expense(&self) -> f64 {
        self.buckets.iter().fold(0.0, |acc, b| acc + b.expense_total)
    }

    #[must_use]
    pub fn total_income(&self) -> f64 {
        self.buckets.iter().fold(0.0, |acc, b| acc + b.income_total)
    }
}

/// Flat shape handed to a chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub expenses: Vec<ChartEntry>,
    pub incomes: Vec<ChartEntry>,
    pub transactions: Vec<Transaction>,
}

impl From<&Aggregation> for ChartData {
    fn from(aggregation: &Aggregation) -> Self {
        let (expenses, incomes) = aggregation.chart_entries();
        Self {
            labels: aggregation.labels(),
            expenses,
            incomes,
            transactions: aggregation
                .visible_transactions()
                .into_iter()
                .cloned()
                .collect(),
        }
    }
}
