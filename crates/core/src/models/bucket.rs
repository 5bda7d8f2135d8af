use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// The time-unit size used to bucket transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl Granularity {
    /// Advance `from` by exactly one calendar unit.
    ///
    /// Month and year steps follow calendar rules: Jan 31 + 1 month is the
    /// last day of February, Feb 29 + 1 year is Feb 28. Returns `None` only
    /// when the result falls outside chrono's representable range.
    #[must_use]
    pub fn step(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Granularity::Day => from.checked_add_signed(TimeDelta::days(1)),
            Granularity::Month => from.checked_add_months(Months::new(1)),
            Granularity::Year => from.checked_add_months(Months::new(12)),
        }
    }

    /// First day of the bucket containing `date`.
    #[must_use]
    pub fn bucket_start(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Granularity::Day => Some(date),
            Granularity::Month => date.with_day(1),
            Granularity::Year => date.with_ordinal(1),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Day => write!(f, "Day"),
            Granularity::Month => write!(f, "Month"),
            Granularity::Year => write!(f, "Year"),
        }
    }
}

/// Identifies the chart bucket a timestamp falls into.
///
/// Used both to group existing transactions and as the cursor key when
/// walking a range, so both paths must go through [`BucketKey::for_timestamp`].
/// Variant order plus field order give chronological ordering within a
/// granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BucketKey {
    Day(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl BucketKey {
    #[must_use]
    pub fn for_timestamp(timestamp: NaiveDateTime, granularity: Granularity) -> Self {
        let date = timestamp.date();
        match granularity {
            Granularity::Day => BucketKey::Day(date),
            Granularity::Month => BucketKey::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Year => BucketKey::Year(date.year()),
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        match self {
            BucketKey::Day(_) => Granularity::Day,
            BucketKey::Month { .. } => Granularity::Month,
            BucketKey::Year(_) => Granularity::Year,
        }
    }

    /// Canonical text label: `YYYY-MM-DD`, `MM/YYYY` or `YYYY`.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BucketKey::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            BucketKey::Month { year, month } => write!(f, "{month:02}/{year:04}"),
            BucketKey::Year(year) => write!(f, "{year:04}"),
        }
    }
}
