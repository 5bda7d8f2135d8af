use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::bucket::Granularity;

/// Whether the walk includes a bucket for `DateRange::end` itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeEnd {
    /// Half-open walk: `start <= cursor < end`
    #[default]
    Exclusive,
    /// Closed walk: `start <= cursor <= end`
    Inclusive,
}

impl RangeEnd {
    /// Whether the cursor is still inside the walked range.
    #[must_use]
    pub fn admits(&self, cursor: NaiveDateTime, end: NaiveDateTime) -> bool {
        match self {
            RangeEnd::Exclusive => cursor < end,
            RangeEnd::Inclusive => cursor <= end,
        }
    }
}

/// A concrete range to chart, with the bucket size to walk it by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub granularity: Granularity,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, granularity: Granularity) -> Self {
        Self {
            start,
            end,
            granularity,
        }
    }

    /// Whether `start >= end`. Such a range walks zero buckets under the
    /// default exclusive end.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// A named date-range preset the user picks in the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateRangeType {
    Today,
    /// Monday through Sunday of the current week
    ThisWeek,
    #[default]
    ThisMonth,
    /// Today and the six days before it
    LastSevenDays,
    /// Today and the 29 days before it
    LastThirtyDays,
    ThisYear,
    /// From Jan 1 of the earliest transaction's year to Dec 31 of this year
    All,
    /// Explicit inclusive day range
    Custom { from: NaiveDate, to: NaiveDate },
}

impl std::fmt::Display for DateRangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateRangeType::Today => write!(f, "Today"),
            DateRangeType::ThisWeek => write!(f, "This week"),
            DateRangeType::ThisMonth => write!(f, "This month"),
            DateRangeType::LastSevenDays => write!(f, "Last 7 days"),
            DateRangeType::LastThirtyDays => write!(f, "Last 30 days"),
            DateRangeType::ThisYear => write!(f, "This year"),
            DateRangeType::All => write!(f, "All"),
            DateRangeType::Custom { from, to } => write!(f, "{from} – {to}"),
        }
    }
}
