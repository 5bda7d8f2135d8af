use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeDelta};

use crate::errors::CoreError;
use crate::models::bucket::Granularity;
use crate::models::date_range::{DateRange, DateRangeType, RangeEnd};
use crate::models::transaction::Transaction;

/// Custom ranges up to this many days are bucketed by day.
const MAX_DAILY_SPAN_DAYS: i64 = 62;

/// Custom ranges up to this many days are bucketed by month; longer ones by year.
const MAX_MONTHLY_SPAN_DAYS: i64 = 731;

/// Clock abstracts access to "today" so preset resolution stays deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> DateTime<Local>;

    /// Returns the current local date. Defaults to `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reads the wall clock of the host machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Resolves date-range presets into concrete ranges and picks a bucket size for them.
pub struct DateRangeService;

impl DateRangeService {
    pub fn new() -> Self {
        Self
    }

    /// First and last day (both inclusive) covered by `range_type` as of `today`.
    ///
    /// `earliest` is the date of the oldest transaction and only matters for
    /// [`DateRangeType::All`].
    pub fn resolve(
        &self,
        range_type: &DateRangeType,
        today: NaiveDate,
        earliest: Option<NaiveDate>,
    ) -> Result<(NaiveDate, NaiveDate), CoreError> {
        let bounds = match range_type {
            DateRangeType::Today => (today, today),
            DateRangeType::ThisWeek => {
                let monday = days_before(today, i64::from(today.weekday().num_days_from_monday()))?;
                (monday, days_after(monday, 6)?)
            }
            DateRangeType::ThisMonth => {
                let first = ymd(today.year(), today.month(), 1)?;
                let next_first = first
                    .checked_add_months(chrono::Months::new(1))
                    .ok_or_else(|| out_of_range(range_type))?;
                (first, days_before(next_first, 1)?)
            }
            DateRangeType::LastSevenDays => (days_before(today, 6)?, today),
            DateRangeType::LastThirtyDays => (days_before(today, 29)?, today),
            DateRangeType::ThisYear => (ymd(today.year(), 1, 1)?, ymd(today.year(), 12, 31)?),
            DateRangeType::All => {
                let first_year = earliest
                    .map(|d| d.year())
                    .unwrap_or(today.year())
                    .min(today.year());
                (ymd(first_year, 1, 1)?, ymd(today.year(), 12, 31)?)
            }
            DateRangeType::Custom { from, to } => {
                if from > to {
                    return Err(CoreError::ValidationError(format!(
                        "'from' date ({from}) must not be after 'to' date ({to})"
                    )));
                }
                (*from, *to)
            }
        };
        Ok(bounds)
    }

    /// Bucket size that fits the preset: days for short ranges, months for a
    /// year, years for all time.
    #[must_use]
    pub fn default_granularity(&self, range_type: &DateRangeType) -> Granularity {
        match range_type {
            DateRangeType::Today
            | DateRangeType::ThisWeek
            | DateRangeType::ThisMonth
            | DateRangeType::LastSevenDays
            | DateRangeType::LastThirtyDays => Granularity::Day,
            DateRangeType::ThisYear => Granularity::Month,
            DateRangeType::All => Granularity::Year,
            DateRangeType::Custom { from, to } => {
                let span_days = (*to - *from).num_days() + 1;
                if span_days <= MAX_DAILY_SPAN_DAYS {
                    Granularity::Day
                } else if span_days <= MAX_MONTHLY_SPAN_DAYS {
                    Granularity::Month
                } else {
                    Granularity::Year
                }
            }
        }
    }

    /// Concrete [`DateRange`] for a preset.
    ///
    /// `start` is snapped back to the first day of the bucket holding the
    /// preset's first day, so month and year buckets line up with calendar
    /// units. `end` depends on `range_end`: midnight after the last day when
    /// exclusive, midnight of the last day when inclusive. Both policies walk
    /// the same buckets for a preset.
    pub fn to_date_range(
        &self,
        range_type: &DateRangeType,
        today: NaiveDate,
        earliest: Option<NaiveDate>,
        granularity: Option<Granularity>,
        range_end: RangeEnd,
    ) -> Result<DateRange, CoreError> {
        let (first, last) = self.resolve(range_type, today, earliest)?;
        let granularity = granularity.unwrap_or_else(|| self.default_granularity(range_type));

        let start = granularity
            .bucket_start(first)
            .ok_or_else(|| out_of_range(range_type))?;
        let end = match range_end {
            RangeEnd::Exclusive => last.succ_opt().ok_or_else(|| out_of_range(range_type))?,
            RangeEnd::Inclusive => last,
        };
        let range = DateRange::new(
            start.and_time(NaiveTime::MIN),
            end.and_time(NaiveTime::MIN),
            granularity,
        );

        tracing::debug!(
            preset = %range_type,
            start = %range.start,
            end = %range.end,
            granularity = %granularity,
            "resolved date range"
        );
        Ok(range)
    }

    /// Transactions dated within the preset's days.
    ///
    /// A bucket-aligned range can reach before the first selected day; this
    /// keeps those days out of the first bucket.
    pub fn clip(
        &self,
        range_type: &DateRangeType,
        today: NaiveDate,
        earliest: Option<NaiveDate>,
        transactions: &[Transaction],
    ) -> Result<Vec<Transaction>, CoreError> {
        let (first, last) = self.resolve(range_type, today, earliest)?;
        Ok(transactions
            .iter()
            .filter(|t| (first..=last).contains(&t.occurred_at.date()))
            .cloned()
            .collect())
    }
}

impl Default for DateRangeService {
    fn default() -> Self {
        Self::new()
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        CoreError::ValidationError(format!("Invalid calendar date {year:04}-{month:02}-{day:02}"))
    })
}

fn days_before(date: NaiveDate, days: i64) -> Result<NaiveDate, CoreError> {
    date.checked_sub_signed(TimeDelta::days(days))
        .ok_or_else(|| CoreError::ValidationError(format!("{days} days before {date} is out of range")))
}

fn days_after(date: NaiveDate, days: i64) -> Result<NaiveDate, CoreError> {
    date.checked_add_signed(TimeDelta::days(days))
        .ok_or_else(|| CoreError::ValidationError(format!("{days} days after {date} is out of range")))
}

fn out_of_range(range_type: &DateRangeType) -> CoreError {
    CoreError::ValidationError(format!("Date range '{range_type}' is out of the supported calendar range"))
}
