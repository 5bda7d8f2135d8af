use serde::{Deserialize, Serialize};

use super::bucket::Granularity;
use super::date_range::{DateRangeType, RangeEnd};

/// User-configurable analysis preferences.
///
/// Missing fields fall back to their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which preset range the analysis screen shows.
    pub date_range: DateRangeType,

    /// Overrides the granularity derived from `date_range` when set.
    pub granularity: Option<Granularity>,

    /// Whether the range's upper bound gets its own bucket.
    pub range_end: RangeEnd,

    /// Display currency code (e.g., "USD"). Passed through to collaborators; never used for formatting here.
    pub default_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_range: DateRangeType::default(),
            granularity: None,
            range_end: RangeEnd::default(),
            default_currency: "USD".to_string(),
        }
    }
}
