//! Time slice keys for the occupancy dataset.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite `(month, hour, day_type)` key identifying one time slice.
///
/// `month` is a `YYYYMM` integer, `hour` is 0-23 and `day_type` is the
/// dataset's categorical label (e.g. "平日" for weekdays, "假日" for holidays).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSliceKey {
    pub month: u32,
    pub hour: u8,
    pub day_type: String,
}

impl TimeSliceKey {
    pub fn new(month: u32, hour: u8, day_type: impl Into<String>) -> Self {
        Self {
            month,
            hour,
            day_type: day_type.into(),
        }
    }
}

impl fmt::Display for TimeSliceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}h/{}", self.month, self.hour, self.day_type)
    }
}

/// Check that a `YYYYMM` integer names a real calendar month.
pub fn is_valid_year_month(month: u32) -> bool {
    let m = month % 100;
    month >= 100_001 && (1..=12).contains(&m)
}
