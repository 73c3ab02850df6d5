//! Holiday models.
//!
//! This module contains the [`HolidayEntry`] produced by holiday resolution,
//! the [`CustomHoliday`] supplied by users, and the [`HolidayCoverage`] flag
//! that tells callers how complete the resolved holiday list is.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A resolved public holiday.
///
/// After merging there is at most one entry per date.
///
/// # Example
///
/// ```
/// use leave_optimizer::models::HolidayEntry;
/// use chrono::NaiveDate;
///
/// let holiday = HolidayEntry {
///     date: NaiveDate::from_ymd_opt(2021, 12, 27).unwrap(),
///     name: "Christmas Day".to_string(),
///     is_substitute: true,
/// };
/// assert!(holiday.is_substitute);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayEntry {
    /// The date the holiday is observed.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
    /// Whether the holiday was moved off its nominal date.
    #[serde(default)]
    pub is_substitute: bool,
}

impl HolidayEntry {
    /// Creates an entry observed on its nominal date.
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            is_substitute: false,
        }
    }
}

/// A user-defined holiday, such as a company shutdown day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomHoliday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name given by the user.
    pub name: String,
}

/// How complete the resolved holiday list is for a location and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayCoverage {
    /// Holidays were computed from built-in rules.
    Rules,
    /// Holidays came from the external dataset.
    Dataset,
    /// No holiday data exists; only weekends and custom holidays apply.
    Unavailable,
}

impl HolidayCoverage {
    /// Returns `true` if public holidays are missing from the calendar.
    pub fn is_degraded(self) -> bool {
        self == HolidayCoverage::Unavailable
    }
}
