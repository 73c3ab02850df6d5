//! Leave block and plan models.
//!
//! This module contains the [`LeaveBlock`] produced by block expansion, the
//! [`Plan`] returned by the combination solver, and the [`Notice`] values used
//! to report graceful degradation back to the caller.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BookedDays, HolidayCoverage, WeekendPattern};

/// A maximal contiguous run of days off created by booking leave.
///
/// Every day from `start_date` to `end_date` (inclusive) is off: booked,
/// weekend, or holiday. The day before `start_date` and the day after
/// `end_date` are workdays.
///
/// # Example
///
/// ```
/// use leave_optimizer::models::LeaveBlock;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let friday = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
/// let block = LeaveBlock {
///     start_date: friday,
///     end_date: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
///     leave_days_used: 1,
///     total_days_off: 3,
///     efficiency: Decimal::from(3),
///     booked_dates: vec![friday],
/// };
/// assert!(block.contains(NaiveDate::from_ymd_opt(2024, 6, 8).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaveBlock {
    /// First day off (inclusive).
    pub start_date: NaiveDate,
    /// Last day off (inclusive).
    pub end_date: NaiveDate,
    /// Number of workdays consumed from the allowance.
    pub leave_days_used: u32,
    /// Inclusive length of the run in days.
    pub total_days_off: u32,
    /// `total_days_off / leave_days_used`.
    pub efficiency: Decimal,
    /// The workdays consumed, ascending.
    pub booked_dates: Vec<NaiveDate>,
}

impl LeaveBlock {
    /// Returns `true` if the date falls inside this block.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns `true` if the two blocks share at least one day.
    pub fn overlaps(&self, other: &LeaveBlock) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

/// A degraded state or fallback the engine applied while planning.
///
/// Notices are returned as data so that a caller can always render a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The requested region is unknown; the default location was used.
    UnknownRegion {
        /// What the caller asked for.
        requested: String,
        /// The location id used instead.
        fallback: String,
    },
    /// The requested weekend pattern is unknown; the location default was used.
    UnknownWeekendPattern {
        /// What the caller asked for.
        requested: String,
        /// The pattern used instead.
        fallback: WeekendPattern,
    },
    /// The dataset has no holidays for this country and year.
    HolidayDataUnavailable {
        /// Dataset country code.
        country_code: String,
        /// The year that was missing.
        year: i32,
    },
}

/// An ordered, non-overlapping set of leave blocks within the allowance.
///
/// # Example
///
/// ```
/// use leave_optimizer::models::{HolidayCoverage, Plan};
///
/// let plan = Plan::empty(HolidayCoverage::Rules, vec![]);
/// assert!(plan.is_empty());
/// assert_eq!(plan.total_leave_days, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Chosen blocks, sorted by start date.
    pub blocks: Vec<LeaveBlock>,
    /// Sum of `leave_days_used` over all blocks.
    pub total_leave_days: u32,
    /// Sum of `total_days_off` over all blocks.
    pub total_days_off: u32,
    /// How complete the holiday data behind this plan was.
    pub coverage: HolidayCoverage,
    /// Fallbacks applied while planning.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl Plan {
    /// Builds a plan from blocks, sorting them and computing totals.
    pub fn new(mut blocks: Vec<LeaveBlock>, coverage: HolidayCoverage, notices: Vec<Notice>) -> Self {
        blocks.sort_by_key(|b| b.start_date);
        let total_leave_days = blocks.iter().map(|b| b.leave_days_used).sum();
        let total_days_off = blocks.iter().map(|b| b.total_days_off).sum();
        Self {
            blocks,
            total_leave_days,
            total_days_off,
            coverage,
            notices,
        }
    }

    /// A plan with no blocks.
    pub fn empty(coverage: HolidayCoverage, notices: Vec<Notice>) -> Self {
        Self::new(Vec::new(), coverage, notices)
    }

    /// Returns `true` if no block was chosen.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The longest block by days off, if any.
    pub fn longest_block(&self) -> Option<&LeaveBlock> {
        self.blocks.iter().max_by_key(|b| b.total_days_off)
    }

    /// The booked set that replaces the user's bookings on "reset to optimal".
    pub fn to_booked_days(&self) -> BookedDays {
        self.blocks
            .iter()
            .flat_map(|b| b.booked_dates.iter().copied())
            .collect()
    }
}
