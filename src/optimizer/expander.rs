//! Leave block expansion.
//!
//! Booking N workdays from a starting day produces a run of consumed
//! workdays; the block then grows outward through every adjoining off day
//! (weekend, holiday or already booked) until a workday is hit on each side.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::{BookedMask, DayTypeIndex, is_off};
use crate::models::LeaveBlock;

/// How far past the indexed year an expansion may reach.
const MAX_SPILL_DAYS: i32 = 31;

/// A leave block expressed in day offsets of one indexed year.
///
/// Candidates are the engine-internal form of [`LeaveBlock`]; convert with
/// [`Candidate::to_block`] before handing results to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// First off day (may be negative when the block spills into the previous year).
    pub start: i32,
    /// Last off day (may exceed the year length when the block spills forward).
    pub end: i32,
    /// Workdays consumed.
    pub leave_days: u32,
    /// Inclusive length of the block.
    pub total_days_off: u32,
    /// `total_days_off / leave_days`.
    pub efficiency: Decimal,
    /// Consumed workday offsets, ascending.
    pub booked: Vec<i32>,
}

impl Candidate {
    /// Returns `true` if the two candidates share a day.
    pub fn overlaps(&self, other: &Candidate) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Converts offsets back to calendar dates.
    pub fn to_block(&self, index: &DayTypeIndex) -> Option<LeaveBlock> {
        let booked_dates = self
            .booked
            .iter()
            .map(|&o| index.date_of(o))
            .collect::<Option<Vec<NaiveDate>>>()?;
        Some(LeaveBlock {
            start_date: index.date_of(self.start)?,
            end_date: index.date_of(self.end)?,
            leave_days_used: self.leave_days,
            total_days_off: self.total_days_off,
            efficiency: self.efficiency,
            booked_dates,
        })
    }
}

/// Expands a booking of `leave_days` workdays starting at `start`.
///
/// Off days at `start` are skipped to find the first bookable workday. The
/// consumed workdays must all fall inside the indexed year; if `start` lies
/// outside it, the year runs out first, or `leave_days` is zero, there is
/// no result. The outward
/// expansion may cross the year boundary.
pub fn expand_from(
    index: &DayTypeIndex,
    booked: &BookedMask,
    start: i32,
    leave_days: u32,
) -> Option<Candidate> {
    let last = index.len() as i32 - 1;
    if leave_days == 0 || start < 0 || start > last {
        return None;
    }

    let mut cursor = start;
    let mut consumed = Vec::with_capacity(leave_days as usize);

    while consumed.len() < leave_days as usize {
        if cursor > last {
            return None;
        }
        if !is_off(index, booked, cursor) {
            consumed.push(cursor);
        }
        cursor += 1;
    }

    let first = *consumed.first()?;
    let last_consumed = *consumed.last()?;

    let mut block_start = first;
    while block_start > -MAX_SPILL_DAYS && is_off(index, booked, block_start - 1) {
        block_start -= 1;
    }

    let mut block_end = last_consumed;
    while block_end < last + MAX_SPILL_DAYS && is_off(index, booked, block_end + 1) {
        block_end += 1;
    }

    let total_days_off = (block_end - block_start + 1) as u32;
    Some(Candidate {
        start: block_start,
        end: block_end,
        leave_days,
        total_days_off,
        efficiency: Decimal::from(total_days_off) / Decimal::from(leave_days),
        booked: consumed,
    })
}

/// Expands a booking of `leave_days` workdays starting on `date`.
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::{BookedMask, DayTypeIndex};
/// use leave_optimizer::models::WeekendPattern;
/// use leave_optimizer::optimizer::expand_block;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let index = DayTypeIndex::build(2024, WeekendPattern::SatSun, &[]);
/// let booked = BookedMask::empty(&index);
///
/// // A Friday joins the following weekend
/// let friday = NaiveDate::from_ymd_opt(2024, 6, 7).unwrap();
/// let block = expand_block(&index, &booked, friday, 1).unwrap();
/// assert_eq!(block.total_days_off, 3);
/// assert_eq!(block.efficiency, Decimal::from(3));
/// ```
pub fn expand_block(
    index: &DayTypeIndex,
    booked: &BookedMask,
    date: NaiveDate,
    leave_days: u32,
) -> Option<LeaveBlock> {
    expand_from(index, booked, index.offset_of(date), leave_days)?.to_block(index)
}
