//! Dense per-year day classification.
//!
//! The [`DayTypeIndex`] maps each day offset of a year to its [`DayType`] so
//! that every other component classifies days by array lookup instead of
//! re-scanning the holiday list. Booked days live in a separate
//! [`BookedMask`] bitset so toggling a booking never forces the holiday
//! classification to be rebuilt.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::models::{BookedDays, HolidayEntry, WeekendPattern};

use super::math::{date_from_offset, days_in_year, offset_from_date};

/// Classification of a single calendar day.
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::DayType;
///
/// assert!(DayType::Workday.is_workday());
/// assert!(!DayType::Holiday.is_workday());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// An ordinary working day.
    Workday,
    /// A weekend day under the active pattern.
    Weekend,
    /// A public, substitute or custom holiday.
    Holiday,
}

impl DayType {
    /// Returns `true` for [`DayType::Workday`].
    pub fn is_workday(self) -> bool {
        self == DayType::Workday
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayType::Workday => write!(f, "Workday"),
            DayType::Weekend => write!(f, "Weekend"),
            DayType::Holiday => write!(f, "Holiday"),
        }
    }
}

/// Day types for every day of one year, indexed by offset from January 1.
///
/// Offsets outside `0..len()` are valid inputs: they are classified from
/// the date directly, using the weekend pattern and any holidays of the
/// neighbouring years that were supplied at build time.
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::{DayType, DayTypeIndex};
/// use leave_optimizer::models::{HolidayEntry, WeekendPattern};
/// use chrono::NaiveDate;
///
/// let easter_monday = NaiveDate::from_ymd_opt(2023, 4, 10).unwrap();
/// let index = DayTypeIndex::build(
///     2023,
///     WeekendPattern::SatSun,
///     &[HolidayEntry::new(easter_monday, "Easter Monday")],
/// );
///
/// assert_eq!(index.len(), 365);
/// assert_eq!(index.day_type_of(easter_monday), DayType::Holiday);
/// assert_eq!(index.day_type(0), DayType::Weekend); // 2023-01-01 is a Sunday
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTypeIndex {
    year: i32,
    weekend: WeekendPattern,
    days: Vec<DayType>,
    outside_holidays: HashSet<NaiveDate>,
}

impl DayTypeIndex {
    /// Builds the index for `year`.
    ///
    /// `holidays` may contain entries from other years; those are kept for
    /// classifying days just outside the indexed year.
    pub fn build(year: i32, weekend: WeekendPattern, holidays: &[HolidayEntry]) -> Self {
        let len = days_in_year(year) as usize;
        let mut days = Vec::with_capacity(len);
        for offset in 0..len as i32 {
            let day_type = match date_from_offset(year, offset) {
                Some(date) if weekend.is_weekend(date.weekday()) => DayType::Weekend,
                Some(_) => DayType::Workday,
                None => DayType::Weekend,
            };
            days.push(day_type);
        }

        let mut outside_holidays = HashSet::new();
        for holiday in holidays {
            if holiday.date.year() == year {
                days[holiday.date.ordinal0() as usize] = DayType::Holiday;
            } else {
                outside_holidays.insert(holiday.date);
            }
        }

        Self {
            year,
            weekend,
            days,
            outside_holidays,
        }
    }

    /// The indexed year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The weekend pattern the index was built with.
    pub fn weekend(&self) -> WeekendPattern {
        self.weekend
    }

    /// Number of days in the indexed year.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always `false`; a year has at least 365 days.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Returns `true` if the offset falls inside the indexed year.
    pub fn contains_offset(&self, offset: i32) -> bool {
        offset >= 0 && (offset as usize) < self.days.len()
    }

    /// Translates an offset to its calendar date.
    pub fn date_of(&self, offset: i32) -> Option<NaiveDate> {
        date_from_offset(self.year, offset)
    }

    /// Translates a calendar date to its offset (may be outside the year).
    pub fn offset_of(&self, date: NaiveDate) -> i32 {
        offset_from_date(self.year, date)
    }

    /// Day type at an offset.
    pub fn day_type(&self, offset: i32) -> DayType {
        if self.contains_offset(offset) {
            return self.days[offset as usize];
        }
        match self.date_of(offset) {
            Some(date) => self.classify_outside(date),
            None => DayType::Weekend,
        }
    }

    /// Day type of a calendar date.
    pub fn day_type_of(&self, date: NaiveDate) -> DayType {
        if date.year() == self.year {
            self.days[date.ordinal0() as usize]
        } else {
            self.classify_outside(date)
        }
    }

    /// Returns `true` if the day at `offset` is a workday.
    pub fn is_workday(&self, offset: i32) -> bool {
        self.day_type(offset).is_workday()
    }

    /// Offsets of all workdays in the indexed year, ascending.
    pub fn workday_offsets(&self) -> impl Iterator<Item = i32> + '_ {
        self.days
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_workday())
            .map(|(i, _)| i as i32)
    }

    fn classify_outside(&self, date: NaiveDate) -> DayType {
        if self.outside_holidays.contains(&date) {
            DayType::Holiday
        } else if self.weekend.is_weekend(date.weekday()) {
            DayType::Weekend
        } else {
            DayType::Workday
        }
    }
}

/// Bitset of booked days aligned with a [`DayTypeIndex`].
///
/// Bookings outside the indexed year are kept in a side set so that block
/// expansion across the year boundary still sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedMask {
    year: i32,
    days: FixedBitSet,
    outside: BTreeSet<NaiveDate>,
}

impl BookedMask {
    /// A mask with nothing booked.
    pub fn empty(index: &DayTypeIndex) -> Self {
        Self {
            year: index.year(),
            days: FixedBitSet::with_capacity(index.len()),
            outside: BTreeSet::new(),
        }
    }

    /// Builds the mask for a booked set.
    pub fn build(index: &DayTypeIndex, booked: &BookedDays) -> Self {
        let mut mask = Self::empty(index);
        for date in booked.iter() {
            if date.year() == mask.year {
                mask.days.insert(date.ordinal0() as usize);
            } else {
                mask.outside.insert(date);
            }
        }
        mask
    }

    /// Returns `true` if the day at `offset` is booked.
    pub fn is_booked(&self, offset: i32) -> bool {
        if offset >= 0 && (offset as usize) < self.days.len() {
            return self.days.contains(offset as usize);
        }
        date_from_offset(self.year, offset).is_some_and(|d| self.outside.contains(&d))
    }

    /// Number of booked days inside the indexed year.
    pub fn count_in_year(&self) -> u32 {
        self.days.count_ones(..) as u32
    }
}

/// Returns `true` if the day at `offset` is off: weekend, holiday or booked.
pub fn is_off(index: &DayTypeIndex, booked: &BookedMask, offset: i32) -> bool {
    !index.is_workday(offset) || booked.is_booked(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn index_2023() -> DayTypeIndex {
        DayTypeIndex::build(
            2023,
            WeekendPattern::SatSun,
            &[
                HolidayEntry::new(make_date("2023-04-07"), "Good Friday"),
                HolidayEntry::new(make_date("2023-04-10"), "Easter Monday"),
                HolidayEntry::new(make_date("2024-01-01"), "New Year's Day"),
            ],
        )
    }

    #[test]
    fn test_length_is_leap_aware() {
        assert_eq!(DayTypeIndex::build(2023, WeekendPattern::SatSun, &[]).len(), 365);
        assert_eq!(DayTypeIndex::build(2024, WeekendPattern::SatSun, &[]).len(), 366);
    }

    #[test]
    fn test_classifies_weekends_and_holidays() {
        let index = index_2023();
        assert_eq!(index.day_type_of(make_date("2023-04-06")), DayType::Workday);
        assert_eq!(index.day_type_of(make_date("2023-04-07")), DayType::Holiday);
        assert_eq!(index.day_type_of(make_date("2023-04-08")), DayType::Weekend);
        assert_eq!(index.day_type_of(make_date("2023-04-10")), DayType::Holiday);
    }

    #[test]
    fn test_fri_sat_pattern() {
        let index = DayTypeIndex::build(2023, WeekendPattern::FriSat, &[]);
        assert_eq!(index.day_type_of(make_date("2023-04-07")), DayType::Weekend);
        assert_eq!(index.day_type_of(make_date("2023-04-09")), DayType::Workday);
    }

    #[test]
    fn test_offset_and_date_translation() {
        let index = index_2023();
        let date = make_date("2023-04-03");
        let offset = index.offset_of(date);
        assert_eq!(offset, 92);
        assert_eq!(index.date_of(offset), Some(date));
    }

    #[test]
    fn test_outside_year_falls_back_to_date_classification() {
        let index = index_2023();
        // 2024-01-01 is a Monday and a supplied next-year holiday
        assert_eq!(index.day_type(365), DayType::Holiday);
        // 2024-01-02 is a Tuesday
        assert_eq!(index.day_type(366), DayType::Workday);
        // 2022-12-31 is a Saturday
        assert_eq!(index.day_type(-1), DayType::Weekend);
    }

    #[test]
    fn test_workday_offsets_count() {
        let index = DayTypeIndex::build(2023, WeekendPattern::SatSun, &[]);
        assert_eq!(index.workday_offsets().count(), 260);
    }

    #[test]
    fn test_booked_mask_inside_and_outside_year() {
        let index = index_2023();
        let booked: BookedDays = [make_date("2023-04-03"), make_date("2024-01-02")]
            .into_iter()
            .collect();
        let mask = BookedMask::build(&index, &booked);
        assert!(mask.is_booked(92));
        assert!(!mask.is_booked(93));
        assert!(mask.is_booked(366));
        assert_eq!(mask.count_in_year(), 1);
    }

    #[test]
    fn test_booked_mask_last_day_of_leap_year() {
        let index = DayTypeIndex::build(2024, WeekendPattern::SatSun, &[]);
        let booked: BookedDays = [make_date("2024-12-31")].into_iter().collect();
        let mask = BookedMask::build(&index, &booked);
        assert!(mask.is_booked(365));
        assert!(!mask.is_booked(366));
    }

    #[test]
    fn test_booked_mask_counts_across_the_whole_year() {
        let index = index_2023();
        let empty = BookedMask::empty(&index);
        assert!((-5..370).all(|offset| !empty.is_booked(offset)));
        assert_eq!(empty.count_in_year(), 0);

        let booked: BookedDays = ["2023-01-02", "2023-03-06", "2023-07-10", "2023-12-29", "2022-12-30"]
            .into_iter()
            .map(make_date)
            .collect();
        let mask = BookedMask::build(&index, &booked);
        assert_eq!(mask.count_in_year(), 4);
        assert!(mask.is_booked(1));
        assert!(mask.is_booked(362));
        assert!(mask.is_booked(-2));
        assert!(!mask.is_booked(363));
    }

    #[test]
    fn test_is_off_combines_index_and_mask() {
        let index = index_2023();
        let booked: BookedDays = [make_date("2023-04-03")].into_iter().collect();
        let mask = BookedMask::build(&index, &booked);
        assert!(is_off(&index, &mask, 92));
        assert!(!is_off(&index, &mask, 93));
        assert!(is_off(&index, &mask, index.offset_of(make_date("2023-04-08"))));
    }

    #[test]
    fn test_day_type_is_pure() {
        let a = index_2023();
        let b = index_2023();
        assert_eq!(a, b);
    }
}
