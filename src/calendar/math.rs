//! Calendar arithmetic.
//!
//! Easter computation, weekday-of-month searches, and translation between
//! calendar dates and 0-based day offsets from January 1.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Computes Easter Sunday for a Gregorian year.
///
/// Uses the anonymous Gregorian algorithm (Meeus/Jones/Butcher).
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2023), NaiveDate::from_ymd_opt(2023, 4, 9));
/// assert_eq!(easter_sunday(2024), NaiveDate::from_ymd_opt(2024, 3, 31));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let month = (h + l - 7 * m + 114).div_euclid(31);
    let day = (h + l - 7 * m + 114).rem_euclid(31) + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Finds the `n`th occurrence (1-based) of a weekday in a month.
///
/// Returns `None` if the month has fewer than `n` such weekdays.
pub fn nth_weekday_of_month(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

/// Finds the last occurrence of a weekday in a month.
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::last_weekday_of_month;
/// use chrono::{NaiveDate, Weekday};
///
/// // Spring bank holiday 2023
/// assert_eq!(
///     last_weekday_of_month(2023, 5, Weekday::Mon),
///     NaiveDate::from_ymd_opt(2023, 5, 29)
/// );
/// ```
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let last = first_of_next.pred_opt()?;
    let back = (7 + last.weekday().num_days_from_monday() - weekday.num_days_from_monday()) % 7;
    last.checked_sub_signed(Duration::days(i64::from(back)))
}

/// Number of days in a year (365 or 366).
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// The date `offset` days after January 1 of `year`.
///
/// Negative offsets and offsets past the end of the year are allowed and
/// land in the neighbouring years.
pub fn date_from_offset(year: i32, offset: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_signed(Duration::days(i64::from(offset)))
}

/// Signed day offset of `date` from January 1 of `year`.
pub fn offset_from_date(year: i32, date: NaiveDate) -> i32 {
    if date.year() == year {
        return date.ordinal0() as i32;
    }
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|jan1| (date - jan1).num_days() as i32)
        .unwrap_or(i32::MIN)
}
