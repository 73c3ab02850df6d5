//! Single-day insight and year-over-year comparison.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar::{BookedMask, DayTypeIndex, is_off};
use crate::models::{DayInsight, Direction, EfficiencyTier, Plan, YearComparison};

use super::expander::expand_from;

/// Percentage change inside which two years count as the same.
const DEAD_ZONE_PERCENT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Evaluates booking `date` alone against the current bookings.
///
/// Returns `None` when the date lies outside the indexed year, is not a
/// workday, or is already booked.
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::{BookedMask, DayTypeIndex};
/// use leave_optimizer::models::{EfficiencyTier, WeekendPattern};
/// use leave_optimizer::optimizer::day_insight;
/// use chrono::NaiveDate;
///
/// let index = DayTypeIndex::build(2024, WeekendPattern::SatSun, &[]);
/// let booked = BookedMask::empty(&index);
///
/// let monday = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// let insight = day_insight(&index, &booked, monday).unwrap();
/// assert_eq!(insight.total_days_off, 3);
/// assert_eq!(insight.tier, EfficiencyTier::High);
/// assert!(!insight.bridge);
///
/// let saturday = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
/// assert!(day_insight(&index, &booked, saturday).is_none());
/// ```
pub fn day_insight(index: &DayTypeIndex, booked: &BookedMask, date: NaiveDate) -> Option<DayInsight> {
    let offset = index.offset_of(date);
    if !index.contains_offset(offset) || is_off(index, booked, offset) {
        return None;
    }

    let candidate = expand_from(index, booked, offset, 1)?;
    let bridge = is_off(index, booked, offset - 1) && is_off(index, booked, offset + 1);

    Some(DayInsight {
        date,
        efficiency: candidate.efficiency,
        total_days_off: candidate.total_days_off,
        bridge,
        tier: EfficiencyTier::from_efficiency(candidate.efficiency),
        block_start: index.date_of(candidate.start)?,
        block_end: index.date_of(candidate.end)?,
    })
}

/// Compares the longest block of two plans.
///
/// Returns `None` when either plan is empty, since there is no baseline to
/// compare against.
pub fn compare_plans(year: i32, current: &Plan, previous: &Plan) -> Option<YearComparison> {
    let current_best = current.longest_block()?.total_days_off;
    let previous_best = previous.longest_block()?.total_days_off;
    if previous_best == 0 {
        return None;
    }

    let change = (Decimal::from(current_best) - Decimal::from(previous_best)) * Decimal::ONE_HUNDRED
        / Decimal::from(previous_best);
    let direction = if change > DEAD_ZONE_PERCENT {
        Direction::More
    } else if change < -DEAD_ZONE_PERCENT {
        Direction::Less
    } else {
        Direction::Same
    };

    Some(YearComparison {
        year,
        current_best,
        previous_best,
        delta_percent: change.round_dp(1),
        direction,
    })
}
