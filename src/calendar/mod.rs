//! Calendar construction for the leave optimisation engine.
//!
//! This module covers calendar arithmetic (Easter, weekday-of-month search,
//! day offsets), holiday resolution with substitution rules, and the dense
//! per-year [`DayTypeIndex`] that the optimiser reads by integer offset.

mod day_index;
mod holidays;
mod math;

pub use day_index::{BookedMask, DayType, DayTypeIndex, is_off};
pub use holidays::{ResolvedHolidays, resolve_holidays};
pub use math::{
    date_from_offset, days_in_year, easter_sunday, last_weekday_of_month, nth_weekday_of_month,
    offset_from_date,
};
