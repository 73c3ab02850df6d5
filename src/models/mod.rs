//! Core data models for the leave optimisation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod booking;
mod context;
mod holiday;
mod insight;
mod leave_block;
mod location;

pub use booking::BookedDays;
pub use context::PlanningContext;
pub use holiday::{CustomHoliday, HolidayCoverage, HolidayEntry};
pub use insight::{DayInsight, Direction, EfficiencyTier, YearComparison};
pub use leave_block::{LeaveBlock, Notice, Plan};
pub use location::{HolidaySource, LocationConfig, RuleSet, WeekendPattern};
