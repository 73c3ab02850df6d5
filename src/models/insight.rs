//! Day-level insight and year-over-year comparison models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed efficiency bands used to colour a calendar heatmap.
///
/// # Example
///
/// ```
/// use leave_optimizer::models::EfficiencyTier;
/// use rust_decimal::Decimal;
///
/// assert_eq!(EfficiencyTier::from_efficiency(Decimal::from(3)), EfficiencyTier::High);
/// assert_eq!(EfficiencyTier::from_efficiency(Decimal::new(25, 1)), EfficiencyTier::Mid);
/// assert_eq!(EfficiencyTier::from_efficiency(Decimal::ONE), EfficiencyTier::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyTier {
    /// Efficiency of 3 or more.
    High,
    /// Efficiency of at least 2 but below 3.
    Mid,
    /// Efficiency below 2.
    Low,
}

impl EfficiencyTier {
    /// Classifies an efficiency ratio.
    pub fn from_efficiency(efficiency: Decimal) -> Self {
        if efficiency >= Decimal::from(3) {
            EfficiencyTier::High
        } else if efficiency >= Decimal::from(2) {
            EfficiencyTier::Mid
        } else {
            EfficiencyTier::Low
        }
    }
}

/// What booking a single workday would achieve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayInsight {
    /// The workday being evaluated.
    pub date: NaiveDate,
    /// Days off gained per leave day if this day alone is booked.
    pub efficiency: Decimal,
    /// Length of the off-run this booking would create.
    pub total_days_off: u32,
    /// `true` when both neighbouring days are already off.
    pub bridge: bool,
    /// Efficiency band.
    pub tier: EfficiencyTier,
    /// First day of the resulting off-run.
    pub block_start: NaiveDate,
    /// Last day of the resulting off-run.
    pub block_end: NaiveDate,
}

/// Direction of a year-over-year change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The current year's best block is longer.
    More,
    /// The current year's best block is shorter.
    Less,
    /// Within the dead zone around zero.
    Same,
}

/// Comparison of the longest planned block against the previous year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearComparison {
    /// The year being planned.
    pub year: i32,
    /// Longest block (days off) in `year`.
    pub current_best: u32,
    /// Longest block (days off) in `year - 1`.
    pub previous_best: u32,
    /// Signed percentage change, rounded to one decimal place.
    pub delta_percent: Decimal,
    /// Direction with a ±0.5% dead zone.
    pub direction: Direction,
}
