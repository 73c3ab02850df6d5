//! Location and weekend-pattern models.
//!
//! A [`LocationConfig`] is immutable reference data: it names a region, the
//! weekend pattern that applies there by default, and where its public
//! holidays come from (built-in rules or an external dataset).

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The pair of weekdays treated as non-working by default.
///
/// Only a small fixed set of presets is supported. Each preset serializes as
/// its kebab-case key (e.g. `"sat-sun"`).
///
/// # Example
///
/// ```
/// use leave_optimizer::models::WeekendPattern;
/// use chrono::Weekday;
///
/// let pattern: WeekendPattern = "fri-sat".parse().unwrap();
/// assert!(pattern.is_weekend(Weekday::Fri));
/// assert!(!pattern.is_weekend(Weekday::Sun));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekendPattern {
    /// Saturday and Sunday.
    #[default]
    SatSun,
    /// Friday and Saturday.
    FriSat,
    /// Thursday and Friday.
    ThuFri,
    /// Sunday and Monday.
    SunMon,
}

impl WeekendPattern {
    /// All supported presets.
    pub const ALL: [WeekendPattern; 4] = [
        WeekendPattern::SatSun,
        WeekendPattern::FriSat,
        WeekendPattern::ThuFri,
        WeekendPattern::SunMon,
    ];

    /// The two weekend days, in week order (first weekend day first).
    pub fn days(self) -> [Weekday; 2] {
        match self {
            WeekendPattern::SatSun => [Weekday::Sat, Weekday::Sun],
            WeekendPattern::FriSat => [Weekday::Fri, Weekday::Sat],
            WeekendPattern::ThuFri => [Weekday::Thu, Weekday::Fri],
            WeekendPattern::SunMon => [Weekday::Sun, Weekday::Mon],
        }
    }

    /// Returns `true` if the weekday is one of this pattern's weekend days.
    pub fn is_weekend(self, weekday: Weekday) -> bool {
        self.days().contains(&weekday)
    }

    /// The preset key, e.g. `"sat-sun"`.
    pub fn key(self) -> &'static str {
        match self {
            WeekendPattern::SatSun => "sat-sun",
            WeekendPattern::FriSat => "fri-sat",
            WeekendPattern::ThuFri => "thu-fri",
            WeekendPattern::SunMon => "sun-mon",
        }
    }
}

impl fmt::Display for WeekendPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for WeekendPattern {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        WeekendPattern::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::UnknownWeekendPattern { key: s.to_string() })
    }
}

/// Built-in holiday rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSet {
    /// England and Wales bank holidays.
    EnglandWales,
    /// Scottish bank holidays (2 January, St Andrew's Day, early August).
    Scotland,
    /// Northern Ireland bank holidays (St Patrick's Day, Battle of the Boyne).
    NorthernIreland,
}

/// Where a location's public holidays come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HolidaySource {
    /// Holidays are computed from a built-in rule set.
    Rules {
        /// The rule set to apply.
        rules: RuleSet,
    },
    /// Holidays are looked up in an externally supplied dataset.
    Dataset {
        /// Country code used as the dataset key (e.g. "ie").
        country_code: String,
    },
}

/// Reference data describing a supported location.
///
/// # Example
///
/// ```
/// use leave_optimizer::models::{HolidaySource, LocationConfig, RuleSet, WeekendPattern};
///
/// let location = LocationConfig {
///     id: "scotland".to_string(),
///     name: "Scotland".to_string(),
///     default_weekend: WeekendPattern::SatSun,
///     holidays: HolidaySource::Rules { rules: RuleSet::Scotland },
/// };
/// assert!(location.is_rule_based());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Stable identifier (e.g. "england-wales").
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Weekend pattern used when the caller does not pick one.
    #[serde(default)]
    pub default_weekend: WeekendPattern,
    /// Holiday source.
    pub holidays: HolidaySource,
}

impl LocationConfig {
    /// Creates a rule-based location with a Saturday/Sunday weekend.
    pub fn rules(id: &str, name: &str, rules: RuleSet) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            default_weekend: WeekendPattern::SatSun,
            holidays: HolidaySource::Rules { rules },
        }
    }

    /// Returns `true` if holidays are computed from built-in rules.
    pub fn is_rule_based(&self) -> bool {
        matches!(self.holidays, HolidaySource::Rules { .. })
    }
}
