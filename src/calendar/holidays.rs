//! Holiday resolution for a (year, location) pair.
//!
//! Rule-based locations compute each holiday's nominal date and then apply
//! substitution: a holiday landing on a weekend day, or on a date already
//! taken by another holiday, moves to the next free workday. Christmas and
//! Boxing Day are resolved as a pair so that Boxing Day keeps its own date
//! whenever it is a workday. Dataset-backed locations read a pre-fetched
//! table instead. Custom holidays are merged last and never replace an
//! existing entry.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::HolidayDataset;
use crate::models::{
    CustomHoliday, HolidayCoverage, HolidayEntry, HolidaySource, LocationConfig, RuleSet,
    WeekendPattern,
};

use super::math::{easter_sunday, last_weekday_of_month, nth_weekday_of_month};

/// Holidays for one year, sorted by date, plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHolidays {
    /// The calendar year.
    pub year: i32,
    /// At most one entry per date, ascending.
    pub entries: Vec<HolidayEntry>,
    /// Where the public holidays came from.
    pub coverage: HolidayCoverage,
}

impl ResolvedHolidays {
    /// Returns the entry observed on `date`, if any.
    pub fn get(&self, date: NaiveDate) -> Option<&HolidayEntry> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Returns `true` if `date` is a holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observance {
    /// Observed on its nominal date even if that is a weekend day.
    Fixed,
    /// Moves to the next free workday when its date is unavailable.
    Substitute,
}

#[derive(Debug, Clone, Copy)]
struct NominalHoliday {
    date: NaiveDate,
    name: &'static str,
    observance: Observance,
}

impl NominalHoliday {
    fn fixed(date: Option<NaiveDate>, name: &'static str) -> Option<Self> {
        date.map(|date| Self {
            date,
            name,
            observance: Observance::Fixed,
        })
    }

    fn substitute(date: Option<NaiveDate>, name: &'static str) -> Option<Self> {
        date.map(|date| Self {
            date,
            name,
            observance: Observance::Substitute,
        })
    }
}

/// Resolves the holiday list for a location and year.
///
/// Never fails: a dataset-backed location with no data for the year yields
/// only the custom holidays and [`HolidayCoverage::Unavailable`].
///
/// # Example
///
/// ```
/// use leave_optimizer::calendar::resolve_holidays;
/// use leave_optimizer::config::{HolidayDataset, LocationCatalog};
/// use leave_optimizer::models::{HolidayCoverage, WeekendPattern};
/// use chrono::NaiveDate;
///
/// let catalog = LocationCatalog::builtin();
/// let location = catalog.get("england-wales").unwrap();
/// let holidays = resolve_holidays(2023, location, WeekendPattern::SatSun, &[], &HolidayDataset::default());
///
/// assert_eq!(holidays.coverage, HolidayCoverage::Rules);
/// assert!(holidays.contains(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()));
/// ```
pub fn resolve_holidays(
    year: i32,
    location: &LocationConfig,
    weekend: WeekendPattern,
    custom: &[CustomHoliday],
    dataset: &HolidayDataset,
) -> ResolvedHolidays {
    let (mut observed, coverage) = match &location.holidays {
        HolidaySource::Rules { rules } => (rule_holidays(year, *rules, weekend), HolidayCoverage::Rules),
        HolidaySource::Dataset { country_code } => match dataset.lookup(country_code, year) {
            Some(rows) => {
                let mut observed = BTreeMap::new();
                for row in rows.iter().filter(|r| r.date.year() == year) {
                    observed
                        .entry(row.date)
                        .or_insert_with(|| HolidayEntry::new(row.date, row.name.clone()));
                }
                (observed, HolidayCoverage::Dataset)
            }
            None => {
                warn!(
                    location = %location.id,
                    country_code = %country_code,
                    year,
                    "No holiday data for year; using weekends and custom holidays only"
                );
                (BTreeMap::new(), HolidayCoverage::Unavailable)
            }
        },
    };

    for holiday in custom.iter().filter(|h| h.date.year() == year) {
        observed
            .entry(holiday.date)
            .or_insert_with(|| HolidayEntry::new(holiday.date, holiday.name.clone()));
    }

    let entries: Vec<HolidayEntry> = observed.into_values().collect();
    debug!(location = %location.id, year, holidays = entries.len(), "Resolved holidays");

    ResolvedHolidays {
        year,
        entries,
        coverage,
    }
}

/// Computes the observed holidays of a built-in rule set, keyed by date.
fn rule_holidays(year: i32, rules: RuleSet, weekend: WeekendPattern) -> BTreeMap<NaiveDate, HolidayEntry> {
    let nominal = nominal_holidays(year, rules);
    let mut observed = BTreeMap::new();

    for holiday in nominal.iter().filter(|h| h.observance == Observance::Fixed) {
        observed
            .entry(holiday.date)
            .or_insert_with(|| HolidayEntry::new(holiday.date, holiday.name));
    }

    for holiday in nominal.iter().filter(|h| h.observance == Observance::Substitute) {
        place(&mut observed, holiday.date, holiday.name, weekend);
    }

    // Christmas and Boxing Day: Boxing Day keeps a workday nominal date, so a
    // weekend Christmas skips past it.
    if let (Some(christmas), Some(boxing)) = (
        NaiveDate::from_ymd_opt(year, 12, 25),
        NaiveDate::from_ymd_opt(year, 12, 26),
    ) {
        let boxing_reserved = !weekend.is_weekend(boxing.weekday()) && !observed.contains_key(&boxing);
        if boxing_reserved {
            observed.insert(boxing, HolidayEntry::new(boxing, "Boxing Day"));
        }
        place(&mut observed, christmas, "Christmas Day", weekend);
        if !boxing_reserved {
            place(&mut observed, boxing, "Boxing Day", weekend);
        }
    }

    observed
}

/// Observes a holiday on its nominal date or the next free workday after it.
fn place(
    observed: &mut BTreeMap<NaiveDate, HolidayEntry>,
    nominal: NaiveDate,
    name: &'static str,
    weekend: WeekendPattern,
) {
    let is_free = |date: &NaiveDate| !weekend.is_weekend(date.weekday()) && !observed.contains_key(date);

    if is_free(&nominal) {
        observed.insert(nominal, HolidayEntry::new(nominal, name));
        return;
    }

    let substitute = nominal
        .iter_days()
        .skip(1)
        .take(14)
        .find(|d| is_free(d));

    if let Some(date) = substitute {
        observed.insert(
            date,
            HolidayEntry {
                date,
                name: name.to_string(),
                is_substitute: true,
            },
        );
    }
}

/// Nominal holidays for a rule set, excluding the Christmas pair.
fn nominal_holidays(year: i32, rules: RuleSet) -> Vec<NominalHoliday> {
    let easter = easter_sunday(year);
    let good_friday = easter.and_then(|e| e.checked_sub_signed(Duration::days(2)));
    let easter_monday = easter.and_then(|e| e.checked_add_signed(Duration::days(1)));
    let ymd = |m: u32, d: u32| NaiveDate::from_ymd_opt(year, m, d);

    let mut holidays = vec![
        NominalHoliday::substitute(ymd(1, 1), "New Year's Day"),
        NominalHoliday::fixed(good_friday, "Good Friday"),
        NominalHoliday::fixed(
            nth_weekday_of_month(year, 5, Weekday::Mon, 1),
            "Early May bank holiday",
        ),
        NominalHoliday::fixed(
            last_weekday_of_month(year, 5, Weekday::Mon),
            "Spring bank holiday",
        ),
    ];

    match rules {
        RuleSet::EnglandWales => {
            holidays.push(NominalHoliday::fixed(easter_monday, "Easter Monday"));
            holidays.push(NominalHoliday::fixed(
                last_weekday_of_month(year, 8, Weekday::Mon),
                "Summer bank holiday",
            ));
        }
        RuleSet::Scotland => {
            holidays.push(NominalHoliday::substitute(ymd(1, 2), "2nd January"));
            holidays.push(NominalHoliday::fixed(
                nth_weekday_of_month(year, 8, Weekday::Mon, 1),
                "Summer bank holiday",
            ));
            holidays.push(NominalHoliday::substitute(ymd(11, 30), "St Andrew's Day"));
        }
        RuleSet::NorthernIreland => {
            holidays.push(NominalHoliday::substitute(ymd(3, 17), "St Patrick's Day"));
            holidays.push(NominalHoliday::fixed(easter_monday, "Easter Monday"));
            holidays.push(NominalHoliday::substitute(
                ymd(7, 12),
                "Battle of the Boyne (Orangemen's Day)",
            ));
            holidays.push(NominalHoliday::fixed(
                last_weekday_of_month(year, 8, Weekday::Mon),
                "Summer bank holiday",
            ));
        }
    }

    let mut holidays: Vec<NominalHoliday> = holidays.into_iter().flatten().collect();
    holidays.sort_by_key(|h| h.date);
    holidays
}
