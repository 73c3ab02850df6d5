//! The immutable input bundle for every engine call.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::warn;

use crate::config::LocationCatalog;

use super::{BookedDays, CustomHoliday, LocationConfig, Notice, WeekendPattern};

/// Everything a planning call depends on.
///
/// The engine keeps no ambient state: year, location, weekend pattern,
/// allowance, custom holidays and bookings all travel in this value.
///
/// # Example
///
/// ```
/// use leave_optimizer::config::LocationCatalog;
/// use leave_optimizer::models::{PlanningContext, WeekendPattern};
///
/// let catalog = LocationCatalog::builtin();
/// let ctx = PlanningContext::resolve(&catalog, 2024, "scotland", Some("fri-sat"), 25);
/// assert_eq!(ctx.location.id, "scotland");
/// assert_eq!(ctx.weekend, WeekendPattern::FriSat);
/// assert!(ctx.notices.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningContext {
    /// Calendar year being planned.
    pub year: i32,
    /// Resolved location.
    pub location: LocationConfig,
    /// Weekend pattern in effect.
    pub weekend: WeekendPattern,
    /// Total leave days available for the year.
    pub allowance: u32,
    /// User-defined holidays for the location.
    pub custom_holidays: Vec<CustomHoliday>,
    /// Days already booked; `None` plans from a clean slate.
    pub booked: Option<BookedDays>,
    /// Fallbacks applied while resolving this context.
    pub notices: Vec<Notice>,
}

impl PlanningContext {
    /// Creates a context using the location's default weekend.
    pub fn new(year: i32, location: LocationConfig, allowance: u32) -> Self {
        Self {
            year,
            weekend: location.default_weekend,
            location,
            allowance,
            custom_holidays: Vec::new(),
            booked: None,
            notices: Vec::new(),
        }
    }

    /// Resolves region and weekend keys against the catalog.
    ///
    /// Unknown regions fall back to the catalog's default location and
    /// unknown weekend keys fall back to the location's default pattern.
    /// Each fallback is recorded as a [`Notice`].
    pub fn resolve(
        catalog: &LocationCatalog,
        year: i32,
        region: &str,
        weekend: Option<&str>,
        allowance: u32,
    ) -> Self {
        let mut notices = Vec::new();

        let location = match catalog.get(region) {
            Ok(location) => location.clone(),
            Err(err) => {
                let fallback = catalog.default_location().clone();
                warn!(error = %err, fallback = %fallback.id, "Falling back to default location");
                notices.push(Notice::UnknownRegion {
                    requested: region.to_string(),
                    fallback: fallback.id.clone(),
                });
                fallback
            }
        };

        let weekend = match weekend.map(str::parse::<WeekendPattern>) {
            None => location.default_weekend,
            Some(Ok(pattern)) => pattern,
            Some(Err(err)) => {
                warn!(error = %err, fallback = %location.default_weekend, "Falling back to default weekend");
                notices.push(Notice::UnknownWeekendPattern {
                    requested: weekend.unwrap_or_default().to_string(),
                    fallback: location.default_weekend,
                });
                location.default_weekend
            }
        };

        Self {
            year,
            location,
            weekend,
            allowance,
            custom_holidays: Vec::new(),
            booked: None,
            notices,
        }
    }

    /// Overrides the weekend pattern.
    pub fn with_weekend(mut self, weekend: WeekendPattern) -> Self {
        self.weekend = weekend;
        self
    }

    /// Sets the custom holidays.
    pub fn with_custom_holidays(mut self, custom_holidays: Vec<CustomHoliday>) -> Self {
        self.custom_holidays = custom_holidays;
        self
    }

    /// Sets the booked days.
    pub fn with_booked(mut self, booked: BookedDays) -> Self {
        self.booked = Some(booked);
        self
    }

    /// The same location and settings for another year, from a clean slate.
    pub fn for_year(&self, year: i32) -> Self {
        Self {
            year,
            location: self.location.clone(),
            weekend: self.weekend,
            allowance: self.allowance,
            custom_holidays: self.custom_holidays.clone(),
            booked: None,
            notices: Vec::new(),
        }
    }

    /// Content hash of the custom holiday list.
    pub fn custom_revision(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.custom_holidays.hash(&mut hasher);
        hasher.finish()
    }

    /// Content hash of the booked set (zero when planning from a clean slate).
    pub fn booked_revision(&self) -> u64 {
        self.booked.as_ref().map_or(0, BookedDays::revision)
    }
}
