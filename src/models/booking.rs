//! The set of days a user has committed as leave.

use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar dates the user has booked as leave.
///
/// Owned by the caller and passed into the engine per call. Serializes as a
/// sorted array of `YYYY-MM-DD` strings.
///
/// # Example
///
/// ```
/// use leave_optimizer::models::BookedDays;
/// use chrono::NaiveDate;
///
/// let mut booked = BookedDays::default();
/// booked.insert(NaiveDate::from_ymd_opt(2024, 7, 5).unwrap());
/// assert!(booked.contains(NaiveDate::from_ymd_opt(2024, 7, 5).unwrap()));
/// assert_eq!(booked.in_year(2024).count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookedDays(BTreeSet<NaiveDate>);

impl BookedDays {
    /// Creates an empty booked set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Books a date. Returns `false` if it was already booked.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    /// Unbooks a date. Returns `false` if it was not booked.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.0.remove(&date)
    }

    /// Returns `true` if the date is booked.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    /// Number of booked dates.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is booked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates booked dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    /// Iterates booked dates that fall within the given year.
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied().filter(move |d| d.year() == year)
    }

    /// Content hash of the set, used as a cache revision.
    pub fn revision(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        hasher.finish()
    }
}

impl FromIterator<NaiveDate> for BookedDays {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<NaiveDate> for BookedDays {
    fn extend<I: IntoIterator<Item = NaiveDate>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}
