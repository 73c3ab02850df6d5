//! Configuration types for the leave optimisation engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML and JSON files in a configuration directory.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{HolidaySource, LocationConfig, RuleSet, WeekendPattern};

fn default_location_id() -> String {
    "england-wales".to_string()
}

fn default_max_blocks() -> usize {
    3
}

fn default_top_by_efficiency() -> usize {
    100
}

fn default_top_by_duration() -> usize {
    50
}

fn default_plan_min_leave_days() -> u32 {
    3
}

fn default_opportunity_min_leave_days() -> u32 {
    1
}

/// Tunables for candidate pruning and the combination solver.
///
/// Loaded from `engine.yaml`; every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Location used when a request names an unknown region.
    #[serde(default = "default_location_id")]
    pub default_location: String,
    /// Maximum number of blocks in a plan.
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,
    /// Candidates kept by descending efficiency.
    #[serde(default = "default_top_by_efficiency")]
    pub top_by_efficiency: usize,
    /// Candidates kept by descending days off.
    #[serde(default = "default_top_by_duration")]
    pub top_by_duration: usize,
    /// Shortest block (in leave days) considered for a whole-year plan.
    #[serde(default = "default_plan_min_leave_days")]
    pub plan_min_leave_days: u32,
    /// Shortest block (in leave days) considered for opportunity lists.
    #[serde(default = "default_opportunity_min_leave_days")]
    pub opportunity_min_leave_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_location: default_location_id(),
            max_blocks: default_max_blocks(),
            top_by_efficiency: default_top_by_efficiency(),
            top_by_duration: default_top_by_duration(),
            plan_min_leave_days: default_plan_min_leave_days(),
            opportunity_min_leave_days: default_opportunity_min_leave_days(),
        }
    }
}

/// Locations configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationsConfig {
    /// All supported locations.
    pub locations: Vec<LocationConfig>,
}

/// The set of supported locations with a designated default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCatalog {
    locations: Vec<LocationConfig>,
    default_index: usize,
}

impl LocationCatalog {
    /// Creates a catalog; the default id must name one of the locations.
    pub fn new(default_id: &str, locations: Vec<LocationConfig>) -> EngineResult<Self> {
        let default_index = locations
            .iter()
            .position(|l| l.id == default_id)
            .ok_or_else(|| EngineError::UnsupportedRegion {
                region: default_id.to_string(),
            })?;
        Ok(Self {
            locations,
            default_index,
        })
    }

    /// The locations shipped with the engine.
    pub fn builtin() -> Self {
        let locations = vec![
            LocationConfig::rules("england-wales", "England & Wales", RuleSet::EnglandWales),
            LocationConfig::rules("scotland", "Scotland", RuleSet::Scotland),
            LocationConfig::rules("northern-ireland", "Northern Ireland", RuleSet::NorthernIreland),
            LocationConfig {
                id: "ireland".to_string(),
                name: "Ireland".to_string(),
                default_weekend: WeekendPattern::SatSun,
                holidays: HolidaySource::Dataset {
                    country_code: "ie".to_string(),
                },
            },
            LocationConfig {
                id: "united-states".to_string(),
                name: "United States".to_string(),
                default_weekend: WeekendPattern::SatSun,
                holidays: HolidaySource::Dataset {
                    country_code: "us".to_string(),
                },
            },
        ];
        Self {
            locations,
            default_index: 0,
        }
    }

    /// Looks up a location by id.
    pub fn get(&self, id: &str) -> EngineResult<&LocationConfig> {
        self.locations
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| EngineError::UnsupportedRegion {
                region: id.to_string(),
            })
    }

    /// The fallback location.
    pub fn default_location(&self) -> &LocationConfig {
        &self.locations[self.default_index]
    }

    /// All locations.
    pub fn locations(&self) -> &[LocationConfig] {
        &self.locations
    }
}

/// A single holiday row in the external dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHoliday {
    /// Observed date.
    pub date: NaiveDate,
    /// Holiday name.
    pub name: String,
}

/// Holidays for one country keyed by year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryHolidays {
    /// Holidays per calendar year.
    #[serde(default)]
    pub years: BTreeMap<i32, Vec<DatasetHoliday>>,
}

/// Pre-fetched holiday tables for dataset-backed locations.
///
/// Shape: `{countries: {countryCode: {years: {year: [{date, name}]}}}}`.
/// Missing countries or years are "no data", not errors.
///
/// # Example
///
/// ```
/// use leave_optimizer::config::HolidayDataset;
///
/// let dataset = HolidayDataset::from_json_str(
///     r#"{"countries": {"ie": {"years": {"2025": [{"date": "2025-03-17", "name": "St Patrick's Day"}]}}}}"#,
/// ).unwrap();
/// assert_eq!(dataset.lookup("ie", 2025).map(|h| h.len()), Some(1));
/// assert!(dataset.lookup("ie", 2026).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DatasetFile")]
pub struct HolidayDataset {
    countries: BTreeMap<String, CountryHolidays>,
    #[serde(skip_serializing)]
    revision: u64,
}

impl HolidayDataset {
    /// Builds a dataset from country tables. Country codes are stored lowercase.
    pub fn new(countries: BTreeMap<String, CountryHolidays>) -> Self {
        let countries = countries
            .into_iter()
            .map(|(code, holidays)| (code.to_ascii_lowercase(), holidays))
            .collect();
        let mut dataset = Self {
            countries,
            revision: 0,
        };
        dataset.revision = dataset.content_hash();
        dataset
    }

    /// Parses the JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Holiday tables keyed by lowercase country code.
    pub fn countries(&self) -> &BTreeMap<String, CountryHolidays> {
        &self.countries
    }

    /// Holidays for a country and year, if the dataset has them.
    pub fn lookup(&self, country_code: &str, year: i32) -> Option<&[DatasetHoliday]> {
        self.countries
            .get(&country_code.to_ascii_lowercase())
            .and_then(|c| c.years.get(&year))
            .map(Vec::as_slice)
    }

    /// Content hash, used to invalidate caches when the dataset changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.countries.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Deserialize)]
struct DatasetFile {
    #[serde(default)]
    countries: BTreeMap<String, CountryHolidays>,
}

impl From<DatasetFile> for HolidayDataset {
    fn from(file: DatasetFile) -> Self {
        Self::new(file.countries)
    }
}

/// The complete engine configuration loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    settings: EngineSettings,
    catalog: LocationCatalog,
    dataset: HolidayDataset,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(settings: EngineSettings, catalog: LocationCatalog, dataset: HolidayDataset) -> Self {
        Self {
            settings,
            catalog,
            dataset,
        }
    }

    /// Built-in locations, default settings and an empty dataset.
    pub fn builtin() -> Self {
        Self::new(
            EngineSettings::default(),
            LocationCatalog::builtin(),
            HolidayDataset::default(),
        )
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the location catalog.
    pub fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }

    /// Returns the holiday dataset.
    pub fn dataset(&self) -> &HolidayDataset {
        &self.dataset
    }
}
