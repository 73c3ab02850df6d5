//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from a directory.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, EngineSettings, HolidayDataset, LocationCatalog, LocationsConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml     # Engine settings
/// ├── locations.yaml  # Supported locations
/// └── holidays.json   # Optional external holiday dataset
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_optimizer::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// let scotland = loader.catalog().get("scotland")?;
/// println!("Location: {}", scotland.name);
/// # Ok::<(), leave_optimizer::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `engine.yaml` or `locations.yaml` is missing or
    /// invalid, if `holidays.json` exists but is invalid, or if the default
    /// location is not among the configured locations. A missing
    /// `holidays.json` yields an empty dataset.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        let locations_path = path.join("locations.yaml");
        let locations = Self::load_yaml::<LocationsConfig>(&locations_path)?;
        let catalog = LocationCatalog::new(&settings.default_location, locations.locations)
            .map_err(|err| EngineError::ConfigParseError {
                path: locations_path.display().to_string(),
                message: format!("default location: {}", err),
            })?;

        let dataset = Self::load_dataset(&path.join("holidays.json"))?;

        debug!(
            locations = catalog.locations().len(),
            countries = dataset.countries().len(),
            "Loaded engine configuration"
        );

        Ok(Self {
            config: EngineConfig::new(settings, catalog, dataset),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads the holiday dataset, treating a missing file as empty.
    fn load_dataset(path: &Path) -> EngineResult<HolidayDataset> {
        let path_str = path.display().to_string();

        if !path.exists() {
            warn!(path = %path_str, "Holiday dataset not found; dataset-backed locations will have no holidays");
            return Ok(HolidayDataset::default());
        }

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        HolidayDataset::from_json_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Returns the location catalog.
    pub fn catalog(&self) -> &LocationCatalog {
        self.config.catalog()
    }

    /// Returns the holiday dataset.
    pub fn dataset(&self) -> &HolidayDataset {
        self.config.dataset()
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
