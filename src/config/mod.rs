//! Configuration loading and management for the leave optimisation engine.
//!
//! This module provides functionality to load engine settings and supported
//! locations from YAML files, and the optional external holiday dataset from
//! JSON.
//!
//! # Example
//!
//! ```no_run
//! use leave_optimizer::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Default location: {}", config.catalog().default_location().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CountryHolidays, DatasetHoliday, EngineConfig, EngineSettings, HolidayDataset,
    LocationCatalog, LocationsConfig,
};
