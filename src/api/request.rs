//! Request types for the leave optimisation API.
//!
//! Dates arrive as `YYYY-MM-DD` strings and are parsed here so that a bad
//! date is reported as a validation error naming the offending value.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::LocationCatalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{BookedDays, CustomHoliday, PlanningContext};

/// Smallest accepted leave allowance.
pub const MIN_ALLOWANCE: u32 = 1;

/// Largest accepted leave allowance.
pub const MAX_ALLOWANCE: u32 = 365;

/// Calendar years accepted at the API edge.
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1900..=2200;

fn default_limit() -> usize {
    10
}

/// A user-defined holiday in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomHolidayRequest {
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Display name.
    pub name: String,
}

/// Request body for `POST /plan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Year to plan.
    pub year: i32,
    /// Location id, e.g. `england-wales`.
    pub region: String,
    /// Weekend preset key; the location default when omitted.
    #[serde(default)]
    pub weekend: Option<String>,
    /// Leave days available.
    pub allowance: u32,
    /// User-defined holidays.
    #[serde(default)]
    pub custom_holidays: Vec<CustomHolidayRequest>,
    /// Days already booked; plans from a clean slate when omitted.
    #[serde(default)]
    pub booked: Option<Vec<String>>,
}

/// Request body for `POST /insight`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRequest {
    /// The workday to evaluate.
    pub date: String,
    /// Location id.
    pub region: String,
    /// Weekend preset key.
    #[serde(default)]
    pub weekend: Option<String>,
    /// User-defined holidays.
    #[serde(default)]
    pub custom_holidays: Vec<CustomHolidayRequest>,
    /// Days already booked.
    #[serde(default)]
    pub booked: Vec<String>,
}

/// Request body for `POST /compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    /// The current year; it is compared against the year before.
    pub year: i32,
    /// Leave days available in each year.
    pub allowance: u32,
    /// Location id.
    pub region: String,
    /// Weekend preset key.
    #[serde(default)]
    pub weekend: Option<String>,
    /// User-defined holidays.
    #[serde(default)]
    pub custom_holidays: Vec<CustomHolidayRequest>,
}

/// Request body for `POST /opportunities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunitiesRequest {
    /// Year to search.
    pub year: i32,
    /// Location id.
    pub region: String,
    /// Weekend preset key.
    #[serde(default)]
    pub weekend: Option<String>,
    /// Longest block considered, in leave days.
    pub allowance: u32,
    /// Maximum number of blocks returned.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// User-defined holidays.
    #[serde(default)]
    pub custom_holidays: Vec<CustomHolidayRequest>,
    /// Days already booked.
    #[serde(default)]
    pub booked: Option<Vec<String>>,
}

/// Request body for `POST /heatmap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapRequest {
    /// Year to render.
    pub year: i32,
    /// Location id.
    pub region: String,
    /// Weekend preset key.
    #[serde(default)]
    pub weekend: Option<String>,
    /// User-defined holidays.
    #[serde(default)]
    pub custom_holidays: Vec<CustomHolidayRequest>,
    /// Days already booked.
    #[serde(default)]
    pub booked: Option<Vec<String>>,
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        value: value.to_string(),
    })
}

fn validate_allowance(allowance: u32) -> EngineResult<u32> {
    if (MIN_ALLOWANCE..=MAX_ALLOWANCE).contains(&allowance) {
        Ok(allowance)
    } else {
        Err(EngineError::InvalidAllowance { allowance })
    }
}

fn validate_year(year: i32) -> EngineResult<i32> {
    if SUPPORTED_YEARS.contains(&year) {
        Ok(year)
    } else {
        Err(EngineError::UnsupportedYear { year })
    }
}

fn parse_custom_holidays(custom: &[CustomHolidayRequest]) -> EngineResult<Vec<CustomHoliday>> {
    custom
        .iter()
        .map(|c| {
            Ok(CustomHoliday {
                date: parse_date(&c.date)?,
                name: c.name.clone(),
            })
        })
        .collect()
}

fn parse_booked(booked: &[String]) -> EngineResult<BookedDays> {
    booked.iter().map(|d| parse_date(d)).collect()
}

struct ContextParts<'a> {
    year: i32,
    region: &'a str,
    weekend: Option<&'a str>,
    allowance: u32,
    custom_holidays: &'a [CustomHolidayRequest],
    booked: Option<&'a [String]>,
}

impl ContextParts<'_> {
    fn into_context(self, catalog: &LocationCatalog) -> EngineResult<PlanningContext> {
        let year = validate_year(self.year)?;
        let custom_holidays = parse_custom_holidays(self.custom_holidays)?;
        let mut ctx =
            PlanningContext::resolve(catalog, year, self.region, self.weekend, self.allowance)
                .with_custom_holidays(custom_holidays);
        if let Some(booked) = self.booked {
            ctx = ctx.with_booked(parse_booked(booked)?);
        }
        Ok(ctx)
    }
}

impl PlanRequest {
    /// Validates the request and resolves it into a planning context.
    pub fn into_context(self, catalog: &LocationCatalog) -> EngineResult<PlanningContext> {
        ContextParts {
            year: self.year,
            region: &self.region,
            weekend: self.weekend.as_deref(),
            allowance: validate_allowance(self.allowance)?,
            custom_holidays: &self.custom_holidays,
            booked: self.booked.as_deref(),
        }
        .into_context(catalog)
    }
}

impl InsightRequest {
    /// Validates the request; returns the context for the date's year and the date.
    pub fn into_context(self, catalog: &LocationCatalog) -> EngineResult<(PlanningContext, NaiveDate)> {
        let date = parse_date(&self.date)?;
        let ctx = ContextParts {
            year: date.year(),
            region: &self.region,
            weekend: self.weekend.as_deref(),
            allowance: 0,
            custom_holidays: &self.custom_holidays,
            booked: Some(&self.booked),
        }
        .into_context(catalog)?;
        Ok((ctx, date))
    }
}

impl CompareRequest {
    /// Validates the request and resolves it into a planning context.
    pub fn into_context(self, catalog: &LocationCatalog) -> EngineResult<PlanningContext> {
        ContextParts {
            year: self.year,
            region: &self.region,
            weekend: self.weekend.as_deref(),
            allowance: validate_allowance(self.allowance)?,
            custom_holidays: &self.custom_holidays,
            booked: None,
        }
        .into_context(catalog)
    }
}

impl OpportunitiesRequest {
    /// Validates the request and resolves it into a planning context.
    pub fn into_context(self, catalog: &LocationCatalog) -> EngineResult<PlanningContext> {
        ContextParts {
            year: self.year,
            region: &self.region,
            weekend: self.weekend.as_deref(),
            allowance: validate_allowance(self.allowance)?,
            custom_holidays: &self.custom_holidays,
            booked: self.booked.as_deref(),
        }
        .into_context(catalog)
    }
}

impl HeatmapRequest {
    /// Validates the request and resolves it into a planning context.
    pub fn into_context(self, catalog: &LocationCatalog) -> EngineResult<PlanningContext> {
        ContextParts {
            year: self.year,
            region: &self.region,
            weekend: self.weekend.as_deref(),
            allowance: 0,
            custom_holidays: &self.custom_holidays,
            booked: self.booked.as_deref(),
        }
        .into_context(catalog)
    }
}
