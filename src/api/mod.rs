//! HTTP API module for the leave optimisation engine.
//!
//! This module exposes plan computation, day insights, year comparison,
//! opportunity lists and the calendar heatmap as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CompareRequest, CustomHolidayRequest, HeatmapRequest, InsightRequest, MAX_ALLOWANCE,
    MIN_ALLOWANCE, OpportunitiesRequest, PlanRequest, parse_date,
};
pub use response::{ApiError, ApiErrorResponse, HeatmapEntry};
pub use state::AppState;
