//! HTTP request handlers for the leave optimisation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;

use super::request::{
    CompareRequest, HeatmapRequest, InsightRequest, OpportunitiesRequest, PlanRequest,
};
use super::response::{ApiError, ApiErrorResponse, HeatmapEntry};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/plan", post(plan_handler))
        .route("/insight", post(insight_handler))
        .route("/compare", post(compare_handler))
        .route("/opportunities", post(opportunities_handler))
        .route("/heatmap", post(heatmap_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, e.g. the missing field name
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request rejected"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Handler for POST /plan.
///
/// Returns the best plan for the year, allowance and bookings supplied.
async fn plan_handler(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing plan request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let planner = state.planner();
    let ctx = match request.into_context(planner.catalog()) {
        Ok(ctx) => ctx,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let plan = planner.compute_plan(&ctx);
    info!(
        correlation_id = %correlation_id,
        year = ctx.year,
        location = %ctx.location.id,
        allowance = ctx.allowance,
        blocks = plan.blocks.len(),
        total_days_off = plan.total_days_off,
        duration_us = start_time.elapsed().as_micros(),
        "Plan computed"
    );
    json_response(StatusCode::OK, plan)
}

/// Handler for POST /insight.
///
/// Returns `null` when the date is not a bookable workday.
async fn insight_handler(
    State(state): State<AppState>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing insight request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let planner = state.planner();
    let (ctx, date) = match request.into_context(planner.catalog()) {
        Ok(parts) => parts,
        Err(err) => return error_response(correlation_id, err),
    };

    let insight = planner.day_insight(&ctx, date);
    info!(
        correlation_id = %correlation_id,
        date = %date,
        bookable = insight.is_some(),
        "Insight computed"
    );
    json_response(StatusCode::OK, insight)
}

/// Handler for POST /compare.
///
/// Returns `null` when either year has no plan to compare.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing comparison request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let planner = state.planner();
    let ctx = match request.into_context(planner.catalog()) {
        Ok(ctx) => ctx,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let comparison = planner.year_comparison(&ctx);
    info!(
        correlation_id = %correlation_id,
        year = ctx.year,
        direction = ?comparison.as_ref().map(|c| c.direction),
        duration_us = start_time.elapsed().as_micros(),
        "Comparison computed"
    );
    json_response(StatusCode::OK, comparison)
}

/// Handler for POST /opportunities.
async fn opportunities_handler(
    State(state): State<AppState>,
    payload: Result<Json<OpportunitiesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing opportunities request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let limit = request.limit;
    let planner = state.planner();
    let ctx = match request.into_context(planner.catalog()) {
        Ok(ctx) => ctx,
        Err(err) => return error_response(correlation_id, err),
    };

    let opportunities = planner.top_opportunities(&ctx, limit);
    info!(
        correlation_id = %correlation_id,
        year = ctx.year,
        count = opportunities.len(),
        "Opportunities computed"
    );
    json_response(StatusCode::OK, opportunities)
}

/// Handler for POST /heatmap.
async fn heatmap_handler(
    State(state): State<AppState>,
    payload: Result<Json<HeatmapRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing heatmap request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };
    let planner = state.planner();
    let ctx = match request.into_context(planner.catalog()) {
        Ok(ctx) => ctx,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    let entries: Vec<HeatmapEntry> = planner
        .calendar_heatmap(&ctx)
        .into_iter()
        .map(|(date, insight)| HeatmapEntry { date, insight })
        .collect();
    info!(
        correlation_id = %correlation_id,
        year = ctx.year,
        days = entries.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Heatmap computed"
    );
    json_response(StatusCode::OK, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{DayInsight, Plan};
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/default").expect("Failed to load config");
        AppState::new(config)
    }

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Vec<u8>) {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_plan_returns_200() {
        let (status, body) = post_json(
            "/plan",
            r#"{"year": 2024, "region": "england-wales", "allowance": 10}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let plan: Plan = serde_json::from_slice(&body).unwrap();
        assert!(!plan.is_empty());
        assert!(plan.total_leave_days <= 10);
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let (status, body) = post_json("/plan", "{invalid json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let (status, body) = post_json("/plan", r#"{"year": 2024, "region": "scotland"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("allowance"));
    }

    #[tokio::test]
    async fn test_insight_on_weekend_returns_null() {
        let (status, body) = post_json(
            "/insight",
            r#"{"date": "2023-06-10", "region": "england-wales"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let insight: Option<DayInsight> = serde_json::from_slice(&body).unwrap();
        assert!(insight.is_none());
    }

    #[tokio::test]
    async fn test_insight_bad_date_returns_validation_error() {
        let (status, body) = post_json(
            "/insight",
            r#"{"date": "14/06/2023", "region": "england-wales"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("14/06/2023"));
    }
}
