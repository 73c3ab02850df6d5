//! Integration tests for the leave optimisation API.
//!
//! This test suite drives the HTTP endpoints end to end:
//! - Plan computation (allowance, bookings, block cap)
//! - Day insight (efficiency, tiers, bridge days, weekend patterns)
//! - Year-over-year comparison
//! - Opportunities and heatmap
//! - Graceful degradation (unknown region, missing holiday data)
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::str::FromStr;
use tower::ServiceExt;

use leave_optimizer::api::{AppState, create_router};
use leave_optimizer::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
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
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn assert_plan_is_valid(plan: &Value, allowance: u64) {
    let blocks = plan["blocks"].as_array().unwrap();
    assert!(blocks.len() <= 3, "at most three blocks");

    let leave: u64 = blocks
        .iter()
        .map(|b| b["leave_days_used"].as_u64().unwrap())
        .sum();
    assert_eq!(leave, plan["total_leave_days"].as_u64().unwrap());
    assert!(leave <= allowance, "leave {} exceeds allowance {}", leave, allowance);

    for pair in blocks.windows(2) {
        let end = pair[0]["end_date"].as_str().unwrap();
        let next_start = pair[1]["start_date"].as_str().unwrap();
        assert!(end < next_start, "blocks overlap or are unsorted");
    }
}

// =============================================================================
// Plan computation
// =============================================================================

#[tokio::test]
async fn test_plan_england_2023() {
    let (status, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2023, "region": "england-wales", "allowance": 25}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_plan_is_valid(&plan, 25);
    assert_eq!(plan["coverage"], "rules");
    assert!(plan.get("notices").is_none());
    assert!(plan["total_days_off"].as_u64().unwrap() > 25);
}

#[tokio::test]
async fn test_plan_small_allowances() {
    for allowance in [1u64, 2, 3, 4, 8] {
        let (status, plan) = post(
            create_router_for_test(),
            "/plan",
            json!({"year": 2024, "region": "scotland", "allowance": allowance}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_plan_is_valid(&plan, allowance);
        assert!(!plan["blocks"].as_array().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_plan_blocks_have_consistent_efficiency() {
    let (_, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2024, "region": "northern-ireland", "allowance": 20}),
    )
    .await;

    for block in plan["blocks"].as_array().unwrap() {
        let used = block["leave_days_used"].as_u64().unwrap();
        let total = block["total_days_off"].as_u64().unwrap();
        assert_eq!(block["booked_dates"].as_array().unwrap().len() as u64, used);
        assert_eq!(
            decimal(&block["efficiency"]),
            Decimal::from(total) / Decimal::from(used)
        );
    }
}

#[tokio::test]
async fn test_plan_is_idempotent() {
    let body = json!({"year": 2025, "region": "england-wales", "allowance": 15});
    let (_, first) = post(create_router_for_test(), "/plan", body.clone()).await;
    let (_, second) = post(create_router_for_test(), "/plan", body).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_plan_with_bookings_uses_remaining_allowance() {
    let booked = ["2023-06-12", "2023-06-13", "2023-06-14"];
    let (status, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2023, "region": "england-wales", "allowance": 7, "booked": booked}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_plan_is_valid(&plan, 4);
    for block in plan["blocks"].as_array().unwrap() {
        for date in block["booked_dates"].as_array().unwrap() {
            assert!(!booked.contains(&date.as_str().unwrap()));
        }
    }
}

#[tokio::test]
async fn test_plan_with_allowance_fully_booked_is_empty() {
    let (status, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({
            "year": 2023,
            "region": "england-wales",
            "allowance": 2,
            "booked": ["2023-06-12", "2023-06-13"]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(plan["blocks"].as_array().unwrap().is_empty());
    assert_eq!(plan["total_leave_days"], 0);
}

// =============================================================================
// Day insight
// =============================================================================

#[tokio::test]
async fn test_insight_thursday_before_good_friday() {
    let (status, insight) = post(
        create_router_for_test(),
        "/insight",
        json!({"date": "2023-04-06", "region": "england-wales"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(insight["total_days_off"], 5);
    assert_eq!(decimal(&insight["efficiency"]), Decimal::from(5));
    assert_eq!(insight["tier"], "high");
    assert_eq!(insight["bridge"], false);
    assert_eq!(insight["block_start"], "2023-04-06");
    assert_eq!(insight["block_end"], "2023-04-10");
}

#[tokio::test]
async fn test_insight_on_holiday_is_null() {
    let (status, insight) = post(
        create_router_for_test(),
        "/insight",
        json!({"date": "2023-12-26", "region": "england-wales"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(insight.is_null());
}

#[tokio::test]
async fn test_insight_bridge_flips_with_bookings() {
    let (_, with_both) = post(
        create_router_for_test(),
        "/insight",
        json!({
            "date": "2023-06-14",
            "region": "england-wales",
            "booked": ["2023-06-13", "2023-06-15"]
        }),
    )
    .await;
    let (_, with_one) = post(
        create_router_for_test(),
        "/insight",
        json!({
            "date": "2023-06-14",
            "region": "england-wales",
            "booked": ["2023-06-13"]
        }),
    )
    .await;

    assert_eq!(with_both["bridge"], true);
    assert_eq!(with_one["bridge"], false);
}

#[tokio::test]
async fn test_insight_scotland_crosses_year_start() {
    // Scotland observes Jan 2 and Jan 3 in 2023; the run reaches back to Sat Dec 31
    let (_, insight) = post(
        create_router_for_test(),
        "/insight",
        json!({"date": "2023-01-04", "region": "scotland"}),
    )
    .await;

    assert_eq!(insight["block_start"], "2022-12-31");
    assert_eq!(insight["block_end"], "2023-01-04");
    assert_eq!(insight["total_days_off"], 5);
}

#[tokio::test]
async fn test_insight_respects_weekend_pattern() {
    let (_, friday) = post(
        create_router_for_test(),
        "/insight",
        json!({"date": "2023-06-09", "region": "england-wales", "weekend": "fri-sat"}),
    )
    .await;
    assert!(friday.is_null());

    let (_, sunday) = post(
        create_router_for_test(),
        "/insight",
        json!({"date": "2023-06-11", "region": "england-wales", "weekend": "fri-sat"}),
    )
    .await;
    assert_eq!(sunday["total_days_off"], 3);
    assert_eq!(sunday["block_start"], "2023-06-09");
}

#[tokio::test]
async fn test_insight_with_custom_holiday() {
    let (_, insight) = post(
        create_router_for_test(),
        "/insight",
        json!({
            "date": "2023-06-15",
            "region": "england-wales",
            "custom_holidays": [{"date": "2023-06-16", "name": "Company Day"}]
        }),
    )
    .await;
    assert_eq!(insight["total_days_off"], 4);
    assert_eq!(insight["tier"], "high");
}

// =============================================================================
// Year comparison
// =============================================================================

#[tokio::test]
async fn test_compare_matches_plans() {
    let router = create_router_for_test();
    let (status, comparison) = post(
        router,
        "/compare",
        json!({"year": 2024, "allowance": 10, "region": "england-wales"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let longest = |plan: &Value| {
        plan["blocks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|b| b["total_days_off"].as_u64().unwrap())
            .max()
            .unwrap()
    };
    let (_, current) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2024, "region": "england-wales", "allowance": 10}),
    )
    .await;
    let (_, previous) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2023, "region": "england-wales", "allowance": 10}),
    )
    .await;

    let current_best = longest(&current);
    let previous_best = longest(&previous);
    assert_eq!(comparison["year"], 2024);
    assert_eq!(comparison["current_best"].as_u64().unwrap(), current_best);
    assert_eq!(comparison["previous_best"].as_u64().unwrap(), previous_best);

    let expected_direction = match current_best.cmp(&previous_best) {
        std::cmp::Ordering::Greater => "more",
        std::cmp::Ordering::Less => "less",
        std::cmp::Ordering::Equal => "same",
    };
    assert_eq!(comparison["direction"], expected_direction);
}

// =============================================================================
// Opportunities and heatmap
// =============================================================================

#[tokio::test]
async fn test_opportunities_limit_and_order() {
    let (status, opportunities) = post(
        create_router_for_test(),
        "/opportunities",
        json!({"year": 2023, "region": "england-wales", "allowance": 10, "limit": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let opportunities = opportunities.as_array().unwrap();
    assert_eq!(opportunities.len(), 3);
    let efficiencies: Vec<Decimal> = opportunities
        .iter()
        .map(|o| decimal(&o["efficiency"]))
        .collect();
    assert!(efficiencies.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_heatmap_england_2023() {
    let (status, heatmap) = post(
        create_router_for_test(),
        "/heatmap",
        json!({"year": 2023, "region": "england-wales"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let entries = heatmap.as_array().unwrap();
    assert_eq!(entries.len(), 252);

    let dates: HashSet<&str> = entries.iter().map(|e| e["date"].as_str().unwrap()).collect();
    assert_eq!(dates.len(), entries.len());
    assert!(!dates.contains("2023-04-07"));

    let thursday = entries
        .iter()
        .find(|e| e["date"] == "2023-04-06")
        .unwrap();
    assert_eq!(thursday["insight"]["tier"], "high");
}

#[tokio::test]
async fn test_heatmap_excludes_booked_days() {
    let (_, heatmap) = post(
        create_router_for_test(),
        "/heatmap",
        json!({"year": 2023, "region": "england-wales", "booked": ["2023-06-14"]}),
    )
    .await;
    let entries = heatmap.as_array().unwrap();
    assert_eq!(entries.len(), 251);
    assert!(entries.iter().all(|e| e["date"] != "2023-06-14"));
}

// =============================================================================
// Graceful degradation
// =============================================================================

#[tokio::test]
async fn test_unknown_region_falls_back() {
    let (status, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2024, "region": "atlantis", "allowance": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["notices"][0]["kind"], "unknown_region");
    assert_eq!(plan["notices"][0]["requested"], "atlantis");
    assert_eq!(plan["notices"][0]["fallback"], "england-wales");
}

#[tokio::test]
async fn test_unknown_weekend_falls_back() {
    let (status, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2024, "region": "scotland", "weekend": "mon-tue", "allowance": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["notices"][0]["kind"], "unknown_weekend_pattern");
    assert_eq!(plan["notices"][0]["fallback"], "sat-sun");
}

#[tokio::test]
async fn test_dataset_region_with_data() {
    let (_, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2025, "region": "ireland", "allowance": 10}),
    )
    .await;
    assert_eq!(plan["coverage"], "dataset");
    assert!(plan.get("notices").is_none());

    // St Patrick's Day 2025 is a Monday
    let (_, insight) = post(
        create_router_for_test(),
        "/insight",
        json!({"date": "2025-03-17", "region": "ireland"}),
    )
    .await;
    assert!(insight.is_null());
}

#[tokio::test]
async fn test_dataset_region_without_data_degrades() {
    let (status, plan) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 2026, "region": "united-states", "allowance": 10}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["coverage"], "unavailable");
    assert_eq!(plan["notices"][0]["kind"], "holiday_data_unavailable");
    assert_eq!(plan["notices"][0]["country_code"], "us");
    assert!(!plan["blocks"].as_array().unwrap().is_empty());
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_allowance_out_of_range() {
    for allowance in [0, 366] {
        let (status, error) = post(
            create_router_for_test(),
            "/plan",
            json!({"year": 2024, "region": "england-wales", "allowance": allowance}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_negative_allowance_is_validation_error() {
    let (status, error) = post(
        create_router_for_test(),
        "/compare",
        json!({"year": 2024, "region": "england-wales", "allowance": -3}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_bad_booked_date() {
    let (status, error) = post(
        create_router_for_test(),
        "/heatmap",
        json!({"year": 2024, "region": "england-wales", "booked": ["2024-02-30"]}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("2024-02-30"));
}

#[tokio::test]
async fn test_missing_region() {
    let (status, error) = post(
        create_router_for_test(),
        "/opportunities",
        json!({"year": 2024, "allowance": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("region"));
}

#[tokio::test]
async fn test_unsupported_year() {
    let (status, error) = post(
        create_router_for_test(),
        "/plan",
        json!({"year": 1200, "region": "england-wales", "allowance": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}
