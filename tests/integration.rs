//! Integration tests for the Childcare Subsidy Engine HTTP API.
//!
//! This test suite covers:
//! - Subsidy rate tiers and sibling positions
//! - The activity test
//! - Per-child costs, withholding, and annual totals
//! - Policy period selection
//! - Scenario generation, filtering, and sorting
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

use subsidy_engine::api::{AppState, create_router};
use subsidy_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/ccs").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
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

fn create_parent(income: &str, days: u8, hours: &str) -> Value {
    json!({
        "fte_income": income,
        "work_days_per_week": days,
        "hours_per_day": hours
    })
}

fn create_hourly_child(age: u8, fee: &str, hours: &str) -> Value {
    json!({
        "age": age,
        "care_type": "centre_based_day_care",
        "fee": {"mode": "hourly", "hourly_fee": fee, "hours_per_week": hours}
    })
}

fn create_daily_child(age: u8, fee: &str, days: u8) -> Value {
    json!({
        "age": age,
        "care_type": "centre_based_day_care",
        "fee": {"mode": "daily", "daily_fee": fee, "hours_per_day": "10", "days_of_care": days}
    })
}

fn create_household(parent1: Value, parent2: Option<Value>, children: Vec<Value>) -> Value {
    let mut household = json!({
        "parent1": parent1,
        "children": children
    });
    if let Some(parent2) = parent2 {
        household["parent2"] = parent2;
    }
    household
}

fn assert_decimal(actual: &Value, expected: &str, label: &str) {
    let actual = normalize_decimal(actual.as_str().unwrap());
    let expected = normalize_decimal(expected);
    assert_eq!(actual, expected, "Expected {} {}, got {}", label, expected, actual);
}

async fn calculate(household: Value) -> Value {
    let (status, body) = post(
        create_router_for_test(),
        "/calculate",
        json!({"household": household, "policy_period": "2025-26"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected error: {}", body);
    body["result"].clone()
}

// =============================================================================
// SECTION 1: Subsidy Rate Tests
// =============================================================================

#[tokio::test]
async fn test_income_just_below_taper_gets_90_percent() {
    let result = calculate(create_household(
        create_parent("85279", 5, "8"),
        None,
        vec![create_hourly_child(3, "15", "30")],
    ))
    .await;

    assert_decimal(&result["subsidies"][0]["percentage"], "90", "percentage");
}

#[tokio::test]
async fn test_income_at_taper_start_gets_89_percent() {
    let result = calculate(create_household(
        create_parent("85280", 5, "8"),
        None,
        vec![create_hourly_child(3, "15", "30")],
    ))
    .await;

    assert_decimal(&result["subsidies"][0]["percentage"], "89", "percentage");
}

#[tokio::test]
async fn test_100k_income_one_child_age_4_gets_87_percent() {
    let result = calculate(create_household(
        create_parent("100000", 5, "8"),
        None,
        vec![create_hourly_child(4, "15", "30")],
    ))
    .await;

    assert_decimal(&result["subsidies"][0]["percentage"], "87", "percentage");
    assert_eq!(result["subsidies"][0]["tier"], "standard");
}

#[tokio::test]
async fn test_second_child_under_six_gets_higher_rate() {
    let result = calculate(create_household(
        create_parent("100000", 5, "8"),
        None,
        vec![create_hourly_child(1, "15", "30"), create_hourly_child(4, "15", "30")],
    ))
    .await;

    // Child 0 is younger, so position 2 on the higher tier.
    assert_eq!(result["subsidies"][0]["position"], 2);
    assert_eq!(result["subsidies"][0]["tier"], "higher");
    assert_decimal(&result["subsidies"][0]["percentage"], "91", "percentage");
    assert_eq!(result["subsidies"][1]["position"], 1);
    assert_decimal(&result["subsidies"][1]["percentage"], "87", "percentage");
}

#[tokio::test]
async fn test_school_age_sibling_stays_standard() {
    let result = calculate(create_household(
        create_parent("100000", 5, "8"),
        None,
        vec![create_hourly_child(9, "15", "10"), create_hourly_child(7, "15", "10")],
    ))
    .await;

    assert_eq!(result["subsidies"][1]["tier"], "standard");
    assert_decimal(&result["subsidies"][1]["percentage"], "87", "percentage");
}

#[tokio::test]
async fn test_higher_rate_reverts_above_threshold() {
    let result = calculate(create_household(
        create_parent("365280", 5, "8"),
        None,
        vec![create_hourly_child(4, "15", "30"), create_hourly_child(2, "15", "30")],
    ))
    .await;

    assert_eq!(result["subsidies"][1]["reverted_to_standard"], true);
    assert_eq!(
        result["subsidies"][1]["percentage"],
        result["subsidies"][0]["percentage"]
    );
    assert_decimal(&result["subsidies"][1]["percentage"], "33", "percentage");
}

// =============================================================================
// SECTION 2: Activity Test Tests
// =============================================================================

#[tokio::test]
async fn test_part_time_parent_below_cutoff_gets_36_hours() {
    let result = calculate(create_household(
        create_parent("90000", 5, "8"),
        Some(create_parent("60000", 3, "7.6")),
        vec![create_hourly_child(3, "15", "40")],
    ))
    .await;

    assert_decimal(
        &result["activity_test"]["lower_parent_hours_per_fortnight"],
        "45.6",
        "lower hours",
    );
    assert_eq!(result["activity_test"]["level"], "base");
    assert_decimal(&result["activity_test"]["subsidised_hours_per_week"], "36", "hours/week");
}

#[tokio::test]
async fn test_both_parents_full_time_get_50_hours() {
    let result = calculate(create_household(
        create_parent("90000", 5, "8"),
        Some(create_parent("60000", 5, "8")),
        vec![create_hourly_child(3, "15", "40")],
    ))
    .await;

    assert_eq!(result["activity_test"]["level"], "higher");
    assert_decimal(&result["activity_test"]["subsidised_hours_per_week"], "50", "hours/week");
    assert_decimal(&result["costs"][0]["subsidised_units"], "40", "subsidised hours");
}

// =============================================================================
// SECTION 3: Cost Tests
// =============================================================================

#[tokio::test]
async fn test_capped_fee_with_default_withholding() {
    // 120000 × 3/5 = 72000 → 90%; 3 × 7.6 × 2 = 45.6 → 36 hours/week
    let result = calculate(create_household(
        create_parent("120000", 3, "7.6"),
        None,
        vec![create_hourly_child(3, "16.25", "40")],
    ))
    .await;

    let cost = &result["costs"][0];
    assert_decimal(&cost["effective_rate"], "14.63", "effective rate");
    assert_decimal(&cost["weekly"]["gross_subsidy"], "474.01", "gross subsidy");
    assert_decimal(&cost["weekly"]["withheld_amount"], "23.70", "withheld");
    assert_decimal(&cost["weekly"]["paid_subsidy"], "450.31", "paid subsidy");
    assert_decimal(&cost["weekly"]["full_cost"], "650", "full cost");
    assert_decimal(&cost["weekly"]["out_of_pocket"], "199.69", "out of pocket");
    assert_decimal(&cost["annual"]["paid_subsidy"], "23416.12", "annual paid subsidy");

    let warnings = result["audit_trace"]["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w["code"] == "FEE_ABOVE_CAP"));
}

#[tokio::test]
async fn test_daily_fee_with_withholding_override() {
    let mut household = create_household(
        create_parent("120000", 3, "7.6"),
        None,
        vec![create_daily_child(2, "140", 3)],
    );
    household["withholding_percentage"] = json!("0");

    let result = calculate(household).await;
    let cost = &result["costs"][0];

    assert_eq!(cost["unit"], "day");
    assert_decimal(&cost["rate_cap"], "146.3", "daily cap");
    assert_decimal(&cost["effective_rate"], "140", "effective rate");
    // 0.9 × 140 × 3 = 378
    assert_decimal(&cost["weekly"]["gross_subsidy"], "378", "gross subsidy");
    assert_decimal(&cost["weekly"]["withheld_amount"], "0", "withheld");
    assert_decimal(&cost["weekly"]["out_of_pocket"], "42", "out of pocket");
}

#[tokio::test]
async fn test_totals_sum_children_and_audit_trace_is_complete() {
    let result = calculate(create_household(
        create_parent("100000", 5, "8"),
        Some(create_parent("50000", 4, "8")),
        vec![create_hourly_child(4, "16", "30"), create_daily_child(1, "150", 4)],
    ))
    .await;

    let paid: Decimal = result["costs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| Decimal::from_str(c["weekly"]["paid_subsidy"].as_str().unwrap()).unwrap())
        .sum();
    let total = Decimal::from_str(result["totals"]["weekly"]["paid_subsidy"].as_str().unwrap()).unwrap();
    assert_eq!(paid, total);

    let steps = result["audit_trace"]["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 7);
    assert_eq!(steps[0]["rule_id"], "income_adjustment");
    assert_eq!(steps[6]["rule_id"], "child_cost");
}

#[tokio::test]
async fn test_same_request_gives_same_result() {
    let household = create_household(
        create_parent("100000", 5, "8"),
        Some(create_parent("50000", 2, "8")),
        vec![create_hourly_child(2, "15", "20")],
    );

    let first = calculate(household.clone()).await;
    let second = calculate(household).await;
    assert_eq!(first, second);
}

// =============================================================================
// SECTION 4: Policy Period Selection Tests
// =============================================================================

#[tokio::test]
async fn test_as_of_date_selects_earlier_period() {
    let household = create_household(
        create_parent("100000", 5, "8"),
        None,
        vec![create_hourly_child(4, "15", "30")],
    );

    let (status, body) = post(
        create_router_for_test(),
        "/calculate",
        json!({"household": household, "as_of": "2025-01-15"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["policy_period"], "2024-25");
    // 2024-25 tapers from $83,280: (100000 - 83280) / 5000 → 3 + 1 steps
    assert_decimal(&body["result"]["subsidies"][0]["percentage"], "86", "percentage");
}

#[tokio::test]
async fn test_latest_period_used_by_default() {
    let household = create_household(
        create_parent("100000", 5, "8"),
        None,
        vec![create_hourly_child(4, "15", "30")],
    );

    let (status, body) = post(create_router_for_test(), "/calculate", json!({"household": household})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["policy_period"], "2025-26");
    assert!(body["calculation_id"].is_string());
    assert!(body["timestamp"].is_string());
}

// =============================================================================
// SECTION 5: Scenario Tests
// =============================================================================

fn two_parent_household() -> Value {
    create_household(
        create_parent("110000", 5, "8"),
        Some(create_parent("80000", 5, "8")),
        vec![create_daily_child(2, "150", 5)],
    )
}

#[tokio::test]
async fn test_all_mode_returns_35_unique_scenarios() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({"household": two_parent_household(), "mode": "all"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scenarios = body["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 35);

    let ids: HashSet<_> = scenarios.iter().map(|s| s["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 35);
}

#[tokio::test]
async fn test_same_salt_gives_same_ids() {
    let salt = "7f9c24e8-3b12-4fef-91e5-1b2c3d4e5f60";
    let request = json!({"household": two_parent_household(), "mode": "common", "salt": salt});

    let (_, first) = post(create_router_for_test(), "/scenarios", request.clone()).await;
    let (_, second) = post(create_router_for_test(), "/scenarios", request).await;

    assert_eq!(first["salt"], salt);
    assert_eq!(first["scenarios"], second["scenarios"]);
    assert_ne!(first["batch_id"], second["batch_id"]);
}

#[tokio::test]
async fn test_sorted_by_net_income_and_best_is_first() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({
            "household": two_parent_household(),
            "mode": "all",
            "sort": {"metric": "net_income", "order": "descending"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scenarios = body["scenarios"].as_array().unwrap();
    let net: Vec<Decimal> = scenarios
        .iter()
        .map(|s| Decimal::from_str(s["metrics"]["net_income"].as_str().unwrap()).unwrap())
        .collect();
    assert!(net.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(body["best_by_net_income"], scenarios[0]["id"]);
}

#[tokio::test]
async fn test_filter_by_work_days() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({
            "household": two_parent_household(),
            "mode": "all",
            "filter": {"min_work_days": 8, "max_work_days": 9}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scenarios = body["scenarios"].as_array().unwrap();
    // (3,5) (4,4) (5,3) (4,5) (5,4)
    assert_eq!(scenarios.len(), 5);
    assert!(scenarios.iter().all(|s| {
        let days = s["total_work_days"].as_u64().unwrap();
        (8..=9).contains(&days)
    }));
}

#[tokio::test]
async fn test_custom_scenario_reduces_care() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({
            "household": two_parent_household(),
            "mode": "custom",
            "custom": [
                {"name": "Staggered", "parent1_days": 3, "parent2_days": 3},
                {"parent1_days": 5, "parent2_days": 5}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let scenarios = body["scenarios"].as_array().unwrap();
    assert_eq!(scenarios[0]["name"], "Staggered");
    // Mon-Wed and Wed-Fri overlap only on Wednesday.
    assert_eq!(scenarios[0]["care_days"], 1);
    assert_eq!(scenarios[1]["care_days"], 5);
    assert_eq!(scenarios[1]["name"], "Parent 1: 5 days, Parent 2: 5 days");
}

#[tokio::test]
async fn test_single_parent_mode() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({
            "household": create_household(
                create_parent("90000", 5, "8"),
                None,
                vec![create_hourly_child(3, "15", "40")],
            ),
            "mode": "single_parent"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let days: Vec<u64> = body["scenarios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["parent1_days"].as_u64().unwrap())
        .collect();
    assert_eq!(days, vec![1, 2, 3, 4, 5]);
}

// =============================================================================
// SECTION 6: Error Cases Tests
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(error["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_children_field_returns_validation_error() {
    let (status, body) = post(
        create_router_for_test(),
        "/calculate",
        json!({"household": {"parent1": create_parent("90000", 5, "8")}}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_child_age_out_of_range_returns_400() {
    let (status, body) = post(
        create_router_for_test(),
        "/calculate",
        json!({"household": create_household(
            create_parent("90000", 5, "8"),
            None,
            vec![create_hourly_child(19, "15", "10")],
        )}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"], "children[0].age");
}

#[tokio::test]
async fn test_withholding_out_of_range_returns_400() {
    let mut household = create_household(
        create_parent("90000", 5, "8"),
        None,
        vec![create_hourly_child(3, "15", "10")],
    );
    household["withholding_percentage"] = json!("150");

    let (status, body) = post(create_router_for_test(), "/calculate", json!({"household": household})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "WITHHOLDING_OUT_OF_RANGE");
}

#[tokio::test]
async fn test_unknown_policy_period_returns_400() {
    let household = create_household(
        create_parent("90000", 5, "8"),
        None,
        vec![create_hourly_child(3, "15", "10")],
    );

    let (status, body) = post(
        create_router_for_test(),
        "/calculate",
        json!({"household": household, "policy_period": "1999-00"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "POLICY_PERIOD_NOT_FOUND");
}

#[tokio::test]
async fn test_custom_mode_without_list_returns_400() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({"household": two_parent_household(), "mode": "custom"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"], "custom");
}

#[tokio::test]
async fn test_custom_mode_with_nobody_working_returns_400() {
    let (status, body) = post(
        create_router_for_test(),
        "/scenarios",
        json!({
            "household": two_parent_household(),
            "mode": "custom",
            "custom": [{"parent1_days": 0, "parent2_days": 0}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["details"], "custom[0]");
}

#[tokio::test]
async fn test_oversized_fee_returns_calculation_error() {
    let (status, body) = post(
        create_router_for_test(),
        "/calculate",
        json!({"household": create_household(
            create_parent("90000", 5, "8"),
            None,
            vec![create_hourly_child(3, "79228162514264337593543950335", "40")],
        )}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CALCULATION_ERROR");
    assert!(body["details"].as_str().unwrap().contains("too large"));
}
