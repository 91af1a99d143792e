//! Usage reporting integration tests.

mod common;

use chrono::{DateTime, Utc, Weekday};
use common::TestHarness;
use mapscout_core::{reset_at, window_start, WindowKind};

async fn fetch_usage(harness: &TestHarness) -> serde_json::Value {
    let response = harness
        .server
        .get("/v1/usage")
        .add_header("authorization", harness.auth_header())
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn fresh_pro_account_reports_full_monthly_allowance() {
    let harness = TestHarness::with_plan("pro").await;

    let body = fetch_usage(&harness).await;

    assert_eq!(body["current"], 0);
    assert_eq!(body["limit"], 1000);
    assert_eq!(body["remaining"], 1000);
    assert_eq!(body["limitType"], "monthly");
    assert_eq!(body["planType"], "pro");
    assert_eq!(body["isFreePlan"], false);

    // The reset instant is the first moment of the next calendar month.
    let expected = reset_at(
        WindowKind::Monthly,
        window_start(WindowKind::Monthly, Utc::now(), Weekday::Mon),
    );
    let reported = DateTime::parse_from_rfc3339(body["resetDate"].as_str().unwrap()).unwrap();
    assert_eq!(reported.with_timezone(&Utc), expected);
}

#[tokio::test]
async fn unknown_plan_falls_back_to_starter() {
    let harness = TestHarness::with_plan("vip").await;

    let body = fetch_usage(&harness).await;

    assert_eq!(body["planType"], "starter");
    assert_eq!(body["limit"], 100);
    assert_eq!(body["limitType"], "weekly");
    assert_eq!(body["isFreePlan"], true);
}

#[tokio::test]
async fn report_is_idempotent_and_side_effect_free() {
    let harness = TestHarness::new().await;
    harness.seed_searches(7, Utc::now());

    let first = fetch_usage(&harness).await;
    let second = fetch_usage(&harness).await;

    assert_eq!(first, second);
    assert_eq!(first["current"], 7);

    // Reporting recorded nothing.
    assert_eq!(harness.total_events(), 7);
}

#[tokio::test]
async fn report_reflects_recorded_usage() {
    let harness = TestHarness::new().await;
    harness.seed_searches(5, Utc::now());

    let body = fetch_usage(&harness).await;

    assert_eq!(body["current"], 5);
    assert_eq!(body["remaining"], 95);
}

#[tokio::test]
async fn remaining_clamps_at_zero_past_the_limit() {
    let harness = TestHarness::new().await;
    // Over-limit counts can exist (bounded admission overshoot, seeded
    // history); remaining never goes negative.
    harness.seed_searches(120, Utc::now());

    let body = fetch_usage(&harness).await;

    assert_eq!(body["current"], 120);
    assert_eq!(body["remaining"], 0);
}

#[tokio::test]
async fn report_after_search_shows_consumption() {
    let harness = TestHarness::new().await;

    harness
        .server
        .post("/v1/search")
        .add_header("authorization", harness.auth_header())
        .json(&serde_json::json!({ "query": "restaurant" }))
        .await
        .assert_status_ok();

    let body = fetch_usage(&harness).await;
    assert_eq!(body["current"], 1);
    assert_eq!(body["remaining"], 99);
}

#[tokio::test]
async fn plan_features_describe_every_tier() {
    let harness = TestHarness::new().await;

    let body = fetch_usage(&harness).await;
    let features = body["planFeatures"].as_object().unwrap();

    assert_eq!(features.len(), 3);
    assert_eq!(features["starter"]["name"], "Starter");
    assert_eq!(features["pro"]["price"], "€29/mo");
    assert!(features["agency"]["features"].as_array().unwrap().len() >= 4);
}

#[tokio::test]
async fn usage_requires_a_credential() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/v1/usage").await;
    response.assert_status_unauthorized();
}
