mod common;

use axum::{body, http::Method};
use common::TestApp;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use armory_api::entities::inventory_event::ReasonCode;
use armory_api::services::reorder::ReorderReport;

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body should be json")
}

fn report_from(body: &Value) -> ReorderReport {
    serde_json::from_value(body["data"].clone()).expect("data should deserialize as a report")
}

#[tokio::test]
async fn steady_seller_reports_rate_and_coverage() {
    let app = TestApp::new().await;
    app.seed_item(
        "G19",
        "Glock 19 Gen 5",
        Some("GLK-19"),
        Some("764503026911"),
        50,
        dec!(450.00),
    )
    .await;
    // Four months of clean history: one receipt, then four units sold in
    // each of the last four months.
    app.seed_event("G19", 62, ReasonCode::Receiving, 4.0).await;
    for months_back in [3.5, 2.5, 1.5, 0.5] {
        app.seed_event("G19", -4, ReasonCode::Sale, months_back)
            .await;
    }

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["G19"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = json_body(response).await;
    assert_eq!(body["success"], json!(true));

    let report = report_from(&body);
    assert_eq!(report.summary.items_analyzed, 1);
    assert_eq!(report.summary.items_needing_reorder, 0);
    assert!(report.unmatched_identifiers.is_empty());

    let rec = &report.recommendations[0];
    assert_eq!(rec.item_id, "G19");
    assert_eq!(rec.current_qty, 50);
    assert_eq!(rec.avg_monthly_sales, 4.0);
    assert_eq!(rec.months_of_stock_left, 12.5);
    assert_eq!(rec.out_of_stock_months, 0.0);
    assert!(!rec.hot_seller);
    assert_eq!(rec.recommended_order_qty, 0);
    assert!(rec.notes.is_empty());
}

#[tokio::test]
async fn urgent_item_is_flagged_and_ordered() {
    let app = TestApp::new().await;
    app.seed_item("M18", "Sig Sauer M18", Some("SIG-M18"), None, 1, dec!(500.00))
        .await;
    app.seed_event("M18", 17, ReasonCode::Receiving, 4.0).await;
    for months_back in [3.5, 2.5, 1.5, 0.5] {
        app.seed_event("M18", -4, ReasonCode::Sale, months_back)
            .await;
    }

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["SIG-M18"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let report = report_from(&json_body(response).await);
    assert_eq!(report.summary.items_needing_reorder, 1);
    assert_eq!(report.summary.items_urgent, 1);
    assert_eq!(report.summary.total_estimated_cost, dec!(1500.00));

    let rec = &report.recommendations[0];
    assert_eq!(rec.months_of_stock_left, 0.3);
    assert_eq!(rec.recommended_order_qty, 3);
    assert_eq!(rec.estimated_order_cost, dec!(1500.00));
    assert!(rec
        .notes
        .iter()
        .any(|note| note.starts_with("Stock-out risk")));
}

#[tokio::test]
async fn scanned_barcode_with_check_digit_resolves() {
    let app = TestApp::new().await;
    app.seed_item(
        "G19",
        "Glock 19 Gen 5",
        Some("GLK-19"),
        Some("764503026911"),
        50,
        dec!(450.00),
    )
    .await;
    app.seed_event("G19", 62, ReasonCode::Receiving, 4.0).await;
    for months_back in [3.5, 2.5, 1.5, 0.5] {
        app.seed_event("G19", -4, ReasonCode::Sale, months_back)
            .await;
    }

    // Scanner output: the stored 12-digit UPC with a trailing check digit.
    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["7645030269113"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let report = report_from(&json_body(response).await);
    assert!(report.unmatched_identifiers.is_empty());
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(report.recommendations[0].item_id, "G19");
    assert_eq!(report.recommendations[0].avg_monthly_sales, 4.0);
}

#[tokio::test]
async fn unknown_identifiers_are_reported_not_fatal() {
    let app = TestApp::new().await;
    app.seed_item("G19", "Glock 19 Gen 5", Some("GLK-19"), None, 50, dec!(450.00))
        .await;
    app.seed_event("G19", 54, ReasonCode::Receiving, 2.0).await;
    app.seed_event("G19", -4, ReasonCode::Sale, 0.5).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["G19", "NO-SUCH-ITEM"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let report = report_from(&json_body(response).await);
    assert_eq!(report.unmatched_identifiers, vec!["NO-SUCH-ITEM"]);
    assert_eq!(report.summary.items_analyzed, 1);
    assert_eq!(report.recommendations[0].item_id, "G19");
}

#[tokio::test]
async fn empty_identifier_list_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": [] })),
        )
        .await;
    assert_eq!(response.status(), 400);

    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("error response should echo a request id");

    let body = json_body(response).await;
    assert_eq!(body["error"], json!("Bad Request"));
    let message = body["message"].as_str().expect("message should be a string");
    assert!(message.starts_with("Validation error:"));
    assert!(message.contains("identifier"));
    assert_eq!(body["request_id"], json!(header_id));
}

#[tokio::test]
async fn stockout_gap_is_excluded_from_the_demand_rate() {
    let app = TestApp::new().await;
    app.seed_item("870", "Remington 870", Some("REM-870"), None, 2, dec!(300.00))
        .await;

    // Sold out at 4.5 months back, restocked 40 days later. The gap must
    // show up as out-of-stock time instead of diluting the demand rate.
    app.seed_event("870", 24, ReasonCode::Receiving, 8.0).await;
    for months_back in [7.5, 6.5, 5.5, 4.5] {
        app.seed_event("870", -6, ReasonCode::Sale, months_back)
            .await;
    }
    app.seed_event("870", 2, ReasonCode::Receiving, 4.5 - 40.0 / 30.44)
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["870"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let rec = report_from(&json_body(response).await).recommendations[0].clone();
    assert_eq!(rec.out_of_stock_months, 1.3);
    assert_eq!(rec.avg_monthly_sales, 2.1);
    assert_eq!(rec.months_of_stock_left, 0.9);
    assert_eq!(rec.recommended_order_qty, 1);
    assert_eq!(rec.estimated_order_cost, dec!(300.00));
    assert!(!rec.hot_seller);
}

#[tokio::test]
async fn surging_item_is_marked_hot() {
    let app = TestApp::new().await;
    app.seed_item("PMAG", "Magpul PMAG 17", Some("MAG-17"), None, 22, dec!(15.00))
        .await;

    // Slow mover for months, then a surge in the current quarter.
    app.seed_event("PMAG", 40, ReasonCode::Receiving, 10.0).await;
    for months_back in [9.0, 7.0, 5.0] {
        app.seed_event("PMAG", -2, ReasonCode::Sale, months_back)
            .await;
    }
    app.seed_event("PMAG", -6, ReasonCode::Sale, 1.0).await;
    app.seed_event("PMAG", -6, ReasonCode::Sale, 0.4).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["PMAG"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let rec = report_from(&json_body(response).await).recommendations[0].clone();
    assert!(rec.hot_seller);
    assert!(rec
        .notes
        .iter()
        .any(|note| note.starts_with("Hot seller:")));
    assert_eq!(rec.recommended_order_qty, 0);
}

#[tokio::test]
async fn lookback_restricts_the_event_window() {
    let app = TestApp::new().await;
    app.seed_item("870", "Remington 870", Some("REM-870"), None, 2, dec!(300.00))
        .await;
    // All ledger activity is older than the requested three-month lookback.
    app.seed_event("870", 26, ReasonCode::Receiving, 8.0).await;
    for months_back in [7.5, 6.5, 5.5, 4.5] {
        app.seed_event("870", -6, ReasonCode::Sale, months_back)
            .await;
    }

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["870"], "lookback_months": 3 })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let rec = report_from(&json_body(response).await).recommendations[0].clone();
    assert_eq!(rec.avg_monthly_sales, 0.0);
    assert_eq!(rec.months_of_stock_left, 999.9);
    assert_eq!(rec.recommended_order_qty, 0);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;
    app.seed_item("G19", "Glock 19 Gen 5", None, None, 5, dec!(450.00))
        .await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/reorder/analysis",
            Some(json!({ "identifiers": ["G19"] })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let header_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("response should echo a request id");

    let body = json_body(response).await;
    assert_eq!(body["meta"]["request_id"], json!(header_id));
}

#[tokio::test]
async fn health_and_status_endpoints_respond() {
    let app = TestApp::new().await;

    let health = app.request(Method::GET, "/api/v1/health", None).await;
    assert_eq!(health.status(), 200);
    let health_body = json_body(health).await;
    assert_eq!(health_body["data"]["status"], json!("healthy"));
    assert_eq!(health_body["data"]["checks"]["database"], json!("healthy"));

    let status = app.request(Method::GET, "/api/v1/status", None).await;
    assert_eq!(status.status(), 200);
    let status_body = json_body(status).await;
    assert_eq!(status_body["data"]["service"], json!("armory-api"));
    assert_eq!(status_body["data"]["status"], json!("ok"));
}
