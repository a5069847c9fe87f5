//! # Integration Tests for tariff-api
//!
//! Drive the full router: upload (multipart and raw JSON), calculation,
//! inspection, health, error mapping, and database-backed persistence.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tariff_api::config::TariffConfig;
use tariff_api::state::AppState;
use tariff_core::TariffStore;
use tariff_db::{Database, DbConfig};

/// Helper: memory-only app with default config.
fn test_app() -> axum::Router {
    tariff_api::app(AppState::new(TariffConfig::default()))
}

/// Helper: app backed by an in-memory database.
async fn test_app_with_db() -> (axum::Router, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let state = AppState::with_database(
        TariffConfig::default(),
        Arc::new(TariffStore::new()),
        db.clone(),
    );
    (tariff_api::app(state), db)
}

/// Helper: read response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart_request(uri: &str, part_name: &str, content: &str) -> Request<Body> {
    let boundary = "tariff-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"{part_name}\"; filename=\"tariffs.json\"\r\n\
         Content-Type: application/json\r\n\
         \r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

/// The date-keyed document the service has always accepted.
fn glass_and_metal() -> String {
    json!({
        "2020-06-01": [
            {"cargo_type": "Glass", "rate": 0.05},
            {"cargo_type": "Metal", "rate": 0.03}
        ]
    })
    .to_string()
}

// -- Health -------------------------------------------------------------------

#[tokio::test]
async fn test_healthcheck() {
    let response = test_app().oneshot(get_request("/healthcheck")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_healthcheck_degraded_when_database_closed() {
    let (app, db) = test_app_with_db().await;
    db.close().await;

    let response = app.oneshot(get_request("/healthcheck")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await, json!({"status": "degraded"}));
}

// -- Upload + Calculate -------------------------------------------------------

#[tokio::test]
async fn test_upload_then_calculate() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(multipart_request("/upload_tariffs/", "file", &glass_and_metal()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["loaded"], 2);
    assert_eq!(body["added"], 2);
    assert_eq!(body["mode"], "merge");
    assert!(body["batchId"].is_string());

    let response = app
        .oneshot(json_request(
            "POST",
            "/calculate_insurance/",
            &json!({"cargo_type": "Glass", "declared_value": 10000.0, "date": "2020-06-01"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["insuranceCost"], 500.0);
    assert_eq!(body["rate"], 0.05);
    assert_eq!(body["category"], "Glass");
    assert_eq!(body["date"], "2020-06-01");
    assert_eq!(body["effectiveFrom"], "2020-06-01");
}

#[tokio::test]
async fn test_calculate_unknown_category_is_404() {
    let app = test_app();
    app.clone()
        .oneshot(multipart_request("/upload_tariffs", "file", &glass_and_metal()))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/calculate_insurance",
            &json!({"category": "Wood", "declaredValue": 10000.0, "date": "2020-06-01"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_calculate_before_first_tariff_is_404() {
    let app = test_app();
    app.clone()
        .oneshot(multipart_request("/upload_tariffs", "file", &glass_and_metal()))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/calculate_insurance",
            &json!({"category": "Glass", "declaredValue": 100, "date": "2020-05-31"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calculate_negative_value_is_422() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/calculate_insurance",
            &json!({"category": "Glass", "declaredValue": -1, "date": "2020-06-01"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_calculate_bad_date_is_422() {
    let response = test_app()
        .oneshot(json_request(
            "POST",
            "/calculate_insurance",
            &json!({"category": "Glass", "declaredValue": 100, "date": "June 1st"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_calculate_malformed_json_is_400() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate_insurance")
                .header("content-type", "application/json")
                .body(Body::from("{\"category\": \"Glass\""))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Upload validation --------------------------------------------------------

#[tokio::test]
async fn test_raw_json_upload_and_listing() {
    let app = test_app();

    let document = json!([
        {"category": "Glass", "rate": "0.05", "effectiveFrom": "2020-01-01"},
        {"category": "Glass", "rate": 0.08, "effectiveFrom": "2020-07-01"}
    ]);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/upload_tariffs", &document))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/tariffs?category=Glass")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(
        body["tariffs"][1],
        json!({"category": "Glass", "rate": 0.08, "effectiveFrom": "2020-07-01"})
    );
}

#[tokio::test]
async fn test_duplicate_upload_is_rejected_atomically() {
    let app = test_app();

    let document = json!([
        {"category": "Metal", "rate": 0.03, "effectiveFrom": "2020-06-01"},
        {"category": "Metal", "rate": 0.04, "effectiveFrom": "2020-06-01"}
    ]);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/upload_tariffs", &document))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"]["message"].as_str().unwrap().starts_with("record 1:"));

    let response = app.oneshot(get_request("/tariffs")).await.unwrap();
    assert_eq!(body_json(response).await["count"], 0);
}

#[tokio::test]
async fn test_repeated_date_key_upload_is_rejected() {
    let app = test_app();

    // written by hand: serde_json::json! would collapse the repeated key
    let document = r#"{
        "2020-06-01": [{"cargo_type": "Glass", "rate": 0.05}],
        "2020-06-01": [{"cargo_type": "Glass", "rate": 0.06}]
    }"#;
    let response = app
        .clone()
        .oneshot(multipart_request("/upload_tariffs", "file", document))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().starts_with("record 1:"));

    let response = app.oneshot(get_request("/tariffs")).await.unwrap();
    assert_eq!(body_json(response).await["count"], 0);
}

#[tokio::test]
async fn test_upload_replace_mode() {
    let app = test_app();
    app.clone()
        .oneshot(multipart_request("/upload_tariffs", "file", &glass_and_metal()))
        .await
        .unwrap();

    let document = json!([{"category": "Wood", "rate": 0.02, "effectiveFrom": "2021-01-01"}]);
    let response = app
        .clone()
        .oneshot(json_request("POST", "/upload_tariffs?mode=replace", &document))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["mode"], "replace");
    assert_eq!(body["total"], 1);

    let response = app
        .oneshot(get_request("/tariffs/resolve?category=Glass&date=2021-06-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_unknown_mode_is_422() {
    let document = json!([{"category": "Wood", "rate": 0.02, "effectiveFrom": "2021-01-01"}]);
    let response = test_app()
        .oneshot(json_request("POST", "/upload_tariffs?mode=append", &document))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_multipart_without_file_part_is_400() {
    let response = test_app()
        .oneshot(multipart_request("/upload_tariffs", "document", &glass_and_metal()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_upload_is_413() {
    let config = TariffConfig {
        max_upload_bytes: 16,
        ..TariffConfig::default()
    };
    let app = tariff_api::app(AppState::new(config));

    let response = app
        .oneshot(json_request(
            "POST",
            "/upload_tariffs",
            &json!([{"category": "Glass", "rate": 0.05, "effectiveFrom": "2020-01-01"}]),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// -- Resolve ------------------------------------------------------------------

#[tokio::test]
async fn test_resolve_endpoint() {
    let app = test_app();
    let document = json!([
        {"category": "Glass", "rate": 0.05, "effectiveFrom": "2020-01-01"},
        {"category": "Glass", "rate": 0.08, "effectiveFrom": "2020-07-01"}
    ]);
    app.clone()
        .oneshot(json_request("POST", "/upload_tariffs", &document))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/tariffs/resolve?category=Glass&date=2020-07-01"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rate"], 0.08);

    let response = app
        .oneshot(get_request("/tariffs/resolve?category=Glass"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Persistence --------------------------------------------------------------

#[tokio::test]
async fn test_upload_is_persisted() {
    let (app, db) = test_app_with_db().await;

    let response = app
        .oneshot(multipart_request("/upload_tariffs", "file", &glass_and_metal()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(db.tariffs().count().await.unwrap(), 2);

    // a fresh store rebuilt from the table resolves the same way
    let store = TariffStore::from_entries(db.tariffs().load_all().await.unwrap());
    let june = chrono::NaiveDate::from_ymd_opt(2020, 6, 1).unwrap();
    assert_eq!(store.resolve("Metal", june).unwrap().rate.to_string(), "0.03");
}

#[tokio::test]
async fn test_failed_persist_leaves_store_unchanged() {
    let (app, db) = test_app_with_db().await;
    db.close().await;

    let response = app
        .clone()
        .oneshot(multipart_request("/upload_tariffs", "file", &glass_and_metal()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "An internal error occurred");

    let response = app.oneshot(get_request("/tariffs")).await.unwrap();
    assert_eq!(body_json(response).await["count"], 0);
}
