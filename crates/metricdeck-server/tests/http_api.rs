#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod support;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use metricdeck_server::app_state::AppState;
use metricdeck_server::router::build_router;

use support::{TestEnv, KEYS_YAML};

const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn configuration_body() -> Value {
    json!({
        "is_editable": true,
        "query_generation_prompt": "parts flagged per day",
        "layouts": [
            {"breakpoint": "lg", "x": 0, "y": 0, "w": 6, "h": 4, "static": false},
            {"breakpoint": "sm", "x": 0, "y": 4, "w": 12, "h": 4}
        ]
    })
}

#[tokio::test]
async fn health_reports_application_and_database() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"application": true, "database": true}));
}

#[tokio::test]
async fn create_then_get_metrics() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, created) = send(&app, post_json("/metric-configuration", configuration_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, metrics) = send(
        &app,
        get(&format!("/metrics/{id}?start_date=2025-06-01&end_date=2025-06-30&day_range=30")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["id"], json!(id));
    assert_eq!(metrics["is_editable"], json!(true));
    assert_eq!(metrics["records"], json!([]));
    assert_eq!(metrics["layouts"][0]["breakpoint"], json!("lg"));
    assert_eq!(metrics["layouts"][0]["static"], json!(false));
    assert_eq!(metrics["layouts"][1]["static"], Value::Null);
    assert_eq!(metrics["layouts"][1]["y"], json!(4));
}

#[tokio::test]
async fn window_parameters_are_optional() {
    let env = TestEnv::new();
    let app = build_router(env.state());
    let (_, created) = send(&app, post_json("/metric-configuration", configuration_body())).await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = send(&app, get(&format!("/metrics/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_metrics_id_is_404() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, body) = send(&app, get(&format!("/metrics/{UNKNOWN_ID}"))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn non_uuid_id_is_400() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, body) = send(&app, get("/metrics/not-a-uuid")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("BAD_REQUEST"));
}

#[tokio::test]
async fn invalid_date_parameter_is_400() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, _) = send(&app, get(&format!("/metrics/{UNKNOWN_ID}?start_date=June"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_configuration_body_is_400() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, body) = send(
        &app,
        post_json("/metric-configuration", json!({"is_editable": "yes"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("BAD_REQUEST"));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn record_for_unknown_configuration_is_404() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, _) = send(
        &app,
        post_json(&format!("/metrics/{UNKNOWN_ID}/records"), json!({"parts_flagged": 1})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn record_for_known_configuration_is_201() {
    let env = TestEnv::new();
    let app = build_router(env.state());
    let (_, created) = send(&app, post_json("/metric-configuration", configuration_body())).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        post_json(
            &format!("/metrics/{id}/records"),
            json!({"obsolescence_val": 1.5, "parts_flagged": 2, "alert_type": "info"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(id));
}

fn authenticated_app(env: &TestEnv) -> Router {
    env.write(
        KEYS_YAML,
        "keys:\n  - id: dashboard-1\n    token: s3cret\n    subject: dashboard\n",
    );
    build_router(AppState::new(env.config_with(true)).unwrap())
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let env = TestEnv::new();
    let app = authenticated_app(&env);

    let (status, body) = send(&app, get(&format!("/metrics/{UNKNOWN_ID}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("AUTH_FAILED"));

    let wrong = Request::builder()
        .uri(format!("/metrics/{UNKNOWN_ID}"))
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let good = Request::builder()
        .uri(format!("/metrics/{UNKNOWN_ID}"))
        .header(header::AUTHORIZATION, "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, good).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_stays_open_when_auth_is_enabled() {
    let env = TestEnv::new();
    let app = authenticated_app(&env);

    let (status, _) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn broken_key_file_is_an_opaque_server_error() {
    let env = TestEnv::new();
    env.write(
        KEYS_YAML,
        "keys:\n  - id: admin-key\n    token: shared\n    subject: admin\n  - id: ops-key\n    token: shared\n    subject: ops\n",
    );
    let app = build_router(AppState::new(env.config_with(true)).unwrap());

    let request = Request::builder()
        .uri(format!("/metrics/{UNKNOWN_ID}"))
        .header(header::AUTHORIZATION, "Bearer shared")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "INTERNAL", "message": "internal server error"})
    );
}

#[tokio::test]
async fn negative_day_range_is_400() {
    let env = TestEnv::new();
    let app = build_router(env.state());

    let (status, body) = send(&app, get(&format!("/metrics/{UNKNOWN_ID}?day_range=-1"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("BAD_REQUEST"));
}
