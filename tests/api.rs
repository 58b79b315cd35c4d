mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use client_exposure::api;
use common::{sample_ledger, service_with, InMemoryLedger};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn app(ledger: Arc<InMemoryLedger>) -> Router {
    api::router(Arc::new(service_with(ledger, Duration::from_secs(60))))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let body = body.map(|json| json.to_string());
    send_raw(app, method, uri, body).await
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(text) => {
            builder = builder.header("content-type", "application/json");
            Body::from(text)
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_check_responds_ok() {
    let app = app(Arc::new(InMemoryLedger::default()));

    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn report_contains_records_and_summary() {
    let app = app(Arc::new(sample_ledger()));

    let uri = "/api/clients/financial?today=2024-01-01";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let report = json(&body);
    let clients = report["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 3);
    assert_eq!(clients[0]["APELIDO"], "Mercado Azul");
    assert_eq!(clients[0]["risk"], "amber");
    assert_eq!(clients[0]["representative_name"], "Carlos");
    assert_eq!(clients[0]["separations"].as_array().unwrap().len(), 1);
    assert_eq!(clients[1]["risk"], "red");
    assert_eq!(clients[2]["risk"], "green");
    assert!(clients[2]["representative_name"].is_null());

    let summary = &report["summary"];
    assert_eq!(summary["clients"], 3);
    assert_eq!(summary["red"], 1);
    assert_eq!(summary["amber"], 1);
    assert_eq!(summary["green"], 1);
}

#[tokio::test]
async fn search_filters_by_alias_case_insensitively() {
    let app = app(Arc::new(sample_ledger()));

    let (status, body) = send(
        &app,
        "GET",
        "/api/clients/financial?today=2024-01-01&search=padaria",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let report = json(&body);
    let clients = report["clients"].as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["client_code"], 2002);
    assert_eq!(report["summary"]["clients"], 1);
}

#[tokio::test]
async fn single_client_lookup_and_not_found() {
    let app = app(Arc::new(sample_ledger()));

    let uri = "/api/clients/2002/financial?today=2024-01-01";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["risk"], "red");

    let (status, body) = send(&app, "GET", "/api/clients/4040/financial", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["status"], 404);

    let (status, _) = send(&app, "GET", "/api/clients/abc/financial", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn export_returns_csv() {
    let app = app(Arc::new(sample_ledger()));

    let uri = "/api/clients/financial/export?today=2024-01-01";
    let (status, body) = send(&app, "GET", uri, None).await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("PES_CODIGO,"));
    assert!(lines[1].starts_with("1001,Mercado Azul,Carlos,"));
}

#[tokio::test]
async fn approving_a_pending_separation_then_rejecting_conflicts() {
    let ledger = Arc::new(sample_ledger());
    let app = app(ledger.clone());

    let (status, body) = send(&app, "POST", "/api/separations/1/approve", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "approved");

    let (status, body) = send(&app, "POST", "/api/separations/1/reject", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json(&body)["status"], 409);

    let (status, _) = send(&app, "POST", "/api/separations/99/approve", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn updating_settings_validates_and_persists() {
    let ledger = Arc::new(sample_ledger());
    let app = app(ledger.clone());

    let (status, _) = send(
        &app,
        "PUT",
        "/api/clients/1001/settings",
        Some(serde_json::json!({"volume_saudavel_faturamento": "-1", "fator_correcao": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/clients/1001/settings",
        Some(serde_json::json!({"volume_saudavel_faturamento": "15000", "fator_correcao": 3})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["fator_correcao"], 3);

    let uri = "/api/clients/1001/financial?today=2024-01-01";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["fator_correcao"], 3);
}

#[tokio::test]
async fn malformed_requests_get_json_validation_errors() {
    let app = app(Arc::new(sample_ledger()));

    let (status, body) = send(&app, "POST", "/api/separations/abc/approve", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["status"], 400);

    let uri = "/api/clients/financial?today=01-01-2024";
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&body)["status"], 400);

    let body = Some("{\"fator_correcao\": ".to_string());
    let (status, body) = send_raw(&app, "PUT", "/api/clients/1001/settings", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json(&body)["error"].as_str().unwrap().starts_with("Validation error"));
}
