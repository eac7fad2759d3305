mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use ceu_dashboard::config::RefreshPeriods;
use ceu_dashboard::{ApiClient, AppState, router};
use common::MockBackend;
use serde_json::Value;
use tower::ServiceExt;

async fn app(backend: &MockBackend) -> Router {
    let state = AppState::new(ApiClient::new(backend.api_base()), RefreshPeriods::default());
    state.refresh_once().await;
    router(state)
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(app, Method::GET, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_is_ok() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn page_view_wraps_the_view_in_an_envelope() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = get_json(&app, "/api/views/areas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "areas");
    assert_eq!(body["title"], "Áreas");
    assert!(body["freshness"]["text"]
        .as_str()
        .unwrap()
        .starts_with("Última Leitura:"));

    let board = &body["view"]["areas"]["data"];
    assert_eq!(board["summary"]["total_areas"], 2);
    assert_eq!(board["rows"][0]["name"], "Piscina");
    assert_eq!(board["notices"]["kind"], "items");
}

#[tokio::test]
async fn page_charts_list_canvases() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = get_json(&app, "/api/charts/piscina").await;
    assert_eq!(status, StatusCode::OK);
    let canvases: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|slot| slot["canvas"].as_str().unwrap())
        .collect();
    assert_eq!(canvases, ["poolOccupationChart", "waterQualityChart"]);
}

#[tokio::test]
async fn unknown_page_is_not_found() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, _) = send(&app, Method::GET, "/api/views/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/api/charts/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/dashboard/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_filter_value_is_rejected() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = send(&app, Method::GET, "/api/alerts?priority=urgent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("urgent"));

    let (status, _) = send(&app, Method::GET, "/dashboard/alertas?type=flood").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn alert_list_is_filtered_and_ordered() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = get_json(&app, "/api/alerts?status=all").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|alert| alert["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["1", "2", "3"]);

    let (_, body) = get_json(&app, "/api/alerts?type=maintenance").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], "2");
}

#[tokio::test]
async fn alert_actions_follow_the_lifecycle() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = send(&app, Method::POST, "/api/alerts/3/ignore").await;
    assert_eq!(status, StatusCode::OK);
    let alert: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(alert["status"], "ignored");
    assert!(alert["resolved_at"].is_null());

    let (status, _) = send(&app, Method::POST, "/api/alerts/3/resolve").await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, Method::POST, "/api/alerts/42/resolve").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::POST, "/api/alerts/1/archive").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get_json(&app, "/api/alerts?status=ignored").await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn form_action_redirects_back_to_the_alert_page() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/dashboard/alertas/1/resolve")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/dashboard/alertas");
}

#[tokio::test]
async fn alert_list_without_snapshot_is_unavailable() {
    let backend = MockBackend::empty().await;
    let app = app(&backend).await;

    let (status, _) = send(&app, Method::GET, "/api/alerts").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let (status, _) = send(&app, Method::POST, "/api/alerts/1/resolve").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn html_alias_serves_the_same_page() {
    let backend = MockBackend::start().await;
    let app = app(&backend).await;

    let (status, body) = send(&app, Method::GET, "/dashboard/resumo-sensores.html").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<title>Resumo de Sensores"));
    assert!(html.contains("sensorsDistributionChart"));
}
