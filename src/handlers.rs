use crate::alerts::{Action, ActionError, Alert, AlertFilter};
use crate::charts::ChartSlot;
use crate::errors::AppError;
use crate::models::{AlertQuery, RecordId};
use crate::state::AppState;
use crate::ui;
use crate::views::freshness::Freshness;
use crate::views::{Clock, Page};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

pub async fn root() -> Redirect {
    Redirect::to(&Page::Main.href())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn alert_filter(query: &AlertQuery) -> Result<AlertFilter, AppError> {
    AlertFilter::parse(
        query.kind.as_deref(),
        query.priority.as_deref(),
        query.status.as_deref(),
    )
    .map_err(|err| AppError::bad_request(err.to_string()))
}

fn period(state: &AppState, page: Page) -> Duration {
    let periods = state.refresh;
    match page {
        Page::Main => periods.main,
        Page::Areas => periods.areas,
        Page::Alerts => periods.alerts,
        Page::Pool => periods.pool,
        Page::Sensors => periods.sensors,
    }
}

/// Serves `/dashboard` and every `/dashboard/<page>` alias.
pub async fn dashboard_page(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<AlertQuery>,
) -> Result<Html<String>, AppError> {
    let page = Page::from_path(uri.path());
    let freshness = state.freshness.current().await;
    let (body, charts) = match page {
        Page::Main => {
            let rendered = state.main.current().await;
            (ui::main_body(&rendered.view), rendered.charts)
        }
        Page::Areas => {
            let rendered = state.areas.current().await;
            (ui::areas_body(&rendered.view), rendered.charts)
        }
        Page::Alerts => {
            let filter = alert_filter(&query)?;
            let rendered = state.alerts.view(&filter, &Clock::system()).await;
            (ui::alerts_body(&rendered.view), rendered.charts)
        }
        Page::Pool => {
            let rendered = state.pool.current().await;
            (ui::pool_body(&rendered.view), rendered.charts)
        }
        Page::Sensors => {
            let rendered = state.sensors.current().await;
            (ui::sensors_body(&rendered.view), rendered.charts)
        }
    };
    Ok(Html(ui::render_page(
        page,
        &freshness,
        period(&state, page),
        &body,
        &charts,
    )))
}

#[derive(Debug, Serialize)]
struct PageEnvelope<V> {
    page: Page,
    title: &'static str,
    freshness: Freshness,
    view: V,
}

fn parse_page(slug: &str) -> Result<Page, AppError> {
    Page::from_slug(slug).ok_or_else(|| AppError::not_found(format!("unknown page: {slug}")))
}

fn envelope<V: Serialize>(page: Page, freshness: Freshness, view: V) -> Response {
    Json(PageEnvelope {
        page,
        title: page.title(),
        freshness,
        view,
    })
    .into_response()
}

pub async fn page_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<AlertQuery>,
) -> Result<Response, AppError> {
    let page = parse_page(&slug)?;
    let freshness = state.freshness.current().await;
    let response = match page {
        Page::Main => envelope(page, freshness, state.main.current().await.view),
        Page::Areas => envelope(page, freshness, state.areas.current().await.view),
        Page::Alerts => {
            let filter = alert_filter(&query)?;
            let rendered = state.alerts.view(&filter, &Clock::system()).await;
            envelope(page, freshness, rendered.view)
        }
        Page::Pool => envelope(page, freshness, state.pool.current().await.view),
        Page::Sensors => envelope(page, freshness, state.sensors.current().await.view),
    };
    Ok(response)
}

pub async fn page_charts(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ChartSlot>>, AppError> {
    let charts = match parse_page(&slug)? {
        Page::Main => state.main.current().await.charts,
        Page::Areas => state.areas.current().await.charts,
        Page::Alerts => {
            state
                .alerts
                .view(&AlertFilter::unrestricted(), &Clock::system())
                .await
                .charts
        }
        Page::Pool => state.pool.current().await.charts,
        Page::Sensors => state.sensors.current().await.charts,
    };
    Ok(Json(charts))
}

pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let filter = alert_filter(&query)?;
    state
        .alerts
        .alerts(&filter)
        .await
        .map(Json)
        .ok_or_else(|| AppError::service_unavailable("no alert snapshot available"))
}

fn parse_action(raw: &str) -> Result<Action, AppError> {
    raw.parse()
        .map_err(|_| AppError::not_found(format!("unknown action: {raw}")))
}

async fn apply_action(state: &AppState, id: String, action: &str) -> Result<Alert, AppError> {
    let action = parse_action(action)?;
    let id = RecordId(id);
    let result = match action {
        Action::Resolve => state.alerts.resolve(&id, Utc::now()).await,
        Action::Ignore => state.alerts.ignore(&id, Utc::now()).await,
    };
    result.map_err(|err| match err {
        ActionError::UnknownAlert(_) => AppError::not_found(err.to_string()),
        ActionError::NotActive(_) => AppError::conflict(err.to_string()),
    })
}

pub async fn alert_action(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Json<Alert>, AppError> {
    let alert = apply_action(&state, id, &action).await?;
    Ok(Json(alert))
}

pub async fn alert_action_form(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> Result<Redirect, AppError> {
    apply_action(&state, id, &action).await?;
    Ok(Redirect::to(&Page::Alerts.href()))
}
