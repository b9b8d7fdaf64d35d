// GET handlers: version, service status, uptime report, downtime history, seed data

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::models::ServiceStatus;
use crate::seed;
use crate::uptime::{Window, WindowLabel, filter_by_region, merge_intervals};
use crate::version::{NAME, VERSION};

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct RegionParams {
    region: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceStatusView {
    name: String,
    url: String,
    region: String,
    location: String,
    /// None when the service has no recorded transitions yet.
    status: Option<ServiceStatus>,
    last_change: Option<i64>,
}

/// GET /api/services?region= — configured services with their latest known status.
pub(super) async fn services_handler(
    State(state): State<AppState>,
    Query(params): Query<RegionParams>,
) -> impl IntoResponse {
    let mut services = Vec::new();
    for service in filter_by_region(&state.services, params.region.as_deref()) {
        let latest = match state.repo.latest_event(&service.name).await {
            Ok(latest) => latest,
            Err(e) => {
                tracing::warn!(service = %service.name, error = %e, "latest status query failed");
                return internal_error("Failed to fetch service status.");
            }
        };
        services.push(ServiceStatusView {
            name: service.name.clone(),
            url: service.url.clone(),
            region: service.region.clone(),
            location: service.location.clone(),
            status: latest.as_ref().map(|e| e.status),
            last_change: latest.as_ref().map(|e| e.timestamp),
        });
    }
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({ "services": services })),
    )
}

/// GET /api/service-history?region= — per-service and overall uptime
/// percentages for the standard trailing windows, anchored at request time.
pub(super) async fn service_history_handler(
    State(state): State<AppState>,
    Query(params): Query<RegionParams>,
) -> impl IntoResponse {
    let report = state
        .calculator
        .report(&state.services, params.region.as_deref(), Utc::now())
        .await;
    axum::Json(report)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DowntimeParams {
    location: String,
    /// YYYY-MM-DD; defaults to twelve calendar months before today.
    start_date: Option<String>,
    /// YYYY-MM-DD, inclusive; defaults to today.
    end_date: Option<String>,
}

/// GET /api/downtime?location=&startDate=&endDate= — merged downtime
/// intervals for one location, chronological.
pub(super) async fn downtime_handler(
    State(state): State<AppState>,
    Query(params): Query<DowntimeParams>,
) -> impl IntoResponse {
    let now = Utc::now();
    let from = match &params.start_date {
        Some(s) => match parse_day_start(s) {
            Some(ms) => ms,
            None => return bad_request("invalid startDate"),
        },
        // Same window rule as the statistics view.
        None => Window::trailing(WindowLabel::TwelveMonth, now).start,
    };
    let to = match &params.end_date {
        Some(s) => match parse_day_end(s) {
            Some(ms) => ms,
            None => return bad_request("invalid endDate"),
        },
        None => now.timestamp_millis(),
    };

    match state.repo.downtime_intervals(&params.location, from, to).await {
        Ok(raw) => {
            let history = merge_intervals(raw);
            (
                StatusCode::OK,
                axum::Json(serde_json::json!({ "history": history })),
            )
        }
        Err(e) => {
            tracing::warn!(location = %params.location, error = %e, "downtime query failed");
            internal_error("Failed to fetch downtime history.")
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TestDataParams {
    mode: String,
}

/// GET /api/test-data?mode=inject|delete|clear|check — seed-event lifecycle
/// for exercising the aggregation without a prober.
pub(super) async fn test_data_handler(
    State(state): State<AppState>,
    Query(params): Query<TestDataParams>,
) -> impl IntoResponse {
    let result = match params.mode.as_str() {
        "inject" => {
            let events = seed::seed_events(&state.services, Utc::now());
            state
                .repo
                .insert_events(&events, true)
                .await
                .map(|_| serde_json::json!({ "message": "Test data injected successfully." }))
        }
        "delete" => state
            .repo
            .delete_seeded()
            .await
            .map(|n| serde_json::json!({ "message": "Test data deleted.", "deleted": n })),
        "clear" => state
            .repo
            .clear_all()
            .await
            .map(|n| serde_json::json!({ "message": "All events deleted.", "deleted": n })),
        "check" => state
            .repo
            .has_seeded()
            .await
            .map(|active| serde_json::json!({ "testMode": active })),
        _ => return bad_request("Invalid mode"),
    };

    match result {
        Ok(body) => (StatusCode::OK, axum::Json(body)),
        Err(e) => {
            tracing::warn!(mode = %params.mode, error = %e, "test-data operation failed");
            internal_error("Test data operation failed.")
        }
    }
}

fn parse_day_start(s: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let dt = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&dt).timestamp_millis())
}

fn parse_day_end(s: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    let dt = date.and_hms_milli_opt(23, 59, 59, 999)?;
    Some(Utc.from_utc_datetime(&dt).timestamp_millis())
}

fn internal_error(msg: &str) -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(serde_json::json!({ "error": msg })),
    )
}

fn bad_request(msg: &str) -> (StatusCode, axum::Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(serde_json::json!({ "error": msg })),
    )
}
