// HTTP routes

mod http;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::event_repo::EventRepo;
use crate::models::Service;
use crate::uptime::UptimeCalculator;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) repo: Arc<EventRepo>,
    pub(crate) calculator: Arc<UptimeCalculator>,
    pub(crate) services: Arc<Vec<Service>>,
}

pub fn app(
    repo: Arc<EventRepo>,
    calculator: Arc<UptimeCalculator>,
    services: Arc<Vec<Service>>,
) -> Router {
    let state = AppState {
        repo,
        calculator,
        services,
    };
    Router::new()
        .route("/", get(|| async { "statuswatch: service uptime monitor" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/services", get(http::services_handler)) // GET /api/services
        .route("/api/service-history", get(http::service_history_handler)) // GET /api/service-history
        .route("/api/downtime", get(http::downtime_handler)) // GET /api/downtime
        .route("/api/test-data", get(http::test_data_handler)) // GET /api/test-data
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
