//! Routes module for the business metrics service
//!
//! Health and Prometheus endpoints plus the `/api/v1` read and control API.

use crate::handlers::{
    health_handler, metrics_handler, reports_handler, scheduler_handler, snapshots_handler,
};
use crate::service::MetricsService;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

/// Build the main router for the business metrics service
pub fn create_router(service: Arc<MetricsService>, request_timeout: Duration) -> Router {
    let api_router = create_api_router(Arc::clone(&service));
    let health_router = create_health_router(service);

    Router::new()
        .merge(api_router)
        .merge(health_router)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(request_timeout))
                .into_inner(),
        )
}

fn create_api_router(service: Arc<MetricsService>) -> Router {
    Router::new()
        // Computed state
        .route("/api/v1/snapshot", get(snapshots_handler::get_snapshot))
        .route("/api/v1/history", get(snapshots_handler::get_history))
        .route("/api/v1/alerts", get(snapshots_handler::get_alerts))
        .route("/api/v1/calculate", post(snapshots_handler::calculate))
        .route("/api/v1/refresh", post(snapshots_handler::refresh))
        // Reports and export
        .route("/api/v1/reports/roi", get(reports_handler::roi_report))
        .route("/api/v1/reports/cfo", get(reports_handler::cfo_report))
        .route("/api/v1/export", get(reports_handler::export))
        // Scheduler control
        .route("/api/v1/scheduler", get(scheduler_handler::get_status))
        .route("/api/v1/scheduler/start", post(scheduler_handler::start))
        .route("/api/v1/scheduler/stop", post(scheduler_handler::stop))
        .with_state(service)
}

fn create_health_router(service: Arc<MetricsService>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(service)
}
