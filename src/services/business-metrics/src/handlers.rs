//! Request handlers for the business metrics service
//!
//! Read accessors for the current snapshot, history, alerts, reports and
//! export, plus the calculation and scheduler control endpoints.

use crate::error::Result;
use crate::service::MetricsService;
use crate::validation::RawInputParameters;
use roi_shared::MetricSnapshot;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

pub mod snapshots_handler {
    use super::*;
    use crate::error::MetricsError;

    /// Latest snapshot
    pub async fn get_snapshot(
        State(service): State<Arc<MetricsService>>,
    ) -> Result<impl IntoResponse> {
        let snapshot = service
            .engine()
            .current_snapshot()
            .await
            .ok_or(MetricsError::NoSnapshot)?;

        Ok(Json(snapshot.as_ref().clone()))
    }

    /// Full history, oldest first
    pub async fn get_history(State(service): State<Arc<MetricsService>>) -> impl IntoResponse {
        let history: Vec<MetricSnapshot> = service
            .engine()
            .history()
            .await
            .iter()
            .map(|snapshot| snapshot.as_ref().clone())
            .collect();

        Json(history)
    }

    pub async fn get_alerts(State(service): State<Arc<MetricsService>>) -> impl IntoResponse {
        Json(service.engine().current_alerts().await)
    }

    /// Calculate from request inputs
    pub async fn calculate(
        State(service): State<Arc<MetricsService>>,
        Json(request): Json<RawInputParameters>,
    ) -> Result<impl IntoResponse> {
        match service.calculate(&request).await {
            Ok(snapshot) => {
                info!("Calculation committed: {}", snapshot.id);
                Ok((StatusCode::CREATED, Json(snapshot.as_ref().clone())))
            }
            Err(e) => {
                error!("Calculation rejected: {}", e);
                Err(e)
            }
        }
    }

    /// Run a refresh cycle now
    pub async fn refresh(
        State(service): State<Arc<MetricsService>>,
    ) -> Result<impl IntoResponse> {
        let snapshot = service.refresh().await?;
        Ok(Json(snapshot.as_ref().clone()))
    }
}

pub mod reports_handler {
    use super::*;

    pub async fn roi_report(
        State(service): State<Arc<MetricsService>>,
    ) -> Result<impl IntoResponse> {
        Ok(Json(service.engine().roi_report().await?))
    }

    pub async fn cfo_report(
        State(service): State<Arc<MetricsService>>,
    ) -> Result<impl IntoResponse> {
        Ok(Json(service.engine().cfo_report().await?))
    }

    /// Download the full in-memory state as JSON
    pub async fn export(State(service): State<Arc<MetricsService>>) -> Result<impl IntoResponse> {
        let body = service.engine().export_json().await?;
        let disposition = format!(
            "attachment; filename=\"business_metrics_{}.json\"",
            chrono::Utc::now().format("%Y-%m-%d")
        );

        Ok((
            [
                (header::CONTENT_TYPE, "application/json".to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        ))
    }
}

pub mod scheduler_handler {
    use super::*;

    pub async fn get_status(State(service): State<Arc<MetricsService>>) -> impl IntoResponse {
        Json(service.scheduler().status().await)
    }

    pub async fn start(State(service): State<Arc<MetricsService>>) -> Result<impl IntoResponse> {
        service.scheduler().start().await?;
        Ok(Json(service.scheduler().status().await))
    }

    pub async fn stop(State(service): State<Arc<MetricsService>>) -> Result<impl IntoResponse> {
        service.scheduler().stop().await?;
        Ok(Json(service.scheduler().status().await))
    }
}

/// Health check handler
pub async fn health_handler(State(service): State<Arc<MetricsService>>) -> impl IntoResponse {
    Json(service.health().await)
}

/// Prometheus metrics handler
pub async fn metrics_handler(
    State(service): State<Arc<MetricsService>>,
) -> Result<impl IntoResponse> {
    let body = service.engine().metrics().export()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
