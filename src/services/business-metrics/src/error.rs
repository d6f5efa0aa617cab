//! Error handling for the business metrics service
//!
//! This module defines the error kinds surfaced by the calculation pipeline,
//! the data sources and the export path, together with conversions from the
//! external error types the service touches.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use roi_shared::{ErrorDetail, ErrorResponse};
use thiserror::Error;

/// Result type alias for business metrics operations
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Main error type for the business metrics service
#[derive(Error, Debug)]
pub enum MetricsError {
    /// A required input is missing, non-positive or out of range
    #[error("Missing or invalid field: {field}")]
    MissingOrInvalidField { field: String },

    /// No benchmark exists for the selected industry
    #[error("Unknown industry: {industry}")]
    UnknownIndustry { industry: String },

    /// A competitor baseline value cannot be used as a divisor
    #[error("Invalid benchmark value: {competitor}.{field}")]
    InvalidBenchmarkValue { competitor: String, field: String },

    /// The remote metrics source could not be reached or answered badly
    #[error("Remote fetch failed: {message}")]
    RemoteFetchFailed { message: String },

    /// No calculation has completed yet
    #[error("No snapshot has been computed yet")]
    NoSnapshot,

    /// The in-memory state could not be exported
    #[error("Export failed: {message}")]
    ExportFailed { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Internal service errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MetricsError {
    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MetricsError::MissingOrInvalidField { .. } => StatusCode::BAD_REQUEST,
            MetricsError::UnknownIndustry { .. } => StatusCode::NOT_FOUND,
            MetricsError::InvalidBenchmarkValue { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            MetricsError::RemoteFetchFailed { .. } => StatusCode::BAD_GATEWAY,
            MetricsError::NoSnapshot => StatusCode::NOT_FOUND,
            MetricsError::ExportFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            MetricsError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            MetricsError::Serialization { .. } => StatusCode::BAD_REQUEST,
            MetricsError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            MetricsError::MissingOrInvalidField { .. } => "MISSING_OR_INVALID_FIELD",
            MetricsError::UnknownIndustry { .. } => "UNKNOWN_INDUSTRY",
            MetricsError::InvalidBenchmarkValue { .. } => "INVALID_BENCHMARK_VALUE",
            MetricsError::RemoteFetchFailed { .. } => "REMOTE_FETCH_FAILED",
            MetricsError::NoSnapshot => "NO_SNAPSHOT",
            MetricsError::ExportFailed { .. } => "EXPORT_FAILED",
            MetricsError::Config { .. } => "CONFIG_ERROR",
            MetricsError::Serialization { .. } => "SERIALIZATION_ERROR",
            MetricsError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Only remote fetch failures have an automatic recovery path
    pub fn is_retryable(&self) -> bool {
        matches!(self, MetricsError::RemoteFetchFailed { .. })
    }
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                status: status.as_u16(),
            },
        });

        (status, body).into_response()
    }
}

// Conversion implementations for external error types

impl From<reqwest::Error> for MetricsError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if let Some(status) = err.status() {
            format!("remote returned {}", status)
        } else {
            err.to_string()
        };

        MetricsError::RemoteFetchFailed { message }
    }
}

impl From<serde_json::Error> for MetricsError {
    fn from(err: serde_json::Error) -> Self {
        MetricsError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for MetricsError {
    fn from(err: config::ConfigError) -> Self {
        MetricsError::Config {
            message: err.to_string(),
        }
    }
}

impl From<prometheus::Error> for MetricsError {
    fn from(err: prometheus::Error) -> Self {
        MetricsError::Internal {
            message: format!("metrics registry: {}", err),
        }
    }
}

impl From<validator::ValidationErrors> for MetricsError {
    fn from(err: validator::ValidationErrors) -> Self {
        // Report the first offending field in a stable order
        let mut fields: Vec<&str> = err.field_errors().keys().copied().collect();
        fields.sort_unstable();

        MetricsError::MissingOrInvalidField {
            field: fields.first().copied().unwrap_or("inputs").to_string(),
        }
    }
}

// Utility functions for creating specific error types

impl MetricsError {
    /// Create a missing or invalid field error
    pub fn missing_field<S: Into<String>>(field: S) -> Self {
        Self::MissingOrInvalidField {
            field: field.into(),
        }
    }

    /// Create an unknown industry error
    pub fn unknown_industry<S: Into<String>>(industry: S) -> Self {
        Self::UnknownIndustry {
            industry: industry.into(),
        }
    }

    /// Create an invalid benchmark value error
    pub fn invalid_benchmark<S1: Into<String>, S2: Into<String>>(competitor: S1, field: S2) -> Self {
        Self::InvalidBenchmarkValue {
            competitor: competitor.into(),
            field: field.into(),
        }
    }

    /// Create a remote fetch error
    pub fn remote_fetch<S: Into<String>>(message: S) -> Self {
        Self::RemoteFetchFailed {
            message: message.into(),
        }
    }

    /// Create an export error
    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::ExportFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            MetricsError::missing_field("monthly_requests").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MetricsError::unknown_industry("mining").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MetricsError::remote_fetch("connection refused").status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MetricsError::invalid_benchmark("langchain", "reliability_score").error_code(),
            "INVALID_BENCHMARK_VALUE"
        );
        assert_eq!(MetricsError::export("disk full").error_code(), "EXPORT_FAILED");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(MetricsError::remote_fetch("timeout").is_retryable());
        assert!(!MetricsError::missing_field("current_api_cost").is_retryable());
        assert!(!MetricsError::unknown_industry("mining").is_retryable());
    }

    #[test]
    fn test_error_display() {
        let error = MetricsError::missing_field("downtime_cost_hour");
        assert_eq!(
            error.to_string(),
            "Missing or invalid field: downtime_cost_hour"
        );
    }

    #[test]
    fn test_from_conversions() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json");
        assert!(json_error.is_err());
        let metrics_error: MetricsError = json_error.unwrap_err().into();
        assert!(matches!(metrics_error, MetricsError::Serialization { .. }));
    }
}
