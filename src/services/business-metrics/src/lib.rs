//! # Business Metrics Service
//!
//! Business impact and ROI calculation engine for the Adaptive Mind platform
//! providing:
//! - Input validation with documented defaults
//! - Current vs. alternative cost models per industry benchmark
//! - Savings, ROI, payback and NPV figures
//! - Competitive advantage against competing frameworks
//! - Business impact estimates and alert generation
//! - A bounded history of computed snapshots with JSON export
//! - Periodic refresh from a remote metrics source with synthetic fallback
//!
//! ## Usage
//!
//! ```rust,no_run
//! use business_metrics_service::{MetricsConfig, MetricsService, RawInputParameters};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MetricsConfig::default();
//!     let service = MetricsService::from_config(&config)?;
//!
//!     let inputs = RawInputParameters {
//!         monthly_requests: Some(150_000.0),
//!         current_api_cost: Some(0.025),
//!         downtime_cost_hour: Some(15_000.0),
//!         ..Default::default()
//!     };
//!
//!     let snapshot = service.calculate(&inputs).await?;
//!     println!("ROI: {:.1}%", snapshot.savings.roi_percentage);
//!
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod benchmarks;
pub mod competitive;
pub mod config;
pub mod cost_model;
pub mod data_source;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod impact;
pub mod ledger;
pub mod metrics;
pub mod reports;
pub mod routes;
pub mod savings;
pub mod scheduler;
pub mod service;
pub mod validation;

pub use benchmarks::BenchmarkRepository;
pub use config::MetricsConfig;
pub use data_source::{
    DataSource, RefreshData, RemoteDataSource, ResilientDataSource, SyntheticFallbackDataSource,
};
pub use engine::{CycleOutcome, MetricsEngine};
pub use error::{MetricsError, Result};
pub use metrics::EngineMetrics;
pub use scheduler::{RefreshScheduler, SchedulerState, SchedulerStatus};
pub use service::MetricsService;
pub use validation::RawInputParameters;
