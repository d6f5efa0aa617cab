//! Service wiring
//!
//! Builds the engine, data sources and scheduler from configuration and
//! exposes the operations the HTTP layer and the CLI call.

use chrono::Utc;
use roi_shared::{HealthResponse, MetricSnapshot};
use std::sync::Arc;
use tracing::{info, warn};

use crate::benchmarks::BenchmarkRepository;
use crate::config::MetricsConfig;
use crate::data_source::{RemoteDataSource, ResilientDataSource};
use crate::engine::{CycleOutcome, MetricsEngine};
use crate::error::{MetricsError, Result};
use crate::metrics::EngineMetrics;
use crate::scheduler::RefreshScheduler;
use crate::validation::RawInputParameters;

/// Engine, scheduler and optional calculation recorder
pub struct MetricsService {
    engine: Arc<MetricsEngine>,
    scheduler: RefreshScheduler,
    recorder: Option<Arc<RemoteDataSource>>,
}

impl MetricsService {
    pub fn new(
        engine: Arc<MetricsEngine>,
        scheduler: RefreshScheduler,
        recorder: Option<Arc<RemoteDataSource>>,
    ) -> Self {
        Self {
            engine,
            scheduler,
            recorder,
        }
    }

    pub fn from_config(config: &MetricsConfig) -> Result<Self> {
        info!("Initializing business metrics service");

        let benchmarks = Arc::new(BenchmarkRepository::standard());
        let engine = Arc::new(MetricsEngine::new(
            benchmarks.clone(),
            config,
            EngineMetrics::new()?,
        ));

        let source = Arc::new(ResilientDataSource::from_config(
            &benchmarks,
            &config.remote,
            &config.fallback,
        )?);

        let recorder = if config.remote.enabled && config.remote.record_calculations {
            Some(Arc::new(RemoteDataSource::new(&config.remote)?))
        } else {
            None
        };

        let scheduler = RefreshScheduler::new(engine.clone(), source, &config.scheduler);

        Ok(Self::new(engine, scheduler, recorder))
    }

    pub fn engine(&self) -> &Arc<MetricsEngine> {
        &self.engine
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Calculate from caller inputs; the result is recorded remotely in the
    /// background when a recorder is configured
    pub async fn calculate(&self, raw: &RawInputParameters) -> Result<Arc<MetricSnapshot>> {
        let snapshot = self.engine.calculate(raw).await?;

        if let Some(recorder) = &self.recorder {
            let recorder = recorder.clone();
            let snapshot = snapshot.clone();
            tokio::spawn(async move {
                if let Err(e) = recorder.record_calculation(&snapshot).await {
                    warn!(error = %e, "Could not record ROI calculation");
                }
            });
        }

        Ok(snapshot)
    }

    /// Run one refresh cycle now; its commit queues behind any cycle in flight
    pub async fn refresh(&self) -> Result<Arc<MetricSnapshot>> {
        match self.engine.refresh(self.scheduler.source()).await? {
            CycleOutcome::Committed(snapshot) => Ok(snapshot),
            other => Err(MetricsError::internal(format!(
                "on-demand refresh did not commit: {:?}",
                other
            ))),
        }
    }

    pub async fn health(&self) -> HealthResponse {
        HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ledger_size: self.engine.ledger_len().await,
            scheduler_running: self.scheduler.is_running().await,
        }
    }

    /// Stop background work
    pub async fn shutdown(&self) -> Result<()> {
        self.scheduler.stop().await
    }
}
