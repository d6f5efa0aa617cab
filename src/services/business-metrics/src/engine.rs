//! Calculation engine
//!
//! Owns the benchmark tables, the history ledger and the current alert list.
//! A refresh cycle runs fetch, validation, both cost models, savings,
//! competitive advantage, impact, alerts and the ledger append strictly in
//! that order. Fetches run concurrently; everything after the fetch is
//! serialized by a single cycle lock so ledger writes never interleave.

use chrono::Utc;
use roi_shared::{
    Alert, BenchmarkEntry, CostMode, DataOrigin, ExportDocument, MetricSnapshot,
    PerformanceSummary,
};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Notify, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::alerts::{generate_alerts, AlertThresholds};
use crate::benchmarks::{apply_performance, BenchmarkRepository};
use crate::competitive::compute_advantages;
use crate::config::{FinancialConfig, MetricsConfig};
use crate::cost_model::compute_costs;
use crate::data_source::ResilientDataSource;
use crate::error::{MetricsError, Result};
use crate::impact::compute_impact;
use crate::ledger::HistoryLedger;
use crate::metrics::EngineMetrics;
use crate::reports::{cfo_report, roi_report, CfoReport, RoiReport};
use crate::savings::compute_savings;
use crate::validation::{validate, RawInputParameters};

/// Result of one refresh cycle
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Snapshot appended to the ledger
    Committed(Arc<MetricSnapshot>),
    /// Computed but dropped because its cycle was cancelled
    Discarded,
    /// Not run because another cycle was in flight or the scheduler is idle
    Skipped,
}

impl CycleOutcome {
    pub fn snapshot(&self) -> Option<&Arc<MetricSnapshot>> {
        match self {
            CycleOutcome::Committed(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// The business metrics calculation engine
pub struct MetricsEngine {
    benchmarks: Arc<BenchmarkRepository>,
    ledger: RwLock<HistoryLedger>,
    alerts: RwLock<Vec<Alert>>,
    cycle_lock: Mutex<()>,
    in_flight: AtomicUsize,
    idle: Notify,
    thresholds: AlertThresholds,
    financial: FinancialConfig,
    metrics: EngineMetrics,
}

/// Marks a refresh cycle as in flight until dropped
struct InFlight<'a> {
    count: &'a AtomicUsize,
    idle: &'a Notify,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

impl MetricsEngine {
    pub fn new(
        benchmarks: Arc<BenchmarkRepository>,
        config: &MetricsConfig,
        metrics: EngineMetrics,
    ) -> Self {
        Self {
            benchmarks,
            ledger: RwLock::new(HistoryLedger::new(config.ledger.capacity)),
            alerts: RwLock::new(Vec::new()),
            cycle_lock: Mutex::new(()),
            in_flight: AtomicUsize::new(0),
            idle: Notify::new(),
            thresholds: AlertThresholds::from(&config.financial),
            financial: config.financial.clone(),
            metrics,
        }
    }

    pub fn benchmarks(&self) -> &Arc<BenchmarkRepository> {
        &self.benchmarks
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Run the calculation pipeline without touching engine state
    pub fn compute(
        &self,
        raw: &RawInputParameters,
        benchmark_overrides: &[BenchmarkEntry],
        performance: Option<&PerformanceSummary>,
        origin: DataOrigin,
    ) -> Result<MetricSnapshot> {
        let inputs = validate(raw)?;

        let benchmark = self
            .benchmarks
            .resolve_benchmark(&inputs.industry, benchmark_overrides);
        let current_costs = compute_costs(&inputs, benchmark.as_ref(), CostMode::Current)?;
        let alternative_costs =
            compute_costs(&inputs, benchmark.as_ref(), CostMode::Alternative)?;

        let savings = compute_savings(&current_costs, &alternative_costs);

        let adopting_profile = match performance {
            Some(perf) => apply_performance(self.benchmarks.adopting_profile(), perf),
            None => self.benchmarks.adopting_profile().clone(),
        };
        let competitive_advantage =
            compute_advantages(&adopting_profile, self.benchmarks.competitors())?;
        let business_impact = compute_impact(&inputs, &savings);

        Ok(MetricSnapshot {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            origin,
            inputs,
            current_costs,
            alternative_costs,
            savings,
            competitive_advantage,
            business_impact,
            adopting_profile,
        })
    }

    /// Calculate from caller-supplied inputs and commit the snapshot
    pub async fn calculate(&self, raw: &RawInputParameters) -> Result<Arc<MetricSnapshot>> {
        let _cycle = self.cycle_lock.lock().await;

        let snapshot = self
            .compute(raw, &[], None, DataOrigin::Manual)
            .map_err(|e| self.cycle_failed(e))?;

        match self.commit(snapshot, || true).await {
            CycleOutcome::Committed(snapshot) => Ok(snapshot),
            _ => Err(MetricsError::internal("manual calculation was not committed")),
        }
    }

    /// Run one refresh cycle; its commit queues behind any cycle already in flight
    pub async fn refresh(&self, source: &ResilientDataSource) -> Result<CycleOutcome> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let _in_flight = self.in_flight_guard();
        self.run_cycle(source, || true).await
    }

    /// Run one refresh cycle unless another is in flight.
    ///
    /// `admit` is checked right before the ledger append; returning false
    /// discards the computed snapshot.
    pub async fn try_refresh<F>(&self, source: &ResilientDataSource, admit: F) -> Result<CycleOutcome>
    where
        F: Fn() -> bool,
    {
        if self
            .in_flight
            .compare_exchange(0, 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Refresh cycle already in flight, skipping");
            return Ok(CycleOutcome::Skipped);
        }
        let _in_flight = self.in_flight_guard();

        self.run_cycle(source, admit).await
    }

    /// Wait until no cycle is in flight
    pub async fn quiesce(&self) {
        loop {
            let idle = self.idle.notified();
            tokio::pin!(idle);
            idle.as_mut().enable();

            if self.in_flight.load(Ordering::SeqCst) == 0 {
                break;
            }
            idle.await;
        }

        // A manual calculation may still hold the lock
        let _cycle = self.cycle_lock.lock().await;
    }

    fn in_flight_guard(&self) -> InFlight<'_> {
        InFlight {
            count: &self.in_flight,
            idle: &self.idle,
        }
    }

    async fn run_cycle<F>(&self, source: &ResilientDataSource, admit: F) -> Result<CycleOutcome>
    where
        F: Fn() -> bool,
    {
        let started = Instant::now();
        let outcome = source.fetch().await;

        if outcome.origin == DataOrigin::Fallback {
            self.metrics.record_fallback();
        }

        if !admit() {
            return Ok(self.discard());
        }

        let data = outcome.data;
        let _cycle = self.cycle_lock.lock().await;
        let snapshot = self
            .compute(
                &data.inputs,
                &data.benchmark_overrides,
                data.performance.as_ref(),
                outcome.origin,
            )
            .map_err(|e| self.cycle_failed(e))?;

        let committed = self.commit(snapshot, admit).await;
        self.metrics
            .observe_cycle_duration(started.elapsed().as_secs_f64());

        Ok(committed)
    }

    /// Generate alerts and append to the ledger. Callers hold the cycle lock.
    async fn commit<F>(&self, snapshot: MetricSnapshot, admit: F) -> CycleOutcome
    where
        F: FnOnce() -> bool,
    {
        let new_alerts = generate_alerts(&snapshot, &self.thresholds, Utc::now());

        let mut ledger = self.ledger.write().await;
        let mut alerts = self.alerts.write().await;

        if !admit() {
            return self.discard();
        }

        let snapshot = Arc::new(snapshot);
        if let Some(evicted) = ledger.append(snapshot.clone()) {
            debug!(evicted_id = %evicted.id, "Evicted oldest snapshot from ledger");
        }
        *alerts = new_alerts;

        self.metrics.record_cycle_completed(
            snapshot.origin,
            snapshot.savings.roi_percentage,
            ledger.len(),
        );

        info!(
            snapshot_id = %snapshot.id,
            origin = %snapshot.origin,
            industry = %snapshot.inputs.industry,
            roi_percentage = snapshot.savings.roi_percentage,
            ledger_size = ledger.len(),
            "Snapshot committed"
        );

        CycleOutcome::Committed(snapshot)
    }

    fn discard(&self) -> CycleOutcome {
        info!("Cycle cancelled, discarding late result");
        self.metrics.record_late_result_discarded();
        CycleOutcome::Discarded
    }

    fn cycle_failed(&self, error: MetricsError) -> MetricsError {
        warn!(error = %error, code = error.error_code(), "Calculation cycle rejected");
        self.metrics.record_cycle_failed();
        error
    }

    // Read accessors

    pub async fn current_snapshot(&self) -> Option<Arc<MetricSnapshot>> {
        self.ledger.read().await.latest()
    }

    /// Full history, oldest first
    pub async fn history(&self) -> Vec<Arc<MetricSnapshot>> {
        self.ledger.read().await.all()
    }

    pub async fn current_alerts(&self) -> Vec<Alert> {
        self.alerts.read().await.clone()
    }

    pub async fn ledger_len(&self) -> usize {
        self.ledger.read().await.len()
    }

    // Reports

    pub async fn roi_report(&self) -> Result<RoiReport> {
        let snapshot = self.current_snapshot().await.ok_or(MetricsError::NoSnapshot)?;
        let description = self
            .benchmarks
            .scenario_description(&snapshot.inputs.industry);
        Ok(roi_report(&snapshot, description, &self.thresholds, Utc::now()))
    }

    pub async fn cfo_report(&self) -> Result<CfoReport> {
        let snapshot = self.current_snapshot().await.ok_or(MetricsError::NoSnapshot)?;
        Ok(cfo_report(&snapshot, &self.financial, Utc::now()))
    }

    // Export

    pub async fn export_document(&self) -> ExportDocument {
        let history = self
            .history()
            .await
            .iter()
            .map(|snapshot| snapshot.as_ref().clone())
            .collect();

        ExportDocument::from_history(history, Utc::now())
    }

    /// Serialize the full in-memory state as pretty JSON
    pub async fn export_json(&self) -> Result<String> {
        let document = self.export_document().await;
        serde_json::to_string_pretty(&document)
            .map_err(|e| MetricsError::export(format!("Failed to serialize export: {}", e)))
    }

    /// Write the export document to a file
    pub async fn export_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.export_json().await?;

        tokio::fs::write(path, json).await.map_err(|e| {
            MetricsError::export(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!(path = %path.display(), "Exported business metrics");
        Ok(())
    }
}
