//! Prometheus metrics for the calculation engine
//!
//! Tracks refresh cycle outcomes, fallback substitutions, late results
//! dropped after a scheduler stop, and the state of the history ledger.

use prometheus::{Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};
use roi_shared::DataOrigin;
use std::sync::Arc;
use tracing::info;

use crate::error::{MetricsError, Result};

const NAMESPACE: &str = "business_metrics";

/// Metrics collector for the engine and scheduler
#[derive(Clone)]
pub struct EngineMetrics {
    registry: Arc<Registry>,

    // Counters
    cycles_completed: IntCounterVec,
    cycles_failed: IntCounter,
    fallback_substitutions: IntCounter,
    late_results_discarded: IntCounter,

    // Gauges
    ledger_length: IntGauge,
    last_roi_percentage: Gauge,

    // Histograms
    cycle_duration: Histogram,
}

impl EngineMetrics {
    /// Create a collector with its own registry
    pub fn new() -> Result<Self> {
        info!("Initializing engine metrics");

        let registry = Registry::new();

        let cycles_completed = IntCounterVec::new(
            Opts::new("cycles_completed_total", "Calculation cycles committed to the ledger")
                .namespace(NAMESPACE),
            &["origin"],
        )?;
        let cycles_failed = IntCounter::with_opts(
            Opts::new("cycles_failed_total", "Calculation cycles rejected by validation or the model")
                .namespace(NAMESPACE),
        )?;
        let fallback_substitutions = IntCounter::with_opts(
            Opts::new("fallback_substitutions_total", "Cycles that used synthetic fallback data")
                .namespace(NAMESPACE),
        )?;
        let late_results_discarded = IntCounter::with_opts(
            Opts::new("late_results_discarded_total", "Results dropped because the scheduler stopped mid-cycle")
                .namespace(NAMESPACE),
        )?;
        let ledger_length = IntGauge::with_opts(
            Opts::new("ledger_length", "Snapshots currently held in the history ledger")
                .namespace(NAMESPACE),
        )?;
        let last_roi_percentage = Gauge::with_opts(
            Opts::new("last_roi_percentage", "ROI percentage of the latest snapshot")
                .namespace(NAMESPACE),
        )?;
        let cycle_duration = Histogram::with_opts(
            HistogramOpts::new("cycle_duration_seconds", "Refresh cycle duration in seconds")
                .namespace(NAMESPACE)
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0]),
        )?;

        registry.register(Box::new(cycles_completed.clone()))?;
        registry.register(Box::new(cycles_failed.clone()))?;
        registry.register(Box::new(fallback_substitutions.clone()))?;
        registry.register(Box::new(late_results_discarded.clone()))?;
        registry.register(Box::new(ledger_length.clone()))?;
        registry.register(Box::new(last_roi_percentage.clone()))?;
        registry.register(Box::new(cycle_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            cycles_completed,
            cycles_failed,
            fallback_substitutions,
            late_results_discarded,
            ledger_length,
            last_roi_percentage,
            cycle_duration,
        })
    }

    pub fn record_cycle_completed(&self, origin: DataOrigin, roi_percentage: f64, ledger_len: usize) {
        self.cycles_completed
            .with_label_values(&[&origin.to_string()])
            .inc();
        self.last_roi_percentage.set(roi_percentage);
        self.ledger_length.set(ledger_len as i64);
    }

    pub fn record_cycle_failed(&self) {
        self.cycles_failed.inc();
    }

    pub fn record_fallback(&self) {
        self.fallback_substitutions.inc();
    }

    pub fn record_late_result_discarded(&self) {
        self.late_results_discarded.inc();
    }

    pub fn observe_cycle_duration(&self, seconds: f64) {
        self.cycle_duration.observe(seconds);
    }

    pub fn cycles_completed(&self, origin: DataOrigin) -> u64 {
        self.cycles_completed
            .with_label_values(&[&origin.to_string()])
            .get()
    }

    pub fn cycles_failed(&self) -> u64 {
        self.cycles_failed.get()
    }

    pub fn fallback_substitutions(&self) -> u64 {
        self.fallback_substitutions.get()
    }

    pub fn late_results_discarded(&self) -> u64 {
        self.late_results_discarded.get()
    }

    /// Export all metrics in Prometheus text format
    pub fn export(&self) -> Result<String> {
        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        encoder
            .encode_to_string(&metric_families)
            .map_err(|e| MetricsError::internal(format!("Failed to encode metrics: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_export() {
        let metrics = EngineMetrics::new().unwrap();

        metrics.record_cycle_completed(DataOrigin::Fallback, 633.4, 3);
        metrics.record_fallback();
        metrics.record_cycle_failed();
        metrics.observe_cycle_duration(0.002);

        assert_eq!(metrics.cycles_completed(DataOrigin::Fallback), 1);
        assert_eq!(metrics.cycles_completed(DataOrigin::Remote), 0);
        assert_eq!(metrics.fallback_substitutions(), 1);
        assert_eq!(metrics.cycles_failed(), 1);

        let text = metrics.export().unwrap();
        assert!(text.contains("business_metrics_cycles_completed_total{origin=\"fallback\"} 1"));
        assert!(text.contains("business_metrics_ledger_length 3"));
    }

    #[test]
    fn test_independent_registries() {
        let first = EngineMetrics::new().unwrap();
        let second = EngineMetrics::new().unwrap();

        first.record_late_result_discarded();
        assert_eq!(first.late_results_discarded(), 1);
        assert_eq!(second.late_results_discarded(), 0);
    }
}
