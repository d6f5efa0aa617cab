//! Refresh scheduler
//!
//! Two-state machine (`Idle`, `Running`) driving periodic refresh cycles.
//! `start` spawns one interval loop, `stop` cancels it and waits until no
//! cycle is in flight. Every start/stop pair bumps a generation counter; a
//! cycle only commits if the generation it started under is still current,
//! so results arriving after `stop` are discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::config::SchedulerConfig;
use crate::data_source::ResilientDataSource;
use crate::engine::{CycleOutcome, MetricsEngine};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Idle,
    Running,
}

/// Point-in-time view of the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub state: SchedulerState,
    pub interval_ms: u64,
    pub ticks: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct TickStats {
    last_tick_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Periodic refresh driver for a [`MetricsEngine`]
#[derive(Clone)]
pub struct RefreshScheduler {
    engine: Arc<MetricsEngine>,
    source: Arc<ResilientDataSource>,
    interval: Duration,
    state: Arc<RwLock<SchedulerState>>,
    generation: Arc<AtomicU64>,
    ticks: Arc<AtomicU64>,
    stats: Arc<RwLock<TickStats>>,
    task_handles: Arc<RwLock<Vec<tokio::task::JoinHandle<()>>>>,
    shutdown_tx: Arc<RwLock<Option<mpsc::Sender<()>>>>,
}

impl RefreshScheduler {
    pub fn new(
        engine: Arc<MetricsEngine>,
        source: Arc<ResilientDataSource>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            engine,
            source,
            interval: config.interval(),
            state: Arc::new(RwLock::new(SchedulerState::Idle)),
            generation: Arc::new(AtomicU64::new(0)),
            ticks: Arc::new(AtomicU64::new(0)),
            stats: Arc::new(RwLock::new(TickStats::default())),
            task_handles: Arc::new(RwLock::new(Vec::new())),
            shutdown_tx: Arc::new(RwLock::new(None)),
        }
    }

    pub fn source(&self) -> &Arc<ResilientDataSource> {
        &self.source
    }

    pub async fn state(&self) -> SchedulerState {
        *self.state.read().await
    }

    pub async fn is_running(&self) -> bool {
        self.state().await == SchedulerState::Running
    }

    /// Idle -> Running. A no-op when already running.
    pub async fn start(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state == SchedulerState::Running {
            debug!("Refresh scheduler already running");
            return Ok(());
        }

        info!(interval_ms = self.interval.as_millis() as u64, "Starting refresh scheduler");

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        *self.shutdown_tx.write().await = Some(shutdown_tx);

        let generation = self.generation.load(Ordering::SeqCst);
        let refresh_task = self.start_refresh_task(shutdown_rx, generation);
        self.task_handles.write().await.push(refresh_task);

        *state = SchedulerState::Running;
        info!("Refresh scheduler started");

        Ok(())
    }

    /// Running -> Idle. When this returns no further ledger append can
    /// originate from this scheduler, including a fetch that was in flight.
    pub async fn stop(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if *state == SchedulerState::Idle {
            return Ok(());
        }

        info!("Stopping refresh scheduler");

        // Invalidate in-flight cycles before anything else
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(tx) = self.shutdown_tx.write().await.take() {
            let _ = tx.try_send(());
        }

        let mut handles = self.task_handles.write().await;
        for handle in handles.drain(..) {
            handle.abort();
        }
        drop(handles);

        self.engine.quiesce().await;

        *state = SchedulerState::Idle;
        info!("Refresh scheduler stopped");

        Ok(())
    }

    /// Run one refresh cycle now, as the interval loop would.
    ///
    /// Returns `Skipped` while idle or when another cycle is in flight.
    pub async fn tick(&self) -> Result<CycleOutcome> {
        if !self.is_running().await {
            debug!("Tick ignored while scheduler is idle");
            return Ok(CycleOutcome::Skipped);
        }

        self.run_tick(self.generation.load(Ordering::SeqCst)).await
    }

    pub async fn status(&self) -> SchedulerStatus {
        let stats = self.stats.read().await;
        SchedulerStatus {
            state: self.state().await,
            interval_ms: self.interval.as_millis() as u64,
            ticks: self.ticks.load(Ordering::SeqCst),
            last_tick_at: stats.last_tick_at,
            last_error: stats.last_error.clone(),
        }
    }

    fn start_refresh_task(
        &self,
        mut shutdown_rx: mpsc::Receiver<()>,
        generation: u64,
    ) -> tokio::task::JoinHandle<()> {
        let scheduler = self.clone();
        let period = self.interval;

        tokio::spawn(async move {
            // First tick one full period after start
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        // Errors are recorded; the next tick is always attempted
                        let _ = scheduler.run_tick(generation).await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Refresh task shutting down");
                        break;
                    }
                }
            }
        })
    }

    async fn run_tick(&self, generation: u64) -> Result<CycleOutcome> {
        let current = self.generation.clone();
        if current.load(Ordering::SeqCst) != generation {
            return Ok(CycleOutcome::Skipped);
        }

        self.ticks.fetch_add(1, Ordering::SeqCst);
        let result = self
            .engine
            .try_refresh(&self.source, move || {
                current.load(Ordering::SeqCst) == generation
            })
            .await;

        let mut stats = self.stats.write().await;
        stats.last_tick_at = Some(Utc::now());
        match &result {
            Ok(outcome) => {
                stats.last_error = None;
                debug!(outcome = outcome_label(outcome), "Refresh tick finished");
            }
            Err(e) => {
                error!(error = %e, "Refresh tick failed");
                stats.last_error = Some(e.to_string());
            }
        }

        result
    }
}

fn outcome_label(outcome: &CycleOutcome) -> &'static str {
    match outcome {
        CycleOutcome::Committed(_) => "committed",
        CycleOutcome::Discarded => "discarded",
        CycleOutcome::Skipped => "skipped",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::BenchmarkRepository;
    use crate::config::{FallbackConfig, MetricsConfig};
    use crate::data_source::SyntheticFallbackDataSource;
    use crate::metrics::EngineMetrics;

    fn scheduler(interval_ms: u64) -> (RefreshScheduler, Arc<MetricsEngine>) {
        let benchmarks = Arc::new(BenchmarkRepository::standard());
        let engine = Arc::new(MetricsEngine::new(
            benchmarks.clone(),
            &MetricsConfig::default(),
            EngineMetrics::new().unwrap(),
        ));
        let fallback = FallbackConfig {
            seed: Some(5),
            ..Default::default()
        };
        let source = Arc::new(ResilientDataSource::new(
            None,
            SyntheticFallbackDataSource::new(&benchmarks, &fallback).unwrap(),
        ));
        let config = SchedulerConfig {
            interval_ms,
            auto_start: false,
        };

        (
            RefreshScheduler::new(engine.clone(), source, &config),
            engine,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_then_stop_before_first_tick() {
        let (scheduler, engine) = scheduler(5000);

        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        scheduler.stop().await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(engine.ledger_len().await, 0);
        assert_eq!(scheduler.state().await, SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_append_at_interval() {
        let (scheduler, engine) = scheduler(5000);

        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(15_500)).await;
        scheduler.stop().await.unwrap();

        assert_eq!(engine.ledger_len().await, 3);
        assert_eq!(scheduler.status().await.ticks, 3);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(engine.ledger_len().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let (scheduler, _engine) = scheduler(5000);

        scheduler.start().await.unwrap();
        scheduler.start().await.unwrap();
        assert_eq!(scheduler.task_handles.read().await.len(), 1);

        scheduler.stop().await.unwrap();
        assert!(scheduler.task_handles.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_tick_while_idle_is_skipped() {
        let (scheduler, engine) = scheduler(5000);

        let outcome = scheduler.tick().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Skipped);
        assert_eq!(engine.ledger_len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_tick_while_running() {
        let (scheduler, engine) = scheduler(60_000);

        scheduler.start().await.unwrap();
        let outcome = scheduler.tick().await.unwrap();
        assert!(outcome.snapshot().is_some());
        assert_eq!(engine.ledger_len().await, 1);

        scheduler.stop().await.unwrap();
        let status = scheduler.status().await;
        assert_eq!(status.state, SchedulerState::Idle);
        assert_eq!(status.interval_ms, 60_000);
        assert!(status.last_tick_at.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let (scheduler, engine) = scheduler(1000);

        scheduler.start().await.unwrap();
        scheduler.stop().await.unwrap();
        scheduler.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.stop().await.unwrap();

        assert_eq!(engine.ledger_len().await, 1);
    }
}
