//! Integration tests for scheduler cancellation and concurrency
//!
//! A deliberately slow data source keeps a cycle in flight while the
//! scheduler is stopped, so late results can be observed being discarded.
//! Time is paused; the runtime auto-advances through the sleeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tokio::time::{sleep, Instant};

use business_metrics_service::{
    config::{FallbackConfig, SchedulerConfig},
    BenchmarkRepository, CycleOutcome, DataSource, EngineMetrics, MetricsConfig, MetricsEngine,
    RawInputParameters, RefreshData, RefreshScheduler, ResilientDataSource, Result,
    SchedulerState, SyntheticFallbackDataSource,
};

const FETCH_DELAY: Duration = Duration::from_secs(10);

struct SlowSource {
    data: RefreshData,
}

#[async_trait]
impl DataSource for SlowSource {
    fn name(&self) -> &str {
        "slow"
    }

    async fn fetch(&self) -> Result<RefreshData> {
        sleep(FETCH_DELAY).await;
        Ok(self.data.clone())
    }
}

/// Serves inputs that fail validation until switched to valid ones
struct ToggleSource {
    valid: Arc<AtomicBool>,
    inputs: RawInputParameters,
}

#[async_trait]
impl DataSource for ToggleSource {
    fn name(&self) -> &str {
        "toggle"
    }

    async fn fetch(&self) -> Result<RefreshData> {
        let mut inputs = self.inputs.clone();
        if !self.valid.load(Ordering::SeqCst) {
            inputs.monthly_requests = Some(-5.0);
        }
        Ok(RefreshData {
            inputs,
            ..Default::default()
        })
    }
}

fn setup(interval_ms: u64) -> (Arc<MetricsEngine>, RefreshScheduler) {
    let benchmarks = Arc::new(BenchmarkRepository::standard());
    let slow = SlowSource {
        data: RefreshData {
            inputs: RawInputParameters::for_industry(&benchmarks, "data_analytics").unwrap(),
            ..Default::default()
        },
    };
    setup_with(benchmarks, Arc::new(slow), interval_ms)
}

fn setup_with(
    benchmarks: Arc<BenchmarkRepository>,
    primary: Arc<dyn DataSource>,
    interval_ms: u64,
) -> (Arc<MetricsEngine>, RefreshScheduler) {
    let engine = Arc::new(MetricsEngine::new(
        benchmarks.clone(),
        &MetricsConfig::default(),
        EngineMetrics::new().unwrap(),
    ));

    let fallback = SyntheticFallbackDataSource::new(
        &benchmarks,
        &FallbackConfig {
            seed: Some(3),
            ..Default::default()
        },
    )
    .unwrap();
    let source = Arc::new(ResilientDataSource::new(Some(primary), fallback));

    let scheduler = RefreshScheduler::new(
        engine.clone(),
        source,
        &SchedulerConfig {
            interval_ms,
            auto_start: false,
        },
    );

    (engine, scheduler)
}

/// Test that a fetch in flight when the scheduler stops never reaches the ledger
#[tokio::test(start_paused = true)]
async fn test_stop_discards_in_flight_result() {
    let (engine, scheduler) = setup(60_000);
    scheduler.start().await.unwrap();

    let ticker = scheduler.clone();
    let in_flight = tokio::spawn(async move { ticker.tick().await });

    // Let the tick enter the slow fetch
    sleep(Duration::from_secs(1)).await;

    // Returns only once the in-flight cycle has finished
    scheduler.stop().await.unwrap();
    assert_eq!(scheduler.state().await, SchedulerState::Idle);

    let outcome = in_flight.await.unwrap().unwrap();
    assert_eq!(outcome, CycleOutcome::Discarded);
    assert_eq!(engine.ledger_len().await, 0);
    assert!(engine.current_alerts().await.is_empty());
    assert_eq!(engine.metrics().late_results_discarded(), 1);
}

/// Test that a tick arriving while a cycle is in flight is skipped
#[tokio::test(start_paused = true)]
async fn test_overlapping_tick_is_skipped() {
    let (engine, scheduler) = setup(60_000);
    scheduler.start().await.unwrap();

    let ticker = scheduler.clone();
    let first = tokio::spawn(async move { ticker.tick().await });
    sleep(Duration::from_secs(1)).await;

    let second = scheduler.tick().await.unwrap();
    assert_eq!(second, CycleOutcome::Skipped);

    let first = first.await.unwrap().unwrap();
    assert!(matches!(first, CycleOutcome::Committed(_)));
    assert_eq!(engine.ledger_len().await, 1);

    scheduler.stop().await.unwrap();
}

/// Test that an on-demand refresh commits after the scheduled cycle it overlaps
#[tokio::test(start_paused = true)]
async fn test_on_demand_refresh_waits_for_cycle() {
    let (engine, scheduler) = setup(60_000);
    scheduler.start().await.unwrap();

    let ticker = scheduler.clone();
    let scheduled = tokio::spawn(async move { ticker.tick().await });
    sleep(Duration::from_secs(1)).await;

    let on_demand = engine.refresh(scheduler.source()).await.unwrap();
    assert!(matches!(on_demand, CycleOutcome::Committed(_)));

    let scheduled = scheduled.await.unwrap().unwrap();
    assert!(matches!(scheduled, CycleOutcome::Committed(_)));

    // Both committed, the earlier fetch first
    let history = engine.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(Some(&history[0]), scheduled.snapshot());
    assert_eq!(Some(&history[1]), on_demand.snapshot());

    scheduler.stop().await.unwrap();
}

/// Test that a manual calculation is not blocked by a slow fetch
#[tokio::test(start_paused = true)]
async fn test_calculate_during_slow_fetch() {
    let (engine, scheduler) = setup(60_000);

    let refreshing = {
        let engine = engine.clone();
        let source = scheduler.source().clone();
        tokio::spawn(async move { engine.refresh(&source).await })
    };
    sleep(Duration::from_secs(1)).await;
    assert!(!refreshing.is_finished());

    let raw = RawInputParameters::for_industry(engine.benchmarks(), "e_commerce").unwrap();
    let started = Instant::now();
    let manual = engine.calculate(&raw).await.unwrap();
    assert_eq!(started.elapsed(), Duration::ZERO);

    // The fetch is still pending; only the manual snapshot is committed
    assert!(!refreshing.is_finished());
    assert_eq!(engine.ledger_len().await, 1);

    let refreshed = refreshing.await.unwrap().unwrap();
    let history = engine.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, manual.id);
    assert_eq!(Some(&history[1]), refreshed.snapshot());
}

/// Test that failing cycles are recorded without halting the scheduler
#[tokio::test(start_paused = true)]
async fn test_failing_cycles_keep_scheduler_running() {
    let benchmarks = Arc::new(BenchmarkRepository::standard());
    let valid = Arc::new(AtomicBool::new(false));
    let toggle = ToggleSource {
        valid: valid.clone(),
        inputs: RawInputParameters::for_industry(&benchmarks, "content_generation").unwrap(),
    };
    let (engine, scheduler) = setup_with(benchmarks, Arc::new(toggle), 1000);

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(3500)).await;

    let status = scheduler.status().await;
    assert_eq!(status.state, SchedulerState::Running);
    assert_eq!(status.ticks, 3);
    assert!(status.last_error.unwrap().contains("monthly_requests"));
    assert_eq!(engine.ledger_len().await, 0);
    assert_eq!(engine.metrics().cycles_failed(), 3);

    valid.store(true, Ordering::SeqCst);
    sleep(Duration::from_millis(1000)).await;

    let status = scheduler.status().await;
    assert_eq!(status.ticks, 4);
    assert!(status.last_error.is_none());
    assert_eq!(engine.ledger_len().await, 1);
    assert_eq!(
        engine.current_snapshot().await.unwrap().inputs.industry,
        "content_generation"
    );

    scheduler.stop().await.unwrap();
}
