//! Refresh data sources
//!
//! A refresh cycle needs raw inputs, optional benchmark overrides and
//! optional live performance figures. [`RemoteDataSource`] fetches them over
//! HTTP; [`SyntheticFallbackDataSource`] generates representative values
//! locally. [`ResilientDataSource`] tries the remote source first and
//! substitutes synthetic data on any failure, so callers never see a fetch
//! error. Inputs the remote payload leaves out are filled from the default
//! scenario of its industry.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use roi_shared::{BenchmarkEntry, DataOrigin, MetricSnapshot, PerformanceSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::benchmarks::BenchmarkRepository;
use crate::config::{FallbackConfig, RemoteConfig};
use crate::error::{MetricsError, Result};
use crate::validation::RawInputParameters;

pub const BUSINESS_IMPACT_PATH: &str = "/api/metrics/business-impact";
pub const ROI_CALCULATION_PATH: &str = "/api/analytics/roi-calculation";

/// Typical live figures of the adopting product
const BASELINE_RELIABILITY: f64 = 0.972;
const BASELINE_LATENCY_MS: f64 = 185.0;
const MAX_SYNTHETIC_RELIABILITY: f64 = 0.99;

/// Everything one refresh cycle consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshData {
    pub inputs: RawInputParameters,
    /// Replace the static benchmark of matching industries for this cycle
    pub benchmark_overrides: Vec<BenchmarkEntry>,
    pub performance: Option<PerformanceSummary>,
}

/// Source of refresh data
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<RefreshData>;
}

/// HTTP client for the remote metrics backend
#[derive(Debug, Clone)]
pub struct RemoteDataSource {
    client: Client,
    base_url: String,
}

impl RemoteDataSource {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("business-metrics/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MetricsError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a computed snapshot to the analytics endpoint
    pub async fn record_calculation(&self, snapshot: &MetricSnapshot) -> Result<()> {
        let payload = json!({
            "scenario": snapshot.inputs.industry,
            "results": snapshot,
            "timestamp": Utc::now(),
        });

        self.client
            .post(self.url(ROI_CALCULATION_PATH))
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        debug!(snapshot_id = %snapshot.id, "Recorded ROI calculation");
        Ok(())
    }
}

#[async_trait]
impl DataSource for RemoteDataSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch(&self) -> Result<RefreshData> {
        let response = self
            .client
            .get(self.url(BUSINESS_IMPACT_PATH))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<RefreshData>().await?)
    }
}

/// Locally generated representative data with a small random jitter
pub struct SyntheticFallbackDataSource {
    base: RawInputParameters,
    scenarios: HashMap<String, RawInputParameters>,
    variation: f64,
    rng: Mutex<StdRng>,
}

impl SyntheticFallbackDataSource {
    pub fn new(benchmarks: &BenchmarkRepository, config: &FallbackConfig) -> Result<Self> {
        let base = RawInputParameters::for_industry(benchmarks, &config.industry)
            .ok_or_else(|| MetricsError::unknown_industry(&config.industry))?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let scenarios = benchmarks
            .industries()
            .filter_map(|industry| {
                RawInputParameters::for_industry(benchmarks, industry)
                    .map(|inputs| (industry.to_string(), inputs))
            })
            .collect();

        Ok(Self {
            base,
            scenarios,
            variation: config.variation.clamp(0.0, 0.99),
            rng: Mutex::new(rng),
        })
    }

    /// Default scenario inputs of `industry`, or the configured base scenario
    pub fn scenario_inputs(&self, industry: Option<&str>) -> &RawInputParameters {
        industry
            .and_then(|industry| self.scenarios.get(industry))
            .unwrap_or(&self.base)
    }

    /// Generate one set of refresh data; never fails
    pub fn generate(&self) -> RefreshData {
        let mut rng = self.rng.lock();
        let mut jitter = || {
            if self.variation > 0.0 {
                1.0 + rng.gen_range(-self.variation..=self.variation)
            } else {
                1.0
            }
        };

        let mut inputs = self.base.clone();
        inputs.monthly_requests = inputs.monthly_requests.map(|v| (v * jitter()).round());
        inputs.current_failure_rate = inputs
            .current_failure_rate
            .map(|v| (v * jitter()).min(100.0));

        let performance = PerformanceSummary {
            reliability_score: Some((BASELINE_RELIABILITY * jitter()).min(MAX_SYNTHETIC_RELIABILITY)),
            avg_latency_ms: Some(BASELINE_LATENCY_MS * jitter()),
        };

        RefreshData {
            inputs,
            benchmark_overrides: Vec::new(),
            performance: Some(performance),
        }
    }
}

#[async_trait]
impl DataSource for SyntheticFallbackDataSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn fetch(&self) -> Result<RefreshData> {
        Ok(self.generate())
    }
}

/// Refresh data together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub data: RefreshData,
    pub origin: DataOrigin,
}

/// Primary source with synthetic fallback
pub struct ResilientDataSource {
    primary: Option<Arc<dyn DataSource>>,
    fallback: SyntheticFallbackDataSource,
}

impl ResilientDataSource {
    pub fn new(primary: Option<Arc<dyn DataSource>>, fallback: SyntheticFallbackDataSource) -> Self {
        Self { primary, fallback }
    }

    /// Remote source when enabled, synthetic fallback always
    pub fn from_config(
        benchmarks: &BenchmarkRepository,
        remote: &RemoteConfig,
        fallback: &FallbackConfig,
    ) -> Result<Self> {
        let primary: Option<Arc<dyn DataSource>> = if remote.enabled {
            let source = RemoteDataSource::new(remote)?;
            info!(base_url = %source.base_url(), "Remote metrics source enabled");
            Some(Arc::new(source))
        } else {
            info!("Remote metrics source disabled, using synthetic data only");
            None
        };

        Ok(Self::new(
            primary,
            SyntheticFallbackDataSource::new(benchmarks, fallback)?,
        ))
    }

    /// Fetch from the primary source, falling back to synthetic data
    pub async fn fetch(&self) -> FetchOutcome {
        if let Some(primary) = &self.primary {
            match primary.fetch().await {
                Ok(mut data) => {
                    let defaults = self
                        .fallback
                        .scenario_inputs(data.inputs.industry.as_deref());
                    data.inputs = data.inputs.with_defaults_from(defaults);

                    return FetchOutcome {
                        data,
                        origin: DataOrigin::Remote,
                    };
                }
                Err(e) => {
                    warn!(
                        source = primary.name(),
                        error = %e,
                        "Fetch failed, substituting synthetic fallback data"
                    );
                }
            }
        }

        FetchOutcome {
            data: self.fallback.generate(),
            origin: DataOrigin::Fallback,
        }
    }
}
