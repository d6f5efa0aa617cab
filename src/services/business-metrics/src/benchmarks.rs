//! Benchmark repository
//!
//! Static industry and competitor reference tables. The repository is built
//! once and shared read-only; per-cycle adjustments (remote benchmark
//! overrides, live performance figures) produce new values instead of
//! mutating the tables.

use roi_shared::{BenchmarkEntry, CompetitorProfile, PerformanceSummary};
use std::collections::BTreeMap;

use crate::error::{MetricsError, Result};

/// Key of the adopting product in the competitor table
pub const ADOPTING_PRODUCT: &str = "adaptive_mind";

/// Monthly request volume assumed for industries without a default
pub const DEFAULT_MONTHLY_REQUESTS: f64 = 100_000.0;

const CUSTOM_SCENARIO_DESCRIPTION: &str = "Custom enterprise scenario";

/// Reliability never reported above this
const MAX_RELIABILITY_SCORE: f64 = 0.99;
/// Failure rate floor of the adopting product
const MIN_FAILURE_RATE: f64 = 0.008;
/// Latency (ms) at which the performance multiplier equals 1
const REFERENCE_LATENCY_MS: f64 = 3000.0;
const MAX_PERFORMANCE_MULTIPLIER: f64 = 25.0;

/// One industry scenario: benchmark figures plus presentation defaults
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryScenario {
    pub benchmark: BenchmarkEntry,
    pub default_monthly_requests: f64,
    pub description: String,
}

/// Process-wide, read-only benchmark tables
#[derive(Debug, Clone)]
pub struct BenchmarkRepository {
    scenarios: BTreeMap<String, IndustryScenario>,
    competitors: Vec<CompetitorProfile>,
    adopting_index: usize,
}

impl BenchmarkRepository {
    /// Build a repository from explicit tables
    pub fn new(
        scenarios: Vec<IndustryScenario>,
        competitors: Vec<CompetitorProfile>,
        adopting_key: impl Into<String>,
    ) -> Result<Self> {
        let adopting_key = adopting_key.into();

        let adopting_index = competitors
            .iter()
            .position(|c| c.key == adopting_key)
            .ok_or_else(|| {
                MetricsError::config(format!(
                    "Adopting profile '{}' missing from competitor table",
                    adopting_key
                ))
            })?;

        let scenarios = scenarios
            .into_iter()
            .map(|s| (s.benchmark.industry.clone(), s))
            .collect();

        Ok(Self {
            scenarios,
            competitors,
            adopting_index,
        })
    }

    /// The built-in industry and competitor tables
    pub fn standard() -> Self {
        let scenarios = vec![
            scenario(
                "customer_service",
                0.025,
                0.08,
                15_000.0,
                2.5,
                150_000.0,
                "AI-powered customer support with real-time failover ensuring 24/7 availability",
            ),
            scenario(
                "fraud_detection",
                0.045,
                0.12,
                85_000.0,
                0.8,
                75_000.0,
                "Mission-critical fraud detection requiring ultra-high reliability and sub-second response",
            ),
            scenario(
                "e_commerce",
                0.018,
                0.15,
                25_000.0,
                1.2,
                300_000.0,
                "Product recommendations and search optimization with peak traffic resilience",
            ),
            scenario(
                "content_generation",
                0.035,
                0.10,
                8_000.0,
                3.0,
                50_000.0,
                "Automated content creation with consistent quality and availability",
            ),
            scenario(
                "data_analytics",
                0.055,
                0.18,
                45_000.0,
                5.0,
                25_000.0,
                "Business intelligence and analytics requiring reliable data processing",
            ),
        ];

        let competitors = vec![
            profile("langchain", 0.72, 0.18, 8.5, 45_000.0, 1.0),
            profile("semantic_kernel", 0.68, 0.22, 9.2, 52_000.0, 0.95),
            profile("azure_ai", 0.75, 0.15, 7.8, 38_000.0, 1.1),
            profile(ADOPTING_PRODUCT, 0.99, 0.008, 2.1, 8_500.0, 12.5),
        ];

        Self {
            scenarios: scenarios
                .into_iter()
                .map(|s| (s.benchmark.industry.clone(), s))
                .collect(),
            adopting_index: competitors.len() - 1,
            competitors,
        }
    }

    pub fn benchmark(&self, industry: &str) -> Option<&BenchmarkEntry> {
        self.scenarios.get(industry).map(|s| &s.benchmark)
    }

    /// Industry keys in sorted order
    pub fn industries(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Benchmark for this cycle: a matching override wins over the static table
    pub fn resolve_benchmark(
        &self,
        industry: &str,
        overrides: &[BenchmarkEntry],
    ) -> Option<BenchmarkEntry> {
        overrides
            .iter()
            .find(|entry| entry.industry == industry)
            .or_else(|| self.benchmark(industry))
            .cloned()
    }

    pub fn default_monthly_requests(&self, industry: &str) -> f64 {
        self.scenarios
            .get(industry)
            .map(|s| s.default_monthly_requests)
            .unwrap_or(DEFAULT_MONTHLY_REQUESTS)
    }

    /// Presentation text for an industry; unknown industries get a generic one
    pub fn scenario_description(&self, industry: &str) -> &str {
        self.scenarios
            .get(industry)
            .map(|s| s.description.as_str())
            .unwrap_or(CUSTOM_SCENARIO_DESCRIPTION)
    }

    /// Every profile, the adopting product included
    pub fn competitors(&self) -> &[CompetitorProfile] {
        &self.competitors
    }

    pub fn adopting_profile(&self) -> &CompetitorProfile {
        &self.competitors[self.adopting_index]
    }
}

/// Adjust the adopting profile with live performance figures
pub fn apply_performance(
    base: &CompetitorProfile,
    performance: &PerformanceSummary,
) -> CompetitorProfile {
    let mut adjusted = base.clone();

    if let Some(score) = performance.reliability_score.filter(|s| s.is_finite() && *s > 0.0) {
        adjusted.reliability_score = score.min(MAX_RELIABILITY_SCORE);
        adjusted.avg_failure_rate = (1.0 - score).max(MIN_FAILURE_RATE);
    }

    if let Some(latency) = performance.avg_latency_ms.filter(|l| l.is_finite() && *l > 0.0) {
        let boost = (REFERENCE_LATENCY_MS / latency).max(1.0);
        adjusted.performance_multiplier = boost.min(MAX_PERFORMANCE_MULTIPLIER);
    }

    adjusted
}

fn scenario(
    industry: &str,
    avg_api_cost: f64,
    failure_rate: f64,
    avg_downtime_cost: f64,
    response_time_target: f64,
    default_monthly_requests: f64,
    description: &str,
) -> IndustryScenario {
    IndustryScenario {
        benchmark: BenchmarkEntry {
            industry: industry.to_string(),
            avg_api_cost,
            failure_rate,
            avg_downtime_cost,
            response_time_target,
        },
        default_monthly_requests,
        description: description.to_string(),
    }
}

fn profile(
    key: &str,
    reliability_score: f64,
    avg_failure_rate: f64,
    setup_complexity: f64,
    maintenance_cost: f64,
    performance_multiplier: f64,
) -> CompetitorProfile {
    CompetitorProfile {
        key: key.to_string(),
        reliability_score,
        avg_failure_rate,
        setup_complexity,
        maintenance_cost,
        performance_multiplier,
    }
}
