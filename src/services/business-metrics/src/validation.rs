//! Input validation
//!
//! Turns loosely-filled enterprise parameters (form input, remote payloads)
//! into a complete [`InputParameters`] value. Monthly volume, API cost and
//! downtime cost are mandatory; everything else falls back to a documented
//! default when absent.

use roi_shared::InputParameters;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::benchmarks::BenchmarkRepository;
use crate::error::{MetricsError, Result};

pub const DEFAULT_CURRENT_FAILURE_RATE: f64 = 8.0;
pub const DEFAULT_TEAM_SIZE: f64 = 5.0;
pub const DEFAULT_AVG_SALARY: f64 = 85_000.0;
pub const DEFAULT_MAINTENANCE_TIME: f64 = 20.0;
pub const DEFAULT_INDUSTRY: &str = "customer_service";

/// Unvalidated calculation inputs; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RawInputParameters {
    pub monthly_requests: Option<f64>,
    pub current_api_cost: Option<f64>,
    pub downtime_cost_hour: Option<f64>,
    /// Percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub current_failure_rate: Option<f64>,
    pub team_size: Option<f64>,
    pub avg_salary: Option<f64>,
    /// Percent
    #[validate(range(min = 0.0, max = 100.0))]
    pub maintenance_time: Option<f64>,
    pub industry: Option<String>,
}

impl RawInputParameters {
    /// Default scenario inputs for an industry, taken from its benchmark
    pub fn for_industry(benchmarks: &BenchmarkRepository, industry: &str) -> Option<Self> {
        let benchmark = benchmarks.benchmark(industry)?;

        Some(Self {
            monthly_requests: Some(benchmarks.default_monthly_requests(industry)),
            current_api_cost: Some(benchmark.avg_api_cost),
            downtime_cost_hour: Some(benchmark.avg_downtime_cost),
            current_failure_rate: Some(benchmark.failure_rate * 100.0),
            team_size: None,
            avg_salary: None,
            maintenance_time: None,
            industry: Some(industry.to_string()),
        })
    }

    /// Fill every absent field from `defaults`; present fields are kept as-is
    pub fn with_defaults_from(self, defaults: &RawInputParameters) -> Self {
        Self {
            monthly_requests: self.monthly_requests.or(defaults.monthly_requests),
            current_api_cost: self.current_api_cost.or(defaults.current_api_cost),
            downtime_cost_hour: self.downtime_cost_hour.or(defaults.downtime_cost_hour),
            current_failure_rate: self.current_failure_rate.or(defaults.current_failure_rate),
            team_size: self.team_size.or(defaults.team_size),
            avg_salary: self.avg_salary.or(defaults.avg_salary),
            maintenance_time: self.maintenance_time.or(defaults.maintenance_time),
            industry: self.industry.or_else(|| defaults.industry.clone()),
        }
    }
}

/// Validate raw inputs and fill defaults
pub fn validate(raw: &RawInputParameters) -> Result<InputParameters> {
    let monthly_requests = require_positive("monthly_requests", raw.monthly_requests)?;
    let current_api_cost = require_positive("current_api_cost", raw.current_api_cost)?;
    let downtime_cost_hour = require_positive("downtime_cost_hour", raw.downtime_cost_hour)?;

    for (field, value) in [
        ("current_failure_rate", raw.current_failure_rate),
        ("team_size", raw.team_size),
        ("avg_salary", raw.avg_salary),
        ("maintenance_time", raw.maintenance_time),
    ] {
        if matches!(value, Some(v) if !v.is_finite()) {
            return Err(MetricsError::missing_field(field));
        }
    }

    raw.validate()?;

    let team_size = optional_positive("team_size", raw.team_size, DEFAULT_TEAM_SIZE)?;
    let avg_salary = optional_positive("avg_salary", raw.avg_salary, DEFAULT_AVG_SALARY)?;

    let industry = raw
        .industry
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_INDUSTRY)
        .to_string();

    Ok(InputParameters {
        monthly_requests,
        current_api_cost,
        downtime_cost_hour,
        current_failure_rate: raw
            .current_failure_rate
            .unwrap_or(DEFAULT_CURRENT_FAILURE_RATE),
        team_size,
        avg_salary,
        maintenance_time: raw.maintenance_time.unwrap_or(DEFAULT_MAINTENANCE_TIME),
        industry,
    })
}

fn require_positive(field: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(MetricsError::missing_field(field)),
    }
}

fn optional_positive(field: &str, value: Option<f64>, default: f64) -> Result<f64> {
    match value {
        None => Ok(default),
        Some(v) if v > 0.0 => Ok(v),
        Some(_) => Err(MetricsError::missing_field(field)),
    }
}
