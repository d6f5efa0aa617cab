//! Configuration module for the business metrics service
//!
//! Settings are layered: built-in defaults, then an optional file named by
//! `BUSINESS_METRICS_CONFIG_FILE`, then `BUSINESS_METRICS__*` environment
//! variables (double underscore separates sections).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::benchmarks::BenchmarkRepository;
use crate::error::{MetricsError, Result};

/// Main configuration structure for the business metrics service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Remote metrics source
    pub remote: RemoteConfig,

    /// Refresh scheduler
    pub scheduler: SchedulerConfig,

    /// History ledger
    pub ledger: LedgerConfig,

    /// Financial assumptions used by reports and alert rules
    pub financial: FinancialConfig,

    /// Synthetic fallback data
    pub fallback: FallbackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_ms: u64,
    /// POST each on-demand calculation back to the analytics endpoint
    pub record_calculations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub interval_ms: u64,
    pub auto_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialConfig {
    pub discount_rate: f64,
    pub npv_years: u32,
    /// Annual savings above this raise an info alert
    pub cost_savings_alert_threshold: f64,
    pub roi_alert_threshold: f64,
    pub reliability_alert_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub industry: String,
    /// Relative jitter applied to generated figures, in [0, 1)
    pub variation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            timeout_seconds: 30,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 3000,
            record_calculations: false,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            auto_start: false,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

impl Default for FinancialConfig {
    fn default() -> Self {
        Self {
            discount_rate: 0.08,
            npv_years: 3,
            cost_savings_alert_threshold: 400_000.0,
            roi_alert_threshold: 300.0,
            reliability_alert_threshold: 95.0,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            industry: "customer_service".to_string(),
            variation: 0.05,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Tick period, never shorter than one millisecond
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables and config file
    pub fn from_env() -> Result<Self> {
        let mut cfg = config::Config::builder();

        // Start with default configuration
        cfg = cfg.add_source(config::Config::try_from(&MetricsConfig::default())?);

        // Add config file if it exists
        if let Ok(config_file) = std::env::var("BUSINESS_METRICS_CONFIG_FILE") {
            cfg = cfg.add_source(config::File::with_name(&config_file).required(false));
        }

        // Environment wins over the file
        cfg = cfg.add_source(
            config::Environment::with_prefix("BUSINESS_METRICS")
                .separator("__")
                .try_parsing(true),
        );

        Ok(cfg.build()?.try_deserialize()?)
    }

    /// Load configuration from an explicit file on top of the defaults
    pub fn from_file(path: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Config::try_from(&MetricsConfig::default())?)
            .add_source(config::File::with_name(path))
            .add_source(
                config::Environment::with_prefix("BUSINESS_METRICS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(MetricsError::config("Server port must be greater than 0"));
        }

        if self.scheduler.interval_ms == 0 {
            return Err(MetricsError::config(
                "Scheduler interval_ms must be greater than 0",
            ));
        }

        if self.ledger.capacity == 0 {
            return Err(MetricsError::config(
                "Ledger capacity must be greater than 0",
            ));
        }

        if self.remote.enabled && self.remote.base_url.trim().is_empty() {
            return Err(MetricsError::config(
                "Remote base_url is required when the remote source is enabled",
            ));
        }

        if self.financial.discount_rate <= -1.0 {
            return Err(MetricsError::config(
                "Discount rate must be greater than -1",
            ));
        }

        if !(0.0..1.0).contains(&self.fallback.variation) {
            return Err(MetricsError::config(
                "Fallback variation must be in the range [0, 1)",
            ));
        }

        if BenchmarkRepository::standard()
            .benchmark(&self.fallback.industry)
            .is_none()
        {
            return Err(MetricsError::config(format!(
                "Unknown fallback industry: {}",
                self.fallback.industry
            )));
        }

        Ok(())
    }
}
