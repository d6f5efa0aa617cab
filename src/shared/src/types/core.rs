//! Core type definitions for the business metrics platform
//!
//! Every pipeline stage takes and returns one of these types. Values are
//! produced fresh for each calculation and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// BENCHMARKS
// ============================================================================

/// Static reference figures for one industry scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub industry: String,
    /// Average cost of a single API request
    pub avg_api_cost: f64,
    /// Baseline failure rate as a fraction (0.08 == 8%)
    pub failure_rate: f64,
    pub avg_downtime_cost: f64,
    /// Response time target in seconds
    pub response_time_target: f64,
}

/// Capability profile of an AI orchestration framework
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub key: String,
    /// Reliability score in the range 0..=1
    pub reliability_score: f64,
    /// Average failure rate as a fraction
    pub avg_failure_rate: f64,
    pub setup_complexity: f64,
    /// Annual maintenance cost
    pub maintenance_cost: f64,
    pub performance_multiplier: f64,
}

// ============================================================================
// INPUTS
// ============================================================================

/// Validated enterprise parameters for one calculation cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputParameters {
    pub monthly_requests: f64,
    pub current_api_cost: f64,
    pub downtime_cost_hour: f64,
    /// Current failure rate in percent (8.0 == 8%)
    pub current_failure_rate: f64,
    pub team_size: f64,
    pub avg_salary: f64,
    /// Share of team time spent on maintenance, in percent
    pub maintenance_time: f64,
    pub industry: String,
}

// ============================================================================
// COSTS AND SAVINGS
// ============================================================================

/// Which side of the comparison a cost breakdown describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostMode {
    /// The organisation's existing setup
    Current,
    /// The setup after adopting the product
    Alternative,
}

impl fmt::Display for CostMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostMode::Current => write!(f, "current"),
            CostMode::Alternative => write!(f, "alternative"),
        }
    }
}


/// Monthly and annual cost breakdown for one mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub mode: CostMode,
    pub monthly_api_cost: f64,
    pub monthly_downtime_cost: f64,
    pub monthly_maintenance_cost: f64,
    /// Only present for the alternative mode
    pub monthly_license_cost: Option<f64>,
    pub monthly_total: f64,
    pub annual_total: f64,
    /// Failure rate fraction the downtime component was derived from
    pub failure_rate: f64,
    /// Current failure fraction divided by this breakdown's fraction
    pub reliability_improvement: Option<f64>,
}

/// Savings, ROI and projections derived from two cost breakdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsResult {
    /// May be negative when the alternative is more expensive
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub roi_percentage: f64,
    /// Always finite and positive
    pub payback_period_months: f64,
    pub three_year_savings: f64,
    pub five_year_savings: f64,
}

// ============================================================================
// COMPETITIVE POSITION AND IMPACT
// ============================================================================

/// Relative position of the adopting product against one competitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvantageDelta {
    /// Relative reliability difference in percent
    pub reliability_advantage: f64,
    pub failure_reduction: f64,
    pub setup_simplification: f64,
    /// Absolute maintenance cost difference (currency)
    pub maintenance_savings: f64,
    pub performance_advantage: f64,
}

/// Competitor key to advantage deltas, ordered by key
pub type CompetitiveAdvantage = BTreeMap<String, AdvantageDelta>;

/// Secondary business impact figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessImpact {
    /// One month of full-outage-equivalent exposure
    pub revenue_protected: f64,
    /// Monthly productivity uplift
    pub productivity_gain: f64,
    pub risk_reduction: f64,
    /// Annual savings carried forward as operational efficiency
    pub operational_efficiency: f64,
    /// Estimated, not measured
    pub customer_satisfaction_improvement: f64,
    /// Estimated, not measured
    pub time_to_market_improvement: f64,
    pub competitive_positioning: String,
}

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// Where the inputs of a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataOrigin {
    Remote,
    Fallback,
    Manual,
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Remote => write!(f, "remote"),
            DataOrigin::Fallback => write!(f, "fallback"),
            DataOrigin::Manual => write!(f, "manual"),
        }
    }
}

/// One complete computed result bundle at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub origin: DataOrigin,
    pub inputs: InputParameters,
    pub current_costs: CostBreakdown,
    pub alternative_costs: CostBreakdown,
    pub savings: SavingsResult,
    pub competitive_advantage: CompetitiveAdvantage,
    pub business_impact: BusinessImpact,
    /// Adopting profile as adjusted for this cycle
    pub adopting_profile: CompetitorProfile,
}

impl MetricSnapshot {
    /// Reliability of the adopting product in percent
    pub fn reliability_percentage(&self) -> f64 {
        self.adopting_profile.reliability_score * 100.0
    }
}

// ============================================================================
// ALERTS
// ============================================================================

/// Alert severity classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Success,
    Info,
    Warning,
}

/// An insight derived from the latest snapshot; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub generated_at: DateTime<Utc>,
}
