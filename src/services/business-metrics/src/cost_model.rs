//! Cost model
//!
//! Monthly and annual cost of running the workload either on the current
//! setup or on the adopting product. API usage cost is the same in both
//! modes; only reliability and operational costs change.

use roi_shared::{BenchmarkEntry, CostBreakdown, CostMode, InputParameters};

use crate::error::{MetricsError, Result};

/// Failure rate fraction of the adopting product
pub const ALTERNATIVE_FAILURE_RATE: f64 = 0.008;

/// Share of current maintenance cost that remains after adoption
pub const MAINTENANCE_REDUCTION_FACTOR: f64 = 0.25;

pub const MIN_MONTHLY_LICENSE: f64 = 2_500.0;
pub const LICENSE_COST_PER_REQUEST: f64 = 0.001;

/// Requests per downtime hour
const REQUESTS_PER_DOWNTIME_HOUR: f64 = 1_000.0;

/// Compute the cost breakdown for one mode.
///
/// `benchmark` is the entry resolved for `inputs.industry`; `None` means the
/// industry is unknown.
pub fn compute_costs(
    inputs: &InputParameters,
    benchmark: Option<&BenchmarkEntry>,
    mode: CostMode,
) -> Result<CostBreakdown> {
    if benchmark.is_none() {
        return Err(MetricsError::unknown_industry(&inputs.industry));
    }

    let current_failure_rate = inputs.current_failure_rate / 100.0;
    let monthly_api_cost = inputs.monthly_requests * inputs.current_api_cost;
    let current_maintenance =
        (inputs.team_size * inputs.avg_salary / 12.0) * (inputs.maintenance_time / 100.0);

    let (failure_rate, monthly_maintenance_cost, monthly_license_cost) = match mode {
        CostMode::Current => (current_failure_rate, current_maintenance, None),
        CostMode::Alternative => (
            ALTERNATIVE_FAILURE_RATE.min(current_failure_rate),
            current_maintenance * MAINTENANCE_REDUCTION_FACTOR,
            Some(license_cost(inputs.monthly_requests)),
        ),
    };

    let downtime_hours = inputs.monthly_requests * failure_rate / REQUESTS_PER_DOWNTIME_HOUR;
    let monthly_downtime_cost = downtime_hours * inputs.downtime_cost_hour;

    let monthly_total = monthly_api_cost
        + monthly_downtime_cost
        + monthly_maintenance_cost
        + monthly_license_cost.unwrap_or(0.0);

    let reliability_improvement = match mode {
        CostMode::Current => None,
        CostMode::Alternative if failure_rate > 0.0 => Some(current_failure_rate / failure_rate),
        CostMode::Alternative => Some(1.0),
    };

    Ok(CostBreakdown {
        mode,
        monthly_api_cost,
        monthly_downtime_cost,
        monthly_maintenance_cost,
        monthly_license_cost,
        monthly_total,
        annual_total: monthly_total * 12.0,
        failure_rate,
        reliability_improvement,
    })
}

/// Monthly license fee for a request volume
pub fn license_cost(monthly_requests: f64) -> f64 {
    (monthly_requests * LICENSE_COST_PER_REQUEST).max(MIN_MONTHLY_LICENSE)
}
