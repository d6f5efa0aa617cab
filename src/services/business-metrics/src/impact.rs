//! Business impact aggregation

use roi_shared::{BusinessImpact, InputParameters, SavingsResult};

/// Hours of exposure in one month of full outage
const MONTHLY_OUTAGE_HOURS: f64 = 24.0 * 30.0;
const PRODUCTIVITY_UPLIFT: f64 = 0.25;
const RISK_COST_PER_REQUEST: f64 = 0.001;

/// Estimated, not measured
pub const CUSTOMER_SATISFACTION_IMPROVEMENT: f64 = 15.0;
/// Estimated, not measured
pub const TIME_TO_MARKET_IMPROVEMENT: f64 = 30.0;
pub const COMPETITIVE_POSITIONING: &str = "Market Leader";

pub fn compute_impact(inputs: &InputParameters, savings: &SavingsResult) -> BusinessImpact {
    BusinessImpact {
        revenue_protected: inputs.downtime_cost_hour * MONTHLY_OUTAGE_HOURS,
        productivity_gain: inputs.team_size * inputs.avg_salary * PRODUCTIVITY_UPLIFT / 12.0,
        risk_reduction: inputs.monthly_requests
            * RISK_COST_PER_REQUEST
            * inputs.current_failure_rate,
        operational_efficiency: savings.annual_savings,
        customer_satisfaction_improvement: CUSTOMER_SATISFACTION_IMPROVEMENT,
        time_to_market_improvement: TIME_TO_MARKET_IMPROVEMENT,
        competitive_positioning: COMPETITIVE_POSITIONING.to_string(),
    }
}
