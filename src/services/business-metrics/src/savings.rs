//! Savings, ROI and NPV

use roi_shared::{CostBreakdown, SavingsResult};

/// Smallest monthly saving used as the payback denominator
pub const MIN_PAYBACK_DENOMINATOR: f64 = 1.0;

/// Derive savings and ROI from the current and alternative breakdowns
pub fn compute_savings(current: &CostBreakdown, alternative: &CostBreakdown) -> SavingsResult {
    let monthly_savings = current.monthly_total - alternative.monthly_total;
    let annual_savings = monthly_savings * 12.0;

    let roi_percentage = if alternative.annual_total > 0.0 {
        annual_savings / alternative.annual_total * 100.0
    } else {
        0.0
    };

    let payback_period_months =
        alternative.annual_total / monthly_savings.max(MIN_PAYBACK_DENOMINATOR);

    SavingsResult {
        monthly_savings,
        annual_savings,
        roi_percentage,
        payback_period_months,
        three_year_savings: annual_savings * 3.0,
        five_year_savings: annual_savings * 5.0,
    }
}

/// Net present value of a constant annual cash flow over `years` years
pub fn net_present_value(annual_cash_flow: f64, years: u32, discount_rate: f64) -> f64 {
    (1..=years)
        .map(|year| annual_cash_flow / (1.0 + discount_rate).powi(year as i32))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_shared::CostMode;

    fn breakdown(mode: CostMode, monthly_total: f64) -> CostBreakdown {
        CostBreakdown {
            mode,
            monthly_api_cost: monthly_total,
            monthly_downtime_cost: 0.0,
            monthly_maintenance_cost: 0.0,
            monthly_license_cost: None,
            monthly_total,
            annual_total: monthly_total * 12.0,
            failure_rate: 0.0,
            reliability_improvement: None,
        }
    }

    #[test]
    fn test_positive_savings() {
        let current = breakdown(CostMode::Current, 10_000.0);
        let alternative = breakdown(CostMode::Alternative, 4_000.0);

        let savings = compute_savings(&current, &alternative);
        assert_eq!(savings.monthly_savings, 6_000.0);
        assert_eq!(savings.annual_savings, savings.monthly_savings * 12.0);
        assert_eq!(savings.roi_percentage, 150.0);
        assert_eq!(savings.payback_period_months, 8.0);
        assert_eq!(savings.three_year_savings, 216_000.0);
        assert_eq!(savings.five_year_savings, 360_000.0);
    }

    #[test]
    fn test_negative_savings_have_finite_payback() {
        let current = breakdown(CostMode::Current, 3_000.0);
        let alternative = breakdown(CostMode::Alternative, 5_000.0);

        let savings = compute_savings(&current, &alternative);
        assert_eq!(savings.monthly_savings, -2_000.0);
        assert!(savings.roi_percentage < 0.0);
        assert!(savings.payback_period_months.is_finite());
        assert!(savings.payback_period_months > 0.0);
        assert_eq!(savings.payback_period_months, 60_000.0);
    }

    #[test]
    fn test_zero_savings() {
        let current = breakdown(CostMode::Current, 5_000.0);
        let alternative = breakdown(CostMode::Alternative, 5_000.0);

        let savings = compute_savings(&current, &alternative);
        assert_eq!(savings.monthly_savings, 0.0);
        assert_eq!(savings.roi_percentage, 0.0);
        assert!(savings.payback_period_months.is_finite());
    }

    #[test]
    fn test_net_present_value() {
        let npv = net_present_value(100_000.0, 3, 0.08);
        // 92592.59 + 85733.88 + 79383.22
        assert!((npv - 257_709.70).abs() < 0.01);

        assert_eq!(net_present_value(100_000.0, 0, 0.08), 0.0);
        assert_eq!(net_present_value(1_000.0, 2, 0.0), 2_000.0);
    }
}
