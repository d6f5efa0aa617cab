//! Executive reports derived from a snapshot
//!
//! The ROI report summarises one calculation for a business audience; the
//! CFO report reframes it as an investment case with NPV and fixed risk and
//! strategy assessments. Both are pure functions of a snapshot.

use chrono::{DateTime, Utc};
use roi_shared::{BusinessImpact, CompetitiveAdvantage, MetricSnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::alerts::AlertThresholds;
use crate::config::FinancialConfig;
use crate::savings::net_present_value;

pub const ROI_REPORT_TYPE: &str = "Adaptive Mind ROI Analysis";
pub const CFO_REPORT_TYPE: &str = "CFO Business Case - Adaptive Mind Framework";

/// Reliability the KPI scorecard measures against, in percent
const RELIABILITY_TARGET: f64 = 99.0;

/// Progress band of a KPI against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl KpiLevel {
    /// Classify a progress percentage (current / target × 100)
    pub fn classify(percentage: f64) -> Self {
        if percentage >= 90.0 {
            KpiLevel::Excellent
        } else if percentage >= 75.0 {
            KpiLevel::Good
        } else if percentage >= 60.0 {
            KpiLevel::Fair
        } else {
            KpiLevel::Poor
        }
    }
}

impl fmt::Display for KpiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KpiLevel::Excellent => write!(f, "excellent"),
            KpiLevel::Good => write!(f, "good"),
            KpiLevel::Fair => write!(f, "fair"),
            KpiLevel::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub progress_percentage: f64,
    pub level: KpiLevel,
}

impl Kpi {
    fn new(name: &str, current: f64, target: f64) -> Self {
        let progress_percentage = if target > 0.0 {
            (current / target * 100.0).max(0.0)
        } else {
            0.0
        };

        Self {
            name: name.to_string(),
            current,
            target,
            progress_percentage,
            level: KpiLevel::classify(progress_percentage),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub annual_savings: f64,
    pub roi_percentage: f64,
    pub payback_period_months: f64,
    pub three_year_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiReport {
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    pub scenario: String,
    pub scenario_description: String,
    pub executive_summary: ExecutiveSummary,
    pub detailed_analysis: MetricSnapshot,
    pub competitive_advantage: CompetitiveAdvantage,
    pub business_impact: BusinessImpact,
    pub kpis: Vec<Kpi>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    pub investment: f64,
    pub annual_return: f64,
    pub roi_percentage: f64,
    pub payback_period_months: f64,
    pub net_present_value: f64,
    pub discount_rate: f64,
    pub npv_years: u32,
}

/// Annualised value drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub revenue_protection: f64,
    pub productivity_gains: f64,
    pub risk_mitigation: f64,
    pub operational_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub implementation_risk: String,
    pub technology_risk: String,
    pub vendor_risk: String,
    pub competitive_risk: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicValue {
    pub market_positioning: String,
    pub competitive_differentiation: String,
    pub scalability_potential: String,
    pub innovation_capability: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfoReport {
    pub report_type: String,
    pub generated_at: DateTime<Utc>,
    pub executive_summary: InvestmentSummary,
    pub financial_metrics: FinancialMetrics,
    pub risk_analysis: RiskAnalysis,
    pub strategic_value: StrategicValue,
}

/// Recommendations in priority order
pub fn recommendations(snapshot: &MetricSnapshot) -> Vec<String> {
    let savings = &snapshot.savings;
    let mut recommendations = Vec::new();

    if savings.roi_percentage > 100.0 {
        recommendations.push("Immediate implementation recommended - ROI exceeds 100%".to_string());
    }

    if savings.payback_period_months < 12.0 {
        recommendations.push("Fast payback period indicates low financial risk".to_string());
    }

    recommendations.extend(
        [
            "Pilot implementation recommended for critical workflows",
            "Consider phased rollout across business units",
            "Establish monitoring and optimization protocols",
        ]
        .map(String::from),
    );

    recommendations
}

/// Progress of the headline figures against their targets
pub fn kpi_scorecard(snapshot: &MetricSnapshot, thresholds: &AlertThresholds) -> Vec<Kpi> {
    vec![
        Kpi::new("roi_percentage", snapshot.savings.roi_percentage, thresholds.roi),
        Kpi::new(
            "annual_savings",
            snapshot.savings.annual_savings,
            thresholds.cost_savings,
        ),
        Kpi::new(
            "reliability",
            snapshot.reliability_percentage(),
            RELIABILITY_TARGET,
        ),
    ]
}

pub fn roi_report(
    snapshot: &MetricSnapshot,
    scenario_description: &str,
    thresholds: &AlertThresholds,
    generated_at: DateTime<Utc>,
) -> RoiReport {
    let savings = &snapshot.savings;

    RoiReport {
        report_type: ROI_REPORT_TYPE.to_string(),
        generated_at,
        scenario: snapshot.inputs.industry.clone(),
        scenario_description: scenario_description.to_string(),
        executive_summary: ExecutiveSummary {
            annual_savings: savings.annual_savings,
            roi_percentage: savings.roi_percentage,
            payback_period_months: savings.payback_period_months,
            three_year_value: savings.three_year_savings,
        },
        detailed_analysis: snapshot.clone(),
        competitive_advantage: snapshot.competitive_advantage.clone(),
        business_impact: snapshot.business_impact.clone(),
        kpis: kpi_scorecard(snapshot, thresholds),
        recommendations: recommendations(snapshot),
    }
}

pub fn cfo_report(
    snapshot: &MetricSnapshot,
    financial: &FinancialConfig,
    generated_at: DateTime<Utc>,
) -> CfoReport {
    let savings = &snapshot.savings;
    let impact = &snapshot.business_impact;

    let investment = if savings.annual_savings < 0.0 {
        savings.annual_savings.abs()
    } else {
        0.0
    };

    CfoReport {
        report_type: CFO_REPORT_TYPE.to_string(),
        generated_at,
        executive_summary: InvestmentSummary {
            investment,
            annual_return: savings.annual_savings.max(0.0),
            roi_percentage: savings.roi_percentage,
            payback_period_months: savings.payback_period_months,
            net_present_value: net_present_value(
                savings.annual_savings,
                financial.npv_years,
                financial.discount_rate,
            ),
            discount_rate: financial.discount_rate,
            npv_years: financial.npv_years,
        },
        financial_metrics: FinancialMetrics {
            revenue_protection: impact.revenue_protected * 12.0,
            productivity_gains: impact.productivity_gain * 12.0,
            risk_mitigation: impact.risk_reduction * 12.0,
            operational_efficiency: savings.annual_savings,
        },
        risk_analysis: RiskAnalysis {
            implementation_risk: "Low".to_string(),
            technology_risk: "Minimal".to_string(),
            vendor_risk: "Low".to_string(),
            competitive_risk: "High without implementation".to_string(),
        },
        strategic_value: StrategicValue {
            market_positioning: "Technology Leadership".to_string(),
            competitive_differentiation: "Significant".to_string(),
            scalability_potential: "High".to_string(),
            innovation_capability: "Enhanced".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::tests::{scenario_inputs, snapshot_for};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kpi_levels() {
        assert_eq!(KpiLevel::classify(95.0), KpiLevel::Excellent);
        assert_eq!(KpiLevel::classify(90.0), KpiLevel::Excellent);
        assert_eq!(KpiLevel::classify(80.0), KpiLevel::Good);
        assert_eq!(KpiLevel::classify(60.0), KpiLevel::Fair);
        assert_eq!(KpiLevel::classify(59.9), KpiLevel::Poor);
        assert_eq!(KpiLevel::Good.to_string(), "good");
    }

    #[test]
    fn test_recommendations_for_strong_case() {
        let snapshot = snapshot_for(scenario_inputs());
        let recs = recommendations(&snapshot);

        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0], "Immediate implementation recommended - ROI exceeds 100%");
        assert_eq!(recs[1], "Fast payback period indicates low financial risk");
        assert_eq!(recs[4], "Establish monitoring and optimization protocols");
    }

    #[test]
    fn test_recommendations_for_weak_case() {
        let mut inputs = scenario_inputs();
        inputs.monthly_requests = 100.0;
        inputs.maintenance_time = 1.0;

        let recs = recommendations(&snapshot_for(inputs));
        assert_eq!(
            recs,
            vec![
                "Pilot implementation recommended for critical workflows",
                "Consider phased rollout across business units",
                "Establish monitoring and optimization protocols",
            ]
        );
    }

    #[test]
    fn test_roi_report() {
        let snapshot = snapshot_for(scenario_inputs());
        let report = roi_report(
            &snapshot,
            "Customer support",
            &AlertThresholds::default(),
            Utc::now(),
        );

        assert_eq!(report.report_type, ROI_REPORT_TYPE);
        assert_eq!(report.scenario, "customer_service");
        assert_eq!(report.scenario_description, "Customer support");
        assert_eq!(report.executive_summary.annual_savings, snapshot.savings.annual_savings);
        assert_eq!(report.kpis.len(), 3);
        assert_eq!(report.kpis[0].level, KpiLevel::Excellent);
        assert_eq!(report.detailed_analysis.id, snapshot.id);
    }

    #[test]
    fn test_cfo_report_for_profitable_case() {
        let snapshot = snapshot_for(scenario_inputs());
        let financial = FinancialConfig::default();
        let report = cfo_report(&snapshot, &financial, Utc::now());

        let annual = snapshot.savings.annual_savings;
        assert_eq!(report.executive_summary.investment, 0.0);
        assert_eq!(report.executive_summary.annual_return, annual);
        assert_eq!(
            report.executive_summary.net_present_value,
            net_present_value(annual, 3, 0.08)
        );
        assert_eq!(
            report.financial_metrics.revenue_protection,
            snapshot.business_impact.revenue_protected * 12.0
        );
        assert_eq!(report.risk_analysis.competitive_risk, "High without implementation");
        assert_eq!(report.strategic_value.market_positioning, "Technology Leadership");
    }

    #[test]
    fn test_cfo_report_for_unprofitable_case() {
        let mut inputs = scenario_inputs();
        inputs.monthly_requests = 100.0;
        inputs.maintenance_time = 1.0;
        let snapshot = snapshot_for(inputs);

        let report = cfo_report(&snapshot, &FinancialConfig::default(), Utc::now());
        assert_eq!(
            report.executive_summary.investment,
            snapshot.savings.annual_savings.abs()
        );
        assert_eq!(report.executive_summary.annual_return, 0.0);
        assert!(report.executive_summary.net_present_value < 0.0);
    }
}
