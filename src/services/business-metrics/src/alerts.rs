//! Insight and alert generation
//!
//! Alerts are a pure function of one snapshot. Every rule is evaluated in a
//! fixed order and all matching rules fire; the competitive positioning
//! alert is always appended last.

use chrono::{DateTime, Utc};
use roi_shared::{Alert, AlertSeverity, MetricSnapshot};

use crate::config::FinancialConfig;

/// Thresholds of the numeric alert rules
#[derive(Debug, Clone, PartialEq)]
pub struct AlertThresholds {
    /// ROI percentage
    pub roi: f64,
    /// Reliability percentage of the adopting product
    pub reliability: f64,
    /// Annual savings
    pub cost_savings: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            roi: 300.0,
            reliability: 95.0,
            cost_savings: 400_000.0,
        }
    }
}

impl From<&FinancialConfig> for AlertThresholds {
    fn from(config: &FinancialConfig) -> Self {
        Self {
            roi: config.roi_alert_threshold,
            reliability: config.reliability_alert_threshold,
            cost_savings: config.cost_savings_alert_threshold,
        }
    }
}

pub fn generate_alerts(
    snapshot: &MetricSnapshot,
    thresholds: &AlertThresholds,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();
    let savings = &snapshot.savings;

    if savings.roi_percentage > thresholds.roi {
        alerts.push(alert(
            AlertSeverity::Success,
            "Exceptional ROI Achieved",
            format!(
                "ROI of {:.1}% significantly exceeds target",
                savings.roi_percentage
            ),
            now,
        ));
    }

    let reliability = snapshot.reliability_percentage();
    if reliability > thresholds.reliability {
        alerts.push(alert(
            AlertSeverity::Success,
            "Reliability Milestone",
            format!("System reliability reached {:.1}%", reliability),
            now,
        ));
    }

    if savings.annual_savings > thresholds.cost_savings {
        alerts.push(alert(
            AlertSeverity::Info,
            "Cost Savings Target Exceeded",
            format!("Annual savings of ${:.0} achieved", savings.annual_savings),
            now,
        ));
    }

    alerts.push(alert(
        AlertSeverity::Info,
        "Competitive Advantage",
        positioning_message(snapshot),
        now,
    ));

    alerts
}

fn positioning_message(snapshot: &MetricSnapshot) -> String {
    let deltas: Vec<f64> = snapshot
        .competitive_advantage
        .values()
        .map(|delta| delta.reliability_advantage)
        .collect();

    if deltas.is_empty() {
        return format!(
            "{} holds a {} position",
            snapshot.adopting_profile.key, snapshot.business_impact.competitive_positioning
        );
    }

    let low = deltas.iter().copied().fold(f64::INFINITY, f64::min);
    let high = deltas.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    format!(
        "{} outperforms {} major competitors on reliability by {:.0}-{:.0}%",
        snapshot.adopting_profile.key,
        deltas.len(),
        low,
        high
    )
}

fn alert(
    severity: AlertSeverity,
    title: &str,
    message: String,
    generated_at: DateTime<Utc>,
) -> Alert {
    Alert {
        severity,
        title: title.to_string(),
        message,
        generated_at,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::benchmarks::BenchmarkRepository;
    use crate::competitive::compute_advantages;
    use crate::cost_model::compute_costs;
    use crate::impact::compute_impact;
    use crate::savings::compute_savings;
    use roi_shared::{CostMode, DataOrigin, InputParameters};
    use uuid::Uuid;

    pub(crate) fn snapshot_for(inputs: InputParameters) -> MetricSnapshot {
        let repo = BenchmarkRepository::standard();
        let benchmark = repo.benchmark(&inputs.industry);
        let current = compute_costs(&inputs, benchmark, CostMode::Current).unwrap();
        let alternative = compute_costs(&inputs, benchmark, CostMode::Alternative).unwrap();
        let savings = compute_savings(&current, &alternative);
        let competitive_advantage =
            compute_advantages(repo.adopting_profile(), repo.competitors()).unwrap();
        let business_impact = compute_impact(&inputs, &savings);

        MetricSnapshot {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            origin: DataOrigin::Manual,
            inputs,
            current_costs: current,
            alternative_costs: alternative,
            savings,
            competitive_advantage,
            business_impact,
            adopting_profile: repo.adopting_profile().clone(),
        }
    }

    pub(crate) fn scenario_inputs() -> InputParameters {
        InputParameters {
            monthly_requests: 150_000.0,
            current_api_cost: 0.025,
            downtime_cost_hour: 15_000.0,
            current_failure_rate: 8.0,
            team_size: 5.0,
            avg_salary: 85_000.0,
            maintenance_time: 20.0,
            industry: "customer_service".to_string(),
        }
    }

    fn titles(alerts: &[Alert]) -> Vec<&str> {
        alerts.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_all_rules_fire_in_order() {
        let snapshot = snapshot_for(scenario_inputs());
        let alerts = generate_alerts(&snapshot, &AlertThresholds::default(), Utc::now());

        assert_eq!(
            titles(&alerts),
            vec![
                "Exceptional ROI Achieved",
                "Reliability Milestone",
                "Cost Savings Target Exceeded",
                "Competitive Advantage",
            ]
        );
        assert_eq!(alerts[0].severity, AlertSeverity::Success);
        assert_eq!(alerts[2].severity, AlertSeverity::Info);
    }

    #[test]
    fn test_positioning_alert_always_last() {
        let mut inputs = scenario_inputs();
        inputs.monthly_requests = 100.0;
        inputs.downtime_cost_hour = 10.0;
        inputs.maintenance_time = 1.0;

        let mut snapshot = snapshot_for(inputs);
        snapshot.adopting_profile.reliability_score = 0.9;

        assert!(snapshot.savings.monthly_savings <= 0.0);

        // Negative savings raise no alert of their own
        let alerts = generate_alerts(&snapshot, &AlertThresholds::default(), Utc::now());
        assert_eq!(titles(&alerts), vec!["Competitive Advantage"]);
        assert_eq!(alerts[0].severity, AlertSeverity::Info);
        assert!(alerts[0].message.contains("3 major competitors"));
    }

    #[test]
    fn test_thresholds_are_strict() {
        let snapshot = snapshot_for(scenario_inputs());
        let thresholds = AlertThresholds {
            roi: snapshot.savings.roi_percentage,
            reliability: 99.5,
            cost_savings: snapshot.savings.annual_savings,
        };

        let alerts = generate_alerts(&snapshot, &thresholds, Utc::now());
        assert_eq!(titles(&alerts), vec!["Competitive Advantage"]);
    }
}
