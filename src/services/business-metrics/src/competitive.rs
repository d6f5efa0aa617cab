//! Competitive advantage of the adopting product against each competitor

use roi_shared::{AdvantageDelta, CompetitiveAdvantage, CompetitorProfile};

use crate::error::{MetricsError, Result};

/// Compute advantage deltas against every competitor except the adopting
/// profile itself.
///
/// Percentages are relative to the competitor's value. Reliability and
/// performance are reported as gains, failure rate and setup complexity as
/// reductions; maintenance savings is an absolute currency difference.
/// A zero or non-finite competitor baseline fails with `InvalidBenchmarkValue`.
pub fn compute_advantages(
    adopting: &CompetitorProfile,
    competitors: &[CompetitorProfile],
) -> Result<CompetitiveAdvantage> {
    let mut advantages = CompetitiveAdvantage::new();

    for competitor in competitors.iter().filter(|c| c.key != adopting.key) {
        let delta = AdvantageDelta {
            reliability_advantage: relative_delta(
                competitor,
                "reliability_score",
                adopting.reliability_score,
                competitor.reliability_score,
            )?,
            failure_reduction: reduction(
                competitor,
                "avg_failure_rate",
                competitor.avg_failure_rate,
                adopting.avg_failure_rate,
            )?,
            setup_simplification: reduction(
                competitor,
                "setup_complexity",
                competitor.setup_complexity,
                adopting.setup_complexity,
            )?,
            maintenance_savings: competitor.maintenance_cost - adopting.maintenance_cost,
            performance_advantage: relative_delta(
                competitor,
                "performance_multiplier",
                adopting.performance_multiplier,
                competitor.performance_multiplier,
            )?,
        };

        advantages.insert(competitor.key.clone(), delta);
    }

    Ok(advantages)
}

/// `(value - base) / base * 100`
fn relative_delta(
    competitor: &CompetitorProfile,
    field: &str,
    value: f64,
    base: f64,
) -> Result<f64> {
    let base = baseline(competitor, field, base)?;
    Ok((value - base) / base * 100.0)
}

/// `(base - value) / base * 100`
fn reduction(competitor: &CompetitorProfile, field: &str, base: f64, value: f64) -> Result<f64> {
    let base = baseline(competitor, field, base)?;
    Ok((base - value) / base * 100.0)
}

fn baseline(competitor: &CompetitorProfile, field: &str, value: f64) -> Result<f64> {
    if value == 0.0 || !value.is_finite() {
        return Err(MetricsError::invalid_benchmark(&competitor.key, field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::{BenchmarkRepository, ADOPTING_PRODUCT};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_standard_competitors() {
        let repo = BenchmarkRepository::standard();
        let advantages =
            compute_advantages(repo.adopting_profile(), repo.competitors()).unwrap();

        assert_eq!(advantages.len(), 3);
        assert!(!advantages.contains_key(ADOPTING_PRODUCT));

        let langchain = &advantages["langchain"];
        // (0.99 - 0.72) / 0.72
        assert!(approx(langchain.reliability_advantage, 37.5));
        // (0.18 - 0.008) / 0.18
        assert!(approx(langchain.failure_reduction, 95.56));
        // (8.5 - 2.1) / 8.5
        assert!(approx(langchain.setup_simplification, 75.29));
        assert_eq!(langchain.maintenance_savings, 36_500.0);
        assert!(approx(langchain.performance_advantage, 1150.0));
    }

    #[test]
    fn test_zero_baseline_is_rejected() {
        let repo = BenchmarkRepository::standard();
        let mut broken = repo.competitors()[0].clone();
        broken.setup_complexity = 0.0;

        let err = compute_advantages(repo.adopting_profile(), &[broken]).unwrap_err();
        match err {
            MetricsError::InvalidBenchmarkValue { competitor, field } => {
                assert_eq!(competitor, "langchain");
                assert_eq!(field, "setup_complexity");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_only_adopting_profile() {
        let repo = BenchmarkRepository::standard();
        let adopting = repo.adopting_profile();

        let advantages =
            compute_advantages(adopting, std::slice::from_ref(adopting)).unwrap();
        assert!(advantages.is_empty());
    }
}
