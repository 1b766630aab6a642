pub mod depletion;
pub mod engine;
pub mod fertilizer_efficiency;
pub mod low_inventory;
pub mod water_efficiency;
pub mod yield_gap;

pub use engine::AdvisoryEngine;

use super::calculations::per_unit;
use crate::config::EfficiencyConfig;
use crate::models::{
    EfficiencyAnalysis, EfficiencyMetric, FieldEfficiency, ProjectionReport, Recommendation,
    ResourcePool, Severity,
};

/// Everything an advisory rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct AdvisoryContext<'a> {
    pub efficiency: &'a EfficiencyAnalysis,
    pub pool: &'a ResourcePool,
    pub projections: Option<&'a ProjectionReport>,
    pub config: &'a EfficiencyConfig,
}

/// Trait for resource optimization rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Evaluate the rule, one recommendation per finding
    fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation>;
}

/// Severity for a low efficiency score, `None` when no advice is needed.
pub(crate) fn score_severity(score: Option<f64>, config: &EfficiencyConfig) -> Option<Severity> {
    let score = score?;
    if score >= config.advisory_threshold {
        return None;
    }
    Some(if score < config.urgent_threshold {
        Severity::Critical
    } else if score < config.review_threshold {
        Severity::Warning
    } else {
        Severity::Advisory
    })
}

/// How far a field's metric sits from the fleet average, in percent.
pub(crate) fn percent_from_average(
    analysis: &EfficiencyAnalysis,
    field: &FieldEfficiency,
    metric: EfficiencyMetric,
) -> Option<f64> {
    let value = field.metric(metric)?;
    let average = analysis.benchmark(metric)?.average;
    per_unit(value - average, average).map(|ratio| ratio * 100.0)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_thresholds() {
        let config = EfficiencyConfig::default();
        assert_eq!(score_severity(Some(50.0), &config), None);
        assert_eq!(score_severity(Some(45.0), &config), Some(Severity::Advisory));
        assert_eq!(score_severity(Some(40.0), &config), Some(Severity::Advisory));
        assert_eq!(score_severity(Some(39.9), &config), Some(Severity::Warning));
        assert_eq!(score_severity(Some(30.0), &config), Some(Severity::Warning));
        assert_eq!(score_severity(Some(29.0), &config), Some(Severity::Critical));
        assert_eq!(score_severity(None, &config), None);
    }
}
