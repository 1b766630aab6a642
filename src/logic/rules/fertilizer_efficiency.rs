use super::{percent_from_average, score_severity, AdvisoryContext, Rule};
use crate::models::{
    EfficiencyMetric, FieldEfficiency, Recommendation, RecommendationCategory, Severity,
};

/// Fertilizer efficiency rule - flags fields applying far more fertilizer per
/// hectare than the rest of the farm
///
/// Severity follows the same thresholds as the water rule.
pub struct FertilizerEfficiencyRule;

impl Rule for FertilizerEfficiencyRule {
    fn id(&self) -> &'static str {
        "fertilizer_efficiency"
    }

    fn name(&self) -> &'static str {
        "Fertilizer Efficiency"
    }

    fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        for field in &ctx.efficiency.fields {
            let Some(score) = field.scores.fertilizer else {
                continue;
            };
            let Some(severity) = score_severity(Some(score), ctx.config) else {
                continue;
            };
            let excess = percent_from_average(
                ctx.efficiency,
                field,
                EfficiencyMetric::FertilizerPerHectare,
            );
            recs.push(self.build_recommendation(field, severity, score, excess));
        }
        recs
    }
}

impl FertilizerEfficiencyRule {
    fn build_recommendation(
        &self,
        field: &FieldEfficiency,
        severity: Severity,
        score: f64,
        excess: Option<f64>,
    ) -> Recommendation {
        let description = match excess {
            Some(pct) => format!(
                "Fertilizer usage for {} in field {} is {:.0}% higher than the farm average.",
                field.crop_label(),
                field.field_id,
                pct
            ),
            None => format!(
                "Fertilizer usage for {} in field {} is well above the farm average.",
                field.crop_label(),
                field.field_id
            ),
        };

        let action = match severity {
            Severity::Critical => {
                "Conduct soil tests to determine exact nutrient needs before the next \
                 application. Switch to split applications through the season."
            }
            Severity::Advisory => {
                "Compare application rates with the field's crop needs and work \
                 compost or manure into the soil before the next top-dressing."
            }
            _ => {
                "Use precision application to apply fertilizer only where needed. \
                 Consider slow-release products to reduce leaching."
            }
        };

        let mut rec = Recommendation::new(
            self.id(),
            RecommendationCategory::Fertilizer,
            severity,
            "Reduce Fertilizer Use",
            description,
        )
        .for_field(&field.field_id)
        .with_explanation(
            "Nutrients applied beyond what the crop can take up are lost to leaching and \
             runoff. Incorporating organic matter improves soil fertility and lowers the \
             amount of purchased fertilizer needed.",
        )
        .with_data_point("Efficiency Score", format!("{:.0}/100", score), "Efficiency Analysis");

        if let Some(per_ha) = field.fertilizer_per_hectare {
            rec = rec.with_data_point(
                "Fertilizer per Hectare",
                format!("{:.1}", per_ha),
                "Usage Records",
            );
        }

        rec.with_action(action)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{analysis, field};
    use super::*;
    use crate::config::EfficiencyConfig;
    use crate::models::ResourcePool;

    #[test]
    fn flags_heavy_fertilizer_use() {
        let analysis = analysis(vec![
            field("north", 50.0, 38.0, 50.0),
            field("south", 50.0, 45.0, 50.0),
        ]);
        let pool = ResourcePool::new();
        let config = EfficiencyConfig::default();
        let ctx = AdvisoryContext {
            efficiency: &analysis,
            pool: &pool,
            projections: None,
            config: &config,
        };

        let recs = FertilizerEfficiencyRule.evaluate(&ctx);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].severity, Severity::Warning);
        assert_eq!(recs[1].severity, Severity::Advisory);
        assert_eq!(recs[1].field_id.as_deref(), Some("south"));
        assert_eq!(recs[0].category, RecommendationCategory::Fertilizer);
        assert!(recs[0].description.contains("well above"));
    }

    #[test]
    fn fields_without_fertilizer_records_are_skipped() {
        let mut idle = field("north", 50.0, 0.0, 50.0);
        idle.scores.fertilizer = None;
        let analysis = analysis(vec![idle]);
        let pool = ResourcePool::new();
        let config = EfficiencyConfig::default();
        let ctx = AdvisoryContext {
            efficiency: &analysis,
            pool: &pool,
            projections: None,
            config: &config,
        };
        assert!(FertilizerEfficiencyRule.evaluate(&ctx).is_empty());
    }
}
