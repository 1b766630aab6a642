use super::{percent_from_average, score_severity, AdvisoryContext, Rule};
use crate::models::{
    EfficiencyMetric, FieldEfficiency, Recommendation, RecommendationCategory, Severity,
};

/// Water efficiency rule - flags fields using far more water per hectare than
/// the rest of the farm
///
/// Conditions:
/// - Water efficiency score below the advisory threshold (default 50)
///
/// Severity levels:
/// - Advisory: score between the review and advisory thresholds
/// - Warning: score between the urgent and review thresholds (default 40)
/// - Critical: score below the urgent threshold (default 30)
pub struct WaterEfficiencyRule;

impl Rule for WaterEfficiencyRule {
    fn id(&self) -> &'static str {
        "water_efficiency"
    }

    fn name(&self) -> &'static str {
        "Water Efficiency"
    }

    fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        ctx.efficiency
            .fields
            .iter()
            .filter_map(|field| {
                let score = field.scores.water?;
                let severity = score_severity(Some(score), ctx.config)?;
                let excess = percent_from_average(
                    ctx.efficiency,
                    field,
                    EfficiencyMetric::WaterPerHectare,
                );
                Some(self.build_recommendation(field, severity, score, excess))
            })
            .collect()
    }
}

impl WaterEfficiencyRule {
    fn build_recommendation(
        &self,
        field: &FieldEfficiency,
        severity: Severity,
        score: f64,
        excess: Option<f64>,
    ) -> Recommendation {
        let title = match severity {
            Severity::Critical => "Excessive Water Use",
            Severity::Advisory => "Water Use Above Average",
            _ => "High Water Use",
        };

        let description = match excess {
            Some(pct) => format!(
                "Water usage for {} in field {} is {:.0}% higher than the farm average.",
                field.crop_label(),
                field.field_id,
                pct
            ),
            None => format!(
                "Water usage for {} in field {} is well above the farm average.",
                field.crop_label(),
                field.field_id
            ),
        };

        let action = match severity {
            Severity::Critical => {
                "Implement drip irrigation to reduce water usage by 30-50% compared to \
                 overhead sprinklers. Check the system for leaks before the next cycle."
            }
            Severity::Advisory => {
                "Apply mulch around plants to cut soil evaporation and review the \
                 irrigation schedule against recent rainfall."
            }
            _ => {
                "Use soil moisture sensors to water only when necessary. Schedule \
                 irrigation for early morning or evening to reduce evaporation."
            }
        };

        let mut rec = Recommendation::new(
            self.id(),
            RecommendationCategory::Water,
            severity,
            title,
            description,
        )
        .for_field(&field.field_id)
        .with_explanation(
            "Efficiency scores compare each field with the farm-wide average, where 50 \
             means exactly average. Applying mulch also reduces soil evaporation, and \
             leaks in irrigation lines waste water without reaching the root zone.",
        )
        .with_data_point("Efficiency Score", format!("{:.0}/100", score), "Efficiency Analysis");

        if let Some(per_ha) = field.water_per_hectare {
            rec = rec.with_data_point(
                "Water per Hectare",
                format!("{:.1}", per_ha),
                "Usage Records",
            );
        }

        rec.with_action(action)
    }
}
