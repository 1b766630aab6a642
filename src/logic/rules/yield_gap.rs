use super::{percent_from_average, score_severity, AdvisoryContext, Rule};
use crate::models::{
    EfficiencyMetric, FieldEfficiency, Recommendation, RecommendationCategory, Severity,
};

/// Yield gap rule - flags fields producing far less per hectare than the
/// farm average
pub struct YieldGapRule;

impl Rule for YieldGapRule {
    fn id(&self) -> &'static str {
        "yield_gap"
    }

    fn name(&self) -> &'static str {
        "Yield Gap"
    }

    fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        ctx.efficiency
            .fields
            .iter()
            .filter_map(|field| {
                let score = field.scores.yield_?;
                let severity = score_severity(Some(score), ctx.config)?;
                let shortfall = percent_from_average(
                    ctx.efficiency,
                    field,
                    EfficiencyMetric::YieldPerHectare,
                )
                .map(|pct| -pct);
                Some(self.build_recommendation(field, severity, score, shortfall))
            })
            .collect()
    }
}

impl YieldGapRule {
    fn build_recommendation(
        &self,
        field: &FieldEfficiency,
        severity: Severity,
        score: f64,
        shortfall: Option<f64>,
    ) -> Recommendation {
        let title = match severity {
            Severity::Critical => "Severe Yield Gap",
            _ => "Below-Average Yield",
        };

        let description = match shortfall {
            Some(pct) => format!(
                "Yield for {} in field {} is {:.0}% lower than the farm average.",
                field.crop_label(),
                field.field_id,
                pct
            ),
            None => format!(
                "Yield for {} in field {} is well below the farm average.",
                field.crop_label(),
                field.field_id
            ),
        };

        Recommendation::new(
            self.id(),
            RecommendationCategory::Yield,
            severity,
            title,
            description,
        )
        .for_field(&field.field_id)
        .with_explanation(
            "Low yield per hectare usually points to plant competition, pest damage or \
             nutrients locked up by an unsuitable soil pH. Integrated pest management \
             and keeping pH in range make existing inputs go further.",
        )
        .with_data_point("Efficiency Score", format!("{:.0}/100", score), "Efficiency Analysis")
        .with_data_point(
            "Total Yield",
            format!("{:.1}", field.total_yield),
            "Harvest Records",
        )
        .with_action(
            "Ensure optimal plant spacing to reduce competition and maximize yields. \
             Monitor soil pH and consider foliar feeding during critical growth stages.",
        )
    }
}
