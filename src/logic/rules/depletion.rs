use super::{AdvisoryContext, Rule};
use crate::models::{DepletionAlert, Recommendation, RecommendationCategory, Severity};

/// Depletion rule - turns projected depletion alerts into recommendations
///
/// Only fires when projections were supplied. Severity is taken from the
/// alert (Critical under the critical window, otherwise Warning).
pub struct DepletionRule;

impl Rule for DepletionRule {
    fn id(&self) -> &'static str {
        "projected_depletion"
    }

    fn name(&self) -> &'static str {
        "Projected Depletion"
    }

    fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        let Some(report) = ctx.projections else {
            return Vec::new();
        };
        report
            .alerts
            .iter()
            .map(|alert| self.build_recommendation(alert))
            .collect()
    }
}

impl DepletionRule {
    fn build_recommendation(&self, alert: &DepletionAlert) -> Recommendation {
        let title = match alert.severity {
            Severity::Critical => format!("{} Running Out", alert.resource_type),
            _ => format!("{} Running Low", alert.resource_type),
        };

        let description = format!(
            "At the current rate of use, {} will run out in about {:.1} days.",
            alert.resource_type, alert.days_remaining
        );

        let action = match alert.severity {
            Severity::Critical => format!(
                "Order {} now or cut non-essential use until stock arrives.",
                alert.resource_type
            ),
            _ => format!(
                "Plan a {} purchase within the next week.",
                alert.resource_type
            ),
        };

        Recommendation::new(
            self.id(),
            RecommendationCategory::Depletion,
            alert.severity,
            title,
            description,
        )
        .with_explanation(
            "Days remaining divide the stock on hand by the average daily use over the \
             recent usage window. A rising usage trend shortens this further.",
        )
        .with_data_point(
            "Days Remaining",
            format!("{:.1}", alert.days_remaining),
            "Usage Projection",
        )
        .with_data_point(
            "On Hand",
            format!("{} {}", alert.current_quantity, alert.unit),
            "Inventory",
        )
        .with_action(action)
    }
}
