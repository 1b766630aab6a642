use super::{AdvisoryContext, Rule};
use crate::models::{Recommendation, RecommendationCategory, ResourceStock, Severity};

/// Low inventory rule - a stock below its reorder threshold needs restocking
///
/// Stocks without a threshold are never flagged. Always critical.
pub struct LowInventoryRule;

impl Rule for LowInventoryRule {
    fn id(&self) -> &'static str {
        "low_inventory"
    }

    fn name(&self) -> &'static str {
        "Low Inventory"
    }

    fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        ctx.pool
            .iter()
            .filter(|stock| {
                stock
                    .reorder_threshold
                    .is_some_and(|threshold| stock.quantity < threshold)
            })
            .map(|stock| self.build_recommendation(stock))
            .collect()
    }
}

impl LowInventoryRule {
    fn build_recommendation(&self, stock: &ResourceStock) -> Recommendation {
        let threshold = stock.reorder_threshold.unwrap_or_default();

        Recommendation::new(
            self.id(),
            RecommendationCategory::Inventory,
            Severity::Critical,
            format!("Low {} Inventory", stock.resource_type),
            format!(
                "Low {} inventory ({} {} remaining).",
                stock.resource_type, stock.quantity, stock.unit
            ),
        )
        .with_explanation(
            "Stock has fallen below the reorder level set for this resource. Running out \
             mid-season delays field operations at the point crops need them most.",
        )
        .with_data_point(
            "On Hand",
            format!("{} {}", stock.quantity, stock.unit),
            "Inventory",
        )
        .with_data_point(
            "Reorder Threshold",
            format!("{} {}", threshold, stock.unit),
            "Inventory",
        )
        .with_action(format!(
            "Restock {} soon to prevent shortages that could impact farm operations.",
            stock.resource_type
        ))
    }
}
