use super::{
    depletion::DepletionRule, fertilizer_efficiency::FertilizerEfficiencyRule,
    low_inventory::LowInventoryRule, water_efficiency::WaterEfficiencyRule,
    yield_gap::YieldGapRule, AdvisoryContext, Rule,
};
use crate::models::Recommendation;
use tracing::debug;

pub struct AdvisoryEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl AdvisoryEngine {
    pub fn new() -> Self {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(WaterEfficiencyRule),
            Box::new(FertilizerEfficiencyRule),
            Box::new(YieldGapRule),
            Box::new(LowInventoryRule),
            Box::new(DepletionRule),
        ];

        Self { rules }
    }

    /// Run every rule. Most urgent first; ties keep rule order.
    pub fn evaluate(&self, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        let mut recs: Vec<Recommendation> = self
            .rules
            .iter()
            .flat_map(|rule| {
                let found = rule.evaluate(ctx);
                debug!("Rule {} produced {} recommendations", rule.id(), found.len());
                found
            })
            .collect();
        recs.sort_by(|a, b| b.severity.cmp(&a.severity));
        recs
    }

    pub fn evaluate_rule(&self, rule_id: &str, ctx: &AdvisoryContext) -> Vec<Recommendation> {
        self.rules
            .iter()
            .find(|r| r.id() == rule_id)
            .map(|rule| rule.evaluate(ctx))
            .unwrap_or_default()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for AdvisoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{analysis, field};
    use super::*;
    use crate::config::EfficiencyConfig;
    use crate::models::{ResourcePool, ResourceStock, Severity};

    #[test]
    fn recommendations_sorted_by_severity() {
        let analysis = analysis(vec![
            field("north", 35.0, 50.0, 50.0),
            field("south", 50.0, 50.0, 20.0),
        ]);
        let pool = ResourcePool::new()
            .with_stock(ResourceStock::new("Seed", 5.0, "kg").with_reorder_threshold(10.0));
        let config = EfficiencyConfig::default();
        let ctx = AdvisoryContext {
            efficiency: &analysis,
            pool: &pool,
            projections: None,
            config: &config,
        };

        let recs = AdvisoryEngine::new().evaluate(&ctx);
        let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["yield_gap", "low_inventory", "water_efficiency"]);
        assert!(recs
            .windows(2)
            .all(|w| w[0].severity >= w[1].severity));
        assert_eq!(recs[2].severity, Severity::Warning);
    }

    #[test]
    fn healthy_farm_gets_no_advice() {
        let analysis = analysis(vec![field("north", 50.0, 50.0, 50.0)]);
        let pool = ResourcePool::new();
        let config = EfficiencyConfig::default();
        let ctx = AdvisoryContext {
            efficiency: &analysis,
            pool: &pool,
            projections: None,
            config: &config,
        };
        assert!(AdvisoryEngine::new().evaluate(&ctx).is_empty());
    }

    #[test]
    fn single_rule_and_listing() {
        let engine = AdvisoryEngine::new();
        let rules = engine.list_rules();
        assert_eq!(rules.len(), 5);
        assert!(rules.contains(&("low_inventory", "Low Inventory")));

        let analysis = analysis(vec![field("north", 10.0, 10.0, 10.0)]);
        let pool = ResourcePool::new();
        let config = EfficiencyConfig::default();
        let ctx = AdvisoryContext {
            efficiency: &analysis,
            pool: &pool,
            projections: None,
            config: &config,
        };
        assert_eq!(engine.evaluate_rule("yield_gap", &ctx).len(), 1);
        assert!(engine.evaluate_rule("missing", &ctx).is_empty());
    }
}
