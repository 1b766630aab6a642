use super::SuitabilityFactor;
use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

pub struct InvestmentFactor;

impl SuitabilityFactor for InvestmentFactor {
    fn id(&self) -> &'static str {
        "investment"
    }

    fn name(&self) -> &'static str {
        "Investment"
    }

    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore {
        let tiers_over = profile
            .investment
            .rank()
            .saturating_sub(ctx.investment_capacity.rank());

        let score = match tiers_over {
            0 => 1.0,
            1 => config.investment_one_tier_over,
            _ => config.investment_two_tiers_over,
        };

        let note = if tiers_over == 0 {
            format!(
                "{} investment requirements align with the {} budget",
                profile.investment, ctx.investment_capacity
            )
        } else {
            format!(
                "{} investment requirements may exceed the {} budget",
                profile.investment, ctx.investment_capacity
            )
        };

        FactorScore::new(self.id(), self.name(), score, note)
    }
}
