use super::SuitabilityFactor;
use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

pub struct PhFactor;

impl SuitabilityFactor for PhFactor {
    fn id(&self) -> &'static str {
        "ph"
    }

    fn name(&self) -> &'static str {
        "Soil pH"
    }

    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore {
        let range = profile.ph_range;
        let distance = range.distance(ctx.soil_ph);
        let score = (1.0 - distance * config.ph_penalty_per_unit).max(0.0);

        let note = if distance == 0.0 {
            format!("soil pH {:.1} is within the {} optimum", ctx.soil_ph, range)
        } else if ctx.soil_ph < range.min {
            format!(
                "soil pH {:.1} is too acidic (optimum {}); liming may help",
                ctx.soil_ph, range
            )
        } else {
            format!(
                "soil pH {:.1} is too alkaline (optimum {}); sulfur or organic matter may help",
                ctx.soil_ph, range
            )
        };

        FactorScore::new(self.id(), self.name(), score, note)
    }
}
