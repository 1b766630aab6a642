use super::SuitabilityFactor;
use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

/// Full credit for a listed soil type; fixed partial credit otherwise,
/// since soils can be amended.
pub struct SoilFactor;

impl SuitabilityFactor for SoilFactor {
    fn id(&self) -> &'static str {
        "soil"
    }

    fn name(&self) -> &'static str {
        "Soil Type"
    }

    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore {
        if profile.supports_soil(ctx.soil_type) {
            FactorScore::new(
                self.id(),
                self.name(),
                1.0,
                format!(
                    "{} soil is well suited for {}",
                    ctx.soil_type, profile.name
                ),
            )
        } else {
            FactorScore::new(
                self.id(),
                self.name(),
                config.soil_partial_credit,
                format!(
                    "{} soil may require amendments for optimal {} growth",
                    ctx.soil_type, profile.name
                ),
            )
        }
    }
}
