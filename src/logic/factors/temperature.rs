use super::SuitabilityFactor;
use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

/// Peaks at the range midpoint and tapers slightly toward the bounds.
/// Outside the range the score keeps falling per °C of distance.
pub struct TemperatureFactor;

impl SuitabilityFactor for TemperatureFactor {
    fn id(&self) -> &'static str {
        "temperature"
    }

    fn name(&self) -> &'static str {
        "Temperature"
    }

    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore {
        let range = profile.temperature_range;
        let temp = ctx.avg_temperature_c;
        let edge = 1.0 - config.temperature_edge_taper;

        let (score, note) = if range.contains(temp) {
            let half_width = range.half_width();
            let score = if half_width > 0.0 {
                1.0 - config.temperature_edge_taper * (temp - range.midpoint()).abs() / half_width
            } else {
                1.0
            };
            (
                score,
                format!(
                    "average temperature of {:.1}°C is favorable for {} ({}°C)",
                    temp, profile.name, range
                ),
            )
        } else {
            let distance = range.distance(temp);
            let direction = if temp < range.min { "below" } else { "above" };
            (
                (edge - distance * config.temperature_penalty_per_degree).max(0.0),
                format!(
                    "average temperature of {:.1}°C is {:.1}°C {} the {}°C range; consider climate management",
                    temp, distance, direction, range
                ),
            )
        };

        FactorScore::new(self.id(), self.name(), score, note)
    }
}
