use super::SuitabilityFactor;
use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

/// Irrigation can make up a rainfall deficit, so a deficit is floored by the
/// irrigation tier. Excess rainfall is never floored.
pub struct RainfallFactor;

impl SuitabilityFactor for RainfallFactor {
    fn id(&self) -> &'static str {
        "rainfall"
    }

    fn name(&self) -> &'static str {
        "Rainfall"
    }

    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore {
        let range = profile.rainfall_range;
        let rainfall = ctx.annual_rainfall_mm;
        let distance = range.distance(rainfall);
        let penalized = (1.0 - distance * config.rainfall_penalty_per_mm).max(0.0);

        let (score, note) = if distance == 0.0 {
            (
                1.0,
                format!(
                    "annual rainfall of {:.0} mm meets {} water requirements",
                    rainfall, profile.name
                ),
            )
        } else if rainfall < range.min {
            let floor = config.irrigation_floors.for_tier(ctx.irrigation);
            let note = if floor > penalized {
                format!(
                    "rainfall is {:.0} mm short of {} needs; {} irrigation offsets part of the deficit",
                    distance,
                    profile.name,
                    ctx.irrigation.as_str().to_lowercase()
                )
            } else {
                format!(
                    "insufficient rainfall for {} ({:.0} mm short); irrigation will be necessary",
                    profile.name, distance
                )
            };
            (penalized.max(floor), note)
        } else {
            (
                penalized,
                format!(
                    "rainfall exceeds {} tolerance by {:.0} mm; drainage management may be required",
                    profile.name, distance
                ),
            )
        };

        FactorScore::new(self.id(), self.name(), score, note)
    }
}
