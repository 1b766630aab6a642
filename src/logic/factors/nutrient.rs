use super::SuitabilityFactor;
use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

pub struct NutrientFactor;

/// `1 - min(1, |actual - required| / required)`; nothing required scores 1.
fn nutrient_score(actual: f64, required: f64) -> f64 {
    if required <= 0.0 {
        return 1.0;
    }
    let deviation = ((actual - required).abs() / required).min(1.0);
    if deviation.is_nan() {
        0.0
    } else {
        1.0 - deviation
    }
}

impl SuitabilityFactor for NutrientFactor {
    fn id(&self) -> &'static str {
        "nutrient"
    }

    fn name(&self) -> &'static str {
        "Soil Nutrients"
    }

    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore {
        let targets = profile.nutrient_targets;
        let actual = ctx.nutrients;
        let nutrients = [
            ("nitrogen", actual.nitrogen, targets.nitrogen),
            ("phosphorus", actual.phosphorus, targets.phosphorus),
            ("potassium", actual.potassium, targets.potassium),
        ];

        let scores: Vec<f64> = nutrients
            .iter()
            .map(|(_, a, r)| nutrient_score(*a, *r))
            .collect();
        let score = scores.iter().sum::<f64>() / scores.len() as f64;

        let off_target: Vec<String> = nutrients
            .iter()
            .zip(&scores)
            .filter(|(_, s)| **s < config.concern_threshold)
            .map(|((name, a, r), _)| {
                let direction = if a < r { "low" } else { "high" };
                format!("{} {}", name, direction)
            })
            .collect();

        let note = if off_target.is_empty() {
            format!("soil N-P-K levels are close to {} requirements", profile.name)
        } else {
            format!(
                "soil nutrients are off target for {} ({}); adjust fertilization",
                profile.name,
                off_target.join(", ")
            )
        };

        FactorScore::new(self.id(), self.name(), score, note)
    }
}
