pub mod engine;
pub mod investment;
pub mod nutrient;
pub mod ph;
pub mod rainfall;
pub mod soil;
pub mod temperature;

pub use engine::{score_crops, SuitabilityScorer};

use crate::config::ScoringConfig;
use crate::models::{CropProfile, FactorScore, GrowingContext};

/// One independent sub-score of crop suitability.
pub trait SuitabilityFactor: Send + Sync {
    /// Identifier matching the weight key in the scoring config
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Score the profile against the context, in [0, 1]. Out-of-range
    /// inputs earn partial credit rather than an error.
    fn evaluate(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        config: &ScoringConfig,
    ) -> FactorScore;
}
