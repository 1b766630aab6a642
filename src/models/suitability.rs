use super::crop_profile::{InvestmentTier, Level, PriceTrend};
use serde::{Deserialize, Serialize};

/// One weighted sub-score contributing to a suitability result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: String,
    pub label: String,
    /// Sub-score in [0, 1].
    pub score: f64,
    pub weight: f64,
    /// Human-readable clause used when the factor is notably good or bad.
    pub note: String,
}

impl FactorScore {
    pub fn new(factor: &str, label: &str, score: f64, note: impl Into<String>) -> Self {
        Self {
            factor: factor.to_string(),
            label: label.to_string(),
            score: score.clamp(0.0, 1.0),
            weight: 0.0,
            note: note.into(),
        }
    }

    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuitabilityResult {
    pub crop: String,
    /// Final score in [0, 100].
    pub suitability: f64,
    pub growing_season: String,
    pub time_to_harvest_days: u32,
    pub water_requirements: Level,
    pub fertilizer_needs: Level,
    pub market_demand: Level,
    pub estimated_yield: String,
    pub price_trend: PriceTrend,
    pub investment_level: InvestmentTier,
    pub rationale: String,
    pub cultivation_tips: Vec<String>,
    pub risks: Vec<String>,
    pub breakdown: Vec<FactorScore>,
}

impl SuitabilityResult {
    pub fn factor(&self, id: &str) -> Option<&FactorScore> {
        self.breakdown.iter().find(|f| f.factor == id)
    }

    pub fn time_to_harvest(&self) -> String {
        let days = self.time_to_harvest_days;
        if days >= 240 {
            format!("~{} months", (days as f64 / 30.0).round() as u32)
        } else {
            format!("~{} days", days)
        }
    }
}
