use super::crop_profile::{NutrientCategory, PlantFamily};
use serde::{Deserialize, Serialize};

/// Which rotation criteria a suggestion satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RotationMatch {
    /// New family and successor nutrient category.
    Ideal,
    FamilyOnly,
    NutrientOnly,
}

impl RotationMatch {
    pub fn score(&self) -> f64 {
        match self {
            RotationMatch::Ideal => 100.0,
            RotationMatch::FamilyOnly => 80.0,
            RotationMatch::NutrientOnly => 60.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RotationMatch::Ideal => "Ideal rotation",
            RotationMatch::FamilyOnly => "Family diversification",
            RotationMatch::NutrientOnly => "Nutrient cycling",
        }
    }
}

impl std::fmt::Display for RotationMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationSuggestion {
    pub crop: String,
    pub family: PlantFamily,
    pub nutrient_category: NutrientCategory,
    pub score: f64,
    pub match_kind: RotationMatch,
    pub rationale: String,
}
