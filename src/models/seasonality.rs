use super::crop_profile::Season;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How sharply the busiest month stands out from the monthly average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeasonalIntensity {
    Mild,
    Moderate,
    Strong,
}

impl SeasonalIntensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonalIntensity::Mild => "Mild",
            SeasonalIntensity::Moderate => "Moderate",
            SeasonalIntensity::Strong => "Strong",
        }
    }
}

impl std::fmt::Display for SeasonalIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeasonalPattern {
    /// Too few distinct months with usage to call a pattern.
    InsufficientData { months_observed: usize },
    /// Records exist but every month totals zero.
    NoUsage,
    Peak {
        intensity: SeasonalIntensity,
        peak_season: Season,
        low_season: Season,
        peak_month: u32,
        low_month: u32,
        /// Busiest month relative to the average of observed months.
        peak_ratio: f64,
        /// Relative deviation of each observed month from that average.
        variations: BTreeMap<u32, f64>,
    },
}

impl SeasonalPattern {
    pub fn label(&self) -> String {
        match self {
            SeasonalPattern::InsufficientData { .. } => "Insufficient data".to_string(),
            SeasonalPattern::NoUsage => "No usage".to_string(),
            SeasonalPattern::Peak {
                intensity,
                peak_season,
                ..
            } => format!("{} {} Peak", intensity, peak_season),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSeasonality {
    pub resource_type: String,
    /// Usage per calendar month (1-12), averaged over the analysed years.
    pub monthly_averages: BTreeMap<u32, f64>,
    pub pattern: SeasonalPattern,
    pub label: String,
}

impl ResourceSeasonality {
    pub fn peak_month(&self) -> Option<u32> {
        match self.pattern {
            SeasonalPattern::Peak { peak_month, .. } => Some(peak_month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityReport {
    pub as_of: NaiveDate,
    /// Earliest date included in the analysis.
    pub since: NaiveDate,
    pub years: u32,
    pub resources: BTreeMap<String, ResourceSeasonality>,
}

impl SeasonalityReport {
    pub fn resource(&self, resource_type: &str) -> Option<&ResourceSeasonality> {
        self.resources.get(resource_type)
    }
}
