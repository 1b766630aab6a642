use super::resource::FieldId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fleet-level metrics that get a benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyMetric {
    WaterPerHectare,
    FertilizerPerHectare,
    YieldPerHectare,
    WaterPerYield,
    FertilizerPerYield,
}

impl EfficiencyMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            EfficiencyMetric::WaterPerHectare => "Water per hectare",
            EfficiencyMetric::FertilizerPerHectare => "Fertilizer per hectare",
            EfficiencyMetric::YieldPerHectare => "Yield per hectare",
            EfficiencyMetric::WaterPerYield => "Water per yield unit",
            EfficiencyMetric::FertilizerPerYield => "Fertilizer per yield unit",
        }
    }

    /// Whether a smaller value indicates better efficiency.
    pub fn lower_is_better(&self) -> bool {
        !matches!(self, EfficiencyMetric::YieldPerHectare)
    }
}

impl std::fmt::Display for EfficiencyMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

/// Usage of one resource type on one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsageMetrics {
    pub total: f64,
    /// Undefined when the field area is not positive.
    pub per_hectare: Option<f64>,
    /// Undefined when the field produced no yield.
    pub per_yield_unit: Option<f64>,
}

/// Relative efficiency scores on a 0-100 scale.
///
/// 50 means "exactly at the fleet average". The scale is relative to the
/// other fields in the same analysis, not an absolute quality grade: a
/// score of 100 means at least twice as good as the average, 25 half as good.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScores {
    pub water: Option<f64>,
    pub fertilizer: Option<f64>,
    #[serde(rename = "yield")]
    pub yield_: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEfficiency {
    pub field_id: FieldId,
    pub crop: Option<String>,
    pub area_ha: f64,
    pub total_yield: f64,
    pub yield_per_hectare: Option<f64>,
    pub water_per_hectare: Option<f64>,
    pub fertilizer_per_hectare: Option<f64>,
    pub water_per_yield: Option<f64>,
    pub fertilizer_per_yield: Option<f64>,
    pub resources: BTreeMap<String, ResourceUsageMetrics>,
    pub scores: EfficiencyScores,
}

impl FieldEfficiency {
    pub fn metric(&self, metric: EfficiencyMetric) -> Option<f64> {
        match metric {
            EfficiencyMetric::WaterPerHectare => self.water_per_hectare,
            EfficiencyMetric::FertilizerPerHectare => self.fertilizer_per_hectare,
            EfficiencyMetric::YieldPerHectare => self.yield_per_hectare,
            EfficiencyMetric::WaterPerYield => self.water_per_yield,
            EfficiencyMetric::FertilizerPerYield => self.fertilizer_per_yield,
        }
    }

    pub fn crop_label(&self) -> &str {
        self.crop.as_deref().unwrap_or("Unknown crop")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyAnalysis {
    pub fields: Vec<FieldEfficiency>,
    pub benchmarks: BTreeMap<EfficiencyMetric, Benchmark>,
}

impl EfficiencyAnalysis {
    pub fn field(&self, field_id: &str) -> Option<&FieldEfficiency> {
        self.fields.iter().find(|f| f.field_id == field_id)
    }

    pub fn benchmark(&self, metric: EfficiencyMetric) -> Option<&Benchmark> {
        self.benchmarks.get(&metric)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yield_is_higher_is_better() {
        assert!(EfficiencyMetric::WaterPerHectare.lower_is_better());
        assert!(EfficiencyMetric::FertilizerPerYield.lower_is_better());
        assert!(!EfficiencyMetric::YieldPerHectare.lower_is_better());
    }

    #[test]
    fn scores_serialize_yield_key() {
        let scores = EfficiencyScores {
            water: Some(50.0),
            fertilizer: None,
            yield_: Some(75.0),
        };
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["yield"], 75.0);
        assert!(json["fertilizer"].is_null());
    }
}
