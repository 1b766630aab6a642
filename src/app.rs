use crate::config::Config;
use crate::datasources::CropTable;
use crate::error::{FarmError, Result};
use crate::config::SeasonalityConfig;
use crate::logic::{
    allocate_resources, analyze_efficiency, analyze_seasonality, cost_breakdown, project_usage,
    return_on_investment, suggest_rotation, AdvisoryContext, AdvisoryEngine, PriceTable,
    SuitabilityScorer,
};
use crate::models::{
    AllocationPlan, CostBreakdown, EfficiencyAnalysis, FieldHarvest, FieldId, FieldInfo,
    GrowingContext, ProjectionReport, Recommendation, ResourcePool, ResourceRequest, RoiReport,
    RotationSuggestion, SeasonalityReport, SuitabilityResult, UsageRecord, YieldRecord,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendInput {
    pub context: GrowingContext,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotateInput {
    #[serde(default)]
    pub current_crops: Vec<String>,
    /// Overrides `rotation.top_n` from the config.
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AllocateInput {
    pub pool: ResourcePool,
    pub requests: Vec<ResourceRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EfficiencyInput {
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    #[serde(default)]
    pub yields: Vec<YieldRecord>,
    pub fields: BTreeMap<FieldId, FieldInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInput {
    pub pool: ResourcePool,
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    pub as_of: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonalityInput {
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    pub as_of: NaiveDate,
    /// Overrides `seasonality.years` from the config.
    #[serde(default)]
    pub years: Option<u32>,
}

/// Efficiency data plus inventory. Depletion advice needs `as_of`.
#[derive(Debug, Clone, Deserialize)]
pub struct AdviseInput {
    #[serde(default)]
    pub pool: ResourcePool,
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    #[serde(default)]
    pub yields: Vec<YieldRecord>,
    #[serde(default)]
    pub fields: BTreeMap<FieldId, FieldInfo>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoiInput {
    pub unit_costs: PriceTable,
    pub crop_prices: PriceTable,
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    #[serde(default)]
    pub harvests: Vec<FieldHarvest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CostsInput {
    pub unit_costs: PriceTable,
    #[serde(default)]
    pub usage: Vec<UsageRecord>,
    #[serde(default)]
    pub fields: BTreeMap<FieldId, FieldInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdviceReport {
    pub recommendations: Vec<Recommendation>,
    pub efficiency: EfficiencyAnalysis,
    pub projections: Option<ProjectionReport>,
}

/// Read a JSON input document, or YAML when the extension says so.
pub fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| FarmError::NotFound(format!("{}: {}", path.display(), e)))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

/// Engine configuration and crop table bundled for the CLI.
pub struct Advisor {
    pub config: Config,
    pub crops: CropTable,
    scorer: SuitabilityScorer,
    advisory: AdvisoryEngine,
}

impl Advisor {
    pub fn new(config: Config, crops: CropTable) -> Self {
        let scorer = SuitabilityScorer::new(config.scoring.clone());
        Self {
            config,
            crops,
            scorer,
            advisory: AdvisoryEngine::new(),
        }
    }

    /// Crop table from `crops_override`, then the config's `crop_table`, then
    /// the built-in table.
    pub fn load(config: Config, crops_override: Option<&Path>) -> Result<Self> {
        let table_path = crops_override.or(config.crop_table.as_deref());
        let crops = match table_path {
            Some(path) => {
                tracing::debug!("Loading crop table from {}", path.display());
                CropTable::load(path)?
            }
            None => CropTable::builtin()?,
        };

        if crops.is_empty() {
            return Err(FarmError::InvalidData(
                "crop table contains no valid profiles".into(),
            ));
        }

        Ok(Self::new(config, crops))
    }

    pub fn recommend(&self, input: &RecommendInput) -> Vec<SuitabilityResult> {
        self.scorer.rank(&input.context, &self.crops, &input.exclude)
    }

    pub fn rotate(&self, input: &RotateInput) -> Vec<RotationSuggestion> {
        let top_n = input.top_n.unwrap_or(self.config.rotation.top_n);
        suggest_rotation(&input.current_crops, &self.crops, top_n)
    }

    pub fn allocate(&self, input: &AllocateInput) -> AllocationPlan {
        allocate_resources(&input.pool, &input.requests, &self.config.allocation)
    }

    pub fn efficiency(&self, input: &EfficiencyInput) -> EfficiencyAnalysis {
        analyze_efficiency(
            &input.usage,
            &input.yields,
            &input.fields,
            &self.config.efficiency,
        )
    }

    pub fn project(&self, input: &ProjectInput) -> ProjectionReport {
        project_usage(&input.pool, &input.usage, input.as_of, &self.config.projection)
    }

    pub fn seasonality(&self, input: &SeasonalityInput) -> SeasonalityReport {
        let config = SeasonalityConfig {
            years: input.years.unwrap_or(self.config.seasonality.years),
            ..self.config.seasonality.clone()
        };
        analyze_seasonality(&input.usage, input.as_of, &config)
    }

    pub fn advise(&self, input: &AdviseInput) -> AdviceReport {
        let efficiency = analyze_efficiency(
            &input.usage,
            &input.yields,
            &input.fields,
            &self.config.efficiency,
        );
        let projections = input
            .as_of
            .map(|as_of| project_usage(&input.pool, &input.usage, as_of, &self.config.projection));

        let ctx = AdvisoryContext {
            efficiency: &efficiency,
            pool: &input.pool,
            projections: projections.as_ref(),
            config: &self.config.efficiency,
        };
        let recommendations = self.advisory.evaluate(&ctx);

        AdviceReport {
            recommendations,
            efficiency,
            projections,
        }
    }

    pub fn roi(&self, input: &RoiInput) -> RoiReport {
        return_on_investment(
            &input.unit_costs,
            &input.crop_prices,
            &input.usage,
            &input.harvests,
        )
    }

    pub fn costs(&self, input: &CostsInput) -> CostBreakdown {
        cost_breakdown(&input.usage, &input.unit_costs, &input.fields)
    }

    pub fn list_factors(&self) -> Vec<(&'static str, &'static str)> {
        self.scorer.list_factors()
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.advisory.list_rules()
    }
}
