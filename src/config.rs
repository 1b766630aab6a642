use crate::error::{FarmError, Result};
use crate::models::{IrrigationTier, MarketAccess};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Crop reference table; the embedded table is used when unset.
    #[serde(default)]
    pub crop_table: Option<PathBuf>,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub efficiency: EfficiencyConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub seasonality: SeasonalityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FactorWeights {
    pub soil: f64,
    pub ph: f64,
    pub temperature: f64,
    pub rainfall: f64,
    pub nutrient: f64,
    pub investment: f64,
}

impl FactorWeights {
    pub fn total(&self) -> f64 {
        self.soil + self.ph + self.temperature + self.rainfall + self.nutrient + self.investment
    }

    pub fn for_factor(&self, id: &str) -> f64 {
        match id {
            "soil" => self.soil,
            "ph" => self.ph,
            "temperature" => self.temperature,
            "rainfall" => self.rainfall,
            "nutrient" => self.nutrient,
            "investment" => self.investment,
            _ => 0.0,
        }
    }
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            soil: 0.15,
            ph: 0.10,
            temperature: 0.20,
            rainfall: 0.20,
            nutrient: 0.25,
            investment: 0.10,
        }
    }
}

/// Rainfall sub-score floor when irrigation can cover a deficit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IrrigationFloors {
    pub none: f64,
    pub limited: f64,
    pub adequate: f64,
    pub abundant: f64,
}

impl IrrigationFloors {
    pub fn for_tier(&self, tier: IrrigationTier) -> f64 {
        match tier {
            IrrigationTier::None => self.none,
            IrrigationTier::Limited => self.limited,
            IrrigationTier::Adequate => self.adequate,
            IrrigationTier::Abundant => self.abundant,
        }
    }
}

impl Default for IrrigationFloors {
    fn default() -> Self {
        Self {
            none: 0.0,
            limited: 0.25,
            adequate: 0.7,
            abundant: 0.85,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketFactors {
    pub poor: f64,
    pub fair: f64,
    pub good: f64,
    pub excellent: f64,
}

impl MarketFactors {
    pub fn for_access(&self, access: MarketAccess) -> f64 {
        match access {
            MarketAccess::Poor => self.poor,
            MarketAccess::Fair => self.fair,
            MarketAccess::Good => self.good,
            MarketAccess::Excellent => self.excellent,
        }
    }
}

impl Default for MarketFactors {
    fn default() -> Self {
        Self {
            poor: 0.85,
            fair: 1.0,
            good: 1.05,
            excellent: 1.10,
        }
    }
}

/// Additive points applied when a crop matches the grower's priority.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PriorityBonuses {
    pub water_need: f64,
    pub demand_high: f64,
    pub demand_low: f64,
    pub price_trend: f64,
    pub nitrogen_fixer: f64,
    pub light_feeder: f64,
    pub heavy_feeder: f64,
    pub volatility: f64,
    pub investment: f64,
}

impl Default for PriorityBonuses {
    fn default() -> Self {
        Self {
            water_need: 8.0,
            demand_high: 6.0,
            demand_low: 4.0,
            price_trend: 4.0,
            nitrogen_fixer: 8.0,
            light_feeder: 4.0,
            heavy_feeder: 4.0,
            volatility: 6.0,
            investment: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: FactorWeights,
    /// Results below this score (0-100) are dropped.
    pub min_score: f64,
    pub soil_partial_credit: f64,
    pub ph_penalty_per_unit: f64,
    /// Score lost at the edge of an in-range temperature window.
    pub temperature_edge_taper: f64,
    pub temperature_penalty_per_degree: f64,
    pub rainfall_penalty_per_mm: f64,
    pub irrigation_floors: IrrigationFloors,
    pub investment_one_tier_over: f64,
    pub investment_two_tiers_over: f64,
    pub market_factors: MarketFactors,
    pub priority_bonuses: PriorityBonuses,
    /// Sub-scores at or above this are cited as favorable.
    pub favorable_threshold: f64,
    /// Sub-scores below this are cited as concerns.
    pub concern_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            min_score: 40.0,
            soil_partial_credit: 0.4,
            ph_penalty_per_unit: 0.35,
            temperature_edge_taper: 0.1,
            temperature_penalty_per_degree: 0.08,
            rainfall_penalty_per_mm: 0.001,
            irrigation_floors: IrrigationFloors::default(),
            investment_one_tier_over: 0.4,
            investment_two_tiers_over: 0.2,
            market_factors: MarketFactors::default(),
            priority_bonuses: PriorityBonuses::default(),
            favorable_threshold: 0.8,
            concern_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RotationConfig {
    pub top_n: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Largest share of its ideal quantity a field can lose to priority weighting.
    pub max_reduction: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self { max_reduction: 0.9 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    /// Benchmark ratio cap; 2.0 maps to a score of 100.
    pub ratio_cap: f64,
    /// Below-average scores under this get a low-key advisory.
    pub advisory_threshold: f64,
    /// Scores below this trigger an optimization recommendation.
    pub review_threshold: f64,
    /// Scores below this make the recommendation critical.
    pub urgent_threshold: f64,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            ratio_cap: 2.0,
            advisory_threshold: 50.0,
            review_threshold: 40.0,
            urgent_threshold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub window_days: u32,
    pub horizon_days: u32,
    pub alert_days: f64,
    pub critical_days: f64,
    pub min_trend_records: usize,
    pub min_trend_days: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            horizon_days: 30,
            alert_days: 14.0,
            critical_days: 7.0,
            min_trend_records: 5,
            min_trend_days: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeasonalityConfig {
    /// Years of history, counted back from the analysis date.
    pub years: u32,
    /// Distinct calendar months with usage needed before a pattern is named.
    pub min_months: usize,
    /// Peak-to-average ratios above these are Strong and Moderate.
    pub strong_ratio: f64,
    pub moderate_ratio: f64,
}

impl Default for SeasonalityConfig {
    fn default() -> Self {
        Self {
            years: 2,
            min_months: 6,
            strong_ratio: 2.0,
            moderate_ratio: 1.5,
        }
    }
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match Self::resolve_path(config_override) {
            Some(p) => p,
            None => {
                tracing::debug!("No config file found, using built-in defaults");
                return Ok(Self::default());
            }
        };
        if !config_path.exists() {
            return Err(FarmError::Config(format!(
                "Config file not found at {:?}",
                config_path
            )));
        }

        tracing::debug!("Loading config from {}", config_path.display());
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| FarmError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml_str(&config_str)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| FarmError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// The file `load` reads: the override when given, else the first
    /// standard location that exists. `None` means built-in defaults.
    pub fn resolve_path(config_override: Option<&PathBuf>) -> Option<PathBuf> {
        match config_override {
            Some(p) => Some(p.clone()),
            None => Self::find_config_path(),
        }
    }

    /// Search for a config file in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/farmwise.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("farmwise").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/farmwise/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| FarmError::Config("Cannot determine config directory".into()))?
            .join("farmwise");
        Ok(config_dir.join("config.yaml"))
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        let total = scoring.weights.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(FarmError::Config(format!(
                "scoring weights must sum to 1.0 (got {:.4})",
                total
            )));
        }

        let non_negative = [
            ("scoring.weights.soil", scoring.weights.soil),
            ("scoring.weights.ph", scoring.weights.ph),
            ("scoring.weights.temperature", scoring.weights.temperature),
            ("scoring.weights.rainfall", scoring.weights.rainfall),
            ("scoring.weights.nutrient", scoring.weights.nutrient),
            ("scoring.weights.investment", scoring.weights.investment),
            ("scoring.ph_penalty_per_unit", scoring.ph_penalty_per_unit),
            (
                "scoring.temperature_penalty_per_degree",
                scoring.temperature_penalty_per_degree,
            ),
            ("scoring.rainfall_penalty_per_mm", scoring.rainfall_penalty_per_mm),
            ("efficiency.ratio_cap", self.efficiency.ratio_cap),
            ("projection.alert_days", self.projection.alert_days),
            ("projection.critical_days", self.projection.critical_days),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FarmError::Config(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }

        let unit_interval = [
            ("scoring.soil_partial_credit", scoring.soil_partial_credit),
            ("scoring.temperature_edge_taper", scoring.temperature_edge_taper),
            ("scoring.investment_one_tier_over", scoring.investment_one_tier_over),
            (
                "scoring.investment_two_tiers_over",
                scoring.investment_two_tiers_over,
            ),
            ("scoring.favorable_threshold", scoring.favorable_threshold),
            ("scoring.concern_threshold", scoring.concern_threshold),
            ("scoring.irrigation_floors.none", scoring.irrigation_floors.none),
            ("scoring.irrigation_floors.limited", scoring.irrigation_floors.limited),
            ("scoring.irrigation_floors.adequate", scoring.irrigation_floors.adequate),
            ("scoring.irrigation_floors.abundant", scoring.irrigation_floors.abundant),
            ("allocation.max_reduction", self.allocation.max_reduction),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(FarmError::Config(format!("{} must be within 0-1", name)));
            }
        }

        let percentages = [
            ("scoring.min_score", scoring.min_score),
            ("efficiency.advisory_threshold", self.efficiency.advisory_threshold),
            ("efficiency.review_threshold", self.efficiency.review_threshold),
            ("efficiency.urgent_threshold", self.efficiency.urgent_threshold),
        ];
        for (name, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(FarmError::Config(format!("{} must be within 0-100", name)));
            }
        }

        let efficiency = &self.efficiency;
        if efficiency.urgent_threshold > efficiency.review_threshold
            || efficiency.review_threshold > efficiency.advisory_threshold
        {
            return Err(FarmError::Config(
                "efficiency thresholds must satisfy urgent <= review <= advisory".into(),
            ));
        }

        let seasonality = &self.seasonality;
        if seasonality.years == 0 {
            return Err(FarmError::Config("seasonality.years must be at least 1".into()));
        }
        if !(1..=12).contains(&seasonality.min_months) {
            return Err(FarmError::Config(
                "seasonality.min_months must be within 1-12".into(),
            ));
        }
        if !seasonality.moderate_ratio.is_finite()
            || !seasonality.strong_ratio.is_finite()
            || seasonality.moderate_ratio < 1.0
            || seasonality.moderate_ratio > seasonality.strong_ratio
        {
            return Err(FarmError::Config(
                "seasonality ratios must satisfy 1 <= moderate_ratio <= strong_ratio".into(),
            ));
        }

        let factors = &scoring.market_factors;
        for value in [factors.poor, factors.fair, factors.good, factors.excellent] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FarmError::Config(
                    "scoring.market_factors must be positive".into(),
                ));
            }
        }

        if self.projection.window_days == 0 {
            return Err(FarmError::Config(
                "projection.window_days must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the written Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up farmwise!");
        println!();

        let mut config = Config::default();

        println!("Crop Recommendations");
        config.scoring.min_score = Input::new()
            .with_prompt("  Minimum suitability score to report (0-100)")
            .default(config.scoring.min_score)
            .interact_text()
            .map_err(|e| FarmError::Config(format!("Input error: {}", e)))?;

        let crop_table: String = Input::new()
            .with_prompt("  Crop table file (blank for built-in table)")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| FarmError::Config(format!("Input error: {}", e)))?;
        config.crop_table = (!crop_table.trim().is_empty()).then(|| PathBuf::from(crop_table));

        config.rotation.top_n = Input::new()
            .with_prompt("  Rotation suggestions to show")
            .default(config.rotation.top_n)
            .interact_text()
            .map_err(|e| FarmError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Resource Allocation");
        config.allocation.max_reduction = Input::new()
            .with_prompt("  Maximum reduction for a low-priority field (0-1)")
            .default(config.allocation.max_reduction)
            .interact_text()
            .map_err(|e| FarmError::Config(format!("Input error: {}", e)))?;

        config.seasonality.years = Input::new()
            .with_prompt("  Years of usage history for seasonality")
            .default(config.seasonality.years)
            .interact_text()
            .map_err(|e| FarmError::Config(format!("Input error: {}", e)))?;

        println!();

        config.validate()?;

        let config_path = Self::default_config_path()?;
        config.write_to(&config_path)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)
            .map_err(|e| FarmError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# farmwise configuration\n# Generated by `farmwise init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(path, content)?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| FarmError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((FactorWeights::default().total() - 1.0).abs() < 1e-12);
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = Config::from_yaml_str(
            r#"
scoring:
  min_score: 55
rotation:
  top_n: 3
"#,
        )
        .unwrap();
        assert_eq!(config.scoring.min_score, 55.0);
        assert_eq!(config.scoring.weights, FactorWeights::default());
        assert_eq!(config.rotation.top_n, 3);
        assert_eq!(config.allocation.max_reduction, 0.9);
        assert!(config.crop_table.is_none());
    }

    #[test]
    fn weights_not_summing_to_one_are_rejected() {
        let err = Config::from_yaml_str(
            r#"
scoring:
  weights:
    soil: 0.5
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn out_of_range_reduction_is_rejected() {
        let err = Config::from_yaml_str("allocation:\n  max_reduction: 1.5\n").unwrap_err();
        assert!(err.to_string().contains("allocation.max_reduction"));
    }

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("FARMWISE_TEST_CROP_TABLE", "/srv/crops.yaml");
        let config =
            Config::from_yaml_str("crop_table: ${FARMWISE_TEST_CROP_TABLE}\n").unwrap();
        assert_eq!(config.crop_table, Some(PathBuf::from("/srv/crops.yaml")));
    }

    #[test]
    fn missing_override_path_is_an_error() {
        let path = PathBuf::from("/definitely/not/here/farmwise.yaml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(FarmError::Config(_))
        ));
    }

    #[test]
    fn override_path_wins_resolution() {
        let path = PathBuf::from("/srv/farmwise/custom.yaml");
        assert_eq!(Config::resolve_path(Some(&path)), Some(path));
    }

    #[test]
    fn efficiency_thresholds_must_be_ordered() {
        let err = Config::from_yaml_str("efficiency:\n  review_threshold: 60\n").unwrap_err();
        assert!(err.to_string().contains("urgent <= review <= advisory"));
    }

    #[test]
    fn seasonality_years_must_be_positive() {
        let err = Config::from_yaml_str("seasonality:\n  years: 0\n").unwrap_err();
        assert!(err.to_string().contains("seasonality.years"));

        let config = Config::from_yaml_str("seasonality:\n  years: 3\n").unwrap();
        assert_eq!(config.seasonality.years, 3);
        assert_eq!(config.seasonality.min_months, 6);
    }

    #[test]
    fn example_config_matches_defaults() {
        let example = include_str!("../config/farmwise.yaml.example");
        assert_eq!(Config::from_yaml_str(example).unwrap(), Config::default());
    }

    #[test]
    fn irrigation_floor_and_market_factor_lookup() {
        let scoring = ScoringConfig::default();
        assert_eq!(
            scoring.irrigation_floors.for_tier(IrrigationTier::Adequate),
            0.7
        );
        assert_eq!(scoring.irrigation_floors.for_tier(IrrigationTier::None), 0.0);
        assert_eq!(
            scoring.market_factors.for_access(MarketAccess::Excellent),
            1.10
        );
    }
}
