use crate::error::FarmError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SoilType {
    Clay,
    Loam,
    Sandy,
    #[serde(alias = "Silt Loam")]
    SiltLoam,
    #[serde(alias = "Clay Loam")]
    ClayLoam,
    #[serde(alias = "Sandy Loam")]
    SandyLoam,
    #[serde(alias = "Silty Clay")]
    SiltyClay,
}

impl SoilType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Clay => "Clay",
            SoilType::Loam => "Loam",
            SoilType::Sandy => "Sandy",
            SoilType::SiltLoam => "Silt Loam",
            SoilType::ClayLoam => "Clay Loam",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::SiltyClay => "Silty Clay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clay" => Some(SoilType::Clay),
            "loam" => Some(SoilType::Loam),
            "sandy" | "sand" => Some(SoilType::Sandy),
            "siltloam" | "silt loam" => Some(SoilType::SiltLoam),
            "clayloam" | "clay loam" => Some(SoilType::ClayLoam),
            "sandyloam" | "sandy loam" => Some(SoilType::SandyLoam),
            "siltyclay" | "silty clay" => Some(SoilType::SiltyClay),
            _ => None,
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    #[serde(alias = "Year-round")]
    YearRound,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::YearRound => "Year-round",
        }
    }

    /// Meteorological season of a calendar month (1-12).
    pub fn of_month(month: u32) -> Option<Self> {
        match month {
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Fall),
            12 | 1 | 2 => Some(Season::Winter),
            _ => None,
        }
    }

    /// Calendar months of a season; empty for year-round.
    pub fn months(&self) -> &'static [u32] {
        match self {
            Season::Spring => &[3, 4, 5],
            Season::Summer => &[6, 7, 8],
            Season::Fall => &[9, 10, 11],
            Season::Winter => &[12, 1, 2],
            Season::YearRound => &[],
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capital required to establish a crop, or available to the grower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InvestmentTier {
    Low,
    Medium,
    High,
}

impl InvestmentTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentTier::Low => "Low",
            InvestmentTier::Medium => "Medium",
            InvestmentTier::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(InvestmentTier::Low),
            "medium" => Some(InvestmentTier::Medium),
            "high" => Some(InvestmentTier::High),
            _ => None,
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            InvestmentTier::Low => 0,
            InvestmentTier::Medium => 1,
            InvestmentTier::High => 2,
        }
    }
}

impl std::fmt::Display for InvestmentTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualitative Low/Medium/High tag used for water need, demand and volatility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTrend {
    Declining,
    #[default]
    Stable,
    Rising,
}

impl PriceTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTrend::Declining => "↓ Declining",
            PriceTrend::Stable => "→ Stable",
            PriceTrend::Rising => "↑ Rising",
        }
    }
}

impl std::fmt::Display for PriceTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlantFamily {
    Legume,
    Grain,
    RootCrop,
    FruitVegetable,
    LeafyVegetable,
    Allium,
    Other,
}

impl PlantFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantFamily::Legume => "Legume",
            PlantFamily::Grain => "Grain",
            PlantFamily::RootCrop => "Root Crop",
            PlantFamily::FruitVegetable => "Fruit Vegetable",
            PlantFamily::LeafyVegetable => "Leafy Vegetable",
            PlantFamily::Allium => "Allium",
            PlantFamily::Other => "Other",
        }
    }

    pub fn all() -> &'static [PlantFamily] {
        &[
            PlantFamily::Legume,
            PlantFamily::Grain,
            PlantFamily::RootCrop,
            PlantFamily::FruitVegetable,
            PlantFamily::LeafyVegetable,
            PlantFamily::Allium,
            PlantFamily::Other,
        ]
    }
}

impl std::fmt::Display for PlantFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How heavily a crop draws down soil nutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutrientCategory {
    HeavyFeeder,
    MediumFeeder,
    LightFeeder,
    NitrogenFixer,
}

impl NutrientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientCategory::HeavyFeeder => "Heavy Feeder",
            NutrientCategory::MediumFeeder => "Medium Feeder",
            NutrientCategory::LightFeeder => "Light Feeder",
            NutrientCategory::NitrogenFixer => "Nitrogen Fixer",
        }
    }

    /// Categories that naturally follow this one in a rotation.
    pub fn successors(&self) -> &'static [NutrientCategory] {
        match self {
            NutrientCategory::HeavyFeeder => &[NutrientCategory::NitrogenFixer],
            NutrientCategory::NitrogenFixer => &[NutrientCategory::HeavyFeeder],
            NutrientCategory::MediumFeeder | NutrientCategory::LightFeeder => {
                &[NutrientCategory::LightFeeder, NutrientCategory::MediumFeeder]
            }
        }
    }
}

impl std::fmt::Display for NutrientCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Closed interval of acceptable values for an environmental variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceRange {
    pub min: f64,
    pub max: f64,
}

impl ToleranceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance to the nearer bound; zero inside the range.
    pub fn distance(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn half_width(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl std::fmt::Display for ToleranceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Macro-nutrient levels in kg/ha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutrientLevels {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
}

impl NutrientLevels {
    pub fn new(nitrogen: f64, phosphorus: f64, potassium: f64) -> Self {
        Self {
            nitrogen,
            phosphorus,
            potassium,
        }
    }

    fn is_valid(&self) -> bool {
        [self.nitrogen, self.phosphorus, self.potassium]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Reference data for one candidate crop. Only built through validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCropProfile")]
pub struct CropProfile {
    pub name: String,
    pub soil_types: Vec<SoilType>,
    pub ph_range: ToleranceRange,
    pub temperature_range: ToleranceRange,
    pub rainfall_range: ToleranceRange,
    pub season_length_days: u32,
    pub growing_seasons: Vec<Season>,
    pub nutrient_targets: NutrientLevels,
    pub investment: InvestmentTier,
    pub family: PlantFamily,
    pub nutrient_category: NutrientCategory,
    pub water_need: Level,
    pub fertilizer_need: Level,
    pub market_demand: Level,
    pub price_volatility: Level,
    pub price_trend: PriceTrend,
    pub typical_yield: String,
    pub cultivation_tips: Vec<String>,
    pub risks: Vec<String>,
}

impl CropProfile {
    pub fn supports_soil(&self, soil: SoilType) -> bool {
        self.soil_types.contains(&soil)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn seasons_label(&self) -> String {
        self.growing_seasons
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Crop profile as curated on disk, before required fields are checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCropProfile {
    pub name: Option<String>,
    pub soil_types: Option<Vec<SoilType>>,
    pub ph_range: Option<ToleranceRange>,
    pub temperature_range: Option<ToleranceRange>,
    pub rainfall_range: Option<ToleranceRange>,
    pub season_length_days: Option<u32>,
    pub growing_seasons: Vec<Season>,
    pub nutrient_targets: Option<NutrientLevels>,
    pub investment: Option<InvestmentTier>,
    pub family: Option<PlantFamily>,
    pub nutrient_category: Option<NutrientCategory>,
    pub water_need: Level,
    pub fertilizer_need: Level,
    pub market_demand: Level,
    pub price_volatility: Level,
    pub price_trend: PriceTrend,
    pub typical_yield: String,
    pub cultivation_tips: Vec<String>,
    pub risks: Vec<String>,
}

fn required<T>(value: Option<T>, crop: &str, field: &str) -> Result<T, FarmError> {
    value.ok_or_else(|| FarmError::invalid_profile(crop, format!("missing {}", field)))
}

impl TryFrom<RawCropProfile> for CropProfile {
    type Error = FarmError;

    fn try_from(raw: RawCropProfile) -> Result<Self, Self::Error> {
        let name = raw
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| FarmError::invalid_profile("<unnamed>", "missing name"))?;

        let soil_types = required(raw.soil_types, &name, "soil_types")?;
        if soil_types.is_empty() {
            return Err(FarmError::invalid_profile(&name, "soil_types is empty"));
        }

        let ph_range = required(raw.ph_range, &name, "ph_range")?;
        let temperature_range = required(raw.temperature_range, &name, "temperature_range")?;
        let rainfall_range = required(raw.rainfall_range, &name, "rainfall_range")?;
        for (field, range) in [
            ("ph_range", &ph_range),
            ("temperature_range", &temperature_range),
            ("rainfall_range", &rainfall_range),
        ] {
            if !range.is_valid() {
                return Err(FarmError::invalid_profile(
                    &name,
                    format!("{} must be finite with min <= max", field),
                ));
            }
        }
        if ph_range.min < 0.0 || ph_range.max > 14.0 {
            return Err(FarmError::invalid_profile(&name, "ph_range outside 0-14"));
        }
        if rainfall_range.min < 0.0 {
            return Err(FarmError::invalid_profile(&name, "rainfall_range is negative"));
        }

        let season_length_days = required(raw.season_length_days, &name, "season_length_days")?;
        if season_length_days == 0 {
            return Err(FarmError::invalid_profile(&name, "season_length_days is zero"));
        }

        let nutrient_targets = required(raw.nutrient_targets, &name, "nutrient_targets")?;
        if !nutrient_targets.is_valid() {
            return Err(FarmError::invalid_profile(
                &name,
                "nutrient_targets must be finite and non-negative",
            ));
        }

        Ok(Self {
            soil_types,
            ph_range,
            temperature_range,
            rainfall_range,
            season_length_days,
            growing_seasons: raw.growing_seasons,
            nutrient_targets,
            investment: required(raw.investment, &name, "investment")?,
            family: required(raw.family, &name, "family")?,
            nutrient_category: required(raw.nutrient_category, &name, "nutrient_category")?,
            water_need: raw.water_need,
            fertilizer_need: raw.fertilizer_need,
            market_demand: raw.market_demand,
            price_volatility: raw.price_volatility,
            price_trend: raw.price_trend,
            typical_yield: raw.typical_yield,
            cultivation_tips: raw.cultivation_tips,
            risks: raw.risks,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_maize() -> RawCropProfile {
        RawCropProfile {
            name: Some("Maize".into()),
            soil_types: Some(vec![SoilType::Loam, SoilType::SandyLoam]),
            ph_range: Some(ToleranceRange::new(5.5, 7.5)),
            temperature_range: Some(ToleranceRange::new(18.0, 35.0)),
            rainfall_range: Some(ToleranceRange::new(500.0, 1800.0)),
            season_length_days: Some(110),
            nutrient_targets: Some(NutrientLevels::new(150.0, 60.0, 60.0)),
            investment: Some(InvestmentTier::Medium),
            family: Some(PlantFamily::Grain),
            nutrient_category: Some(NutrientCategory::HeavyFeeder),
            ..Default::default()
        }
    }

    #[test]
    fn soil_type_from_str_valid() {
        assert_eq!(SoilType::from_str("loam"), Some(SoilType::Loam));
        assert_eq!(SoilType::from_str("Sandy Loam"), Some(SoilType::SandyLoam));
        assert_eq!(SoilType::from_str("SILTYCLAY"), Some(SoilType::SiltyClay));
        assert_eq!(SoilType::from_str("peat"), None);
    }

    #[test]
    fn investment_tier_orders_low_to_high() {
        assert!(InvestmentTier::Low < InvestmentTier::Medium);
        assert!(InvestmentTier::Medium < InvestmentTier::High);
        assert_eq!(InvestmentTier::from_str("HIGH"), Some(InvestmentTier::High));
    }

    #[test]
    fn nutrient_successors_alternate_heavy_and_fixer() {
        assert_eq!(
            NutrientCategory::HeavyFeeder.successors(),
            &[NutrientCategory::NitrogenFixer]
        );
        assert_eq!(
            NutrientCategory::NitrogenFixer.successors(),
            &[NutrientCategory::HeavyFeeder]
        );
        assert!(NutrientCategory::LightFeeder
            .successors()
            .contains(&NutrientCategory::MediumFeeder));
    }

    #[test]
    fn tolerance_range_distance() {
        let range = ToleranceRange::new(5.5, 7.5);
        assert_eq!(range.distance(6.0), 0.0);
        assert!((range.distance(5.0) - 0.5).abs() < 1e-12);
        assert!((range.distance(8.5) - 1.0).abs() < 1e-12);
        assert!((range.midpoint() - 6.5).abs() < 1e-12);
    }

    #[test]
    fn valid_raw_profile_converts() {
        let profile = CropProfile::try_from(raw_maize()).unwrap();
        assert_eq!(profile.name, "Maize");
        assert_eq!(profile.water_need, Level::Medium);
        assert_eq!(profile.price_trend, PriceTrend::Stable);
        assert!(profile.supports_soil(SoilType::Loam));
        assert!(!profile.supports_soil(SoilType::Clay));
        assert!(profile.is_named("  maize "));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let mut raw = raw_maize();
        raw.ph_range = None;
        let err = CropProfile::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("missing ph_range"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let mut raw = raw_maize();
        raw.temperature_range = Some(ToleranceRange::new(35.0, 18.0));
        assert!(CropProfile::try_from(raw).is_err());
    }

    #[test]
    fn empty_soil_list_is_rejected() {
        let mut raw = raw_maize();
        raw.soil_types = Some(Vec::new());
        assert!(CropProfile::try_from(raw).is_err());
    }

    #[test]
    fn profile_deserializes_through_validation() {
        let yaml = r#"
name: Beans
soil_types: [Loam, "Sandy Loam"]
ph_range: { min: 6.0, max: 7.5 }
temperature_range: { min: 18, max: 30 }
rainfall_range: { min: 400, max: 1200 }
season_length_days: 75
nutrient_targets: { nitrogen: 20, phosphorus: 40, potassium: 40 }
investment: Low
family: Legume
nutrient_category: NitrogenFixer
"#;
        let profile: CropProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.family, PlantFamily::Legume);
        assert_eq!(profile.soil_types, vec![SoilType::Loam, SoilType::SandyLoam]);

        let broken = "name: Beans\nsoil_types: [Loam]\n";
        assert!(serde_yaml::from_str::<CropProfile>(broken).is_err());
    }
}
