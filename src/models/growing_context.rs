use super::crop_profile::{InvestmentTier, NutrientLevels, SoilType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IrrigationTier {
    None,
    #[default]
    Limited,
    Adequate,
    Abundant,
}

impl IrrigationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrigationTier::None => "None",
            IrrigationTier::Limited => "Limited",
            IrrigationTier::Adequate => "Adequate",
            IrrigationTier::Abundant => "Abundant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "rainfed" => Some(IrrigationTier::None),
            "limited" => Some(IrrigationTier::Limited),
            "adequate" => Some(IrrigationTier::Adequate),
            "abundant" => Some(IrrigationTier::Abundant),
            _ => None,
        }
    }
}

impl std::fmt::Display for IrrigationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketAccess {
    Poor,
    #[default]
    Fair,
    Good,
    Excellent,
}

impl MarketAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketAccess::Poor => "Poor",
            MarketAccess::Fair => "Fair",
            MarketAccess::Good => "Good",
            MarketAccess::Excellent => "Excellent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "poor" => Some(MarketAccess::Poor),
            "fair" => Some(MarketAccess::Fair),
            "good" => Some(MarketAccess::Good),
            "excellent" => Some(MarketAccess::Excellent),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarketAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grower objective that tilts the ranking toward matching crops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Profit,
    Sustainability,
    RiskMinimization,
    WaterEfficiency,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Profit => "Profit",
            Priority::Sustainability => "Sustainability",
            Priority::RiskMinimization => "Risk Minimization",
            Priority::WaterEfficiency => "Water Efficiency",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' ', '_'], "").as_str() {
            "profit" | "maximizeprofit" => Some(Priority::Profit),
            "sustainability" => Some(Priority::Sustainability),
            "riskminimization" | "minimizerisk" => Some(Priority::RiskMinimization),
            "waterefficiency" => Some(Priority::WaterEfficiency),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one field's environment and management capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowingContext {
    pub soil_type: SoilType,
    pub soil_ph: f64,
    pub nutrients: NutrientLevels,
    /// Annual rainfall in mm.
    pub annual_rainfall_mm: f64,
    /// Average growing-season temperature in °C.
    pub avg_temperature_c: f64,
    #[serde(default)]
    pub irrigation: IrrigationTier,
    #[serde(default)]
    pub market_access: MarketAccess,
    pub investment_capacity: InvestmentTier,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub land_area_ha: Option<f64>,
    #[serde(default)]
    pub previous_crops: Vec<String>,
}

impl GrowingContext {
    pub fn new(
        soil_type: SoilType,
        soil_ph: f64,
        nutrients: NutrientLevels,
        annual_rainfall_mm: f64,
        avg_temperature_c: f64,
        investment_capacity: InvestmentTier,
    ) -> Self {
        Self {
            soil_type,
            soil_ph,
            nutrients,
            annual_rainfall_mm,
            avg_temperature_c,
            irrigation: IrrigationTier::default(),
            market_access: MarketAccess::default(),
            investment_capacity,
            priority: None,
            land_area_ha: None,
            previous_crops: Vec::new(),
        }
    }

    pub fn with_irrigation(mut self, irrigation: IrrigationTier) -> Self {
        self.irrigation = irrigation;
        self
    }

    pub fn with_market_access(mut self, access: MarketAccess) -> Self {
        self.market_access = access;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_land_area(mut self, hectares: f64) -> Self {
        self.land_area_ha = Some(hectares);
        self
    }

    pub fn with_previous_crop(mut self, crop: &str) -> Self {
        self.previous_crops.push(crop.to_string());
        self
    }

    pub fn grew_previously(&self, crop: &str) -> bool {
        self.previous_crops
            .iter()
            .any(|c| c.trim().eq_ignore_ascii_case(crop))
    }
}
