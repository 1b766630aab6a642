use super::recommendation::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceProjection {
    pub resource_type: String,
    pub unit: String,
    pub current_quantity: f64,
    pub daily_usage: f64,
    pub projected_quantity: f64,
    /// Undefined when nothing is being consumed.
    pub days_until_depletion: Option<f64>,
    /// Sample standard deviation of per-day totals.
    pub variability: f64,
    pub window_usage: f64,
    /// Least-squares slope of daily usage normalized by mean daily usage.
    pub usage_trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepletionAlert {
    pub resource_type: String,
    pub days_remaining: f64,
    pub current_quantity: f64,
    pub unit: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub projections: Vec<ResourceProjection>,
    pub alerts: Vec<DepletionAlert>,
}

impl ProjectionReport {
    pub fn projection(&self, resource_type: &str) -> Option<&ResourceProjection> {
        self.projections
            .iter()
            .find(|p| p.resource_type == resource_type)
    }
}
