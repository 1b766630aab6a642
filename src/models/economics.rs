use super::resource::FieldId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Harvest outcome of one field, used for return-on-investment figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldHarvest {
    pub field_id: FieldId,
    pub crop: String,
    pub yield_amount: f64,
    #[serde(default)]
    pub harvest_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRoi {
    pub field_id: FieldId,
    pub crop: String,
    pub yield_amount: f64,
    pub revenue: f64,
    pub total_cost: f64,
    pub resource_costs: BTreeMap<String, f64>,
    /// (revenue - cost) / cost; undefined when nothing was spent.
    pub roi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRoi {
    pub cost: f64,
    /// Revenue attributed to this resource in proportion to its cost share.
    pub contribution: f64,
    pub roi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoiReport {
    pub fields: Vec<FieldRoi>,
    pub resources: BTreeMap<String, ResourceRoi>,
    pub total_cost: f64,
    pub total_revenue: f64,
    pub overall_roi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub by_resource: BTreeMap<String, f64>,
    pub total: f64,
}

impl CostLine {
    pub fn add(&mut self, resource_type: &str, cost: f64) {
        *self.by_resource.entry(resource_type.to_string()).or_insert(0.0) += cost;
        self.total += cost;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldCost {
    #[serde(flatten)]
    pub line: CostLine,
    pub cost_per_hectare: Option<f64>,
}

impl FieldCost {
    pub fn total(&self) -> f64 {
        self.line.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub totals: CostLine,
    pub by_field: BTreeMap<FieldId, FieldCost>,
    pub by_crop: BTreeMap<String, CostLine>,
    /// Keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, CostLine>,
}
