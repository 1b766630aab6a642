use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use tracing::warn;

pub type FieldId = String;

/// Coarse grouping of resource types used for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Water,
    Fertilizer,
    Other,
}

impl ResourceKind {
    /// "Water" matches exactly; any type mentioning fertilizer counts as fertilizer.
    pub fn classify(resource_type: &str) -> Self {
        let lower = resource_type.trim().to_lowercase();
        if lower == "water" {
            ResourceKind::Water
        } else if lower.contains("fertilizer") || lower.contains("fertiliser") {
            ResourceKind::Fertilizer
        } else {
            ResourceKind::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Water => "Water",
            ResourceKind::Fertilizer => "Fertilizer",
            ResourceKind::Other => "Other",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quantity of one resource type currently on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceStock {
    pub resource_type: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    /// Inventory level below which a restock is advised.
    #[serde(default)]
    pub reorder_threshold: Option<f64>,
}

impl ResourceStock {
    pub fn new(resource_type: &str, quantity: f64, unit: &str) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            quantity,
            unit: unit.to_string(),
            reorder_threshold: None,
        }
    }

    pub fn with_reorder_threshold(mut self, threshold: f64) -> Self {
        self.reorder_threshold = Some(threshold);
        self
    }
}

/// Read-only snapshot of available resources, keyed by resource type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ResourceStock>", into = "Vec<ResourceStock>")]
pub struct ResourcePool {
    stocks: BTreeMap<String, ResourceStock>,
}

impl ResourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stock(mut self, stock: ResourceStock) -> Self {
        self.stocks.insert(stock.resource_type.clone(), stock);
        self
    }

    pub fn with_quantity(self, resource_type: &str, quantity: f64) -> Self {
        self.with_stock(ResourceStock::new(resource_type, quantity, ""))
    }

    pub fn get(&self, resource_type: &str) -> Option<&ResourceStock> {
        self.stocks.get(resource_type)
    }

    /// Usable quantity; missing, negative or non-finite stock counts as zero.
    pub fn available(&self, resource_type: &str) -> f64 {
        self.stocks
            .get(resource_type)
            .map_or(0.0, |s| usable(s.quantity))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceStock> {
        self.stocks.values()
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.stocks.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

fn usable(quantity: f64) -> f64 {
    if quantity.is_finite() && quantity > 0.0 {
        quantity
    } else {
        0.0
    }
}

/// Repeated entries for one resource type are summed, keeping the first
/// entry's unit and reorder threshold.
impl From<Vec<ResourceStock>> for ResourcePool {
    fn from(stocks: Vec<ResourceStock>) -> Self {
        let mut pool = ResourcePool::new();
        for stock in stocks {
            match pool.stocks.entry(stock.resource_type.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(stock);
                }
                Entry::Occupied(mut slot) => {
                    warn!(
                        "Duplicate stock entry for {}, summing quantities",
                        stock.resource_type
                    );
                    let existing = slot.get_mut();
                    existing.quantity = usable(existing.quantity) + usable(stock.quantity);
                    if existing.reorder_threshold.is_none() {
                        existing.reorder_threshold = stock.reorder_threshold;
                    }
                }
            }
        }
        pool
    }
}

impl From<ResourcePool> for Vec<ResourceStock> {
    fn from(pool: ResourcePool) -> Self {
        pool.stocks.into_values().collect()
    }
}

fn default_priority() -> f64 {
    1.0
}

/// One field's uncapped resource needs for an allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub field_id: FieldId,
    pub needs: BTreeMap<String, f64>,
    #[serde(default = "default_priority")]
    pub priority: f64,
}

impl ResourceRequest {
    pub fn new(field_id: &str) -> Self {
        Self {
            field_id: field_id.to_string(),
            needs: BTreeMap::new(),
            priority: default_priority(),
        }
    }

    pub fn with_need(mut self, resource_type: &str, quantity: f64) -> Self {
        self.needs.insert(resource_type.to_string(), quantity);
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceTotals {
    pub available: f64,
    pub requested: f64,
    pub allocated: f64,
    pub shortage: f64,
    /// True when the conservation step had to scale allocations down.
    pub rebalanced: bool,
}

impl ResourceTotals {
    /// Share of the available pool handed out, undefined for an empty pool.
    pub fn utilization(&self) -> Option<f64> {
        (self.available > 0.0).then(|| self.allocated / self.available)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub allocations: BTreeMap<FieldId, BTreeMap<String, f64>>,
    pub shortages: BTreeMap<String, f64>,
    pub totals: BTreeMap<String, ResourceTotals>,
}

impl AllocationPlan {
    pub fn allocated(&self, field_id: &str, resource_type: &str) -> f64 {
        self.allocations
            .get(field_id)
            .and_then(|r| r.get(resource_type))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn total_allocated(&self, resource_type: &str) -> f64 {
        self.allocations
            .values()
            .filter_map(|r| r.get(resource_type))
            .sum()
    }

    pub fn has_shortage(&self) -> bool {
        self.shortages.values().any(|s| *s > 0.0)
    }
}

/// Observed consumption of a resource on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub field_id: FieldId,
    pub resource_type: String,
    pub quantity: f64,
    pub date: NaiveDate,
}

impl UsageRecord {
    pub fn new(field_id: &str, resource_type: &str, quantity: f64, date: NaiveDate) -> Self {
        Self {
            field_id: field_id.to_string(),
            resource_type: resource_type.to_string(),
            quantity,
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldRecord {
    pub field_id: FieldId,
    pub harvest_date: NaiveDate,
    pub amount: f64,
}

impl YieldRecord {
    pub fn new(field_id: &str, amount: f64, harvest_date: NaiveDate) -> Self {
        Self {
            field_id: field_id.to_string(),
            harvest_date,
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub area_ha: f64,
    #[serde(default)]
    pub crop: Option<String>,
}

impl FieldInfo {
    pub fn new(area_ha: f64) -> Self {
        Self { area_ha, crop: None }
    }

    pub fn with_crop(mut self, crop: &str) -> Self {
        self.crop = Some(crop.to_string());
        self
    }
}
