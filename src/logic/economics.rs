use super::calculations::{is_valid_quantity, per_unit};
use crate::models::{
    CostBreakdown, FieldHarvest, FieldId, FieldInfo, FieldRoi, ResourceRoi, RoiReport,
    UsageRecord,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Unit prices keyed by resource type or crop name.
pub type PriceTable = BTreeMap<String, f64>;

fn lookup(table: &PriceTable, key: &str) -> Option<f64> {
    table
        .get(key)
        .or_else(|| {
            table
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key.trim()))
                .map(|(_, price)| price)
        })
        .copied()
        .filter(|price| is_valid_quantity(*price))
}

/// Cost of one usage record, if the resource has a usable unit cost.
fn usage_cost(record: &UsageRecord, unit_costs: &PriceTable) -> Option<f64> {
    if !is_valid_quantity(record.quantity) {
        warn!(
            "Ignoring invalid {} usage {} on field {}",
            record.resource_type, record.quantity, record.field_id
        );
        return None;
    }
    lookup(unit_costs, &record.resource_type).map(|unit| record.quantity * unit)
}

/// Return on investment per field and per resource type.
///
/// Revenue is yield × crop price. Revenue is attributed to each resource in
/// proportion to its share of the field's cost. Harvests without a crop price
/// or with no yield are skipped.
pub fn return_on_investment(
    unit_costs: &PriceTable,
    crop_prices: &PriceTable,
    usage: &[UsageRecord],
    harvests: &[FieldHarvest],
) -> RoiReport {
    let mut report = RoiReport {
        resources: unit_costs
            .keys()
            .map(|rt| (rt.clone(), ResourceRoi::default()))
            .collect(),
        ..Default::default()
    };

    let mut merged: BTreeMap<&str, (&str, f64)> = BTreeMap::new();
    for harvest in harvests {
        let entry = merged
            .entry(harvest.field_id.as_str())
            .or_insert((harvest.crop.as_str(), 0.0));
        if !entry.0.eq_ignore_ascii_case(&harvest.crop) {
            warn!(
                "Field {} has harvests for both {} and {}, keeping {}",
                harvest.field_id, entry.0, harvest.crop, entry.0
            );
            continue;
        }
        if is_valid_quantity(harvest.yield_amount) {
            entry.1 += harvest.yield_amount;
        }
    }

    for (field_id, (crop, yield_amount)) in merged {
        let Some(price) = lookup(crop_prices, crop) else {
            debug!("No price for {}, skipping field {}", crop, field_id);
            continue;
        };
        if yield_amount <= 0.0 {
            debug!("No yield on field {}, skipping", field_id);
            continue;
        }

        let revenue = yield_amount * price;
        let mut resource_costs: BTreeMap<String, f64> = BTreeMap::new();
        for record in usage.iter().filter(|r| r.field_id == field_id) {
            if let Some(cost) = usage_cost(record, unit_costs) {
                *resource_costs
                    .entry(record.resource_type.clone())
                    .or_insert(0.0) += cost;
            }
        }
        let total_cost: f64 = resource_costs.values().sum();

        for (resource_type, cost) in &resource_costs {
            let metrics = report.resources.entry(resource_type.clone()).or_default();
            metrics.cost += cost;
            if let Some(share) = per_unit(*cost, total_cost) {
                metrics.contribution += revenue * share;
            }
        }

        report.total_cost += total_cost;
        report.total_revenue += revenue;
        report.fields.push(FieldRoi {
            field_id: field_id.to_string(),
            crop: crop.to_string(),
            yield_amount,
            revenue,
            total_cost,
            resource_costs,
            roi: per_unit(revenue - total_cost, total_cost),
        });
    }

    for metrics in report.resources.values_mut() {
        metrics.roi = per_unit(metrics.contribution - metrics.cost, metrics.cost);
    }
    report.overall_roi = per_unit(
        report.total_revenue - report.total_cost,
        report.total_cost,
    );

    report
}

/// Resource spending by type, field, crop and calendar month.
/// Usage of resources without a unit cost is ignored.
pub fn cost_breakdown(
    usage: &[UsageRecord],
    unit_costs: &PriceTable,
    fields: &BTreeMap<FieldId, FieldInfo>,
) -> CostBreakdown {
    let mut breakdown = CostBreakdown::default();

    for record in usage {
        let Some(cost) = usage_cost(record, unit_costs) else {
            continue;
        };
        let resource_type = record.resource_type.as_str();

        breakdown.totals.add(resource_type, cost);
        breakdown
            .by_field
            .entry(record.field_id.clone())
            .or_default()
            .line
            .add(resource_type, cost);

        if let Some(crop) = fields.get(&record.field_id).and_then(|f| f.crop.as_ref()) {
            breakdown
                .by_crop
                .entry(crop.clone())
                .or_default()
                .add(resource_type, cost);
        }

        breakdown
            .by_month
            .entry(record.date.format("%Y-%m").to_string())
            .or_default()
            .add(resource_type, cost);
    }

    for (field_id, field_cost) in breakdown.by_field.iter_mut() {
        field_cost.cost_per_hectare = fields
            .get(field_id)
            .and_then(|f| per_unit(field_cost.line.total, f.area_ha));
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn prices(entries: &[(&str, f64)]) -> PriceTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn harvest(field: &str, crop: &str, amount: f64) -> FieldHarvest {
        FieldHarvest {
            field_id: field.to_string(),
            crop: crop.to_string(),
            yield_amount: amount,
            harvest_date: None,
        }
    }

    #[test]
    fn roi_per_field_and_resource() {
        let costs = prices(&[("Water", 0.5), ("Fertilizer", 2.0)]);
        let crop_prices = prices(&[("Maize", 200.0)]);
        let usage = vec![
            UsageRecord::new("north", "Water", 400.0, date(5, 1)),
            UsageRecord::new("north", "Fertilizer", 100.0, date(5, 2)),
            UsageRecord::new("north", "Labor", 10.0, date(5, 2)),
        ];
        let harvests = vec![harvest("north", "maize", 5.0)];

        let report = return_on_investment(&costs, &crop_prices, &usage, &harvests);
        let north = &report.fields[0];
        assert_eq!(north.revenue, 1000.0);
        assert_eq!(north.total_cost, 400.0);
        assert_eq!(north.roi, Some(1.5));
        assert!(!north.resource_costs.contains_key("Labor"));

        let water = &report.resources["Water"];
        assert_eq!(water.cost, 200.0);
        assert_eq!(water.contribution, 500.0);
        assert_eq!(water.roi, Some(1.5));
        assert_eq!(report.overall_roi, Some(1.5));
    }

    #[test]
    fn roi_undefined_without_cost() {
        let report = return_on_investment(
            &prices(&[("Water", 1.0)]),
            &prices(&[("Beans", 100.0)]),
            &[],
            &[harvest("east", "Beans", 2.0)],
        );
        assert_eq!(report.fields[0].roi, None);
        assert_eq!(report.overall_roi, None);
        assert_eq!(report.resources["Water"].roi, None);
    }

    #[test]
    fn unpriced_or_empty_harvests_are_skipped() {
        let report = return_on_investment(
            &prices(&[("Water", 1.0)]),
            &prices(&[("Maize", 100.0)]),
            &[],
            &[harvest("a", "Cotton", 5.0), harvest("b", "Maize", 0.0)],
        );
        assert!(report.fields.is_empty());
        assert_eq!(report.total_revenue, 0.0);
    }

    #[test]
    fn cost_breakdown_groups_by_field_crop_and_month() {
        let costs = prices(&[("Water", 0.5), ("Seed", 4.0)]);
        let fields: BTreeMap<FieldId, FieldInfo> = [
            ("north".to_string(), FieldInfo::new(2.0).with_crop("Maize")),
            ("south".to_string(), FieldInfo::new(0.0)),
        ]
        .into_iter()
        .collect();
        let usage = vec![
            UsageRecord::new("north", "Water", 100.0, date(4, 30)),
            UsageRecord::new("north", "Seed", 10.0, date(5, 1)),
            UsageRecord::new("south", "Water", 20.0, date(5, 3)),
            UsageRecord::new("south", "Diesel", 20.0, date(5, 3)),
        ];

        let breakdown = cost_breakdown(&usage, &costs, &fields);
        assert_eq!(breakdown.totals.total, 100.0);
        assert_eq!(breakdown.totals.by_resource["Water"], 60.0);
        assert!(!breakdown.totals.by_resource.contains_key("Diesel"));

        let north = &breakdown.by_field["north"];
        assert_eq!(north.total(), 90.0);
        assert_eq!(north.cost_per_hectare, Some(45.0));
        assert_eq!(breakdown.by_field["south"].cost_per_hectare, None);

        assert_eq!(breakdown.by_crop["Maize"].total, 90.0);
        assert_eq!(breakdown.by_crop.len(), 1);
        assert_eq!(breakdown.by_month["2024-04"].total, 50.0);
        assert_eq!(breakdown.by_month["2024-05"].total, 50.0);
    }
}
