use super::calculations::{is_valid_quantity, linear_slope, mean, sample_std_dev};
use crate::config::ProjectionConfig;
use crate::models::{
    DepletionAlert, ProjectionReport, ResourcePool, ResourceProjection, Severity, UsageRecord,
};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Project stock levels from recent consumption.
///
/// Only usage dated within `window_days` up to and including `as_of` counts.
/// Resources with no usage in the window are left out of the report.
pub fn project_usage(
    pool: &ResourcePool,
    usage: &[UsageRecord],
    as_of: NaiveDate,
    config: &ProjectionConfig,
) -> ProjectionReport {
    let window_start = as_of - Duration::days(i64::from(config.window_days));
    let mut report = ProjectionReport::default();

    for stock in pool.iter() {
        let recent: Vec<&UsageRecord> = usage
            .iter()
            .filter(|r| r.resource_type == stock.resource_type)
            .filter(|r| r.date >= window_start && r.date <= as_of)
            .filter(|r| {
                let valid = is_valid_quantity(r.quantity);
                if !valid {
                    warn!(
                        "Ignoring invalid {} usage {} on {}",
                        r.resource_type, r.quantity, r.date
                    );
                }
                valid
            })
            .collect();

        let Some(earliest) = recent.iter().map(|r| r.date).min() else {
            continue;
        };

        let window_usage: f64 = recent.iter().map(|r| r.quantity).sum();
        let days_span = (as_of - earliest).num_days().max(1) as f64;
        let daily_usage = window_usage / days_span;

        let mut per_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in &recent {
            *per_day.entry(record.date).or_insert(0.0) += record.quantity;
        }
        let daily_totals: Vec<f64> = per_day.values().copied().collect();

        let current_quantity = pool.available(&stock.resource_type);
        let days_until_depletion = (daily_usage > 0.0).then(|| current_quantity / daily_usage);
        let projected_quantity =
            (current_quantity - daily_usage * f64::from(config.horizon_days)).max(0.0);

        let usage_trend = if recent.len() >= config.min_trend_records
            && per_day.len() >= config.min_trend_days
        {
            usage_trend(&per_day)
        } else {
            0.0
        };

        if let Some(days) = days_until_depletion {
            if days > 0.0 && days < config.alert_days {
                report.alerts.push(DepletionAlert {
                    resource_type: stock.resource_type.clone(),
                    days_remaining: days,
                    current_quantity,
                    unit: stock.unit.clone(),
                    severity: if days < config.critical_days {
                        Severity::Critical
                    } else {
                        Severity::Warning
                    },
                });
            }
        }

        report.projections.push(ResourceProjection {
            resource_type: stock.resource_type.clone(),
            unit: stock.unit.clone(),
            current_quantity,
            daily_usage,
            projected_quantity,
            days_until_depletion,
            variability: sample_std_dev(&daily_totals),
            window_usage,
            usage_trend,
        });
    }

    report.alerts.sort_by(|a, b| {
        a.days_remaining
            .total_cmp(&b.days_remaining)
            .then_with(|| a.resource_type.cmp(&b.resource_type))
    });

    debug!(
        "Projected {} resources, {} depletion alerts",
        report.projections.len(),
        report.alerts.len()
    );
    report
}

/// Least-squares slope of daily totals normalized by their mean, so 0.05
/// means usage grows about 5% of a typical day's use per day.
fn usage_trend(per_day: &BTreeMap<NaiveDate, f64>) -> f64 {
    let Some(first) = per_day.keys().next().copied() else {
        return 0.0;
    };
    let points: Vec<(f64, f64)> = per_day
        .iter()
        .map(|(date, qty)| ((*date - first).num_days() as f64, *qty))
        .collect();
    let values: Vec<f64> = points.iter().map(|(_, y)| *y).collect();

    match (linear_slope(&points), mean(&values)) {
        (Some(slope), Some(avg)) if avg > 0.0 => slope / avg,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceStock;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn pool() -> ResourcePool {
        ResourcePool::new()
            .with_stock(ResourceStock::new("Water", 100.0, "m3"))
            .with_stock(ResourceStock::new("Seed", 1000.0, "kg"))
            .with_stock(ResourceStock::new("Diesel", 50.0, "L"))
    }

    #[test]
    fn daily_average_and_depletion() {
        // 10 days before as_of, 200 m3 total
        let usage = vec![
            UsageRecord::new("north", "Water", 120.0, date(21)),
            UsageRecord::new("south", "Water", 80.0, date(26)),
        ];
        let report = project_usage(&pool(), &usage, date(31), &ProjectionConfig::default());

        let water = report.projection("Water").unwrap();
        assert_eq!(water.window_usage, 200.0);
        assert_eq!(water.daily_usage, 20.0);
        assert_eq!(water.days_until_depletion, Some(5.0));
        assert_eq!(water.projected_quantity, 0.0);
        assert_eq!(water.unit, "m3");

        assert_eq!(report.alerts.len(), 1);
        assert_eq!(report.alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn resources_without_recent_usage_are_skipped() {
        let usage = vec![UsageRecord::new("north", "Seed", 10.0, date(1))];
        let as_of = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let report = project_usage(&pool(), &usage, as_of, &ProjectionConfig::default());
        assert!(report.projections.is_empty());
        assert!(report.alerts.is_empty());
    }

    #[test]
    fn alerts_sorted_by_days_remaining() {
        // Water 10 days left, Diesel ~3.3, Seed 1000
        let usage = vec![
            UsageRecord::new("a", "Water", 100.0, date(21)),
            UsageRecord::new("a", "Diesel", 50.0, date(21)),
            UsageRecord::new("a", "Seed", 10.0, date(21)),
            UsageRecord::new("a", "Diesel", 100.0, date(30)),
        ];
        let report = project_usage(&pool(), &usage, date(31), &ProjectionConfig::default());
        let kinds: Vec<&str> = report
            .alerts
            .iter()
            .map(|a| a.resource_type.as_str())
            .collect();
        assert_eq!(kinds, vec!["Diesel", "Water"]);
        assert_eq!(report.alerts[0].severity, Severity::Critical);
        assert_eq!(report.alerts[1].severity, Severity::Warning);
    }

    #[test]
    fn same_day_usage_uses_one_day_span() {
        let usage = vec![UsageRecord::new("a", "Seed", 30.0, date(31))];
        let report = project_usage(&pool(), &usage, date(31), &ProjectionConfig::default());
        let seed = report.projection("Seed").unwrap();
        assert_eq!(seed.daily_usage, 30.0);
        assert_eq!(seed.variability, 0.0);
    }

    #[test]
    fn trend_requires_enough_history() {
        let few = vec![
            UsageRecord::new("a", "Seed", 10.0, date(20)),
            UsageRecord::new("a", "Seed", 20.0, date(25)),
        ];
        let report = project_usage(&pool(), &few, date(31), &ProjectionConfig::default());
        assert_eq!(report.projection("Seed").unwrap().usage_trend, 0.0);
    }

    #[test]
    fn rising_usage_has_positive_trend() {
        let usage: Vec<UsageRecord> = (0..6u32)
            .map(|i| UsageRecord::new("a", "Seed", 10.0 + 2.0 * i as f64, date(20 + i)))
            .collect();
        let report = project_usage(&pool(), &usage, date(31), &ProjectionConfig::default());
        let seed = report.projection("Seed").unwrap();
        // slope 2 over mean 15
        assert!((seed.usage_trend - 2.0 / 15.0).abs() < 1e-9);
        assert!(seed.variability > 0.0);
    }

    #[test]
    fn future_and_invalid_records_are_ignored() {
        let usage = vec![
            UsageRecord::new("a", "Seed", 10.0, date(30)),
            UsageRecord::new("a", "Seed", -5.0, date(30)),
            UsageRecord::new("a", "Seed", 500.0, NaiveDate::from_ymd_opt(2024, 6, 5).unwrap()),
        ];
        let report = project_usage(&pool(), &usage, date(31), &ProjectionConfig::default());
        assert_eq!(report.projection("Seed").unwrap().window_usage, 10.0);
    }
}
