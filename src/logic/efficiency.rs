use super::calculations::{is_valid_quantity, mean, per_unit};
use crate::config::EfficiencyConfig;
use crate::models::{
    Benchmark, EfficiencyAnalysis, EfficiencyMetric, EfficiencyScores, FieldEfficiency, FieldId,
    FieldInfo, ResourceKind, ResourceUsageMetrics, UsageRecord, YieldRecord,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

const METRICS: [EfficiencyMetric; 5] = [
    EfficiencyMetric::WaterPerHectare,
    EfficiencyMetric::FertilizerPerHectare,
    EfficiencyMetric::YieldPerHectare,
    EfficiencyMetric::WaterPerYield,
    EfficiencyMetric::FertilizerPerYield,
];

#[derive(Default)]
struct FieldTotals {
    resources: BTreeMap<String, f64>,
    water: Option<f64>,
    fertilizer: Option<f64>,
    total_yield: Option<f64>,
}

/// Per-field usage figures scored against the fleet average.
///
/// Scores are relative: 50 means the field matches the benchmark average,
/// 100 means it is at least twice as efficient, 0 means it used effectively
/// unbounded resources per hectare. They say nothing about absolute quality.
pub fn analyze_efficiency(
    usage: &[UsageRecord],
    yields: &[YieldRecord],
    fields: &BTreeMap<FieldId, FieldInfo>,
    config: &EfficiencyConfig,
) -> EfficiencyAnalysis {
    let totals = aggregate(usage, yields, fields);

    let mut analysis = EfficiencyAnalysis::default();
    for (field_id, field_totals) in &totals {
        let Some(info) = fields.get(field_id) else {
            continue;
        };
        analysis.fields.push(field_figures(field_id, info, field_totals));
    }

    for metric in METRICS {
        let values: Vec<f64> = analysis
            .fields
            .iter()
            .filter_map(|f| f.metric(metric))
            .collect();
        if let Some(average) = mean(&values) {
            analysis.benchmarks.insert(
                metric,
                Benchmark {
                    average,
                    min: values.iter().copied().fold(f64::INFINITY, f64::min),
                    max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    samples: values.len(),
                },
            );
        }
    }

    let benchmarks = analysis.benchmarks.clone();
    let score = |field: &FieldEfficiency, metric: EfficiencyMetric| {
        benchmark_score(
            field.metric(metric),
            benchmarks.get(&metric),
            metric.lower_is_better(),
            config.ratio_cap,
        )
    };
    for field in &mut analysis.fields {
        field.scores = EfficiencyScores {
            water: score(field, EfficiencyMetric::WaterPerHectare),
            fertilizer: score(field, EfficiencyMetric::FertilizerPerHectare),
            yield_: score(field, EfficiencyMetric::YieldPerHectare),
        };
    }

    debug!(
        "Analyzed efficiency for {} fields ({} benchmarks)",
        analysis.fields.len(),
        analysis.benchmarks.len()
    );
    analysis
}

/// Sum usage and yield per known field. Unknown fields and invalid
/// quantities are logged and ignored.
fn aggregate(
    usage: &[UsageRecord],
    yields: &[YieldRecord],
    fields: &BTreeMap<FieldId, FieldInfo>,
) -> BTreeMap<FieldId, FieldTotals> {
    let mut totals: BTreeMap<FieldId, FieldTotals> = BTreeMap::new();
    let mut unknown: BTreeSet<&str> = BTreeSet::new();

    for record in usage {
        if !fields.contains_key(&record.field_id) {
            unknown.insert(&record.field_id);
            continue;
        }
        if !is_valid_quantity(record.quantity) {
            warn!(
                "Ignoring invalid {} usage {} on field {}",
                record.resource_type, record.quantity, record.field_id
            );
            continue;
        }

        let entry = totals.entry(record.field_id.clone()).or_default();
        *entry
            .resources
            .entry(record.resource_type.clone())
            .or_insert(0.0) += record.quantity;
        match ResourceKind::classify(&record.resource_type) {
            ResourceKind::Water => *entry.water.get_or_insert(0.0) += record.quantity,
            ResourceKind::Fertilizer => *entry.fertilizer.get_or_insert(0.0) += record.quantity,
            ResourceKind::Other => {}
        }
    }

    for record in yields {
        if !fields.contains_key(&record.field_id) {
            unknown.insert(&record.field_id);
            continue;
        }
        if !is_valid_quantity(record.amount) {
            warn!(
                "Ignoring invalid yield {} on field {}",
                record.amount, record.field_id
            );
            continue;
        }
        let entry = totals.entry(record.field_id.clone()).or_default();
        *entry.total_yield.get_or_insert(0.0) += record.amount;
    }

    for field_id in unknown {
        warn!("Records reference unknown field {}, ignoring", field_id);
    }

    totals
}

fn field_figures(field_id: &str, info: &FieldInfo, totals: &FieldTotals) -> FieldEfficiency {
    let total_yield = totals.total_yield.unwrap_or(0.0);
    let area_ok = info.area_ha.is_finite() && info.area_ha > 0.0;
    if !area_ok {
        warn!(
            "Field {} has non-positive area {}, figures are undefined",
            field_id, info.area_ha
        );
    }

    let per_ha = |total: Option<f64>| total.filter(|_| area_ok).and_then(|t| per_unit(t, info.area_ha));
    let per_yield = |total: Option<f64>| {
        total
            .filter(|_| area_ok)
            .and_then(|t| per_unit(t, total_yield))
    };

    let resources = totals
        .resources
        .iter()
        .map(|(resource_type, total)| {
            (
                resource_type.clone(),
                ResourceUsageMetrics {
                    total: *total,
                    per_hectare: per_ha(Some(*total)),
                    per_yield_unit: per_yield(Some(*total)),
                },
            )
        })
        .collect();

    FieldEfficiency {
        field_id: field_id.to_string(),
        crop: info.crop.clone(),
        area_ha: info.area_ha,
        total_yield,
        yield_per_hectare: per_ha(totals.total_yield),
        water_per_hectare: per_ha(totals.water),
        fertilizer_per_hectare: per_ha(totals.fertilizer),
        water_per_yield: per_yield(totals.water),
        fertilizer_per_yield: per_yield(totals.fertilizer),
        resources,
        scores: EfficiencyScores::default(),
    }
}

/// `clamp(50 × min(ratio, cap), 0, 100)`; undefined without a value or with a
/// zero benchmark.
fn benchmark_score(
    value: Option<f64>,
    benchmark: Option<&Benchmark>,
    lower_is_better: bool,
    ratio_cap: f64,
) -> Option<f64> {
    let value = value?;
    let average = benchmark?.average;
    if average.is_nan() || average <= 0.0 {
        return None;
    }

    let ratio = if lower_is_better {
        if value > 0.0 {
            average / value
        } else {
            ratio_cap
        }
    } else {
        value / average
    };

    Some((50.0 * ratio.min(ratio_cap)).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn fields(entries: &[(&str, f64)]) -> BTreeMap<FieldId, FieldInfo> {
        entries
            .iter()
            .map(|(id, area)| (id.to_string(), FieldInfo::new(*area).with_crop("Maize")))
            .collect()
    }

    #[test]
    fn field_at_benchmark_scores_fifty() {
        let fields = fields(&[("a", 10.0), ("b", 10.0), ("c", 10.0)]);
        let usage = vec![
            UsageRecord::new("a", "Water", 1000.0, day(1)),
            UsageRecord::new("b", "Water", 2000.0, day(1)),
            UsageRecord::new("c", "Water", 3000.0, day(1)),
        ];
        let analysis = analyze_efficiency(&usage, &[], &fields, &EfficiencyConfig::default());

        let bench = analysis.benchmark(EfficiencyMetric::WaterPerHectare).unwrap();
        assert_eq!(bench.average, 200.0);
        assert_eq!(bench.min, 100.0);
        assert_eq!(bench.max, 300.0);
        assert_eq!(bench.samples, 3);

        assert_eq!(analysis.field("b").unwrap().scores.water, Some(50.0));
        assert_eq!(analysis.field("a").unwrap().scores.water, Some(100.0));
        let c = analysis.field("c").unwrap().scores.water.unwrap();
        assert!((c - 50.0 * 200.0 / 300.0).abs() < 1e-9);
    }

    #[test]
    fn higher_yield_scores_higher() {
        let fields = fields(&[("a", 2.0), ("b", 2.0)]);
        let yields = vec![
            YieldRecord::new("a", 10.0, day(20)),
            YieldRecord::new("b", 30.0, day(20)),
        ];
        let analysis = analyze_efficiency(&[], &yields, &fields, &EfficiencyConfig::default());
        let a = analysis.field("a").unwrap().scores.yield_.unwrap();
        let b = analysis.field("b").unwrap().scores.yield_.unwrap();
        assert_eq!(a, 25.0);
        assert_eq!(b, 75.0);
    }

    #[test]
    fn zero_yield_leaves_per_yield_undefined() {
        let fields = fields(&[("dry", 5.0), ("wet", 5.0)]);
        let usage = vec![
            UsageRecord::new("dry", "Water", 500.0, day(1)),
            UsageRecord::new("wet", "Water", 500.0, day(1)),
            UsageRecord::new("dry", "NPK Fertilizer", 50.0, day(2)),
        ];
        let yields = vec![
            YieldRecord::new("dry", 0.0, day(28)),
            YieldRecord::new("wet", 20.0, day(28)),
        ];
        let analysis = analyze_efficiency(&usage, &yields, &fields, &EfficiencyConfig::default());

        let dry = analysis.field("dry").unwrap();
        assert_eq!(dry.total_yield, 0.0);
        assert_eq!(dry.water_per_yield, None);
        assert_eq!(dry.fertilizer_per_yield, None);
        assert_eq!(dry.resources["Water"].per_yield_unit, None);
        assert_eq!(dry.yield_per_hectare, Some(0.0));
        assert_eq!(dry.scores.yield_, Some(0.0));

        let bench = analysis.benchmark(EfficiencyMetric::WaterPerYield).unwrap();
        assert_eq!(bench.samples, 1);
        assert!(bench.average.is_finite());
    }

    #[test]
    fn zero_benchmark_gives_undefined_score() {
        let fields = fields(&[("a", 1.0), ("b", 1.0)]);
        let yields = vec![
            YieldRecord::new("a", 0.0, day(1)),
            YieldRecord::new("b", 0.0, day(1)),
        ];
        let analysis = analyze_efficiency(&[], &yields, &fields, &EfficiencyConfig::default());
        assert_eq!(analysis.field("a").unwrap().scores.yield_, None);
    }

    #[test]
    fn non_positive_area_is_excluded_from_benchmarks() {
        let fields = fields(&[("good", 10.0), ("broken", 0.0)]);
        let usage = vec![
            UsageRecord::new("good", "Water", 1000.0, day(1)),
            UsageRecord::new("broken", "Water", 99999.0, day(1)),
        ];
        let analysis = analyze_efficiency(&usage, &[], &fields, &EfficiencyConfig::default());

        let broken = analysis.field("broken").unwrap();
        assert_eq!(broken.water_per_hectare, None);
        assert_eq!(broken.scores.water, None);
        let bench = analysis.benchmark(EfficiencyMetric::WaterPerHectare).unwrap();
        assert_eq!(bench.samples, 1);
        assert_eq!(bench.average, 100.0);
    }

    #[test]
    fn unknown_fields_and_silent_fields_are_omitted() {
        let fields = fields(&[("a", 1.0), ("idle", 1.0)]);
        let usage = vec![
            UsageRecord::new("a", "Water", 10.0, day(1)),
            UsageRecord::new("ghost", "Water", 10.0, day(1)),
        ];
        let analysis = analyze_efficiency(&usage, &[], &fields, &EfficiencyConfig::default());
        assert_eq!(analysis.fields.len(), 1);
        assert!(analysis.field("idle").is_none());
        assert!(analysis.field("ghost").is_none());
    }

    #[test]
    fn fertilizer_types_are_pooled() {
        let fields = fields(&[("a", 2.0)]);
        let usage = vec![
            UsageRecord::new("a", "Nitrogen Fertilizer", 30.0, day(1)),
            UsageRecord::new("a", "Potash fertilizer", 10.0, day(2)),
            UsageRecord::new("a", "Seed", 5.0, day(2)),
        ];
        let analysis = analyze_efficiency(&usage, &[], &fields, &EfficiencyConfig::default());
        let a = analysis.field("a").unwrap();
        assert_eq!(a.fertilizer_per_hectare, Some(20.0));
        assert_eq!(a.water_per_hectare, None);
        assert_eq!(a.resources["Seed"].per_hectare, Some(2.5));
        // only field, so it sits at the benchmark
        assert_eq!(a.scores.fertilizer, Some(50.0));
    }

    #[test]
    fn empty_input_gives_empty_analysis() {
        let analysis =
            analyze_efficiency(&[], &[], &BTreeMap::new(), &EfficiencyConfig::default());
        assert!(analysis.is_empty());
        assert!(analysis.benchmarks.is_empty());
    }

    fn arb_farm() -> impl Strategy<
        Value = (Vec<UsageRecord>, Vec<YieldRecord>, BTreeMap<FieldId, FieldInfo>),
    > {
        prop::collection::vec(
            (0.0f64..50.0, 0.0f64..5000.0, 0.0f64..300.0, 0.0f64..40.0, 1u32..29),
            1..8,
        )
        .prop_map(|entries| {
            let mut usage = Vec::new();
            let mut yields = Vec::new();
            let mut fields = BTreeMap::new();
            for (i, (area, water, fertilizer, harvest, d)) in entries.into_iter().enumerate() {
                let id = format!("field-{}", i);
                usage.push(UsageRecord::new(&id, "Water", water, day(d)));
                usage.push(UsageRecord::new(&id, "NPK Fertilizer", fertilizer, day(d)));
                yields.push(YieldRecord::new(&id, harvest, day(d + 1)));
                fields.insert(id, FieldInfo::new(area).with_crop("Maize"));
            }
            (usage, yields, fields)
        })
    }

    proptest! {
        #[test]
        fn efficiency_is_deterministic(farm in arb_farm()) {
            let (usage, yields, fields) = farm;
            let config = EfficiencyConfig::default();
            let first = analyze_efficiency(&usage, &yields, &fields, &config);
            let second = analyze_efficiency(&usage, &yields, &fields, &config);
            prop_assert_eq!(first, second);
        }
    }
}
