use super::calculations::is_valid_quantity;
use crate::config::SeasonalityConfig;
use crate::models::{
    ResourceSeasonality, Season, SeasonalIntensity, SeasonalPattern, SeasonalityReport,
    UsageRecord,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, warn};

const SEASONS: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

/// Monthly usage profile of each resource type over the last `years` years
/// up to and including `as_of`.
///
/// Usage is summed per calendar month and divided by `years`, so each month
/// reads as a typical year's consumption. A pattern is only named once
/// `min_months` distinct months have usage.
pub fn analyze_seasonality(
    usage: &[UsageRecord],
    as_of: NaiveDate,
    config: &SeasonalityConfig,
) -> SeasonalityReport {
    let years = config.years.max(1);
    let since = as_of - Duration::days(365 * i64::from(years));

    let mut monthly: BTreeMap<&str, BTreeMap<u32, f64>> = BTreeMap::new();
    for record in usage {
        if record.date < since || record.date > as_of {
            continue;
        }
        if !is_valid_quantity(record.quantity) {
            warn!(
                "Ignoring invalid {} usage {} on {}",
                record.resource_type, record.quantity, record.date
            );
            continue;
        }
        *monthly
            .entry(record.resource_type.as_str())
            .or_default()
            .entry(record.date.month())
            .or_insert(0.0) += record.quantity;
    }

    let resources: BTreeMap<String, ResourceSeasonality> = monthly
        .into_iter()
        .map(|(resource_type, totals)| {
            let monthly_averages: BTreeMap<u32, f64> = totals
                .into_iter()
                .map(|(month, total)| (month, total / f64::from(years)))
                .collect();
            let pattern = classify(&monthly_averages, config);
            let seasonality = ResourceSeasonality {
                resource_type: resource_type.to_string(),
                label: pattern.label(),
                monthly_averages,
                pattern,
            };
            (resource_type.to_string(), seasonality)
        })
        .collect();

    debug!(
        "Seasonality for {} resources since {}",
        resources.len(),
        since
    );
    SeasonalityReport {
        as_of,
        since,
        years,
        resources,
    }
}

fn classify(monthly: &BTreeMap<u32, f64>, config: &SeasonalityConfig) -> SeasonalPattern {
    let insufficient = SeasonalPattern::InsufficientData {
        months_observed: monthly.len(),
    };
    if monthly.len() < config.min_months {
        return insufficient;
    }

    let average = monthly.values().sum::<f64>() / monthly.len() as f64;
    if average <= 0.0 {
        return SeasonalPattern::NoUsage;
    }

    let season_average = |season: Season| {
        season
            .months()
            .iter()
            .map(|m| monthly.get(m).copied().unwrap_or(0.0))
            .sum::<f64>()
            / 3.0
    };
    let by_season = SEASONS.iter().map(|s| (*s, season_average(*s)));
    let by_month = monthly.iter().map(|(m, v)| (*m, *v));

    let (
        Some((peak_season, _)),
        Some((low_season, _)),
        Some((peak_month, peak_value)),
        Some((low_month, _)),
    ) = (
        first_extreme(by_season.clone(), |a, b| a > b),
        first_extreme(by_season, |a, b| a < b),
        first_extreme(by_month.clone(), |a, b| a > b),
        first_extreme(by_month, |a, b| a < b),
    )
    else {
        return insufficient;
    };

    let peak_ratio = peak_value / average;
    let intensity = if peak_ratio > config.strong_ratio {
        SeasonalIntensity::Strong
    } else if peak_ratio > config.moderate_ratio {
        SeasonalIntensity::Moderate
    } else {
        SeasonalIntensity::Mild
    };

    SeasonalPattern::Peak {
        intensity,
        peak_season,
        low_season,
        peak_month,
        low_month,
        peak_ratio,
        variations: monthly
            .iter()
            .map(|(m, v)| (*m, (v - average) / average))
            .collect(),
    }
}

/// The entry `beats` every earlier one; ties keep the earliest.
fn first_extreme<K: Copy>(
    items: impl Iterator<Item = (K, f64)>,
    beats: fn(f64, f64) -> bool,
) -> Option<(K, f64)> {
    let mut best: Option<(K, f64)> = None;
    for (key, value) in items {
        match best {
            Some((_, current)) if !beats(value, current) => {}
            _ => best = Some((key, value)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn one_year() -> SeasonalityConfig {
        SeasonalityConfig {
            years: 1,
            ..Default::default()
        }
    }

    fn monthly_water(values: &[(u32, f64)]) -> Vec<UsageRecord> {
        values
            .iter()
            .map(|(m, q)| UsageRecord::new("north", "Water", *q, date(2024, *m, 15)))
            .collect()
    }

    #[test]
    fn summer_peak_is_strong() {
        let usage = monthly_water(&[
            (1, 10.0),
            (2, 10.0),
            (3, 10.0),
            (4, 10.0),
            (5, 10.0),
            (6, 40.0),
            (7, 40.0),
            (8, 40.0),
            (9, 10.0),
            (10, 10.0),
            (11, 10.0),
            (12, 10.0),
        ]);
        let report = analyze_seasonality(&usage, date(2024, 12, 31), &one_year());
        let water = report.resource("Water").unwrap();

        assert_eq!(water.label, "Strong Summer Peak");
        match &water.pattern {
            SeasonalPattern::Peak {
                intensity,
                peak_season,
                low_season,
                peak_month,
                low_month,
                peak_ratio,
                variations,
            } => {
                assert_eq!(*intensity, SeasonalIntensity::Strong);
                assert_eq!(*peak_season, Season::Summer);
                // Spring, Fall and Winter tie; the first wins
                assert_eq!(*low_season, Season::Spring);
                assert_eq!(*peak_month, 6);
                assert_eq!(*low_month, 1);
                assert!((peak_ratio - 40.0 / 17.5).abs() < 1e-9);
                assert_eq!(variations.len(), 12);
            }
            other => panic!("expected a peak, got {:?}", other),
        }
        assert_eq!(water.peak_month(), Some(6));
    }

    #[test]
    fn moderate_peak_from_six_months() {
        let usage = monthly_water(&[
            (3, 10.0),
            (4, 10.0),
            (5, 10.0),
            (6, 25.0),
            (7, 10.0),
            (8, 10.0),
        ]);
        let report = analyze_seasonality(&usage, date(2024, 12, 31), &one_year());
        // 25 against a 12.5 average is exactly 2.0, not above the strong ratio
        assert_eq!(report.resource("Water").unwrap().label, "Moderate Summer Peak");
    }

    #[test]
    fn under_six_months_is_insufficient() {
        let usage = monthly_water(&[(4, 10.0), (5, 20.0), (6, 30.0), (7, 40.0), (8, 50.0)]);
        let report = analyze_seasonality(&usage, date(2024, 12, 31), &one_year());
        let water = report.resource("Water").unwrap();

        assert_eq!(
            water.pattern,
            SeasonalPattern::InsufficientData { months_observed: 5 }
        );
        assert_eq!(water.label, "Insufficient data");
        assert_eq!(water.monthly_averages.len(), 5);
        assert_eq!(water.peak_month(), None);
    }

    #[test]
    fn zero_usage_months_report_no_usage() {
        let usage = monthly_water(&[
            (1, 0.0),
            (2, 0.0),
            (3, 0.0),
            (4, 0.0),
            (5, 0.0),
            (6, 0.0),
        ]);
        let report = analyze_seasonality(&usage, date(2024, 12, 31), &one_year());
        let water = report.resource("Water").unwrap();
        assert_eq!(water.pattern, SeasonalPattern::NoUsage);
        assert_eq!(water.label, "No usage");
    }

    #[test]
    fn no_records_gives_empty_report() {
        let report = analyze_seasonality(&[], date(2024, 12, 31), &SeasonalityConfig::default());
        assert!(report.resources.is_empty());
        assert_eq!(report.years, 2);
    }

    #[test]
    fn window_and_yearly_average() {
        let usage = vec![
            UsageRecord::new("north", "Seed", 60.0, date(2023, 3, 10)),
            // Before the two-year window
            UsageRecord::new("north", "Seed", 500.0, date(2022, 6, 15)),
            // After the analysis date
            UsageRecord::new("north", "Seed", 500.0, date(2024, 7, 1)),
            UsageRecord::new("south", "Seed", -5.0, date(2023, 4, 1)),
        ];
        let report = analyze_seasonality(&usage, date(2024, 6, 30), &SeasonalityConfig::default());

        assert_eq!(report.since, date(2022, 7, 1));
        let seed = report.resource("Seed").unwrap();
        assert_eq!(seed.monthly_averages.len(), 1);
        assert_eq!(seed.monthly_averages[&3], 30.0);
    }

    #[test]
    fn months_map_to_seasons() {
        assert_eq!(Season::of_month(1), Some(Season::Winter));
        assert_eq!(Season::of_month(4), Some(Season::Spring));
        assert_eq!(Season::of_month(8), Some(Season::Summer));
        assert_eq!(Season::of_month(11), Some(Season::Fall));
        assert_eq!(Season::of_month(13), None);
        assert!(SEASONS
            .iter()
            .all(|s| s.months().iter().all(|m| Season::of_month(*m) == Some(*s))));
    }
}
