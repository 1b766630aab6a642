use super::{
    investment::InvestmentFactor, nutrient::NutrientFactor, ph::PhFactor,
    rainfall::RainfallFactor, soil::SoilFactor, temperature::TemperatureFactor,
    SuitabilityFactor,
};
use crate::config::ScoringConfig;
use crate::datasources::CropTable;
use crate::models::{
    CropProfile, FactorScore, GrowingContext, InvestmentTier, Level, NutrientCategory,
    PriceTrend, Priority, SuitabilityResult,
};
use tracing::debug;

pub struct SuitabilityScorer {
    factors: Vec<Box<dyn SuitabilityFactor>>,
    config: ScoringConfig,
}

impl SuitabilityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        let factors: Vec<Box<dyn SuitabilityFactor>> = vec![
            Box::new(SoilFactor),
            Box::new(PhFactor),
            Box::new(TemperatureFactor),
            Box::new(RainfallFactor),
            Box::new(NutrientFactor),
            Box::new(InvestmentFactor),
        ];

        Self { factors, config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score one crop. Never fails; poor matches earn partial credit.
    pub fn score(&self, profile: &CropProfile, ctx: &GrowingContext) -> SuitabilityResult {
        let breakdown: Vec<FactorScore> = self
            .factors
            .iter()
            .map(|factor| {
                let mut score = factor.evaluate(profile, ctx, &self.config);
                score.weight = self.config.weights.for_factor(factor.id());
                score
            })
            .collect();

        let weighted: f64 = breakdown.iter().map(FactorScore::weighted).sum();
        let market = self.config.market_factors.for_access(ctx.market_access);
        let bonus = self.priority_bonus(profile, ctx.priority);

        let raw = 100.0 * weighted * market + bonus;
        let suitability = if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 100.0)
        };

        let rationale = self.rationale(profile, ctx, suitability, &breakdown, market, bonus);

        SuitabilityResult {
            crop: profile.name.clone(),
            suitability,
            growing_season: profile.seasons_label(),
            time_to_harvest_days: profile.season_length_days,
            water_requirements: profile.water_need,
            fertilizer_needs: profile.fertilizer_need,
            market_demand: profile.market_demand,
            estimated_yield: profile.typical_yield.clone(),
            price_trend: profile.price_trend,
            investment_level: profile.investment,
            rationale,
            cultivation_tips: profile.cultivation_tips.clone(),
            risks: profile.risks.clone(),
            breakdown,
        }
    }

    /// Score every crop not excluded, drop those under the minimum score and
    /// sort best first (ties by name).
    pub fn rank<'a>(
        &self,
        ctx: &GrowingContext,
        crops: impl IntoIterator<Item = &'a CropProfile>,
        exclude: &[String],
    ) -> Vec<SuitabilityResult> {
        let mut evaluated = 0usize;
        let mut results: Vec<SuitabilityResult> = crops
            .into_iter()
            .filter(|profile| {
                let excluded = ctx.grew_previously(&profile.name)
                    || exclude.iter().any(|name| profile.is_named(name));
                if excluded {
                    debug!("Skipping excluded crop {}", profile.name);
                }
                !excluded
            })
            .map(|profile| {
                evaluated += 1;
                self.score(profile, ctx)
            })
            .filter(|result| result.suitability >= self.config.min_score)
            .collect();

        results.sort_by(|a, b| {
            b.suitability
                .total_cmp(&a.suitability)
                .then_with(|| a.crop.cmp(&b.crop))
        });

        debug!(
            "Scored {} crops, {} at or above {:.0}",
            evaluated,
            results.len(),
            self.config.min_score
        );
        results
    }

    pub fn list_factors(&self) -> Vec<(&'static str, &'static str)> {
        self.factors.iter().map(|f| (f.id(), f.name())).collect()
    }

    fn priority_bonus(&self, profile: &CropProfile, priority: Option<Priority>) -> f64 {
        let points = &self.config.priority_bonuses;
        match priority {
            None => 0.0,
            Some(Priority::WaterEfficiency) => match profile.water_need {
                Level::Low => points.water_need,
                Level::Medium => 0.0,
                Level::High => -points.water_need,
            },
            Some(Priority::Profit) => {
                let demand = match profile.market_demand {
                    Level::High => points.demand_high,
                    Level::Medium => 0.0,
                    Level::Low => -points.demand_low,
                };
                let trend = match profile.price_trend {
                    PriceTrend::Rising => points.price_trend,
                    PriceTrend::Stable => 0.0,
                    PriceTrend::Declining => -points.price_trend,
                };
                demand + trend
            }
            Some(Priority::Sustainability) => match profile.nutrient_category {
                NutrientCategory::NitrogenFixer => points.nitrogen_fixer,
                NutrientCategory::LightFeeder => points.light_feeder,
                NutrientCategory::MediumFeeder => 0.0,
                NutrientCategory::HeavyFeeder => -points.heavy_feeder,
            },
            Some(Priority::RiskMinimization) => {
                let volatility = match profile.price_volatility {
                    Level::Low => points.volatility,
                    Level::Medium => 0.0,
                    Level::High => -points.volatility,
                };
                let investment = match profile.investment {
                    InvestmentTier::Low => points.investment,
                    InvestmentTier::Medium => 0.0,
                    InvestmentTier::High => -points.investment,
                };
                volatility + investment
            }
        }
    }

    fn rationale(
        &self,
        profile: &CropProfile,
        ctx: &GrowingContext,
        suitability: f64,
        breakdown: &[FactorScore],
        market: f64,
        bonus: f64,
    ) -> String {
        let mut rationale = format!(
            "{} is recommended with a {:.1}% suitability score.",
            profile.name, suitability
        );

        if let Some(area) = ctx.land_area_ha.filter(|a| a.is_finite() && *a > 0.0) {
            let scale = if area < 1.0 {
                "is suitable for small-scale"
            } else if area < 5.0 {
                "allows for medium-scale"
            } else {
                "is appropriate for larger-scale"
            };
            rationale.push_str(&format!(
                " Your land size ({:.2} hectares) {} {} production.",
                area, scale, profile.name
            ));
        }

        let favorable: Vec<&str> = breakdown
            .iter()
            .filter(|f| f.score >= self.config.favorable_threshold)
            .map(|f| f.note.as_str())
            .collect();
        if !favorable.is_empty() {
            rationale.push_str(&format!(
                " Favorable factors include: {}.",
                favorable.join("; ")
            ));
        }

        let concerns: Vec<&str> = breakdown
            .iter()
            .filter(|f| f.score < self.config.concern_threshold)
            .map(|f| f.note.as_str())
            .collect();
        if !concerns.is_empty() {
            rationale.push_str(&format!(" Considerations: {}.", concerns.join("; ")));
        }

        if market > 1.0 {
            rationale.push_str(&format!(
                " {} market access improves the outlook.",
                ctx.market_access
            ));
        } else if market < 1.0 {
            rationale.push_str(&format!(
                " {} market access limits the outlook.",
                ctx.market_access
            ));
        }

        if let Some(priority) = ctx.priority {
            if bonus > 0.0 {
                rationale.push_str(&format!(
                    " Aligns with your {} priority (+{:.0}).",
                    priority, bonus
                ));
            } else if bonus < 0.0 {
                rationale.push_str(&format!(
                    " Works against your {} priority ({:.0}).",
                    priority, bonus
                ));
            }
        }

        rationale
    }
}

impl Default for SuitabilityScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// Rank the whole table for one growing context.
pub fn score_crops(
    ctx: &GrowingContext,
    table: &CropTable,
    exclude: &[String],
    config: &ScoringConfig,
) -> Vec<SuitabilityResult> {
    SuitabilityScorer::new(config.clone()).rank(ctx, table, exclude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::factors::test_support::{loam_context, maize};
    use crate::models::{IrrigationTier, MarketAccess, NutrientLevels, SoilType};
    use proptest::prelude::*;

    #[test]
    fn maize_on_loam_scores_high() {
        let result = SuitabilityScorer::default().score(&maize(), &loam_context());
        assert!(result.suitability >= 80.0, "got {}", result.suitability);
        assert_eq!(result.breakdown.len(), 6);
        let weights: f64 = result.breakdown.iter().map(|f| f.weight).sum();
        assert!((weights - 1.0).abs() < 1e-9);
        assert!(result.rationale.contains("Favorable factors include"));
        assert!(!result.rationale.contains("Considerations"));
    }

    #[test]
    fn market_access_scales_score() {
        let scorer = SuitabilityScorer::default();
        let mut ctx = loam_context();
        ctx.soil_type = SoilType::Clay;
        let fair = scorer.score(&maize(), &ctx).suitability;
        let poor = scorer
            .score(&maize(), &ctx.clone().with_market_access(MarketAccess::Poor))
            .suitability;
        let good = scorer
            .score(&maize(), &ctx.clone().with_market_access(MarketAccess::Good))
            .suitability;
        assert!(poor < fair && fair < good);
        assert!((poor - fair * 0.85).abs() < 1e-9);
    }

    #[test]
    fn water_priority_penalizes_thirsty_crops() {
        let table = CropTable::builtin().unwrap();
        let rice = table.get("Rice").unwrap();
        let scorer = SuitabilityScorer::default();
        let mut ctx = loam_context();
        ctx.soil_type = SoilType::Clay;
        let base = scorer.score(rice, &ctx).suitability;
        let prioritized = scorer
            .score(rice, &ctx.with_priority(Priority::WaterEfficiency))
            .suitability;
        assert!((base - prioritized - 8.0).abs() < 1e-9);
    }

    #[test]
    fn sustainability_priority_favors_legumes() {
        let table = CropTable::builtin().unwrap();
        let beans = table.get("Beans").unwrap();
        let scorer = SuitabilityScorer::default();
        let ctx = loam_context();
        let base = scorer.score(beans, &ctx).suitability;
        let with = scorer
            .score(beans, &ctx.clone().with_priority(Priority::Sustainability))
            .suitability;
        assert!(with > base || with == 100.0);
    }

    #[test]
    fn rank_excludes_previous_and_listed_crops() {
        let table = CropTable::builtin().unwrap();
        let ctx = loam_context().with_previous_crop("maize");
        let results = score_crops(
            &ctx,
            &table,
            &["SOYBEANS".to_string()],
            &ScoringConfig::default(),
        );
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.crop != "Maize" && r.crop != "Soybeans"));
    }

    #[test]
    fn rank_is_sorted_and_thresholded() {
        let table = CropTable::builtin().unwrap();
        let results = score_crops(&loam_context(), &table, &[], &ScoringConfig::default());
        for pair in results.windows(2) {
            assert!(
                pair[0].suitability > pair[1].suitability
                    || (pair[0].suitability == pair[1].suitability && pair[0].crop < pair[1].crop)
            );
        }
        assert!(results.iter().all(|r| r.suitability >= 40.0));
    }

    #[test]
    fn nothing_passes_a_perfect_threshold_in_hostile_conditions() {
        let table = CropTable::builtin().unwrap();
        let ctx = GrowingContext::new(
            SoilType::Sandy,
            3.0,
            NutrientLevels::new(0.0, 0.0, 0.0),
            0.0,
            -10.0,
            InvestmentTier::Low,
        )
        .with_irrigation(IrrigationTier::None);
        let config = ScoringConfig {
            min_score: 90.0,
            ..ScoringConfig::default()
        };
        assert!(score_crops(&ctx, &table, &[], &config).is_empty());
    }

    #[test]
    fn land_scale_noted_in_rationale() {
        let ctx = loam_context().with_land_area(0.5);
        let result = SuitabilityScorer::default().score(&maize(), &ctx);
        assert!(result.rationale.contains("small-scale"));
        let ctx = loam_context().with_land_area(12.0);
        let result = SuitabilityScorer::default().score(&maize(), &ctx);
        assert!(result.rationale.contains("larger-scale"));
    }

    fn arb_context() -> impl Strategy<Value = GrowingContext> {
        (
            prop::sample::select(vec![
                SoilType::Clay,
                SoilType::Loam,
                SoilType::Sandy,
                SoilType::SiltyClay,
            ]),
            -5.0f64..20.0,
            (-100.0f64..500.0, -100.0f64..500.0, -100.0f64..500.0),
            -500.0f64..5000.0,
            -30.0f64..60.0,
            prop::sample::select(vec![
                InvestmentTier::Low,
                InvestmentTier::Medium,
                InvestmentTier::High,
            ]),
            prop::sample::select(vec![
                MarketAccess::Poor,
                MarketAccess::Fair,
                MarketAccess::Good,
                MarketAccess::Excellent,
            ]),
            prop::option::of(prop::sample::select(vec![
                Priority::Profit,
                Priority::Sustainability,
                Priority::RiskMinimization,
                Priority::WaterEfficiency,
            ])),
        )
            .prop_map(|(soil, ph, (n, p, k), rain, temp, capacity, access, priority)| {
                let mut ctx = GrowingContext::new(
                    soil,
                    ph,
                    NutrientLevels::new(n, p, k),
                    rain,
                    temp,
                    capacity,
                )
                .with_market_access(access);
                ctx.priority = priority;
                ctx
            })
    }

    proptest! {
        #[test]
        fn score_is_always_within_bounds(ctx in arb_context()) {
            let table = CropTable::builtin().unwrap();
            let scorer = SuitabilityScorer::default();
            for profile in &table {
                let result = scorer.score(profile, &ctx);
                prop_assert!(result.suitability >= 0.0 && result.suitability <= 100.0);
                for factor in &result.breakdown {
                    prop_assert!(factor.score >= 0.0 && factor.score <= 1.0);
                }
            }
        }

        #[test]
        fn ranking_is_deterministic(ctx in arb_context()) {
            let table = CropTable::builtin().unwrap();
            let config = ScoringConfig::default();
            let first = score_crops(&ctx, &table, &[], &config);
            let second = score_crops(&ctx, &table, &[], &config);
            prop_assert_eq!(first, second);
        }
    }
}
