use crate::datasources::CropTable;
use crate::models::{CropProfile, NutrientCategory, PlantFamily, RotationMatch, RotationSuggestion};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Propose next-season crops that change plant family and follow the
/// nutrient cycle of the current crops.
///
/// Candidates are tiered: family and nutrient successor both match (100),
/// otherwise family only (80), otherwise nutrient successor only (60).
/// Only the best non-empty tier is returned, ordered by name.
///
/// Unknown crop names are ignored. If names were given but none are known,
/// the result is empty. An empty list is treated as a fallow field.
pub fn suggest_rotation(
    current_crops: &[String],
    table: &CropTable,
    top_n: usize,
) -> Vec<RotationSuggestion> {
    let current: Vec<&CropProfile> = current_crops
        .iter()
        .filter_map(|name| {
            let profile = table.get(name);
            if profile.is_none() {
                warn!("Unknown crop '{}' ignored for rotation planning", name);
            }
            profile
        })
        .collect();

    if !current_crops.is_empty() && current.is_empty() {
        return Vec::new();
    }

    let current_families: BTreeSet<PlantFamily> = current.iter().map(|p| p.family).collect();
    let current_categories: BTreeSet<NutrientCategory> =
        current.iter().map(|p| p.nutrient_category).collect();

    let new_families: BTreeSet<PlantFamily> = PlantFamily::all()
        .iter()
        .copied()
        .filter(|f| !current_families.contains(f))
        .collect();

    let successors: BTreeSet<NutrientCategory> = if current.is_empty() {
        NutrientCategory::LightFeeder.successors().iter().copied().collect()
    } else {
        current_categories
            .iter()
            .flat_map(|c| c.successors().iter().copied())
            .filter(|c| !current_categories.contains(c))
            .collect()
    };

    let candidates: Vec<&CropProfile> = table
        .iter()
        .filter(|p| !current_crops.iter().any(|name| p.is_named(name)))
        .collect();

    let tiers = [
        RotationMatch::Ideal,
        RotationMatch::FamilyOnly,
        RotationMatch::NutrientOnly,
    ];

    for kind in tiers {
        let mut matches: Vec<&CropProfile> = candidates
            .iter()
            .copied()
            .filter(|p| {
                let family_ok = new_families.contains(&p.family);
                let nutrient_ok = successors.contains(&p.nutrient_category);
                match kind {
                    RotationMatch::Ideal => family_ok && nutrient_ok,
                    RotationMatch::FamilyOnly => family_ok,
                    RotationMatch::NutrientOnly => nutrient_ok,
                }
            })
            .collect();

        if matches.is_empty() {
            continue;
        }

        matches.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(
            "Rotation tier '{}' matched {} crops",
            kind,
            matches.len()
        );

        return matches
            .into_iter()
            .take(top_n)
            .map(|p| build_suggestion(p, kind, &current))
            .collect();
    }

    Vec::new()
}

fn cycle_reason(category: NutrientCategory) -> &'static str {
    match category {
        NutrientCategory::NitrogenFixer => "restores soil nitrogen drawn down by heavy feeders",
        NutrientCategory::HeavyFeeder => "makes use of nitrogen left behind by legumes",
        NutrientCategory::MediumFeeder | NutrientCategory::LightFeeder => {
            "keeps nutrient demand moderate while the soil recovers"
        }
    }
}

fn build_suggestion(
    profile: &CropProfile,
    kind: RotationMatch,
    current: &[&CropProfile],
) -> RotationSuggestion {
    let previous = if current.is_empty() {
        "a fallow field".to_string()
    } else {
        current
            .iter()
            .map(|p| format!("{} ({})", p.name, p.family))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let rationale = match kind {
        RotationMatch::Ideal => format!(
            "{}: {} is a {} crop, breaking the pest and disease cycle after {}, and as a {} it {}.",
            kind,
            profile.name,
            profile.family,
            previous,
            profile.nutrient_category.as_str().to_lowercase(),
            cycle_reason(profile.nutrient_category)
        ),
        RotationMatch::FamilyOnly => format!(
            "{}: {} is a {} crop, breaking the pest and disease cycle after {}.",
            kind, profile.name, profile.family, previous
        ),
        RotationMatch::NutrientOnly => format!(
            "{}: as a {}, {} {} after {}.",
            kind,
            profile.nutrient_category.as_str().to_lowercase(),
            profile.name,
            cycle_reason(profile.nutrient_category),
            previous
        ),
    };

    RotationSuggestion {
        crop: profile.name.clone(),
        family: profile.family,
        nutrient_category: profile.nutrient_category,
        score: kind.score(),
        match_kind: kind,
        rationale,
    }
}
