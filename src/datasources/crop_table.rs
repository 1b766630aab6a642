use crate::error::{FarmError, Result};
use crate::models::{CropProfile, RawCropProfile};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

const BUILTIN_CROPS: &str = include_str!("../../data/crops.yaml");

/// An entry that could not be turned into a usable profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedProfile {
    /// Zero-based position in the source list.
    pub index: usize,
    pub name: Option<String>,
    pub reason: String,
}

/// In-memory crop reference table. Entries keep source order.
#[derive(Debug, Clone, Default)]
pub struct CropTable {
    profiles: Vec<CropProfile>,
    skipped: Vec<SkippedProfile>,
}

impl CropTable {
    /// The table shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CROPS)
    }

    /// Load a table from disk. `.json` files are read as JSON, everything else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FarmError::NotFound(format!("crop table {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let table = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        debug!(
            "Loaded {} crop profiles from {} ({} skipped)",
            table.len(),
            path.display(),
            table.skipped.len()
        );
        Ok(table)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let entries: Vec<serde_yaml::Value> = serde_yaml::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<serde_yaml::Value> = serde_json::from_str(content)?;
        Ok(Self::from_entries(entries))
    }

    /// Validate entries one at a time so a single bad profile never
    /// discards the rest of the table.
    pub fn from_entries(entries: Vec<serde_yaml::Value>) -> Self {
        let mut table = CropTable::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let name = entry
                .get("name")
                .and_then(|n| n.as_str())
                .map(|n| n.trim().to_string());

            let parsed = serde_yaml::from_value::<RawCropProfile>(entry)
                .map_err(FarmError::from)
                .and_then(CropProfile::try_from);

            match parsed {
                Ok(profile) => table.push(index, profile),
                Err(e) => table.skip(index, name, e.to_string()),
            }
        }

        table
    }

    pub fn from_profiles(profiles: Vec<CropProfile>) -> Self {
        let mut table = CropTable::default();
        for (index, profile) in profiles.into_iter().enumerate() {
            table.push(index, profile);
        }
        table
    }

    fn push(&mut self, index: usize, profile: CropProfile) {
        if self.get(&profile.name).is_some() {
            let name = profile.name.clone();
            self.skip(index, Some(name), "duplicate crop name".to_string());
            return;
        }
        self.profiles.push(profile);
    }

    fn skip(&mut self, index: usize, name: Option<String>, reason: String) {
        warn!(
            "Skipping crop profile #{} ({}): {}",
            index,
            name.as_deref().unwrap_or("unnamed"),
            reason
        );
        self.skipped.push(SkippedProfile {
            index,
            name,
            reason,
        });
    }

    /// Case-insensitive lookup by crop name.
    pub fn get(&self, name: &str) -> Option<&CropProfile> {
        self.profiles.iter().find(|p| p.is_named(name))
    }

    pub fn profiles(&self) -> &[CropProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CropProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedProfile] {
        &self.skipped
    }
}

impl<'a> IntoIterator for &'a CropTable {
    type Item = &'a CropProfile;
    type IntoIter = std::slice::Iter<'a, CropProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}
