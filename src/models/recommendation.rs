use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationCategory {
    Water,
    Fertilizer,
    Yield,
    Inventory,
    Depletion,
}

impl RecommendationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationCategory::Water => "Water",
            RecommendationCategory::Fertilizer => "Fertilizer",
            RecommendationCategory::Yield => "Yield",
            RecommendationCategory::Inventory => "Inventory",
            RecommendationCategory::Depletion => "Depletion",
        }
    }
}

impl std::fmt::Display for RecommendationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Advisory,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Advisory => "Advisory",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
    pub source: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display, source: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            source: source.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub category: RecommendationCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub explanation: String,
    pub field_id: Option<String>,
    pub data_points: Vec<DataPoint>,
    pub suggested_action: Option<String>,
}

impl Recommendation {
    pub fn new(
        id: impl Into<String>,
        category: RecommendationCategory,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            title: title.into(),
            description: description.into(),
            explanation: String::new(),
            field_id: None,
            data_points: Vec::new(),
            suggested_action: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn for_field(mut self, field_id: &str) -> Self {
        self.field_id = Some(field_id.to_string());
        self
    }

    pub fn with_data_point(
        mut self,
        label: &str,
        value: impl std::fmt::Display,
        source: &str,
    ) -> Self {
        self.data_points.push(DataPoint::new(label, value, source));
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }
}
