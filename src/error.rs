use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid crop profile '{crop}': {reason}")]
    InvalidProfile { crop: String, reason: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl FarmError {
    pub fn invalid_profile(crop: impl Into<String>, reason: impl Into<String>) -> Self {
        FarmError::InvalidProfile {
            crop: crop.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FarmError>;
