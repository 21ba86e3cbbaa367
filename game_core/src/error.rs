use thiserror::Error;

/// Rejected game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be zero or more, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("max_score must be at least 1")]
    ZeroMaxScore,

    #[error("paddle height {paddle} does not fit the world height {world}")]
    PaddleTooTall { paddle: f32, world: f32 },
}
