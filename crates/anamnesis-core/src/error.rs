use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("insight has no recommendations")]
    EmptyRecommendations,

    #[error("invalid risk score for {field}: {value} (expected 0..=100)")]
    RiskOutOfRange { field: &'static str, value: f64 },
}
