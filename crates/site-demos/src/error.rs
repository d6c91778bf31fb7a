#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("unknown network preset: {0}")]
    UnknownPreset(String),

    #[error("network multiplier must be finite and positive, got {0}")]
    InvalidMultiplier(f64),

    #[error("simulation runner stopped")]
    Stopped,
}
