use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaydecError {
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    #[error(
        "Channel length mismatch: vertical {vertical}, north {north}, east {east}, time {time}"
    )]
    LengthMismatch {
        vertical: usize,
        north: usize,
        east: usize,
        time: usize,
    },

    #[error("Insufficient data: need {needed} samples, have {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Time stamps must be strictly increasing (violated at index {index})")]
    NonMonotonicTime { index: usize },

    #[error("Invalid frequency range: {0}")]
    InvalidFrequencyRange(String),

    #[error("Filter design failed at {frequency:.4} Hz: {reason}")]
    FilterDesign { frequency: f64, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, RaydecError>;
