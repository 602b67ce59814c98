// Error types. Every variant states *where* things went wrong.
use thiserror::Error;

/// Rejected configuration. Fatal at startup, never raised mid-animation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NonPositiveDistance { field: &'static str, value: f32 },
    #[error("{field}: min {min} is greater than max {max}")]
    InvertedRange { field: &'static str, min: u64, max: u64 },
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NonPositiveScale { field: &'static str, value: f32 },
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String),   // Creating (or rebuilding) the overlay window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Pushing the frame to the window failed
    #[error("asset load error: {path}: {reason}")]
    AssetLoad { path: String, reason: String }, // Decoding a layer image failed
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
