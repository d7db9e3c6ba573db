//! Error types for the sitesmith assembly engine.

use thiserror::Error;

/// Cache storage errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Durable tier error: {0}")]
    Durable(String),

    #[error("Cache entry could not be encoded: {0}")]
    Encoding(String),

    #[error("Cache I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Rule definition errors
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule '{rule}': {message}")]
    Invalid { rule: String, message: String },

    #[error("Rule set could not be parsed: {0}")]
    Parse(String),
}

/// Catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog file {path}: {message}")]
    File { path: String, message: String },

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Catalog I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Text generation errors reported by a generator implementation
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generator failed: {0}")]
    Failed(String),

    #[error("Generator timed out after {0} ms")]
    Timeout(u64),

    #[error("Generator returned empty text")]
    Empty,
}

/// Top-level engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::ConfigError(err.to_string())
    }
}
