//! Error types for the engine

use crate::config::ConfigError;
use taskwise_extractor::ExtractorError;
use thiserror::Error;

/// Errors surfaced by engine setup and the task service
///
/// Orchestrated operations never fail once the engine is built; only
/// construction, input validation and the external collaborators
/// produce these.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Caller supplied unusable input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Extractor setup failed (lexicon file, extractor config)
    #[error("Extractor setup failed: {0}")]
    Extractor(#[from] ExtractorError),

    /// The task store rejected an operation
    #[error("Task store error: {0}")]
    Store(String),

    /// The similarity index rejected an operation
    #[error("Task index error: {0}")]
    Index(String),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
