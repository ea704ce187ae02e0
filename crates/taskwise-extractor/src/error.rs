//! Error types for the Extractor
//!
//! Extraction itself never fails; these errors only arise while loading
//! configuration or lexicon files.

use thiserror::Error;

/// Errors that can occur while setting up an extractor
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Lexicon or config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(String),

    /// A lexicon extension names a category that does not exist
    #[error("Unknown lexicon category: {0}")]
    UnknownCategory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::TomlParse(e.to_string())
    }
}
