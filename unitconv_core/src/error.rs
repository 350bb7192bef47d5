//! Error types for the unitconv_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for unitconv_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Category is not present in the registry
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Unit is not present in the resolved category
    #[error("Unknown unit '{unit}' in category '{category}'")]
    UnknownUnit { category: String, unit: String },

    /// Invalid custom unit or category definition
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed value read back from an export
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// True for failed category/unit lookups.
    ///
    /// Front ends show a generic notice for these instead of the details.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Error::UnknownCategory(_) | Error::UnknownUnit { .. })
    }
}
