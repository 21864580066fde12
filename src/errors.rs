use thiserror::Error;

/// Main error type for the twin-parser crate.
///
/// Parsing and the position queries never fail; these errors come from
/// configuration, scanner construction and the command-line front-end.
#[derive(Debug, Error)]
pub enum TwinError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Scanner pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("No files found matching the provided patterns")]
    NoFilesFound,

    #[error("Invalid separator {separator:?}: {reason}")]
    InvalidSeparator { separator: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Failed to write output to {path}: {message}")]
    OutputError { path: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Input error: {0}")]
    InputError(String),
}

pub type Result<T> = std::result::Result<T, TwinError>;
