use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::errors::{TwinError, Result};

/// Characters that carry grammar meaning and cannot appear in a separator.
const RESERVED: &[char] = &['(', ')', '[', ']', '!'];

/// Upper bound for `max_depth`; every level costs several stack frames.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Parser configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter between a variant and its body
    pub separator: String,

    /// Maximum nesting of groups and variant bodies before the rest of an
    /// interior is kept as a single unknown token
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            separator: ":".to_string(),
            max_depth: 128,
        }
    }
}

impl ParserConfig {
    /// Configuration with the given separator and default limits
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TwinError::ConfigError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TwinError::ConfigError {
                message: format!("Failed to read config file {}: {}", path.display(), e),
            })?;

        serde_json::from_str(&content)
            .map_err(|e| TwinError::ConfigError {
                message: format!("Failed to parse JSON config: {}", e),
            })
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path)?,
            Some("json") => Self::from_json_file(path)?,
            _ => {
                return Err(TwinError::ConfigError {
                    message: format!(
                        "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                        path.display()
                    ),
                })
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the separator and limits before a scanner is built from them
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| TwinError::InvalidSeparator {
            separator: self.separator.clone(),
            reason: reason.to_string(),
        };

        if self.separator.is_empty() {
            return Err(invalid("separator must not be empty"));
        }
        if self.separator.chars().count() > 8 {
            return Err(invalid("separator must be at most 8 characters"));
        }
        if self.separator.chars().any(char::is_whitespace) {
            return Err(invalid("separator must not contain whitespace"));
        }
        if self.separator.contains(RESERVED) {
            return Err(invalid("separator must not contain any of ( ) [ ] !"));
        }
        if self.max_depth == 0 {
            return Err(TwinError::ConfigError {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(TwinError::ConfigError {
                message: format!("max_depth must be at most {}", MAX_DEPTH_LIMIT),
            });
        }

        Ok(())
    }
}
