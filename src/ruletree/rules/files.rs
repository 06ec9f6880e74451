//! Rule files
//!
//! Rule sets can be kept in JSON or YAML files holding a single mapping from rule name to rule.
//! Key order in the file is rule order.
//!
//! ```yaml
//! close: "]"
//! open:
//!   pattern: '\[(\w*)'
//! marker: ["*", "_"]
//! ```

use super::RuleSet;
use crate::ruletree::error::ConfigurationError;
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileFormat {
    Json,
    Yaml,
}

impl RuleFileFormat {
    /// Pick the format from a file extension. Unknown extensions are read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => RuleFileFormat::Yaml,
            _ => RuleFileFormat::Json,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuleFileError {
    #[error("failed to read rule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON in rule file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML in rule file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Rules(#[from] ConfigurationError),
}

impl RuleSet {
    pub fn from_str_with_format(
        source: &str,
        format: RuleFileFormat,
    ) -> Result<Self, RuleFileError> {
        let value: Value = match format {
            RuleFileFormat::Json => serde_json::from_str(source)?,
            RuleFileFormat::Yaml => serde_yaml::from_str(source)?,
        };
        Ok(RuleSet::from_value(&value)?)
    }

    pub fn from_json_str(source: &str) -> Result<Self, RuleFileError> {
        Self::from_str_with_format(source, RuleFileFormat::Json)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, RuleFileError> {
        Self::from_str_with_format(source, RuleFileFormat::Yaml)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleFileError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        Self::from_str_with_format(&source, RuleFileFormat::from_path(path))
    }
}
