//! Loading desired-state documents from YAML.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::Error;
use crate::model::{AclConfig, TopicConfig};
use crate::result::Result;

/// Parse a YAML document. Blank input yields the empty document.
///
/// # Errors
///
/// Returns [`Error::ConfigParseFailed`] if the YAML is malformed or does not
/// match the document shape.
pub fn parse_document<T: DeserializeOwned + Default>(text: &str) -> Result<T> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(text).map_err(|e| Error::config_parse_failed(e.to_string()))
}

/// Read and parse a YAML document from `path`.
///
/// # Errors
///
/// Returns [`Error::FileReadFailed`] if the file cannot be read, or
/// [`Error::ConfigParseFailed`] if it cannot be parsed.
pub fn load_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "Loading desired-state document");
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::file_read_failed(path, e.to_string()))?;
    parse_document(&text)
}

impl TopicConfig {
    /// Parse and validate a `topics` document.
    ///
    /// # Errors
    ///
    /// Returns a parse error or the first invalid topic.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = parse_document(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a `topics` document from disk.
    ///
    /// # Errors
    ///
    /// Returns a read, parse or validation error.
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = load_document(path)?;
        config.validate()?;
        Ok(config)
    }
}

impl AclConfig {
    /// Parse an `acls` document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParseFailed`] if the document is malformed.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        parse_document(text)
    }

    /// Load an `acls` document from disk.
    ///
    /// # Errors
    ///
    /// Returns a read or parse error.
    pub fn load(path: &Path) -> Result<Self> {
        load_document(path)
    }
}
