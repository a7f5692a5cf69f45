//! Core error types for desired-state handling.
//!
//! All errors are explicit, typed, and recoverable - no panics allowed.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The enum vocabulary a configuration string is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumCategory {
    ResourceType,
    PatternType,
    Operation,
    Permission,
}

impl EnumCategory {
    /// Human-readable category name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ResourceType => "resource type",
            Self::PatternType => "pattern type",
            Self::Operation => "operation",
            Self::Permission => "permission",
        }
    }
}

impl fmt::Display for EnumCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for kafcfg operations.
#[derive(Debug, Error)]
pub enum Error {
    // I/O errors
    #[error("failed to read file '{path}': {reason}")]
    FileReadFailed { path: PathBuf, reason: String },

    // Parsing errors
    #[error("configuration parse error: {reason}")]
    ConfigParseFailed { reason: String },

    #[error("unknown {category}: {raw}")]
    UnknownEnumValue { category: EnumCategory, raw: String },

    // Validation errors
    #[error("invalid topic '{topic}': {reason}")]
    InvalidTopic { topic: String, reason: String },

    #[error("invalid cluster settings: {reason}")]
    InvalidSettings { reason: String },
}

impl Error {
    /// Create a file read error.
    pub fn file_read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration parse error.
    pub fn config_parse_failed(reason: impl Into<String>) -> Self {
        Self::ConfigParseFailed {
            reason: reason.into(),
        }
    }

    /// Create an unknown enum value error.
    pub fn unknown_enum_value(category: EnumCategory, raw: impl Into<String>) -> Self {
        Self::UnknownEnumValue {
            category,
            raw: raw.into(),
        }
    }

    /// Create an invalid topic error.
    pub fn invalid_topic(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTopic {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid settings error.
    pub fn invalid_settings(reason: impl Into<String>) -> Self {
        Self::InvalidSettings {
            reason: reason.into(),
        }
    }

    /// Machine-readable error code (`SCREAMING_SNAKE_CASE`).
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::FileReadFailed { .. } => "FILE_READ_FAILED",
            Self::ConfigParseFailed { .. } => "CONFIG_PARSE_ERROR",
            Self::UnknownEnumValue { .. } => "UNKNOWN_ENUM_VALUE",
            Self::InvalidTopic { .. } => "INVALID_TOPIC",
            Self::InvalidSettings { .. } => "INVALID_SETTINGS",
        }
    }
}
