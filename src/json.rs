//! JSON error output for `--format json`.
//!
//! Report entries are written by the reconciler's JSON lines sink; this module
//! covers the failure side so a run always ends in machine-readable output.

use serde::{Deserialize, Serialize};

/// Standard JSON error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
}

impl Default for JsonError {
    fn default() -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: "UNKNOWN".to_string(),
                message: "An unknown error occurred".to_string(),
                exit_code: 4,
                suggestion: None,
            },
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (`SCREAMING_SNAKE_CASE`)
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Semantic exit code (1-4)
    pub exit_code: i32,
    /// Optional suggestion for resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl JsonError {
    /// Create a new JSON error with a code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                exit_code: 4,
                suggestion: None,
            },
        }
    }

    /// Set the exit code
    #[must_use]
    pub const fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.error.exit_code = exit_code;
        self
    }

    /// Add a suggestion to the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.error.suggestion = Some(suggestion.into());
        self
    }

    /// Build from a run failure.
    ///
    /// The message carries the whole context chain.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let (code, exit_code) = classify(err);
        let json = Self::new(code, format!("{err:#}")).with_exit_code(exit_code);
        match suggestion_for(code) {
            Some(suggestion) => json.with_suggestion(suggestion),
            None => json,
        }
    }

    /// Convert to a single-line JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Error code and exit code for a run failure.
///
/// Looks through the context chain for a typed error; anything else is `UNKNOWN`/4.
#[must_use]
pub fn classify(err: &anyhow::Error) -> (&'static str, i32) {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<kafcfg_reconciler::Error>()
                .map(|e| (e.code(), e.exit_code()))
                .or_else(|| {
                    cause
                        .downcast_ref::<kafcfg_core::Error>()
                        .map(|e| (e.code(), 1))
                })
        })
        .unwrap_or(("UNKNOWN", 4))
}

fn suggestion_for(code: &str) -> Option<&'static str> {
    match code {
        "FILE_READ_FAILED" => Some("Check the path passed with --file"),
        "CONFIG_PARSE_ERROR" => Some("Check the document is valid YAML with the expected keys"),
        "UNKNOWN_ENUM_VALUE" => {
            Some("Use Kafka wire names such as TOPIC, PREFIXED, READ or ALLOW (any case)")
        }
        "INVALID_SETTINGS" => Some("Check the KAFKA_* environment variables"),
        "CONNECTION_ERROR" => Some("Check KAFKA_BROKERS and the TLS/SASL settings"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;
    use kafcfg_core::EnumCategory;
    use kafcfg_reconciler::BrokerError;

    use super::*;

    #[test]
    fn test_default_is_unknown() {
        let json = JsonError::default();
        assert!(!json.success);
        assert_eq!(json.error.code, "UNKNOWN");
        assert_eq!(json.error.exit_code, 4);
    }

    #[test]
    fn test_classify_finds_typed_error_through_context() {
        let err: anyhow::Result<()> = Err(kafcfg_reconciler::Error::connection("refused"))
            .context("applying topics");
        let err = err.err().map(|e| classify(&e));
        assert_eq!(err, Some(("CONNECTION_ERROR", 2)));
    }

    #[test]
    fn test_classify_core_error_is_config_exit() {
        let err = anyhow::Error::new(kafcfg_core::Error::unknown_enum_value(
            EnumCategory::Operation,
            "READ_ALL",
        ));
        assert_eq!(classify(&err), ("UNKNOWN_ENUM_VALUE", 1));
    }

    #[test]
    fn test_classify_broker_rejection() {
        let err = anyhow::Error::new(kafcfg_reconciler::Error::topic_creation_failed(
            "orders",
            BrokerError::rejected(36, "Topic 'orders' already exists."),
        ));
        assert_eq!(classify(&err), ("TOPIC_CREATION_FAILED", 3));
    }

    #[test]
    fn test_classify_untyped_error() {
        assert_eq!(classify(&anyhow::anyhow!("boom")), ("UNKNOWN", 4));
    }

    #[test]
    fn test_from_anyhow_serializes_code_message_and_exit_code() -> anyhow::Result<()> {
        let err = anyhow::Error::new(kafcfg_reconciler::Error::connection("no broker reachable"));
        let json = JsonError::from_anyhow(&err).to_json()?;
        let value: serde_json::Value = serde_json::from_str(&json)?;

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "CONNECTION_ERROR");
        assert_eq!(value["error"]["exit_code"], 2);
        assert!(value["error"]["message"]
            .as_str()
            .is_some_and(|m| m.contains("no broker reachable")));
        assert!(value["error"]["suggestion"].is_string());
        Ok(())
    }
}
