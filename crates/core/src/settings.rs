//! Cluster connection settings
//!
//! # Sources
//!
//! Settings are built by a pure function over a key-value lookup, so the same
//! code serves the process environment and test fixtures:
//!
//! ```ignore
//! let settings = ClusterSettings::from_env()?;
//! let settings = ClusterSettings::from_source(|key| fixture.get(key).cloned())?;
//! ```
//!
//! # Recognized keys
//!
//! | key | default |
//! |-----|---------|
//! | `KAFKA_BROKERS` | `localhost:9092` (comma-separated) |
//! | `KAFKA_CLIENT_ID` | `kafcfg` |
//! | `KAFKA_REQUEST_TIMEOUT_MS` | `30000` |
//! | `KAFKA_SSL_ENABLED` | `false` |
//! | `KAFKA_SSL_CA_CONTENT`, `KAFKA_SSL_CERT_CONTENT`, `KAFKA_SSL_KEY_CONTENT` | empty |
//! | `KAFKA_SSL_KEY_PASSWORD` | empty |
//! | `KAFKA_SASL_ENABLED` | `false` |
//! | `KAFKA_SASL_USERNAME`, `KAFKA_SASL_PASSWORD` | empty |
//! | `KAFKA_SASL_MECHANISM` | `PLAIN` |
//!
//! Empty values count as unset. Booleans are true only for `true`, any case.

use std::fmt;

use crate::error::Error;
use crate::result::Result;

pub const DEFAULT_BROKERS: &str = "localhost:9092";
pub const DEFAULT_CLIENT_ID: &str = "kafcfg";
pub const DEFAULT_REQUEST_TIMEOUT_MS: i32 = 30_000;
pub const DEFAULT_SASL_MECHANISM: &str = "PLAIN";

const REDACTED: &str = "<redacted>";

/// TLS material, PEM-encoded.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub enabled: bool,
    pub ca_pem: String,
    pub cert_pem: String,
    pub key_pem: String,
    pub key_password: String,
}

impl fmt::Debug for TlsSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsSettings")
            .field("enabled", &self.enabled)
            .field("ca_pem", &!self.ca_pem.is_empty())
            .field("cert_pem", &!self.cert_pem.is_empty())
            .field("key_pem", &REDACTED)
            .field("key_password", &REDACTED)
            .finish()
    }
}

/// SASL credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SaslSettings {
    pub enabled: bool,
    pub username: String,
    pub password: String,
    pub mechanism: String,
}

impl Default for SaslSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            username: String::new(),
            password: String::new(),
            mechanism: DEFAULT_SASL_MECHANISM.to_string(),
        }
    }
}

impl fmt::Debug for SaslSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslSettings")
            .field("enabled", &self.enabled)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .field("mechanism", &self.mechanism)
            .finish()
    }
}

/// Everything the admin client needs to reach the cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSettings {
    /// Bootstrap addresses, tried in order.
    pub brokers: Vec<String>,
    pub client_id: String,
    pub request_timeout_ms: i32,
    pub tls: TlsSettings,
    pub sasl: SaslSettings,
}

impl Default for ClusterSettings {
    fn default() -> Self {
        Self {
            brokers: vec![DEFAULT_BROKERS.to_string()],
            client_id: DEFAULT_CLIENT_ID.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            tls: TlsSettings::default(),
            sasl: SaslSettings::default(),
        }
    }
}

impl ClusterSettings {
    /// Build settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if a value cannot be interpreted.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key-value lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] if `KAFKA_BROKERS` lists no address or
    /// `KAFKA_REQUEST_TIMEOUT_MS` is not a positive integer.
    pub fn from_source<F>(source: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| source(key).filter(|value| !value.is_empty());
        let flag = |key: &str| lookup(key).is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let mut settings = Self::default();

        if let Some(value) = lookup("KAFKA_BROKERS") {
            settings.brokers = value
                .split(',')
                .map(str::trim)
                .filter(|addr| !addr.is_empty())
                .map(ToString::to_string)
                .collect();
            if settings.brokers.is_empty() {
                return Err(Error::invalid_settings(format!(
                    "KAFKA_BROKERS lists no address: {value:?}"
                )));
            }
        }

        if let Some(value) = lookup("KAFKA_CLIENT_ID") {
            settings.client_id = value;
        }

        if let Some(value) = lookup("KAFKA_REQUEST_TIMEOUT_MS") {
            settings.request_timeout_ms = value
                .parse::<i32>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| {
                    Error::invalid_settings(format!(
                        "KAFKA_REQUEST_TIMEOUT_MS must be a positive integer, got {value:?}"
                    ))
                })?;
        }

        settings.tls = TlsSettings {
            enabled: flag("KAFKA_SSL_ENABLED"),
            ca_pem: lookup("KAFKA_SSL_CA_CONTENT").unwrap_or_default(),
            cert_pem: lookup("KAFKA_SSL_CERT_CONTENT").unwrap_or_default(),
            key_pem: lookup("KAFKA_SSL_KEY_CONTENT").unwrap_or_default(),
            key_password: lookup("KAFKA_SSL_KEY_PASSWORD").unwrap_or_default(),
        };

        settings.sasl = SaslSettings {
            enabled: flag("KAFKA_SASL_ENABLED"),
            username: lookup("KAFKA_SASL_USERNAME").unwrap_or_default(),
            password: lookup("KAFKA_SASL_PASSWORD").unwrap_or_default(),
            mechanism: lookup("KAFKA_SASL_MECHANISM")
                .unwrap_or_else(|| DEFAULT_SASL_MECHANISM.to_string()),
        };

        Ok(settings)
    }
}
