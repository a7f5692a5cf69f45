//! SASL/PLAIN authentication.

use bytes::Bytes;
use kafcfg_core::SaslSettings;
use kafka_protocol::messages::{
    ApiKey, SaslAuthenticateRequest, SaslAuthenticateResponse, SaslHandshakeRequest,
    SaslHandshakeResponse,
};
use kafka_protocol::protocol::StrBytes;
use tracing::debug;

use crate::connection::BrokerConnection;
use crate::error::{Error, Result};

const PLAIN: &str = "PLAIN";
const HANDSHAKE_VERSION: i16 = 1;
const AUTHENTICATE_VERSION: i16 = 0;

/// PLAIN credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SaslPlain {
    username: String,
    password: String,
}

impl std::fmt::Debug for SaslPlain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaslPlain")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl SaslPlain {
    /// Credentials from settings; `None` when SASL is disabled.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` for any mechanism other than PLAIN.
    pub fn from_settings(settings: &SaslSettings) -> kafcfg_core::Result<Option<Self>> {
        if !settings.enabled {
            return Ok(None);
        }
        if !settings.mechanism.eq_ignore_ascii_case(PLAIN) {
            return Err(kafcfg_core::Error::invalid_settings(format!(
                "unsupported SASL mechanism '{}'; only PLAIN is supported",
                settings.mechanism
            )));
        }
        Ok(Some(Self {
            username: settings.username.clone(),
            password: settings.password.clone(),
        }))
    }

    /// The PLAIN initial response: empty authzid, username, password, NUL-separated.
    pub fn auth_bytes(&self) -> Bytes {
        let mut bytes = Vec::with_capacity(self.username.len() + self.password.len() + 2);
        bytes.push(0);
        bytes.extend_from_slice(self.username.as_bytes());
        bytes.push(0);
        bytes.extend_from_slice(self.password.as_bytes());
        Bytes::from(bytes)
    }

    /// Run the handshake and authenticate exchange on a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns a SASL error if the broker does not offer PLAIN or rejects the credentials.
    pub async fn authenticate(&self, connection: &mut BrokerConnection) -> Result<()> {
        let handshake = SaslHandshakeRequest::default().with_mechanism(StrBytes::from_static_str(PLAIN));
        let response: SaslHandshakeResponse = connection
            .send(ApiKey::SaslHandshake, HANDSHAKE_VERSION, &handshake)
            .await?;

        if response.error_code != 0 {
            let offered: Vec<&str> = response.mechanisms.iter().map(|m| m.as_str()).collect();
            return Err(Error::sasl(format!(
                "broker refused mechanism PLAIN (error {}); offered: {}",
                response.error_code,
                offered.join(", ")
            )));
        }

        let request = SaslAuthenticateRequest::default().with_auth_bytes(self.auth_bytes());
        let response: SaslAuthenticateResponse = connection
            .send(ApiKey::SaslAuthenticate, AUTHENTICATE_VERSION, &request)
            .await?;

        if response.error_code != 0 {
            let message = response
                .error_message
                .as_ref()
                .map_or("no message", |m| m.as_str());
            return Err(Error::sasl(format!(
                "error {} for user '{}': {message}",
                response.error_code, self.username
            )));
        }

        debug!(addr = connection.addr(), username = %self.username, "SASL/PLAIN authenticated");
        Ok(())
    }
}
