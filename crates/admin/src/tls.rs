//! TLS client configuration built from PEM content held in settings.
//!
//! The CA bundle is mandatory when TLS is enabled and every broker certificate
//! is verified against it. A client certificate and key are optional; when both
//! are present the connection authenticates with them (mutual TLS).

use std::sync::Arc;

use kafcfg_core::TlsSettings;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::warn;

use crate::error::{Error, Result};

/// Build a TLS connector from settings.
///
/// # Errors
///
/// Returns an error if the CA bundle is missing or unparsable, if only one of
/// certificate and key is given, or if the key does not match the certificate.
pub fn connector(settings: &TlsSettings) -> Result<TlsConnector> {
    let roots = root_store(&settings.ca_pem)?;
    let builder = ClientConfig::builder().with_root_certificates(roots);

    let config = match (settings.cert_pem.is_empty(), settings.key_pem.is_empty()) {
        (true, true) => builder.with_no_client_auth(),
        (false, false) => {
            if !settings.key_password.is_empty() {
                warn!("KAFKA_SSL_KEY_PASSWORD is set but encrypted keys are not supported; expecting an unencrypted key");
            }
            let certs = parse_certs(&settings.cert_pem, "client certificate")?;
            let key = parse_key(&settings.key_pem)?;
            builder
                .with_client_auth_cert(certs, key)
                .map_err(|e| Error::tls(format!("invalid client certificate or key: {e}")))?
        }
        _ => {
            return Err(Error::tls(
                "client certificate and key must be provided together",
            ));
        }
    };

    Ok(TlsConnector::from(Arc::new(config)))
}

fn root_store(ca_pem: &str) -> Result<RootCertStore> {
    if ca_pem.trim().is_empty() {
        return Err(Error::tls("TLS is enabled but no CA certificate was provided"));
    }

    let mut roots = RootCertStore::empty();
    for cert in parse_certs(ca_pem, "CA certificate")? {
        roots
            .add(cert)
            .map_err(|e| Error::tls(format!("invalid CA certificate: {e}")))?;
    }
    Ok(roots)
}

fn parse_certs(pem: &str, what: &str) -> Result<Vec<CertificateDer<'static>>> {
    let mut reader = pem.as_bytes();
    let certs = rustls_pemfile::certs(&mut reader)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::tls(format!("failed to parse {what}: {e}")))?;

    if certs.is_empty() {
        return Err(Error::tls(format!("no {what} found in PEM content")));
    }
    Ok(certs)
}

fn parse_key(pem: &str) -> Result<PrivateKeyDer<'static>> {
    let mut reader = pem.as_bytes();
    rustls_pemfile::private_key(&mut reader)
        .map_err(|e| Error::tls(format!("failed to parse private key: {e}")))?
        .ok_or_else(|| Error::tls("no private key found in PEM content"))
}

/// The name a broker certificate is verified against.
///
/// # Errors
///
/// Returns an error if the host part of `addr` is not a valid DNS name or IP.
pub fn server_name(addr: &str) -> Result<ServerName<'static>> {
    let host = host_of(addr);
    ServerName::try_from(host.to_string())
        .map_err(|e| Error::tls(format!("invalid server name '{host}': {e}")))
}

/// Host part of a `host:port` address. Brackets around IPv6 hosts are removed.
pub(crate) fn host_of(addr: &str) -> &str {
    let host = addr.rsplit_once(':').map_or(addr, |(host, _)| host);
    host.trim_start_matches('[').trim_end_matches(']')
}
