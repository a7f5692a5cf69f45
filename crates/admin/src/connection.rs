//! One framed request/response connection to a broker.
//!
//! Every frame is a big-endian `i32` length followed by that many bytes. A
//! request frame carries a request header and a body; a response frame carries
//! a response header (just the correlation id for the versions used here) and
//! a body. Requests are strictly sequential on a connection.

use bytes::{Bytes, BytesMut};
use kafka_protocol::messages::{ApiKey, RequestHeader, ResponseHeader};
use kafka_protocol::protocol::{Decodable, Encodable, StrBytes};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::sasl::SaslPlain;
use crate::tls;

/// Request header version for every non-flexible API version used here.
const REQUEST_HEADER_VERSION: i16 = 1;
/// Response header version for every non-flexible API version used here.
const RESPONSE_HEADER_VERSION: i16 = 0;
/// Upper bound on an accepted response frame.
const MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Byte stream a connection runs over: plain TCP or TLS.
pub trait BrokerStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> BrokerStream for T {}

/// How connections are dialed and authenticated.
#[derive(Clone)]
pub struct Transport {
    pub client_id: String,
    pub tls: Option<TlsConnector>,
    pub sasl: Option<SaslPlain>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("client_id", &self.client_id)
            .field("tls", &self.tls.is_some())
            .field("sasl", &self.sasl)
            .finish()
    }
}

impl Transport {
    /// Dial `addr`, wrap it in TLS if configured, and authenticate if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection, TLS handshake, or SASL exchange fails.
    pub async fn dial(&self, addr: &str) -> Result<BrokerConnection> {
        debug!(addr, tls = self.tls.is_some(), "Dialing broker");

        let tcp = TcpStream::connect(addr)
            .await
            .map_err(|e| Error::connect(addr, e.to_string()))?;

        let stream: Box<dyn BrokerStream> = match &self.tls {
            Some(connector) => {
                let name = tls::server_name(addr)?;
                let stream = connector
                    .connect(name, tcp)
                    .await
                    .map_err(|e| Error::connect(addr, format!("TLS handshake failed: {e}")))?;
                Box::new(stream)
            }
            None => Box::new(tcp),
        };

        let mut connection = BrokerConnection::new(addr, &self.client_id, stream);
        if let Some(sasl) = &self.sasl {
            sasl.authenticate(&mut connection).await?;
        }
        Ok(connection)
    }
}

/// A framed connection to one broker.
pub struct BrokerConnection {
    addr: String,
    client_id: StrBytes,
    correlation_id: i32,
    stream: Box<dyn BrokerStream>,
}

impl std::fmt::Debug for BrokerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConnection")
            .field("addr", &self.addr)
            .field("correlation_id", &self.correlation_id)
            .finish_non_exhaustive()
    }
}

impl BrokerConnection {
    /// Wrap an established stream.
    pub fn new(addr: &str, client_id: &str, stream: Box<dyn BrokerStream>) -> Self {
        Self {
            addr: addr.to_string(),
            client_id: StrBytes::from_string(client_id.to_string()),
            correlation_id: 0,
            stream,
        }
    }

    /// Address this connection was dialed at.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one request and wait for its response.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure, on an encode/decode failure, or when the
    /// response carries a different correlation id.
    pub async fn send<Req, Resp>(&mut self, api_key: ApiKey, version: i16, request: &Req) -> Result<Resp>
    where
        Req: Encodable,
        Resp: Decodable,
    {
        self.correlation_id = self.correlation_id.wrapping_add(1);
        let correlation_id = self.correlation_id;

        let frame = encode_request(api_key, version, correlation_id, &self.client_id, request)?;
        trace!(addr = %self.addr, ?api_key, version, correlation_id, bytes = frame.len(), "Sending request");

        self.stream
            .write_all(&frame)
            .await
            .map_err(|e| Error::io(&self.addr, e))?;
        self.stream
            .flush()
            .await
            .map_err(|e| Error::io(&self.addr, e))?;

        let mut body = self.read_frame().await?;
        decode_response(&mut body, correlation_id, version)
    }

    async fn read_frame(&mut self) -> Result<Bytes> {
        let len = self
            .stream
            .read_i32()
            .await
            .map_err(|e| Error::io(&self.addr, e))?;
        let len = frame_len(len)?;

        let mut buf = vec![0_u8; len];
        self.stream
            .read_exact(&mut buf)
            .await
            .map_err(|e| Error::io(&self.addr, e))?;
        Ok(Bytes::from(buf))
    }
}

/// Length-prefixed request frame: size, header, body.
pub(crate) fn encode_request<Req: Encodable>(
    api_key: ApiKey,
    version: i16,
    correlation_id: i32,
    client_id: &StrBytes,
    request: &Req,
) -> Result<BytesMut> {
    let header = RequestHeader::default()
        .with_request_api_key(api_key as i16)
        .with_request_api_version(version)
        .with_correlation_id(correlation_id)
        .with_client_id(Some(client_id.clone()));

    let mut payload = BytesMut::new();
    header
        .encode(&mut payload, REQUEST_HEADER_VERSION)
        .map_err(|e| Error::protocol(format!("failed to encode request header: {e}")))?;
    request
        .encode(&mut payload, version)
        .map_err(|e| Error::protocol(format!("failed to encode {api_key:?} v{version}: {e}")))?;

    let size = i32::try_from(payload.len())
        .map_err(|_| Error::protocol("request frame too large"))?;
    let mut frame = BytesMut::with_capacity(payload.len() + 4);
    frame.extend_from_slice(&size.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode a response frame body, checking it answers `correlation_id`.
pub(crate) fn decode_response<Resp: Decodable>(
    body: &mut Bytes,
    correlation_id: i32,
    version: i16,
) -> Result<Resp> {
    let header = ResponseHeader::decode(body, RESPONSE_HEADER_VERSION)
        .map_err(|e| Error::protocol(format!("failed to decode response header: {e}")))?;

    if header.correlation_id != correlation_id {
        return Err(Error::protocol(format!(
            "correlation id mismatch: sent {correlation_id}, received {}",
            header.correlation_id
        )));
    }

    Resp::decode(body, version)
        .map_err(|e| Error::protocol(format!("failed to decode response: {e}")))
}

fn frame_len(len: i32) -> Result<usize> {
    let len = usize::try_from(len)
        .map_err(|_| Error::protocol(format!("negative frame length {len}")))?;
    if len > MAX_FRAME_BYTES {
        return Err(Error::protocol(format!("frame length {len} exceeds limit")));
    }
    Ok(len)
}
