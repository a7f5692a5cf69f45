//! In-process broker for exercising the client over real sockets.
//!
//! Answers Metadata, CreateTopics and the SASL/PLAIN exchange with canned
//! responses and records every request it sees.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::{Bytes, BytesMut};
use kafka_protocol::messages::create_topics_response::CreatableTopicResult;
use kafka_protocol::messages::metadata_response::MetadataResponseBroker;
use kafka_protocol::messages::{
    ApiKey, BrokerId, CreateTopicsRequest, CreateTopicsResponse, MetadataResponse, RequestHeader,
    ResponseHeader, SaslAuthenticateRequest, SaslAuthenticateResponse, SaslHandshakeResponse,
};
use kafka_protocol::protocol::{Decodable, Encodable, StrBytes};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{Error, Result};

/// One request as seen by a fake broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub broker: &'static str,
    pub api_key: i16,
    pub version: i16,
}

impl Seen {
    pub const fn new(broker: &'static str, api_key: ApiKey, version: i16) -> Self {
        Self {
            broker,
            api_key: api_key as i16,
            version,
        }
    }
}

#[derive(Debug, Default)]
struct Journal {
    seen: Vec<Seen>,
    topics: Vec<String>,
    auth_bytes: Vec<Bytes>,
}

/// Requests recorded across every fake broker sharing it.
#[derive(Debug, Clone, Default)]
pub struct Log {
    journal: Arc<Mutex<Journal>>,
}

impl Log {
    fn lock(&self) -> MutexGuard<'_, Journal> {
        match self.journal.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.lock().seen.clone()
    }

    pub fn topics(&self) -> Vec<String> {
        self.lock().topics.clone()
    }

    pub fn auth_bytes(&self) -> Vec<Bytes> {
        self.lock().auth_bytes.clone()
    }
}

/// Canned behaviour of one fake broker.
#[derive(Debug, Clone)]
pub struct FakeBroker {
    name: &'static str,
    controller: Option<(i32, SocketAddr)>,
    sasl_error: i16,
}

impl FakeBroker {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            controller: None,
            sasl_error: 0,
        }
    }

    /// Report `addr` as controller `id` in Metadata responses.
    #[must_use]
    pub const fn with_controller(mut self, id: i32, addr: SocketAddr) -> Self {
        self.controller = Some((id, addr));
        self
    }

    /// Answer SaslAuthenticate with `code`.
    #[must_use]
    pub const fn with_sasl_error(mut self, code: i16) -> Self {
        self.sasl_error = code;
        self
    }

    /// Bind to an ephemeral port and serve until the runtime shuts down.
    pub async fn spawn(self, log: Log) -> Result<SocketAddr> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| Error::io("127.0.0.1:0", e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| Error::io("127.0.0.1:0", e))?;

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let broker = self.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = broker.serve(stream, &log).await;
                });
            }
        });
        Ok(addr)
    }

    async fn serve(&self, mut stream: TcpStream, log: &Log) -> Result<()> {
        loop {
            let Ok(len) = stream.read_i32().await else {
                return Ok(());
            };
            let len = usize::try_from(len).map_err(|_| Error::protocol("negative frame"))?;
            let mut buf = vec![0_u8; len];
            stream
                .read_exact(&mut buf)
                .await
                .map_err(|e| Error::io(self.name, e))?;

            let mut body = Bytes::from(buf);
            let header = RequestHeader::decode(&mut body, 1)
                .map_err(|e| Error::protocol(e.to_string()))?;
            let version = header.request_api_version;
            log.lock().seen.push(Seen {
                broker: self.name,
                api_key: header.request_api_key,
                version,
            });

            let response = self.answer(header.request_api_key, version, &mut body, log)?;
            let frame = frame(header.correlation_id, &response)?;
            stream
                .write_all(&frame)
                .await
                .map_err(|e| Error::io(self.name, e))?;
        }
    }

    fn answer(&self, api_key: i16, version: i16, body: &mut Bytes, log: &Log) -> Result<BytesMut> {
        let mut out = BytesMut::new();
        let encoded = if api_key == ApiKey::Metadata as i16 {
            self.metadata().encode(&mut out, version)
        } else if api_key == ApiKey::CreateTopics as i16 {
            let request = CreateTopicsRequest::decode(body, version)
                .map_err(|e| Error::protocol(e.to_string()))?;
            let results = request
                .topics
                .iter()
                .map(|t| CreatableTopicResult::default().with_name(t.name.clone()))
                .collect();
            log.lock()
                .topics
                .extend(request.topics.iter().map(|t| t.name.as_str().to_string()));
            CreateTopicsResponse::default()
                .with_topics(results)
                .encode(&mut out, version)
        } else if api_key == ApiKey::SaslHandshake as i16 {
            SaslHandshakeResponse::default()
                .with_mechanisms(vec![StrBytes::from_static_str("PLAIN")])
                .encode(&mut out, version)
        } else if api_key == ApiKey::SaslAuthenticate as i16 {
            let request = SaslAuthenticateRequest::decode(body, version)
                .map_err(|e| Error::protocol(e.to_string()))?;
            log.lock().auth_bytes.push(request.auth_bytes);
            let message = (self.sasl_error != 0)
                .then(|| StrBytes::from_static_str("Authentication failed: Invalid username or password"));
            SaslAuthenticateResponse::default()
                .with_error_code(self.sasl_error)
                .with_error_message(message)
                .encode(&mut out, version)
        } else {
            return Err(Error::protocol(format!("unexpected api key {api_key}")));
        };
        encoded.map_err(|e| Error::protocol(e.to_string()))?;
        Ok(out)
    }

    fn metadata(&self) -> MetadataResponse {
        match self.controller {
            Some((id, addr)) => MetadataResponse::default()
                .with_controller_id(BrokerId(id))
                .with_brokers(vec![
                    MetadataResponseBroker::default()
                        .with_node_id(BrokerId(id))
                        .with_host(StrBytes::from_string(addr.ip().to_string()))
                        .with_port(i32::from(addr.port())),
                ]),
            None => MetadataResponse::default().with_controller_id(BrokerId(-1)),
        }
    }
}

fn frame(correlation_id: i32, body: &BytesMut) -> Result<BytesMut> {
    let mut payload = BytesMut::new();
    ResponseHeader::default()
        .with_correlation_id(correlation_id)
        .encode(&mut payload, 0)
        .map_err(|e| Error::protocol(e.to_string()))?;
    payload.extend_from_slice(body);

    let size = i32::try_from(payload.len()).map_err(|_| Error::protocol("frame too large"))?;
    let mut out = BytesMut::with_capacity(payload.len() + 4);
    out.extend_from_slice(&size.to_be_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// An address nothing listens on.
pub async fn closed_addr() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|e| Error::io("127.0.0.1:0", e))?;
    listener
        .local_addr()
        .map_err(|e| Error::io("127.0.0.1:0", e))
}
