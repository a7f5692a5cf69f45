//! Kafka-backed [`AdminConnector`] and [`AdminClient`].
//!
//! Connecting walks the bootstrap list in order until one broker answers,
//! asks it for cluster metadata, then dials the controller that metadata names.
//! Topic creation goes to the controller; ACL creation goes to the bootstrap
//! broker. Both connections live in the session and close when it is dropped.

use async_trait::async_trait;
use kafcfg_core::ClusterSettings;
use kafcfg_reconciler::{AclEntry, AdminClient, AdminConnector, BrokerError, NewTopic};
use kafka_protocol::error::ResponseError;
use kafka_protocol::messages::create_acls_request::AclCreation;
use kafka_protocol::messages::create_topics_request::{CreatableTopic, CreatableTopicConfig};
use kafka_protocol::messages::{
    ApiKey, CreateAclsRequest, CreateAclsResponse, CreateTopicsRequest, CreateTopicsResponse,
    MetadataRequest, MetadataResponse, TopicName,
};
use kafka_protocol::protocol::StrBytes;
use tracing::{debug, info, warn};

use crate::connection::{BrokerConnection, Transport};
use crate::error::{Error, Result};
use crate::sasl::SaslPlain;
use crate::tls;

const METADATA_VERSION: i16 = 1;
const CREATE_TOPICS_VERSION: i16 = 2;
const CREATE_ACLS_VERSION: i16 = 1;

/// Opens admin sessions against a real cluster.
#[derive(Debug, Clone)]
pub struct KafkaConnector {
    settings: ClusterSettings,
    sasl: Option<SaslPlain>,
}

impl KafkaConnector {
    /// Create a connector. Nothing is dialed until [`AdminConnector::connect`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` if SASL is enabled with a mechanism other than PLAIN.
    pub fn new(settings: ClusterSettings) -> kafcfg_core::Result<Self> {
        let sasl = SaslPlain::from_settings(&settings.sasl)?;
        Ok(Self { settings, sasl })
    }

    fn transport(&self) -> Result<Transport> {
        let tls = if self.settings.tls.enabled {
            Some(tls::connector(&self.settings.tls)?)
        } else {
            None
        };

        Ok(Transport {
            client_id: self.settings.client_id.clone(),
            tls,
            sasl: self.sasl.clone(),
        })
    }

    async fn bootstrap(&self, transport: &Transport) -> Result<BrokerConnection> {
        let mut failures = Vec::new();
        for addr in &self.settings.brokers {
            match transport.dial(addr).await {
                Ok(connection) => return Ok(connection),
                // Same credentials and CA for every broker.
                Err(e @ (Error::Sasl { .. } | Error::Tls { .. })) => return Err(e),
                Err(e) => {
                    warn!(addr = %addr, error = %e, "Bootstrap broker unavailable");
                    failures.push(e.to_string());
                }
            }
        }
        Err(Error::connect(
            self.settings.brokers.join(","),
            format!("no bootstrap broker reachable: {}", failures.join("; ")),
        ))
    }

    async fn open(&self) -> Result<KafkaSession> {
        let transport = self.transport()?;
        let mut bootstrap = self.bootstrap(&transport).await?;

        let request = MetadataRequest::default().with_topics(Some(Vec::new()));
        let metadata: MetadataResponse = bootstrap
            .send(ApiKey::Metadata, METADATA_VERSION, &request)
            .await?;
        let controller_addr = controller_addr(&metadata)?;
        debug!(bootstrap = bootstrap.addr(), controller = %controller_addr, "Discovered controller");

        let controller = transport.dial(&controller_addr).await?;
        info!(controller = %controller_addr, "Connected to cluster controller");

        Ok(KafkaSession {
            bootstrap,
            controller,
            timeout_ms: self.settings.request_timeout_ms,
        })
    }
}

#[async_trait]
impl AdminConnector for KafkaConnector {
    async fn connect(&self) -> std::result::Result<Box<dyn AdminClient>, BrokerError> {
        let session = self.open().await?;
        Ok(Box::new(session))
    }
}

/// An open session: one connection to a bootstrap broker, one to the controller.
#[derive(Debug)]
pub struct KafkaSession {
    bootstrap: BrokerConnection,
    controller: BrokerConnection,
    timeout_ms: i32,
}

#[async_trait]
impl AdminClient for KafkaSession {
    async fn create_topics(&mut self, topics: &[NewTopic]) -> std::result::Result<(), BrokerError> {
        let request = CreateTopicsRequest::default()
            .with_topics(topics.iter().map(creatable_topic).collect())
            .with_timeout_ms(self.timeout_ms);

        let response: CreateTopicsResponse = self
            .controller
            .send(ApiKey::CreateTopics, CREATE_TOPICS_VERSION, &request)
            .await?;

        topic_outcome(topics, &response)
    }

    async fn create_acls(
        &mut self,
        entries: &[AclEntry],
    ) -> std::result::Result<Vec<Option<BrokerError>>, BrokerError> {
        let request =
            CreateAclsRequest::default().with_creations(entries.iter().map(acl_creation).collect());

        let response: CreateAclsResponse = self
            .bootstrap
            .send(ApiKey::CreateAcls, CREATE_ACLS_VERSION, &request)
            .await?;

        Ok(response
            .results
            .iter()
            .map(|r| (r.error_code != 0).then(|| rejection(r.error_code, r.error_message.as_ref())))
            .collect())
    }
}

impl Drop for KafkaSession {
    fn drop(&mut self) {
        debug!(
            bootstrap = self.bootstrap.addr(),
            controller = self.controller.addr(),
            "Closing admin session"
        );
    }
}

fn creatable_topic(topic: &NewTopic) -> CreatableTopic {
    CreatableTopic::default()
        .with_name(TopicName(StrBytes::from_string(topic.name.clone())))
        .with_num_partitions(topic.partitions)
        .with_replication_factor(topic.replication_factor)
        .with_configs(
            topic
                .configs
                .iter()
                .map(|(name, value)| {
                    CreatableTopicConfig::default()
                        .with_name(StrBytes::from_string(name.clone()))
                        .with_value(Some(StrBytes::from_string(value.clone())))
                })
                .collect(),
        )
}

fn acl_creation(entry: &AclEntry) -> AclCreation {
    AclCreation::default()
        .with_resource_type(entry.resource_type.code())
        .with_resource_name(StrBytes::from_string(entry.resource_name.clone()))
        .with_resource_pattern_type(entry.pattern_type.code())
        .with_principal(StrBytes::from_string(entry.principal.clone()))
        .with_host(StrBytes::from_string(entry.host.clone()))
        .with_operation(entry.operation.code())
        .with_permission_type(entry.permission.code())
}

/// `host:port` of the controller named in a metadata response.
pub(crate) fn controller_addr(metadata: &MetadataResponse) -> Result<String> {
    let controller_id = metadata.controller_id;
    if controller_id.0 < 0 {
        return Err(Error::no_controller("cluster reports no active controller"));
    }

    metadata
        .brokers
        .iter()
        .find(|b| b.node_id == controller_id)
        .map(|b| {
            let host = b.host.as_str();
            if host.contains(':') {
                format!("[{host}]:{}", b.port)
            } else {
                format!("{host}:{}", b.port)
            }
        })
        .ok_or_else(|| {
            Error::no_controller(format!(
                "controller {} is not among the {} advertised brokers",
                controller_id.0,
                metadata.brokers.len()
            ))
        })
}

/// First failure for the requested topics, in request order.
pub(crate) fn topic_outcome(
    requested: &[NewTopic],
    response: &CreateTopicsResponse,
) -> std::result::Result<(), BrokerError> {
    for topic in requested {
        let result = response
            .topics
            .iter()
            .find(|r| r.name.as_str() == topic.name)
            .ok_or_else(|| BrokerError::malformed(format!("no result for topic '{}'", topic.name)))?;

        if result.error_code != 0 {
            return Err(rejection(result.error_code, result.error_message.as_ref()));
        }
    }
    Ok(())
}

/// A broker rejection, named after the error code when the broker sent no message.
pub(crate) fn rejection(code: i16, message: Option<&StrBytes>) -> BrokerError {
    let message = match message {
        Some(m) if !m.is_empty() => m.as_str().to_string(),
        _ => ResponseError::try_from_code(code)
            .map_or_else(|| "unknown broker error".to_string(), |e| format!("{e:?}")),
    };
    BrokerError::rejected(code, message)
}
