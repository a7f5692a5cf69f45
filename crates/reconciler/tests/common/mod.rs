//! In-memory admin doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use kafcfg_reconciler::{AclEntry, AdminClient, AdminConnector, BrokerError, NewTopic};

/// Everything the doubles observed.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub connects: usize,
    pub released: usize,
    pub topic_requests: Vec<Vec<NewTopic>>,
    pub acl_requests: Vec<Vec<AclEntry>>,
}

impl Recorded {
    pub fn created_topics(&self) -> Vec<String> {
        self.topic_requests
            .iter()
            .flatten()
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn network_calls(&self) -> usize {
        self.connects + self.topic_requests.len() + self.acl_requests.len()
    }
}

#[derive(Debug, Default)]
struct Script {
    connect_failure: Option<BrokerError>,
    topic_failures: HashMap<String, BrokerError>,
    /// principal -> (entry index, error)
    acl_failures: HashMap<String, (usize, BrokerError)>,
    truncate_acl_results: bool,
}

#[derive(Debug, Default)]
struct Shared {
    recorded: Recorded,
    script: Script,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    match shared.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Connector that records every call and answers from a script.
#[derive(Debug, Clone, Default)]
pub struct RecordingConnector {
    shared: Arc<Mutex<Shared>>,
}

impl RecordingConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_connect(self, error: BrokerError) -> Self {
        lock(&self.shared).script.connect_failure = Some(error);
        self
    }

    pub fn fail_topic(self, topic: &str, error: BrokerError) -> Self {
        lock(&self.shared)
            .script
            .topic_failures
            .insert(topic.to_string(), error);
        self
    }

    pub fn fail_acl(self, principal: &str, index: usize, error: BrokerError) -> Self {
        lock(&self.shared)
            .script
            .acl_failures
            .insert(principal.to_string(), (index, error));
        self
    }

    pub fn truncate_acl_results(self) -> Self {
        lock(&self.shared).script.truncate_acl_results = true;
        self
    }

    pub fn recorded(&self) -> Recorded {
        lock(&self.shared).recorded.clone()
    }
}

#[async_trait]
impl AdminConnector for RecordingConnector {
    async fn connect(&self) -> Result<Box<dyn AdminClient>, BrokerError> {
        let mut shared = lock(&self.shared);
        shared.recorded.connects += 1;
        if let Some(error) = shared.script.connect_failure.clone() {
            return Err(error);
        }
        Ok(Box::new(RecordingClient {
            shared: Arc::clone(&self.shared),
        }))
    }
}

struct RecordingClient {
    shared: Arc<Mutex<Shared>>,
}

#[async_trait]
impl AdminClient for RecordingClient {
    async fn create_topics(&mut self, topics: &[NewTopic]) -> Result<(), BrokerError> {
        let mut shared = lock(&self.shared);
        shared.recorded.topic_requests.push(topics.to_vec());
        topics
            .iter()
            .find_map(|t| shared.script.topic_failures.get(&t.name).cloned())
            .map_or(Ok(()), Err)
    }

    async fn create_acls(
        &mut self,
        entries: &[AclEntry],
    ) -> Result<Vec<Option<BrokerError>>, BrokerError> {
        let mut shared = lock(&self.shared);
        shared.recorded.acl_requests.push(entries.to_vec());

        let failure = entries
            .first()
            .and_then(|e| shared.script.acl_failures.get(&e.principal).cloned());

        let mut results: Vec<Option<BrokerError>> = entries
            .iter()
            .enumerate()
            .map(|(i, _)| match &failure {
                Some((index, error)) if *index == i => Some(error.clone()),
                _ => None,
            })
            .collect();

        if shared.script.truncate_acl_results {
            results.pop();
        }
        Ok(results)
    }
}

impl Drop for RecordingClient {
    fn drop(&mut self) {
        lock(&self.shared).recorded.released += 1;
    }
}
