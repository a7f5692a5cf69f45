//! Integration tests for topic reconciliation.
//!
//! These tests verify that:
//! - Plan mode reports every topic and never touches the network
//! - Apply mode issues one create request per topic and reports it
//! - The first failure aborts the run and the session is still released

mod common;

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use common::RecordingConnector;
use kafcfg_core::TopicConfig;
use kafcfg_reconciler::{
    BrokerError, Error, Mode, NewTopic, Reconciler, ReportEntry, ReportResource, TopicReconciler,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const ORDERS: &str = r#"
topics:
  orders:
    partitions: 3
    replicas: 2
    config:
      retention.ms: "3600000"
"#;

const THREE_TOPICS: &str = r"
topics:
  payments:
    partitions: 6
    replicas: 3
  audit:
    partitions: 1
    replicas: 1
  orders:
    partitions: 3
    replicas: 2
";

fn reconciler(connector: &RecordingConnector) -> Reconciler {
    Reconciler::new(Arc::new(connector.clone()))
}

fn topic_names(entries: &[ReportEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|e| match &e.resource {
            ReportResource::Topic(t) => Some(t.topic.clone()),
            ReportResource::Acl(_) => None,
        })
        .collect()
}

/// # GIVEN
/// One topic `orders` with 3 partitions, 2 replicas and a retention setting
///
/// # WHEN
/// The topics are planned
///
/// # THEN
/// Exactly one entry mirrors the topic and no network call is made
#[tokio::test]
async fn test_plan_reports_topic_without_network() -> TestResult {
    let connector = RecordingConnector::new();
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(ORDERS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    let summary = reconciler(&connector)
        .run(&topics, Mode::Plan, &mut entries)
        .await?;

    assert_eq!(summary.entries, 1);
    assert_eq!(entries.len(), 1);
    let entry = entries.first().ok_or("missing entry")?;
    assert_eq!(entry.mode, Mode::Plan);
    match &entry.resource {
        ReportResource::Topic(t) => {
            assert_eq!(t.topic, "orders");
            assert_eq!(t.partitions, 3);
            assert_eq!(t.replicas, 2);
            assert_eq!(t.config.len(), 1);
            assert_eq!(t.config.get("retention.ms").map(String::as_str), Some("3600000"));
        }
        ReportResource::Acl(_) => return Err("expected a topic entry".into()),
    }

    assert_eq!(connector.recorded().network_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_plan_never_connects_for_many_topics() -> TestResult {
    let connector = RecordingConnector::new();
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(THREE_TOPICS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    reconciler(&connector)
        .run(&topics, Mode::Plan, &mut entries)
        .await?;

    assert_eq!(entries.len(), 3);
    assert_eq!(connector.recorded().network_calls(), 0);
    Ok(())
}

/// # GIVEN
/// The `orders` topic
///
/// # WHEN
/// The topics are applied
///
/// # THEN
/// One create request carries the same fields and one confirmation is reported
#[tokio::test]
async fn test_apply_creates_topic_and_confirms() -> TestResult {
    let connector = RecordingConnector::new();
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(ORDERS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    let summary = reconciler(&connector)
        .run(&topics, Mode::Apply, &mut entries)
        .await?;

    let recorded = connector.recorded();
    assert_eq!(recorded.connects, 1);
    assert_eq!(recorded.released, 1);
    assert_eq!(
        recorded.topic_requests,
        vec![vec![NewTopic {
            name: "orders".to_string(),
            partitions: 3,
            replication_factor: 2,
            configs: vec![("retention.ms".to_string(), "3600000".to_string())],
        }]]
    );

    assert_eq!(summary.mode, Mode::Apply);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.first().map(|e| e.mode), Some(Mode::Apply));
    assert_eq!(topic_names(&entries), vec!["orders"]);
    Ok(())
}

#[tokio::test]
async fn test_apply_creates_exactly_the_configured_set() -> TestResult {
    let connector = RecordingConnector::new();
    let config = TopicConfig::from_yaml_str(THREE_TOPICS)?;
    let expected: HashSet<String> = config.topics.keys().cloned().collect();
    let mut entries: Vec<ReportEntry> = Vec::new();

    reconciler(&connector)
        .run(&TopicReconciler::new(config), Mode::Apply, &mut entries)
        .await?;

    let recorded = connector.recorded();
    let created: HashSet<String> = recorded.created_topics().into_iter().collect();
    assert_eq!(created, expected);
    assert_eq!(recorded.topic_requests.len(), 3);
    assert!(recorded.topic_requests.iter().all(|r| r.len() == 1));
    assert_eq!(recorded.connects, 1);
    Ok(())
}

/// # GIVEN
/// Three topics, the second of which the broker rejects
///
/// # WHEN
/// The topics are applied
///
/// # THEN
/// The run fails with `TopicCreationFailed`, the third topic is never sent,
/// and the session is released
#[tokio::test]
async fn test_broker_rejection_aborts_remaining_topics() -> TestResult {
    let connector = RecordingConnector::new()
        .fail_topic("orders", BrokerError::rejected(36, "Topic 'orders' already exists."));
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(THREE_TOPICS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    let result = reconciler(&connector)
        .run(&topics, Mode::Apply, &mut entries)
        .await;

    assert!(matches!(
        &result,
        Err(Error::TopicCreationFailed { topic, cause: BrokerError::Rejected { code: 36, .. } })
            if topic == "orders"
    ));

    // Topics are processed in name order: audit, orders, payments.
    let recorded = connector.recorded();
    assert_eq!(recorded.created_topics(), vec!["audit", "orders"]);
    assert_eq!(topic_names(&entries), vec!["audit"]);
    assert_eq!(recorded.released, 1);
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_during_create_is_connection_error() -> TestResult {
    let connector =
        RecordingConnector::new().fail_topic("orders", BrokerError::transport("connection reset"));
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(ORDERS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    let result = reconciler(&connector)
        .run(&topics, Mode::Apply, &mut entries)
        .await;

    assert!(matches!(result, Err(Error::Connection { .. })));
    assert_eq!(connector.recorded().released, 1);
    Ok(())
}

#[tokio::test]
async fn test_connection_failure_sends_nothing() -> TestResult {
    let connector =
        RecordingConnector::new().fail_connect(BrokerError::transport("no broker reachable"));
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(ORDERS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    let result = reconciler(&connector)
        .run(&topics, Mode::Apply, &mut entries)
        .await;

    let err = result.err().ok_or("expected failure")?;
    assert!(matches!(err, Error::Connection { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(connector.recorded().topic_requests.is_empty());
    assert!(entries.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_topic_fails_before_connecting() -> TestResult {
    let connector = RecordingConnector::new();
    let mut config = TopicConfig::from_yaml_str(ORDERS)?;
    if let Some(orders) = config.topics.get_mut("orders") {
        orders.partitions = 0;
    }
    let mut entries: Vec<ReportEntry> = Vec::new();

    let result = reconciler(&connector)
        .run(&TopicReconciler::new(config), Mode::Apply, &mut entries)
        .await;

    assert!(matches!(
        result,
        Err(Error::Config(kafcfg_core::Error::InvalidTopic { .. }))
    ));
    assert_eq!(connector.recorded().network_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_empty_document_does_not_connect() -> TestResult {
    let connector = RecordingConnector::new();
    let mut entries: Vec<ReportEntry> = Vec::new();

    let summary = reconciler(&connector)
        .run(&TopicReconciler::new(TopicConfig::default()), Mode::Apply, &mut entries)
        .await?;

    assert_eq!(summary.entries, 0);
    assert_eq!(connector.recorded().connects, 0);
    Ok(())
}

#[tokio::test]
async fn test_plan_output_is_name_ordered() -> TestResult {
    let connector = RecordingConnector::new();
    let topics = TopicReconciler::new(TopicConfig::from_yaml_str(THREE_TOPICS)?);
    let mut entries: Vec<ReportEntry> = Vec::new();

    reconciler(&connector)
        .run(&topics, Mode::Plan, &mut entries)
        .await?;

    let names = topic_names(&entries);
    let sorted: BTreeSet<String> = names.iter().cloned().collect();
    assert_eq!(names, sorted.into_iter().collect::<Vec<_>>());
    Ok(())
}
