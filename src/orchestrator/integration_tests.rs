// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! End-to-end segment runs: invoke, merge, retry hook, channel routing.

use super::*;
use crate::config::consts::{CHANNEL_AZURE_BLOB, QUEUE_PROCESS_ID};
use crate::config::{ProcessSpec, RunConfig};
use crate::registry::Process;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

/// A process that returns a fixed value for the `emit` command.
struct Fixed {
    value: Value,
}

#[async_trait]
impl Process for Fixed {
    async fn run(&self, command: &str, _options: &Value) -> Result<Value, OrchestrationError> {
        match command {
            "emit" => Ok(self.value.clone()),
            other => Err(OrchestrationError::UnknownRunCommand {
                process: "fixed".to_string(),
                command: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Remote backend that captures every routed write.
struct CapturingRemote {
    writes: Mutex<Vec<(String, String, Artifact)>>,
}

impl CapturingRemote {
    fn new() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RemoteStore for CapturingRemote {
    async fn write(&self, artifact: &Artifact, key: &str, name: &str) -> bool {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), name.to_string(), artifact.clone()));
        true
    }

    async fn read(&self, _key: &str, _name: &str) -> Option<Artifact> {
        None
    }

    async fn delete(&self, _key: &str, _name: &str) -> bool {
        true
    }
}

/// Retry policy that records what it was handed.
struct CapturingRetry {
    seen: Arc<Mutex<Vec<Value>>>,
}

impl RetryPolicy for CapturingRetry {
    fn retry(&self, failed: &Value) {
        self.seen.lock().unwrap().push(failed.clone());
    }
}

fn registry_emitting(entries: &[(&str, Value)]) -> ProcessRegistry {
    let mut registry = ProcessRegistry::new();
    for (id, value) in entries {
        let value = value.clone();
        registry.insert_fn(*id, move |_: &Value| {
            Ok(Box::new(Fixed {
                value: value.clone(),
            }) as Box<dyn Process>)
        });
    }
    registry
}

fn spec(process: &str) -> ProcessSpec {
    ProcessSpec {
        process: process.to_string(),
        constructor_options: Value::Null,
        run_command: "emit".to_string(),
        run_options: Value::Null,
    }
}

fn blob_config(segment: Vec<&str>, processes: Vec<(&str, &str)>) -> OrchestratorConfig {
    let mut run_config = RunConfig::new();
    for (id, process) in processes {
        run_config.insert(id, spec(process));
    }
    OrchestratorConfig {
        segment: segment.into_iter().map(String::from).collect(),
        batch_id: Some("itest".to_string()),
        channel: Some(CHANNEL_AZURE_BLOB.to_string()),
        container: Some("forecast-results".to_string()),
        processes: run_config,
    }
}

#[tokio::test]
async fn results_are_keyed_by_process_id() {
    let registry = registry_emitting(&[
        ("proc_a", json!({"k": 1})),
        ("proc_b", json!({"k": 2})),
    ]);
    let config = blob_config(
        vec!["a", "b"],
        vec![("a", "proc_a"), ("b", "proc_b")],
    );

    let remote = Arc::new(CapturingRemote::new());
    let mut orchestrator = SegmentOrchestrator::new(config, registry)
        .unwrap()
        .with_remote(remote.clone());
    orchestrator.run_segment().await.unwrap();

    let writes = remote.writes.lock().unwrap();
    let (_, _, artifact) = &writes[0];
    let results = artifact.as_structured().unwrap();
    assert_eq!(results["proc_a"]["k"], 1);
    assert_eq!(results["proc_b"]["k"], 2);
    assert_eq!(orchestrator.state(), RunState::Completed);
}

#[tokio::test]
async fn results_merge_in_segment_list_order() {
    // Same result key from two differently named processes: the entry from
    // the process later in the segment list must win.
    struct Keyed {
        value: Value,
    }

    #[async_trait]
    impl Process for Keyed {
        async fn run(&self, _: &str, _: &Value) -> Result<Value, OrchestrationError> {
            Ok(self.value.clone())
        }

        fn name(&self) -> &'static str {
            "keyed"
        }
    }

    let mut registry = ProcessRegistry::new();
    registry.insert_fn("same_key", |options: &Value| {
        Ok(Box::new(Keyed {
            value: options.clone(),
        }) as Box<dyn Process>)
    });

    let mut run_config = RunConfig::new();
    for (id, n) in [("a", 1), ("b", 2)] {
        run_config.insert(
            id,
            ProcessSpec {
                process: "same_key".to_string(),
                constructor_options: json!({"k": n}),
                run_command: "emit".to_string(),
                run_options: Value::Null,
            },
        );
    }
    let config = OrchestratorConfig {
        segment: vec!["a".to_string(), "b".to_string()],
        batch_id: Some("itest".to_string()),
        channel: Some(CHANNEL_AZURE_BLOB.to_string()),
        container: None,
        processes: run_config,
    };

    let remote = Arc::new(CapturingRemote::new());
    let mut orchestrator = SegmentOrchestrator::new(config, registry)
        .unwrap()
        .with_remote(remote.clone());
    orchestrator.run_segment().await.unwrap();

    let writes = remote.writes.lock().unwrap();
    let results = writes[0].2.as_structured().unwrap();
    // Both invocations produce the key "same_key"; B ran later, so k = 2.
    assert_eq!(results["same_key"]["k"], 2);
}

#[tokio::test]
async fn destination_follows_naming_convention() {
    let registry = registry_emitting(&[("p", json!({"ok": true}))]);
    let config = blob_config(vec!["region_na", "electronics"], vec![("region_na", "p")]);

    let remote = Arc::new(CapturingRemote::new());
    let mut orchestrator = SegmentOrchestrator::new(config, registry)
        .unwrap()
        .with_remote(remote.clone());
    orchestrator.run_segment().await.unwrap();

    let writes = remote.writes.lock().unwrap();
    let (key, name, _) = &writes[0];
    assert_eq!(key, "forecast/itest/segment_results");
    assert_eq!(name, "region_na_electronics_results.json");
}

#[tokio::test]
async fn segment_entries_without_run_config_are_skipped() {
    let registry = registry_emitting(&[("p", json!({"ok": true}))]);
    // Segment lists "unconfigured" but the run config has no entry for it.
    let config = blob_config(vec!["configured", "unconfigured"], vec![("configured", "p")]);

    let remote = Arc::new(CapturingRemote::new());
    let mut orchestrator = SegmentOrchestrator::new(config, registry)
        .unwrap()
        .with_remote(remote.clone());
    orchestrator.run_segment().await.unwrap();

    let writes = remote.writes.lock().unwrap();
    let results = writes[0].2.as_structured().unwrap();
    assert_eq!(results.as_object().unwrap().len(), 1);
    assert!(results.get("p").is_some());
}

#[tokio::test]
async fn null_results_are_not_merged() {
    let registry = registry_emitting(&[("quiet", Value::Null)]);
    let config = blob_config(vec!["a"], vec![("a", "quiet")]);

    let remote = Arc::new(CapturingRemote::new());
    let mut orchestrator = SegmentOrchestrator::new(config, registry)
        .unwrap()
        .with_remote(remote.clone());
    orchestrator.run_segment().await.unwrap();

    let writes = remote.writes.lock().unwrap();
    let results = writes[0].2.as_structured().unwrap();
    assert!(results.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn queue_submission_results_reach_the_retry_hook() {
    let failed_messages = json!([{"msg": "m1"}, {"msg": "m2"}]);
    let registry = registry_emitting(&[(QUEUE_PROCESS_ID, failed_messages.clone())]);
    let config = blob_config(
        vec![QUEUE_PROCESS_ID],
        vec![(QUEUE_PROCESS_ID, QUEUE_PROCESS_ID)],
    );

    let seen = Arc::new(Mutex::new(Vec::new()));
    let remote = Arc::new(CapturingRemote::new());
    let mut orchestrator = SegmentOrchestrator::new(config, registry)
        .unwrap()
        .with_remote(remote)
        .with_retry_policy(Box::new(CapturingRetry { seen: seen.clone() }));
    orchestrator.run_segment().await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[failed_messages]);
}

#[tokio::test]
async fn unknown_process_fails_the_run() {
    let registry = ProcessRegistry::new();
    let config = blob_config(vec!["a"], vec![("a", "ghost")]);

    let mut orchestrator = SegmentOrchestrator::new(config, registry).unwrap();
    let err = orchestrator.run_segment().await.unwrap_err();
    assert!(matches!(err, OrchestrationError::UnknownProcess(id) if id == "ghost"));
    assert_eq!(orchestrator.state(), RunState::Failed);
}

#[tokio::test]
async fn unknown_channel_fails_the_run() {
    let registry = registry_emitting(&[("p", json!({"ok": true}))]);
    let mut config = blob_config(vec!["a"], vec![("a", "p")]);
    config.channel = Some("teleport".to_string());

    let mut orchestrator = SegmentOrchestrator::new(config, registry).unwrap();
    let err = orchestrator.run_segment().await.unwrap_err();
    assert!(matches!(err, OrchestrationError::UnknownChannel(name) if name == "teleport"));
    assert_eq!(orchestrator.state(), RunState::Failed);
}
