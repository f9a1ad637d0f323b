// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A very lightweight orchestrator to run a series of process modules.
//!
//! One orchestrator drives one segment: it resolves each configured process
//! through the registry in segment-list order, invokes it, shallow-merges the
//! results (later key wins), applies the retry extension point to queue
//! submission results, and writes the aggregate through the output channel.
//!
//! Invocations are awaited one at a time, so the merge order *is* the
//! segment-list order. If invocation is ever parallelized, results must be
//! buffered and merged in a second, ordered pass, and one process's failure
//! must not touch another's result.

#[cfg(test)]
mod integration_tests;

use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::channel::{ChannelRouter, RemoteStore, StubRemoteStore};
use crate::config::consts::{
    segment_results_base, DEFAULT_CHANNEL, QUEUE_PROCESS_ID, RESULTS_FILE_SUFFIX,
};
use crate::config::OrchestratorConfig;
use crate::errors::{OrchestrationError, ValidationError};
use crate::observability::messages::orchestrator::{
    ResultsWritten, RetryRequested, SegmentRunStarted,
};
use crate::observability::messages::StructuredLog;
use crate::registry::ProcessRegistry;
use crate::store::{Artifact, DiskStore};

/// Batch-scoped context, created at construction and immutable for the run.
#[derive(Debug, Clone)]
pub struct BatchContext {
    batch_id: String,
    base_path: PathBuf,
    channel: String,
}

impl BatchContext {
    /// Resolve the batch id (fresh v4 UUID when unset) and channel (disk when
    /// unset), then derive the base output path from the resolved id.
    pub fn new(batch_id: Option<String>, channel: Option<String>) -> Self {
        let batch_id = batch_id.unwrap_or_else(generate_batch_id);
        let base_path = segment_results_base(&batch_id);
        Self {
            batch_id,
            base_path,
            channel: channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

fn generate_batch_id() -> String {
    let batch_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(batch_id = %batch_id, "Setting batch id to {}", batch_id);
    batch_id
}

/// Logical run states of a segment orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, not yet run
    Idle,
    /// Iterating the segment's process list
    Running,
    /// Results written through the channel
    Completed,
    /// A configuration error aborted the run
    Failed,
}

/// Extension point invoked with failed queue messages.
///
/// Real retry logic is an external collaborator concern; the default
/// implementation only logs.
pub trait RetryPolicy: Send + Sync {
    fn retry(&self, failed: &Value);
}

/// Placeholder retry policy: report the failed messages and move on.
pub struct NoopRetry;

impl RetryPolicy for NoopRetry {
    fn retry(&self, failed: &Value) {
        RetryRequested { messages: failed }.log();
    }
}

/// Drives per-segment execution: resolve, invoke, merge, route.
pub struct SegmentOrchestrator {
    segment: Vec<String>,
    context: BatchContext,
    registry: ProcessRegistry,
    run_config: crate::config::RunConfig,
    router: ChannelRouter,
    retry: Box<dyn RetryPolicy>,
    state: RunState,
}

impl std::fmt::Debug for SegmentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentOrchestrator")
            .field("segment", &self.segment)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl SegmentOrchestrator {
    /// Build an orchestrator from an explicit configuration.
    ///
    /// The remote backend defaults to the stub, constructed with the config's
    /// storage container identifier; use `with_remote` to wire a real one.
    /// An empty segment list is a validation error.
    pub fn new(
        config: OrchestratorConfig,
        registry: ProcessRegistry,
    ) -> Result<Self, ValidationError> {
        if config.segment.is_empty() {
            return Err(ValidationError::EmptySegment);
        }
        let context = BatchContext::new(config.batch_id, config.channel);
        let remote: Arc<dyn RemoteStore> = Arc::new(StubRemoteStore::new(
            config.container.unwrap_or_default(),
        ));
        let router = ChannelRouter::new(context.channel(), DiskStore::new(), remote);
        Ok(Self {
            segment: config.segment,
            context,
            registry,
            run_config: config.processes,
            router,
            retry: Box::new(NoopRetry),
            state: RunState::Idle,
        })
    }

    /// Replace the remote backend behind the router.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.router = ChannelRouter::new(self.context.channel(), DiskStore::new(), remote);
        self
    }

    /// Replace the retry extension point.
    pub fn with_retry_policy(mut self, retry: Box<dyn RetryPolicy>) -> Self {
        self.retry = retry;
        self
    }

    pub fn context(&self) -> &BatchContext {
        &self.context
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// The destination the segment's results artifact is written to.
    pub fn results_destination(&self) -> PathBuf {
        self.context
            .base_path()
            .join(format!("{}{}", self.segment.join("_"), RESULTS_FILE_SUFFIX))
    }

    /// Run the segment and write the aggregated results.
    pub async fn run_segment(&mut self) -> Result<(), OrchestrationError> {
        self.state = RunState::Running;
        match self.run_segment_inner().await {
            Ok(()) => {
                self.state = RunState::Completed;
                Ok(())
            }
            Err(e) => {
                self.state = RunState::Failed;
                Err(e)
            }
        }
    }

    async fn run_segment_inner(&mut self) -> Result<(), OrchestrationError> {
        let started = SegmentRunStarted {
            batch_id: self.context.batch_id(),
            segment: &self.segment,
            channel: self.context.channel(),
        };
        // Entered only for the start log; holding the guard across the awaits
        // below would make this future !Send.
        {
            let span = started.span("run_segment");
            let _guard = span.enter();
            started.log();
        }

        let mut results: Map<String, Value> = Map::new();
        for process_id in &self.segment {
            let Some(spec) = self.run_config.get(process_id) else {
                continue;
            };
            let (id, value) = self.registry.invoke(spec).await?;
            if !value.is_null() {
                results.insert(id, value);
            }
        }

        if let Some(failed) = results.get(QUEUE_PROCESS_ID) {
            self.retry.retry(failed);
        }

        let destination = self.results_destination();
        let payload = Artifact::Structured(Value::Object(results));
        self.router.route(&payload, &destination).await?;

        ResultsWritten {
            batch_id: self.context.batch_id(),
            channel: self.context.channel(),
            destination: &destination.display().to_string(),
        }
        .log();
        Ok(())
    }
}
