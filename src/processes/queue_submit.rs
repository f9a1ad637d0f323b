// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::OrchestrationError;
use crate::registry::Process;

/// Queue submission process - hands work messages to a downstream queue.
///
/// Supported run commands:
/// * `start_queue` - options: `{ messages: [object] }`; returns the list of
///   messages that could not be submitted, which the orchestrator forwards
///   to the retry extension point under the `run_queue` result key.
///
/// There is no real queue behind this implementation; a message is treated as
/// undeliverable when it carries `"deliver": false`, which lets demos and
/// tests drive the retry path deterministically.
pub struct QueueSubmitProcess {
    queue: String,
}

impl QueueSubmitProcess {
    pub fn new(queue: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
        }
    }

    pub fn from_options(options: &Value) -> Self {
        let queue = options
            .get("queue")
            .and_then(Value::as_str)
            .unwrap_or("default")
            .to_string();
        Self::new(queue)
    }

    fn start_queue(&self, options: &Value) -> Value {
        let messages = options
            .get("messages")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let (delivered, failed): (Vec<Value>, Vec<Value>) = messages
            .into_iter()
            .partition(|m| m.get("deliver").and_then(Value::as_bool) != Some(false));

        tracing::info!(
            queue = %self.queue,
            delivered = delivered.len(),
            failed = failed.len(),
            "queue submission finished"
        );
        Value::Array(failed)
    }
}

#[async_trait]
impl Process for QueueSubmitProcess {
    async fn run(&self, command: &str, options: &Value) -> Result<Value, OrchestrationError> {
        match command {
            "start_queue" => Ok(self.start_queue(options)),
            other => Err(OrchestrationError::UnknownRunCommand {
                process: self.name().to_string(),
                command: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "run_queue"
    }
}
