// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Name -> capability lookup for segment processes.
//!
//! The orchestrator constructs and invokes arbitrary process modules without
//! compile-time knowledge of their types. Lookup is an explicit mapping from
//! process identifier to a factory; each factory builds a value satisfying
//! the `Process` capability trait. There is no reflection anywhere: run
//! commands are plain strings that implementations match on, answering
//! `UnknownRunCommand` for anything they don't support.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ProcessSpec;
use crate::errors::OrchestrationError;
use crate::observability::messages::orchestrator::ProcessInvoked;
use crate::observability::messages::StructuredLog;

/// A constructed process module, ready to run.
///
/// `run` receives the run command identifier and its options and returns an
/// arbitrary result value. Unknown commands are a configuration error, not a
/// runtime condition to recover from.
#[async_trait]
pub trait Process: Send + Sync {
    async fn run(&self, command: &str, options: &Value) -> Result<Value, OrchestrationError>;

    fn name(&self) -> &'static str;
}

/// Builds a `Process` from its constructor options.
pub trait ProcessFactory: Send + Sync {
    fn create(&self, options: &Value) -> Result<Box<dyn Process>, OrchestrationError>;
}

impl<F> ProcessFactory for F
where
    F: Fn(&Value) -> Result<Box<dyn Process>, OrchestrationError> + Send + Sync,
{
    fn create(&self, options: &Value) -> Result<Box<dyn Process>, OrchestrationError> {
        self(options)
    }
}

/// Newtype wrapper for the process registry providing type safety
#[derive(Clone, Default)]
pub struct ProcessRegistry(pub HashMap<String, Arc<dyn ProcessFactory>>);

impl ProcessRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert a factory under a process identifier
    pub fn insert(&mut self, id: impl Into<String>, factory: Arc<dyn ProcessFactory>) {
        self.0.insert(id.into(), factory);
    }

    /// Insert a closure factory under a process identifier
    pub fn insert_fn<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn(&Value) -> Result<Box<dyn Process>, OrchestrationError> + Send + Sync + 'static,
    {
        self.0.insert(id.into(), Arc::new(factory));
    }

    /// Get a factory by process identifier
    pub fn get(&self, id: &str) -> Option<&Arc<dyn ProcessFactory>> {
        self.0.get(id)
    }

    /// Check if a process identifier is registered
    pub fn contains_key(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Get all registered process identifiers
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Construct and run the process named by a spec.
    ///
    /// Resolves the factory by `spec.process`, builds the process with the
    /// spec's constructor options, runs the named command with the spec's run
    /// options, and returns the result keyed by the process identifier.
    /// Unknown process or run command identifiers propagate - they indicate a
    /// misconfiguration, and the current orchestration run should abort.
    pub async fn invoke(&self, spec: &ProcessSpec) -> Result<(String, Value), OrchestrationError> {
        let factory = self
            .get(&spec.process)
            .ok_or_else(|| OrchestrationError::UnknownProcess(spec.process.clone()))?;

        ProcessInvoked {
            process_id: &spec.process,
            run_command: &spec.run_command,
        }
        .log();

        let process = factory.create(&spec.constructor_options)?;
        let result = process.run(&spec.run_command, &spec.run_options).await?;
        Ok((spec.process.clone(), result))
    }
}

impl std::fmt::Debug for ProcessRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessRegistry")
            .field("process_count", &self.0.len())
            .field("process_ids", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<HashMap<String, Arc<dyn ProcessFactory>>> for ProcessRegistry {
    fn from(map: HashMap<String, Arc<dyn ProcessFactory>>) -> Self {
        Self(map)
    }
}
