// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for segment orchestration.
//!
//! These are the fatal tier of the error model: each variant indicates a
//! misconfiguration discovered at run time (an unknown output channel, a
//! process or run command the registry has never heard of). They are not
//! caught and converted to booleans; they abort the current `run_segment`
//! call and surface to the caller.

use thiserror::Error;

/// Errors raised while resolving and running segment processes.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    /// The configured output channel is not one of the recognized names.
    #[error("output channel '{0}' is not valid ('disk', 'azure_blob')")]
    UnknownChannel(String),

    /// The run config names a process the registry does not contain.
    #[error("process '{0}' is not registered")]
    UnknownProcess(String),

    /// The run config names a run command the process does not support.
    #[error("process '{process}' does not support run command '{command}'")]
    UnknownRunCommand { process: String, command: String },

    /// A process factory refused its constructor options.
    #[error("failed to construct process '{process}': {reason}")]
    ConstructionFailed { process: String, reason: String },

    /// A process run returned an error rather than a result value.
    #[error("process '{process}' failed: {reason}")]
    ProcessFailed { process: String, reason: String },
}
