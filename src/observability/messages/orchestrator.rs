// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for segment run lifecycle and routing events.
//!
//! This module contains message types for logging events related to:
//! * Segment run start and completion
//! * Process resolution and invocation
//! * Output channel routing
//! * The retry extension point

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A segment run started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SegmentRunStarted<'a> {
    pub batch_id: &'a str,
    pub segment: &'a [String],
    pub channel: &'a str,
}

impl Display for SegmentRunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Running segment [{}] for batch {} (channel: {})",
            self.segment.join(", "),
            self.batch_id,
            self.channel
        )
    }
}

impl StructuredLog for SegmentRunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            batch_id = self.batch_id,
            segment = %self.segment.join("_"),
            channel = self.channel,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "segment_run",
            span_name = name,
            batch_id = self.batch_id,
            segment = %self.segment.join("_"),
            channel = self.channel,
        )
    }
}

/// A process is about to be invoked.
///
/// # Log Level
/// `info!` - Routine operational event
pub struct ProcessInvoked<'a> {
    pub process_id: &'a str,
    pub run_command: &'a str,
}

impl Display for ProcessInvoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Calling process: {} ({})", self.process_id, self.run_command)
    }
}

impl StructuredLog for ProcessInvoked<'_> {
    fn log(&self) {
        tracing::info!(
            process_id = self.process_id,
            run_command = self.run_command,
            "{}", self
        );
    }
}

/// The aggregated results were written through the output channel.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ResultsWritten<'a> {
    pub batch_id: &'a str,
    pub channel: &'a str,
    pub destination: &'a str,
}

impl Display for ResultsWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Output successfully written to {} for {} at {}",
            self.channel, self.batch_id, self.destination
        )
    }
}

impl StructuredLog for ResultsWritten<'_> {
    fn log(&self) {
        tracing::info!(
            batch_id = self.batch_id,
            channel = self.channel,
            destination = self.destination,
            "{}", self
        );
    }
}

/// Failed queue messages were handed to the retry extension point.
///
/// # Log Level
/// `info!` - Placeholder behavior; real retry logic is a collaborator concern
pub struct RetryRequested<'a> {
    pub messages: &'a serde_json::Value,
}

impl Display for RetryRequested<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "failed messages: {}", self.messages)
    }
}

impl StructuredLog for RetryRequested<'_> {
    fn log(&self) {
        tracing::info!(messages = %self.messages, "{}", self);
    }
}

/// The configured output channel is not recognized.
///
/// # Log Level
/// `error!` - Fatal configuration error; the run aborts after this
pub struct ChannelRejected<'a> {
    pub channel: &'a str,
}

impl Display for ChannelRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Output channel {} is not valid ('disk', 'azure_blob')",
            self.channel
        )
    }
}

impl StructuredLog for ChannelRejected<'_> {
    fn log(&self) {
        tracing::error!(channel = self.channel, "{}", self);
    }
}
