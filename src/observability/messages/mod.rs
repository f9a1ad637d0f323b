// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements the `Display` trait for human-readable output
//! and `StructuredLog` to emit the same event with structured fields attached.
//!
//! # Organization
//!
//! * `store` - artifact persistence events (writes, reads, deletes, directory ops)
//! * `orchestrator` - segment run lifecycle, routing, and retry events

use tracing::Span;

pub mod orchestrator;
pub mod store;

/// Emit a message through `tracing` with structured fields.
///
/// `log()` records the event at the level appropriate for the message type;
/// `span()` opens a span carrying the same fields for nested work.
pub trait StructuredLog {
    fn log(&self);

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("orcha", span_name = name)
    }
}
