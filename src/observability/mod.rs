// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in orcha. Message types follow a struct-based pattern
//! with `Display` trait implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Enable future internationalization without code changes
//! * Provide consistent, structured logging output
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::store` - artifact persistence events
//! * `messages::orchestrator` - segment run lifecycle and routing events
//!
//! # Usage
//!
//! ```rust
//! use orcha::observability::messages::store::ArtifactWriteFailed;
//!
//! let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
//! let msg = ArtifactWriteFailed {
//!     name: "forecast/b1/segment_results/a_results.json",
//!     error: &error,
//! };
//!
//! tracing::warn!("{}", msg);
//! ```

pub mod messages;
