// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for artifact persistence events.
//!
//! This module contains message types for logging events related to:
//! * Artifact writes and reads (single and batched)
//! * File deletion
//! * Directory lifecycle operations

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// An artifact was written to its destination.
///
/// # Log Level
/// `info!` - Routine operational event
pub struct ArtifactWritten<'a> {
    pub name: &'a str,
}

impl Display for ArtifactWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Upload to disk successful in {}", self.name)
    }
}

impl StructuredLog for ArtifactWritten<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, "{}", self);
    }
}

/// An artifact write failed; the failure was collapsed to `false` for the caller.
///
/// # Log Level
/// `warn!` - Recoverable failure
pub struct ArtifactWriteFailed<'a> {
    pub name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ArtifactWriteFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unsuccessful upload to disk in {}: {}", self.name, self.error)
    }
}

impl StructuredLog for ArtifactWriteFailed<'_> {
    fn log(&self) {
        tracing::warn!(name = self.name, error = %self.error, "{}", self);
    }
}

/// An artifact was read back from disk.
///
/// # Log Level
/// `info!` - Routine operational event
pub struct ArtifactRead<'a> {
    pub name: &'a str,
}

impl Display for ArtifactRead<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Read {} from disk successful", self.name)
    }
}

impl StructuredLog for ArtifactRead<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, "{}", self);
    }
}

/// An artifact read failed; the caller receives `None`.
///
/// # Log Level
/// `warn!` - Recoverable failure
pub struct ArtifactReadFailed<'a> {
    pub name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ArtifactReadFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Unsuccessful read {} from disk: {}", self.name, self.error)
    }
}

impl StructuredLog for ArtifactReadFailed<'_> {
    fn log(&self) {
        tracing::warn!(name = self.name, error = %self.error, "{}", self);
    }
}

/// A file was deleted, or was already absent (idempotent delete).
///
/// # Log Level
/// `info!` - Routine operational event
pub struct FileDeleted<'a> {
    pub name: &'a str,
}

impl Display for FileDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deletion of file {} successful", self.name)
    }
}

impl StructuredLog for FileDeleted<'_> {
    fn log(&self) {
        tracing::info!(name = self.name, "{}", self);
    }
}

/// A directory was deleted.
///
/// # Log Level
/// `info!` - Routine operational event
pub struct DirectoryDeleted<'a> {
    pub path: &'a str,
}

impl Display for DirectoryDeleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Deletion of directory {} successful", self.path)
    }
}

impl StructuredLog for DirectoryDeleted<'_> {
    fn log(&self) {
        tracing::info!(path = self.path, "{}", self);
    }
}

/// A store operation was refused or failed; the caller receives `false`.
///
/// Covers directory lifecycle refusals (already exists, not empty, not found)
/// as well as delete and list failures.
///
/// # Log Level
/// `warn!` - Recoverable failure
pub struct StoreOpRefused<'a> {
    pub operation: &'static str,
    pub path: &'a str,
    pub reason: String,
}

impl Display for StoreOpRefused<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Couldn't {} {}: {}", self.operation, self.path, self.reason)
    }
}

impl StructuredLog for StoreOpRefused<'_> {
    fn log(&self) {
        tracing::warn!(
            operation = self.operation,
            path = self.path,
            reason = %self.reason,
            "{}", self
        );
    }
}

/// A directory was created.
///
/// # Log Level
/// `info!` - Routine operational event
pub struct DirectoryCreated<'a> {
    pub path: &'a str,
    pub recursive: bool,
}

impl Display for DirectoryCreated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.recursive {
            write!(f, "Multi-level directories {} created", self.path)
        } else {
            write!(f, "Directory {} created", self.path)
        }
    }
}

impl StructuredLog for DirectoryCreated<'_> {
    fn log(&self) {
        tracing::info!(path = self.path, recursive = self.recursive, "{}", self);
    }
}
