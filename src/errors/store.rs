// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for artifact store operations.
//!
//! These are the recoverable tier of the error model: every variant is caught
//! inside `DiskStore` and collapsed to a boolean (or `None`) at the public
//! API, with the original error preserved for logging. The fallible `try_*`
//! operations expose them directly so callers can tell not-found apart from
//! permission or serialization failures.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by format-dispatching disk persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying filesystem I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file or directory does not exist.
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The directory already exists, so creation was refused.
    #[error("path already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// The directory is not empty, so a non-recursive delete was refused.
    #[error("directory not empty: {}", .0.display())]
    NotEmpty(PathBuf),

    /// The payload could not be encoded in the format named by the suffix.
    #[error("serialization failed for {}: {reason}", name.display())]
    Serialization { name: PathBuf, reason: String },

    /// The file contents could not be decoded as the format named by the suffix.
    #[error("deserialization failed for {}: {reason}", name.display())]
    Deserialization { name: PathBuf, reason: String },

    /// The payload variant cannot be expressed in the suffix-selected format.
    #[error("format mismatch for {}: {format} file cannot hold a {payload} payload", name.display())]
    FormatMismatch {
        name: PathBuf,
        format: &'static str,
        payload: &'static str,
    },
}
