// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during run configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The segment list is empty, so there is nothing to orchestrate
    EmptySegment,
    /// A run config entry names a process the registry does not contain
    UnknownProcessReference {
        /// The process identifier that couldn't be resolved
        process_id: String,
    },
    /// A run config entry has an empty run command
    MissingRunCommand {
        /// The process identifier whose spec is missing a run command
        process_id: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySegment => {
                write!(f, "A segment list must be provided")
            }
            ValidationError::UnknownProcessReference { process_id } => {
                write!(
                    f,
                    "Run config references process '{}' which is not registered",
                    process_id
                )
            }
            ValidationError::MissingRunCommand { process_id } => {
                write!(f, "Process '{}' has an empty run command", process_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
