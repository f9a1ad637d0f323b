// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Format-dispatching artifact persistence.
//!
//! * `artifact` - the payload data model (`Artifact`, `Table`, `OpaqueBlob`)
//! * `format` - suffix dispatch rule and timestamped name rewriting
//! * `tabular` - CSV codec with optional column type hints
//! * `disk` - `DiskStore`: read/write/delete, batches, directory lifecycle

pub mod artifact;
pub mod disk;
pub mod format;
pub mod tabular;

pub use artifact::{Artifact, Cell, ColumnType, OpaqueBlob, Table};
pub use disk::{DiskStore, ReadRequest};
pub use format::ArtifactFormat;
