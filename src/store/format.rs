// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Destination-name format dispatch and timestamped name rewriting.
//!
//! The format of a persisted artifact is determined solely by the destination
//! name's suffix: `.json` selects structured JSON text, `.csv` selects
//! tabular text, and any other suffix falls back to opaque binary
//! serialization. The rule is bit-exact and case-sensitive.

use chrono::Utc;
use std::path::{Path, PathBuf};

/// On-disk format selected by a destination name's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Tabular,
    Structured,
    Opaque,
}

impl ArtifactFormat {
    /// Dispatch rule: `.csv` -> tabular, `.json` -> structured, else opaque.
    pub fn from_name(name: &Path) -> Self {
        match name.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => ArtifactFormat::Tabular,
            Some("json") => ArtifactFormat::Structured,
            _ => ArtifactFormat::Opaque,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Tabular => "tabular",
            ArtifactFormat::Structured => "structured",
            ArtifactFormat::Opaque => "opaque",
        }
    }
}

/// Rewrite a destination name to carry the current UTC upload time.
///
/// The name is split at the final extension and `_{YYYY.MM.DD_HH.MM.SS}` is
/// inserted before it: `out/run.json` becomes
/// `out/run_2026.08.23_14.05.09.json`. A name without an extension gets the
/// timestamp appended.
pub fn timestamped_name(name: &Path) -> PathBuf {
    let stamp = Utc::now().format("%Y.%m.%d_%H.%M.%S").to_string();
    timestamped_name_at(name, &stamp)
}

fn timestamped_name_at(name: &Path, stamp: &str) -> PathBuf {
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match name.extension() {
        Some(ext) => format!("{}_{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_{}", stem, stamp),
    };
    match name.parent() {
        Some(parent) if parent != Path::new("") => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}
