// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Format-dispatching disk persistence.
//!
//! `DiskStore` reads, writes, and deletes artifacts on the local filesystem,
//! selecting the serialization by the destination name's suffix (see
//! `store::format`). The public API never propagates underlying faults: every
//! operation collapses to a boolean (or `None`) plus a structured log line.
//! The `try_*` twins return `Result<_, StoreError>` so callers that need to
//! distinguish not-found from permission from serialization errors can.
//!
//! Batch operations apply the single-item operation per entry in input order
//! and key the result map by *base name* (the file name component, not the
//! full path). Two entries sharing a base name silently overwrite each other
//! in the result map; batches are never grouped or deduplicated by directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::observability::messages::store::{
    ArtifactRead, ArtifactReadFailed, ArtifactWriteFailed, ArtifactWritten, DirectoryCreated,
    DirectoryDeleted, FileDeleted, StoreOpRefused,
};
use crate::observability::messages::StructuredLog;
use crate::store::artifact::{Artifact, ColumnType, Table};
use crate::store::format::{timestamped_name, ArtifactFormat};
use crate::store::tabular;

/// On-disk envelope for opaque files.
///
/// Structured payloads are stored as JSON text inside the envelope because
/// `serde_json::Value` is self-describing and cannot come back through a
/// non-self-describing binary decoder.
#[derive(Serialize, Deserialize)]
enum OpaqueRecord {
    Tabular(Table),
    Structured(String),
    Blob(Vec<u8>),
}

/// One entry of a batched read: a source name with optional tabular type hints.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    pub name: PathBuf,
    pub hints: Option<HashMap<String, ColumnType>>,
}

impl ReadRequest {
    pub fn new(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            hints: None,
        }
    }

    pub fn with_hints(name: impl Into<PathBuf>, hints: HashMap<String, ColumnType>) -> Self {
        Self {
            name: name.into(),
            hints: Some(hints),
        }
    }
}

/// Format-aware persistence against the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl DiskStore {
    pub fn new() -> Self {
        Self
    }

    /// Write an artifact, selecting serialization by the destination suffix.
    ///
    /// With `include_timestamp`, the destination name is rewritten to carry
    /// the UTC upload time before its final extension. Returns `false` and
    /// logs on any underlying failure.
    pub fn write(
        &self,
        artifact: &Artifact,
        name: impl AsRef<Path>,
        include_timestamp: bool,
    ) -> bool {
        let destination = if include_timestamp {
            timestamped_name(name.as_ref())
        } else {
            name.as_ref().to_path_buf()
        };
        let shown = destination.display().to_string();
        match self.try_write(artifact, &destination) {
            Ok(()) => {
                ArtifactWritten { name: &shown }.log();
                true
            }
            Err(e) => {
                ArtifactWriteFailed {
                    name: &shown,
                    error: &e,
                }
                .log();
                false
            }
        }
    }

    /// Fallible twin of `write`; does not rewrite the destination name.
    pub fn try_write(&self, artifact: &Artifact, name: &Path) -> Result<(), StoreError> {
        match ArtifactFormat::from_name(name) {
            ArtifactFormat::Tabular => {
                let table = artifact
                    .as_tabular()
                    .ok_or_else(|| mismatch(name, ArtifactFormat::Tabular, artifact))?;
                fs::write(name, tabular::to_csv(table))?;
            }
            ArtifactFormat::Structured => {
                let value = artifact
                    .as_structured()
                    .ok_or_else(|| mismatch(name, ArtifactFormat::Structured, artifact))?;
                let text = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
                    name: name.to_path_buf(),
                    reason: e.to_string(),
                })?;
                fs::write(name, text)?;
            }
            ArtifactFormat::Opaque => {
                let record = to_opaque_record(artifact, name)?;
                let bytes =
                    bincode::serialize(&record).map_err(|e| StoreError::Serialization {
                        name: name.to_path_buf(),
                        reason: e.to_string(),
                    })?;
                fs::write(name, bytes)?;
            }
        }
        Ok(())
    }

    /// Read an artifact back, selecting deserialization by the source suffix.
    ///
    /// `hints` applies only to tabular reads. Returns `None` and logs on any
    /// underlying failure.
    pub fn read(
        &self,
        name: impl AsRef<Path>,
        hints: Option<&HashMap<String, ColumnType>>,
    ) -> Option<Artifact> {
        let name = name.as_ref();
        let shown = name.display().to_string();
        match self.try_read(name, hints) {
            Ok(artifact) => {
                ArtifactRead { name: &shown }.log();
                Some(artifact)
            }
            Err(e) => {
                ArtifactReadFailed {
                    name: &shown,
                    error: &e,
                }
                .log();
                None
            }
        }
    }

    /// Fallible twin of `read`.
    pub fn try_read(
        &self,
        name: &Path,
        hints: Option<&HashMap<String, ColumnType>>,
    ) -> Result<Artifact, StoreError> {
        match ArtifactFormat::from_name(name) {
            ArtifactFormat::Tabular => {
                let text = read_to_string(name)?;
                let table = tabular::from_csv(&text, hints).map_err(|reason| {
                    StoreError::Deserialization {
                        name: name.to_path_buf(),
                        reason,
                    }
                })?;
                Ok(Artifact::Tabular(table))
            }
            ArtifactFormat::Structured => {
                let text = read_to_string(name)?;
                let value = serde_json::from_str(&text).map_err(|e| {
                    StoreError::Deserialization {
                        name: name.to_path_buf(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Artifact::Structured(value))
            }
            ArtifactFormat::Opaque => {
                let bytes = read_bytes(name)?;
                let record: OpaqueRecord = bincode::deserialize(&bytes).map_err(|e| {
                    StoreError::Deserialization {
                        name: name.to_path_buf(),
                        reason: e.to_string(),
                    }
                })?;
                from_opaque_record(record, name)
            }
        }
    }

    /// Write each entry in input order; result keyed by base name.
    pub fn write_batch(
        &self,
        entries: &[(PathBuf, Artifact)],
        include_timestamp: bool,
    ) -> HashMap<String, bool> {
        let mut results = HashMap::new();
        for (name, artifact) in entries {
            results.insert(
                base_name(name),
                self.write(artifact, name, include_timestamp),
            );
        }
        results
    }

    /// Read each request in input order; result keyed by base name.
    pub fn read_batch(&self, requests: &[ReadRequest]) -> HashMap<String, Option<Artifact>> {
        let mut results = HashMap::new();
        for request in requests {
            results.insert(
                base_name(&request.name),
                self.read(&request.name, request.hints.as_ref()),
            );
        }
        results
    }

    /// Delete a file. Absence of the file is success (idempotent delete).
    pub fn delete_one(&self, name: impl AsRef<Path>) -> bool {
        let name = name.as_ref();
        let shown = name.display().to_string();
        match self.try_delete_one(name) {
            Ok(()) => {
                FileDeleted { name: &shown }.log();
                true
            }
            Err(e) => {
                StoreOpRefused {
                    operation: "delete file",
                    path: &shown,
                    reason: e.to_string(),
                }
                .log();
                false
            }
        }
    }

    pub fn try_delete_one(&self, name: &Path) -> Result<(), StoreError> {
        if name.exists() {
            fs::remove_file(name)?;
        }
        Ok(())
    }

    /// Delete each name in input order; result keyed by base name.
    pub fn delete_batch(&self, names: &[PathBuf]) -> HashMap<String, bool> {
        let mut results = HashMap::new();
        for name in names {
            results.insert(base_name(name), self.delete_one(name));
        }
        results
    }

    /// Create a directory. Fails (returns `false`) if it already exists.
    pub fn create_dir(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let shown = path.display().to_string();
        match self.try_create_dir(path) {
            Ok(()) => {
                DirectoryCreated {
                    path: &shown,
                    recursive: false,
                }
                .log();
                true
            }
            Err(e) => {
                StoreOpRefused {
                    operation: "create directory",
                    path: &shown,
                    reason: e.to_string(),
                }
                .log();
                false
            }
        }
    }

    pub fn try_create_dir(&self, path: &Path) -> Result<(), StoreError> {
        if path.exists() {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        fs::create_dir(path)?;
        Ok(())
    }

    /// Create a directory and all missing intermediate levels.
    ///
    /// Fails (returns `false`) if the full path already exists; this
    /// preserves the non-idempotent contract of `create_dir`.
    pub fn create_dir_recursive(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let shown = path.display().to_string();
        match self.try_create_dir_recursive(path) {
            Ok(()) => {
                DirectoryCreated {
                    path: &shown,
                    recursive: true,
                }
                .log();
                true
            }
            Err(e) => {
                StoreOpRefused {
                    operation: "create multi-level directories",
                    path: &shown,
                    reason: e.to_string(),
                }
                .log();
                false
            }
        }
    }

    pub fn try_create_dir_recursive(&self, path: &Path) -> Result<(), StoreError> {
        if path.exists() {
            return Err(StoreError::AlreadyExists(path.to_path_buf()));
        }
        fs::create_dir_all(path)?;
        Ok(())
    }

    /// Delete a directory only if it exists and is empty.
    pub fn delete_empty_dir(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let shown = path.display().to_string();
        match self.try_delete_empty_dir(path) {
            Ok(()) => {
                DirectoryDeleted { path: &shown }.log();
                true
            }
            Err(e) => {
                StoreOpRefused {
                    operation: "delete empty directory",
                    path: &shown,
                    reason: e.to_string(),
                }
                .log();
                false
            }
        }
    }

    pub fn try_delete_empty_dir(&self, path: &Path) -> Result<(), StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        if fs::read_dir(path)?.next().is_some() {
            return Err(StoreError::NotEmpty(path.to_path_buf()));
        }
        fs::remove_dir(path)?;
        Ok(())
    }

    /// Delete a directory and all its contents. Fails if it does not exist.
    pub fn delete_dir_recursive(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let shown = path.display().to_string();
        match self.try_delete_dir_recursive(path) {
            Ok(()) => {
                DirectoryDeleted { path: &shown }.log();
                true
            }
            Err(e) => {
                StoreOpRefused {
                    operation: "delete directory",
                    path: &shown,
                    reason: e.to_string(),
                }
                .log();
                false
            }
        }
    }

    pub fn try_delete_dir_recursive(&self, path: &Path) -> Result<(), StoreError> {
        if !path.exists() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }
        fs::remove_dir_all(path)?;
        Ok(())
    }

    /// List entry names in a directory, in filesystem order (no sort).
    ///
    /// With `files_only`, sub-directories are excluded. Collapses errors to
    /// an empty list plus a log line.
    pub fn list_dir(&self, path: impl AsRef<Path>, files_only: bool) -> Vec<String> {
        let path = path.as_ref();
        match self.try_list_dir(path, files_only) {
            Ok(names) => names,
            Err(e) => {
                StoreOpRefused {
                    operation: "list directory",
                    path: &path.display().to_string(),
                    reason: e.to_string(),
                }
                .log();
                Vec::new()
            }
        }
    }

    pub fn try_list_dir(&self, path: &Path, files_only: bool) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if files_only && !entry.path().is_file() {
                continue;
            }
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// The process's current directory, or `None` (logged) if unavailable.
    pub fn current_dir(&self) -> Option<PathBuf> {
        match std::env::current_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                StoreOpRefused {
                    operation: "get current directory",
                    path: ".",
                    reason: e.to_string(),
                }
                .log();
                None
            }
        }
    }
}

/// Base name of a path: the file name component, or the whole path when it
/// has none (e.g. ends in `..`).
fn base_name(name: &Path) -> String {
    name.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.display().to_string())
}

fn mismatch(name: &Path, format: ArtifactFormat, artifact: &Artifact) -> StoreError {
    StoreError::FormatMismatch {
        name: name.to_path_buf(),
        format: format.as_str(),
        payload: artifact.kind(),
    }
}

fn to_opaque_record(artifact: &Artifact, name: &Path) -> Result<OpaqueRecord, StoreError> {
    Ok(match artifact {
        Artifact::Tabular(table) => OpaqueRecord::Tabular(table.clone()),
        Artifact::Structured(value) => OpaqueRecord::Structured(
            serde_json::to_string(value).map_err(|e| StoreError::Serialization {
                name: name.to_path_buf(),
                reason: e.to_string(),
            })?,
        ),
        Artifact::Opaque(blob) => OpaqueRecord::Blob(blob.as_bytes().to_vec()),
    })
}

fn from_opaque_record(record: OpaqueRecord, name: &Path) -> Result<Artifact, StoreError> {
    Ok(match record {
        OpaqueRecord::Tabular(table) => Artifact::Tabular(table),
        OpaqueRecord::Structured(text) => Artifact::Structured(
            serde_json::from_str(&text).map_err(|e| StoreError::Deserialization {
                name: name.to_path_buf(),
                reason: e.to_string(),
            })?,
        ),
        OpaqueRecord::Blob(bytes) => {
            Artifact::Opaque(crate::store::artifact::OpaqueBlob::from_bytes(bytes))
        }
    })
}

fn read_to_string(name: &Path) -> Result<String, StoreError> {
    fs::read_to_string(name).map_err(|e| io_to_store(e, name))
}

fn read_bytes(name: &Path) -> Result<Vec<u8>, StoreError> {
    fs::read(name).map_err(|e| io_to_store(e, name))
}

fn io_to_store(e: std::io::Error, name: &Path) -> StoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StoreError::NotFound(name.to_path_buf())
    } else {
        StoreError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::artifact::{Cell, OpaqueBlob};
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> DiskStore {
        DiskStore::new()
    }

    fn scratch() -> TempDir {
        TempDir::new().expect("tempdir")
    }

    #[test]
    fn structured_round_trip() {
        let dir = scratch();
        let name = dir.path().join("result.json");
        let artifact = Artifact::structured(json!({"key": "val", "nested": {"n": [1, 2, 3]}}));

        assert!(store().write(&artifact, &name, false));
        let back = store().read(&name, None).expect("read back");
        assert_eq!(back, artifact);
    }

    #[test]
    fn tabular_round_trip() {
        let dir = scratch();
        let name = dir.path().join("frame.csv");
        let mut table = Table::new(vec!["id".into(), "value".into()]);
        table.push_row(vec![Cell::Int(1), Cell::Float(0.5)]);
        table.push_row(vec![Cell::Int(2), Cell::Float(1.5)]);
        let artifact = Artifact::tabular(table);

        assert!(store().write(&artifact, &name, false));
        let back = store().read(&name, None).expect("read back");
        assert_eq!(back, artifact);
    }

    #[test]
    fn tabular_read_applies_hints() {
        let dir = scratch();
        let name = dir.path().join("frame.csv");
        std::fs::write(&name, "sku,qty\n0042,7\n").unwrap();

        let mut hints = HashMap::new();
        hints.insert("sku".to_string(), ColumnType::Text);
        let back = store().read(&name, Some(&hints)).expect("read back");
        let table = back.as_tabular().unwrap();
        assert_eq!(table.rows()[0][0], Cell::Text("0042".into()));
        assert_eq!(table.rows()[0][1], Cell::Int(7));
    }

    #[test]
    fn opaque_round_trips_arbitrary_graphs() {
        let dir = scratch();
        let name = dir.path().join("model");

        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Model {
            weights: Vec<f64>,
            labels: Vec<String>,
        }

        let model = Model {
            weights: vec![0.1, 0.9],
            labels: vec!["low".into(), "high".into()],
        };
        let artifact = Artifact::opaque(&model).unwrap();

        assert!(store().write(&artifact, &name, false));
        let back = store().read(&name, None).expect("read back");
        let recovered: Model = back.as_opaque().unwrap().decode().unwrap();
        assert_eq!(recovered, model);
    }

    #[test]
    fn opaque_suffix_accepts_any_payload_kind() {
        let dir = scratch();
        let name = dir.path().join("snapshot.bin");
        let artifact = Artifact::structured(json!({"k": 1}));

        assert!(store().write(&artifact, &name, false));
        let back = store().read(&name, None).expect("read back");
        assert_eq!(back, artifact);
    }

    #[test]
    fn format_mismatch_collapses_to_false() {
        let dir = scratch();
        let name = dir.path().join("frame.csv");
        let artifact = Artifact::structured(json!({"not": "tabular"}));

        assert!(!store().write(&artifact, &name, false));
        assert!(!name.exists());

        let err = store().try_write(&artifact, &name).unwrap_err();
        assert!(matches!(err, StoreError::FormatMismatch { .. }));
    }

    #[test]
    fn read_missing_file_is_none_and_not_found() {
        let dir = scratch();
        let name = dir.path().join("absent.json");
        assert!(store().read(&name, None).is_none());
        assert!(matches!(
            store().try_read(&name, None).unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn timestamped_write_lands_beside_plain_name() {
        let dir = scratch();
        let name = dir.path().join("out.json");
        let artifact = Artifact::structured(json!({"t": true}));

        assert!(store().write(&artifact, &name, true));
        assert!(!name.exists());

        let names = store().list_dir(dir.path(), true);
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("out_"));
        assert!(names[0].ends_with(".json"));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = scratch();
        let name = dir.path().join("gone.json");
        assert!(store().delete_one(&name));

        std::fs::write(&name, "{}").unwrap();
        assert!(store().delete_one(&name));
        assert!(!name.exists());
    }

    #[test]
    fn batch_results_key_by_base_name_and_overwrite() {
        let dir = scratch();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();

        let v1 = Artifact::structured(json!({"v": 1}));
        let v2 = Artifact::structured(json!({"v": 2}));
        let entries = vec![(a.join("x.json"), v1.clone()), (b.join("x.json"), v2.clone())];

        let results = store().write_batch(&entries, false);
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("x.json"), Some(&true));

        // Both files were written; the result map just reflects the last status.
        assert_eq!(store().read(a.join("x.json"), None), Some(v1));
        assert_eq!(store().read(b.join("x.json"), None), Some(v2));
    }

    #[test]
    fn batch_isolates_item_failures() {
        let dir = scratch();
        let good = dir.path().join("good.json");
        store().write(&Artifact::structured(json!(1)), &good, false);

        let requests = vec![
            ReadRequest::new(&good),
            ReadRequest::new(dir.path().join("missing.json")),
        ];
        let results = store().read_batch(&requests);
        assert_eq!(results.len(), 2);
        assert!(results.get("good.json").unwrap().is_some());
        assert!(results.get("missing.json").unwrap().is_none());
    }

    #[test]
    fn delete_batch_reports_per_item() {
        let dir = scratch();
        let present = dir.path().join("present");
        std::fs::write(&present, b"x").unwrap();

        let names = vec![present.clone(), dir.path().join("absent")];
        let results = store().delete_batch(&names);
        assert_eq!(results.get("present"), Some(&true));
        assert_eq!(results.get("absent"), Some(&true));
    }

    #[test]
    fn create_dir_is_not_idempotent() {
        let dir = scratch();
        let path = dir.path().join("fresh");
        assert!(store().create_dir(&path));
        assert!(!store().create_dir(&path));
    }

    #[test]
    fn create_dir_recursive_fails_on_existing_path() {
        let dir = scratch();
        let path = dir.path().join("one/two/three");
        assert!(store().create_dir_recursive(&path));
        assert!(path.is_dir());
        assert!(!store().create_dir_recursive(&path));
    }

    #[test]
    fn delete_empty_dir_requires_existing_and_empty() {
        let dir = scratch();
        let path = dir.path().join("d");

        assert!(!store().delete_empty_dir(&path));

        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("f"), b"x").unwrap();
        assert!(!store().delete_empty_dir(&path));

        std::fs::remove_file(path.join("f")).unwrap();
        assert!(store().delete_empty_dir(&path));
        assert!(!path.exists());
    }

    #[test]
    fn delete_dir_recursive_requires_existing() {
        let dir = scratch();
        let path = dir.path().join("tree");
        assert!(!store().delete_dir_recursive(&path));

        std::fs::create_dir_all(path.join("inner")).unwrap();
        std::fs::write(path.join("inner/f"), b"x").unwrap();
        assert!(store().delete_dir_recursive(&path));
        assert!(!path.exists());
    }

    #[test]
    fn list_dir_files_only_excludes_directories() {
        let dir = scratch();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("f1"), b"x").unwrap();
        std::fs::write(dir.path().join("f2"), b"y").unwrap();

        let mut all = store().list_dir(dir.path(), false);
        all.sort();
        assert_eq!(all, vec!["f1", "f2", "sub"]);

        let mut files = store().list_dir(dir.path(), true);
        files.sort();
        assert_eq!(files, vec!["f1", "f2"]);
    }

    #[test]
    fn opaque_blob_passthrough_preserves_bytes() {
        let dir = scratch();
        let name = dir.path().join("raw.blob");
        let artifact = Artifact::Opaque(OpaqueBlob::from_bytes(vec![0, 159, 146, 150]));

        assert!(store().write(&artifact, &name, false));
        assert_eq!(store().read(&name, None), Some(artifact));
    }
}
