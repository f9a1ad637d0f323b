// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Artifact data model: the payload universe the store can persist.
//!
//! An `Artifact` is one of three kinds, matching the three recognized disk
//! formats:
//!
//! * `Tabular` - row/column data, persisted as CSV with a header row
//! * `Structured` - arbitrary nested key-value data, persisted as JSON text
//! * `Opaque` - a binary blob holding any serde-serializable object graph,
//!   persisted with the generic binary serializer
//!
//! The kind of the *file* is decided solely by the destination name's suffix
//! (see `store::format`), never by the payload. Writing a payload the
//! suffix-selected format cannot express is a serialization failure.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A single value in a tabular cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Column type hints for tabular reads, mapped by column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Bool,
    Int,
    Float,
    Text,
}

/// Row/column data with a named header.
///
/// Rows are stored in insertion order; every row must match the header width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. Returns `false` (row dropped) if the width does not
    /// match the header.
    pub fn push_row(&mut self, row: Vec<Cell>) -> bool {
        if row.len() != self.columns.len() {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// A binary blob carrying an arbitrary serde-serializable object graph.
///
/// Encoding uses bincode, so anything that round-trips through bincode can be
/// stored under an opaque destination name and recovered with `decode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueBlob(Vec<u8>);

impl OpaqueBlob {
    pub fn encode<T: Serialize>(value: &T) -> Result<Self, bincode::Error> {
        Ok(Self(bincode::serialize(value)?))
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, bincode::Error> {
        bincode::deserialize(&self.0)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// A payload destined for, or retrieved from, the storage medium.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Tabular(Table),
    Structured(serde_json::Value),
    Opaque(OpaqueBlob),
}

impl Artifact {
    pub fn structured(value: impl Into<serde_json::Value>) -> Self {
        Artifact::Structured(value.into())
    }

    pub fn tabular(table: Table) -> Self {
        Artifact::Tabular(table)
    }

    /// Pack any serializable value into an opaque artifact.
    pub fn opaque<T: Serialize>(value: &T) -> Result<Self, bincode::Error> {
        Ok(Artifact::Opaque(OpaqueBlob::encode(value)?))
    }

    /// Kind name used in logs and mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Tabular(_) => "tabular",
            Artifact::Structured(_) => "structured",
            Artifact::Opaque(_) => "opaque",
        }
    }

    pub fn as_tabular(&self) -> Option<&Table> {
        match self {
            Artifact::Tabular(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Artifact::Structured(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_opaque(&self) -> Option<&OpaqueBlob> {
        match self {
            Artifact::Opaque(blob) => Some(blob),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_row_rejects_width_mismatch() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        assert!(table.push_row(vec![Cell::Int(1), Cell::Int(2)]));
        assert!(!table.push_row(vec![Cell::Int(3)]));
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn column_lookup_by_name() {
        let mut table = Table::new(vec!["x".into(), "y".into()]);
        table.push_row(vec![Cell::Int(1), Cell::Text("one".into())]);
        table.push_row(vec![Cell::Int(2), Cell::Text("two".into())]);

        let ys = table.column("y").unwrap();
        assert_eq!(ys, vec![&Cell::Text("one".into()), &Cell::Text("two".into())]);
        assert!(table.column("z").is_none());
    }

    #[test]
    fn opaque_blob_round_trips_object_graphs() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Nested {
            values: Vec<(String, i64)>,
            flag: Option<bool>,
        }

        let original = Nested {
            values: vec![("a".into(), 1), ("b".into(), 2)],
            flag: Some(true),
        };
        let blob = OpaqueBlob::encode(&original).unwrap();
        let recovered: Nested = blob.decode().unwrap();
        assert_eq!(recovered, original);
    }

    #[test]
    fn artifact_kind_names() {
        assert_eq!(Artifact::structured(json!({})).kind(), "structured");
        assert_eq!(Artifact::tabular(Table::default()).kind(), "tabular");
        assert_eq!(Artifact::opaque(&42_u8).unwrap().kind(), "opaque");
    }
}
