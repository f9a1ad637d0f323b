// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! CSV codec for tabular artifacts.
//!
//! Writes a header row and no row-index column. Reads accept an optional
//! `column name -> ColumnType` hint map; unhinted columns are inferred
//! (all-integer -> Int, else all-float -> Float, else all true/false -> Bool,
//! else Text). Empty cells are `Null` in either direction.

use crate::store::artifact::{Cell, ColumnType, Table};
use std::collections::HashMap;

/// Encode a table as CSV text: header row first, rows in order.
pub fn to_csv(table: &Table) -> String {
    let mut out = String::new();
    write_record(&mut out, table.columns().iter().map(String::as_str));
    for row in table.rows() {
        let rendered: Vec<String> = row.iter().map(render_cell).collect();
        write_record(&mut out, rendered.iter().map(String::as_str));
    }
    out
}

/// Decode CSV text into a table, applying type hints where given.
pub fn from_csv(
    text: &str,
    hints: Option<&HashMap<String, ColumnType>>,
) -> Result<Table, String> {
    let mut records = parse_records(text)?;
    if records.is_empty() {
        return Err("csv input has no header row".to_string());
    }
    let columns = records.remove(0);
    for (i, record) in records.iter().enumerate() {
        if record.len() != columns.len() {
            return Err(format!(
                "row {} has {} fields, expected {}",
                i + 1,
                record.len(),
                columns.len()
            ));
        }
    }

    let types: Vec<ColumnType> = columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            hints
                .and_then(|h| h.get(name).copied())
                .unwrap_or_else(|| infer_column_type(&records, idx))
        })
        .collect();

    let mut table = Table::new(columns);
    for record in &records {
        let row = record
            .iter()
            .zip(&types)
            .map(|(raw, ty)| parse_cell(raw, *ty))
            .collect::<Result<Vec<Cell>, String>>()?;
        table.push_row(row);
    }
    Ok(table)
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Null => String::new(),
        Cell::Bool(b) => b.to_string(),
        Cell::Int(i) => i.to_string(),
        // Keep whole floats distinguishable from integers on the way back in
        Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
        Cell::Float(f) => f.to_string(),
        Cell::Text(s) => s.clone(),
    }
}

fn write_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

/// Split CSV text into records of raw fields, honoring quoting.
fn parse_records(text: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    let mut saw_any = false;

    while let Some(c) = chars.next() {
        saw_any = true;
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    if !saw_any {
        return Err("csv input is empty".to_string());
    }
    // A trailing newline leaves one spurious empty record; drop it.
    if records.last().is_some_and(|r| r.len() == 1 && r[0].is_empty()) {
        records.pop();
    }
    Ok(records)
}

fn infer_column_type(records: &[Vec<String>], idx: usize) -> ColumnType {
    let non_empty: Vec<&str> = records
        .iter()
        .map(|r| r[idx].as_str())
        .filter(|s| !s.is_empty())
        .collect();
    if non_empty.is_empty() {
        return ColumnType::Text;
    }
    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Int;
    }
    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float;
    }
    if non_empty.iter().all(|s| *s == "true" || *s == "false") {
        return ColumnType::Bool;
    }
    ColumnType::Text
}

fn parse_cell(raw: &str, ty: ColumnType) -> Result<Cell, String> {
    if raw.is_empty() {
        return Ok(Cell::Null);
    }
    match ty {
        ColumnType::Int => raw
            .parse::<i64>()
            .map(Cell::Int)
            .map_err(|_| format!("'{}' is not an integer", raw)),
        ColumnType::Float => raw
            .parse::<f64>()
            .map(Cell::Float)
            .map_err(|_| format!("'{}' is not a float", raw)),
        ColumnType::Bool => match raw {
            "true" => Ok(Cell::Bool(true)),
            "false" => Ok(Cell::Bool(false)),
            _ => Err(format!("'{}' is not a bool", raw)),
        },
        ColumnType::Text => Ok(Cell::Text(raw.to_string())),
    }
}
