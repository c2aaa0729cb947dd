// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Field projection: turn a raw Kubernetes object into a typed row
//!
//! Projection never mutates the object and never invents values: anything
//! missing along an extractor's path is an explicit absence, not a zero value.

mod columns;
mod schema;

pub use columns::{ColumnSpec, ColumnType, Extractor, lookup};
pub use schema::{TableSchema, schema_for};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::fmt;

use crate::error::{Error, Result};

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl CellValue {
    /// JSON form of the cell; timestamps are RFC3339 in UTC
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::String(s) => Value::String(s.clone()),
            CellValue::Integer(i) => Value::from(*i),
            CellValue::Boolean(b) => Value::Bool(*b),
            CellValue::Timestamp(ts) => {
                Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            CellValue::Json(v) => v.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => f.write_str(s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            CellValue::Json(v) => write!(f, "{}", v),
        }
    }
}

/// One projected row: every schema column in schema order, each holding a
/// value or an explicit absence
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    cells: Vec<(&'static str, Option<CellValue>)>,
}

impl ProjectedRow {
    /// Value of a column; None when the column is absent or unknown
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(name, _)| *name)
    }

    pub fn cells(&self) -> &[(&'static str, Option<CellValue>)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row as a JSON object in column order, absent cells as null
    pub fn to_json(&self) -> Value {
        let map = self
            .cells
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.as_ref().map_or(Value::Null, CellValue::to_json),
                )
            })
            .collect();
        Value::Object(map)
    }
}

/// Project a raw object through a table schema
pub fn project(object: &Value, schema: &TableSchema) -> Result<ProjectedRow> {
    let cells = schema
        .columns()
        .iter()
        .map(|column| {
            let value = column
                .extractor
                .extract(object)
                .map(|raw| coerce(column, raw))
                .transpose()?;
            Ok((column.name, value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ProjectedRow { cells })
}

fn coerce(column: &ColumnSpec, raw: &Value) -> Result<CellValue> {
    let mismatch = || Error::ProjectionType {
        column: column.name,
        expected: column.column_type,
        found: describe(raw),
    };

    match column.column_type {
        ColumnType::String => raw.as_str().map(|s| CellValue::String(s.to_string())),
        ColumnType::Integer => raw.as_i64().map(CellValue::Integer),
        ColumnType::Boolean => raw.as_bool().map(CellValue::Boolean),
        ColumnType::Timestamp => raw
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| CellValue::Timestamp(dt.with_timezone(&Utc))),
        ColumnType::Json => Some(CellValue::Json(raw.clone())),
    }
    .ok_or_else(mismatch)
}

/// Short description of a JSON value for error messages
fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string {:?}", s),
        Value::Array(a) => format!("array of {} items", a.len()),
        Value::Object(_) => "object".to_string(),
    }
}
