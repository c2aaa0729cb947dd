// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Column definitions: a name, a semantic type and a pure extractor

use serde_json::Value;
use std::fmt;

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Integer,
    Boolean,
    Timestamp,
    /// Structured value passed through as JSON
    Json,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a column's value comes from in the raw object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// Dotted path from the object root (e.g., "metadata.name", "spec.containers.0")
    Path(&'static str),
    /// The whole object
    Whole,
}

impl Extractor {
    /// Resolve the extractor against a raw object. None means absent.
    pub fn extract<'a>(&self, object: &'a Value) -> Option<&'a Value> {
        match self {
            Extractor::Path(path) => lookup(object, path),
            Extractor::Whole => Some(object),
        }
    }
}

/// Column definition for a table schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub extractor: Extractor,
    pub description: &'static str,
}

impl ColumnSpec {
    pub const fn new(
        name: &'static str,
        column_type: ColumnType,
        extractor: Extractor,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            column_type,
            extractor,
            description,
        }
    }
}

pub(crate) const fn text(name: &'static str, path: &'static str, description: &'static str) -> ColumnSpec {
    ColumnSpec::new(name, ColumnType::String, Extractor::Path(path), description)
}

pub(crate) const fn int(name: &'static str, path: &'static str, description: &'static str) -> ColumnSpec {
    ColumnSpec::new(name, ColumnType::Integer, Extractor::Path(path), description)
}

pub(crate) const fn boolean(
    name: &'static str,
    path: &'static str,
    description: &'static str,
) -> ColumnSpec {
    ColumnSpec::new(name, ColumnType::Boolean, Extractor::Path(path), description)
}

pub(crate) const fn timestamp(
    name: &'static str,
    path: &'static str,
    description: &'static str,
) -> ColumnSpec {
    ColumnSpec::new(name, ColumnType::Timestamp, Extractor::Path(path), description)
}

pub(crate) const fn json(name: &'static str, path: &'static str, description: &'static str) -> ColumnSpec {
    ColumnSpec::new(name, ColumnType::Json, Extractor::Path(path), description)
}

/// Walk a dotted path through objects and arrays (numeric segments index arrays).
///
/// A missing key, an out-of-range index, a walk through a scalar and an
/// explicit JSON null all resolve to None.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(part)?,
            Value::Array(arr) => arr.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    (!current.is_null()).then_some(current)
}
