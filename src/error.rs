// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error taxonomy shared by the client provider, fetchers, projection and registry
//!
//! A single-key lookup that finds nothing is not an error: fetchers report it
//! as `Ok(None)`, which the registry turns into an empty result.

use std::fmt;

use thiserror::Error;

use crate::kubernetes::ResourceKind;
use crate::projection::ColumnType;

/// Boxed error used as the source of configuration failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Upstream call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::List => f.write_str("list"),
            Operation::Get => f.write_str("get"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// The kubeconfig could not be located or parsed, or no client could be built from it
    #[error("failed to resolve cluster configuration: {reason}")]
    ConfigResolution {
        reason: String,
        #[source]
        source: BoxError,
    },

    /// Any cluster API failure other than "not found"
    #[error("failed to {operation} {kind} from the cluster API: {source}")]
    UpstreamFetch {
        kind: ResourceKind,
        operation: Operation,
        #[source]
        source: kube::Error,
    },

    /// Table name outside the fixed registry
    #[error("unknown table '{0}'")]
    UnknownTable(String),

    /// An extractor met a value it does not know how to convert.
    /// This is a schema defect, never a data condition to tolerate.
    #[error("column '{column}' expects {expected} but the resource holds {found}")]
    ProjectionType {
        column: &'static str,
        expected: ColumnType,
        found: String,
    },

    /// Lookup key does not identify exactly one instance of the kind
    #[error("invalid key for {kind}: {reason}")]
    InvalidKey { kind: ResourceKind, reason: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::ConfigResolution {
            reason: reason.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table_message() {
        let err = Error::UnknownTable("k8s_bogus".to_string());
        assert_eq!(err.to_string(), "unknown table 'k8s_bogus'");
    }

    #[test]
    fn test_projection_type_message() {
        let err = Error::ProjectionType {
            column: "creation_timestamp",
            expected: ColumnType::Timestamp,
            found: "number 12".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("creation_timestamp"));
        assert!(msg.contains("timestamp"));
        assert!(msg.contains("number 12"));
    }

    #[test]
    fn test_config_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::config("cannot read /nope/config", io);
        assert!(err.to_string().contains("/nope/config"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "no such file");
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::List.to_string(), "list");
        assert_eq!(Operation::Get.to_string(), "get");
    }
}
