// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Read-only Kubernetes resources exposed as typed tables
//!
//! Five kinds are queryable (`k8s_deployment`, `k8s_pod`, `k8s_namespace`,
//! `k8s_node`, `k8s_replicaset`). A [`TableRegistry`] resolves a table by
//! name; the returned [`Table`] lists rows as a lazy stream or fetches a
//! single row by key. All calls share one cluster client, built on first use
//! from the user's kubeconfig.

pub mod config;
pub mod error;
pub mod kubernetes;
pub mod projection;
pub mod query;
pub mod registry;

pub use error::{Error, Result};
pub use kubernetes::{ResourceKey, ResourceKind};
pub use projection::{CellValue, ProjectedRow};
pub use query::QueryContext;
pub use registry::{Table, TableRegistry};
