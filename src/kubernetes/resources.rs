// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! The fixed set of Kubernetes resource kinds exposed as tables, and the keys
//! that identify a single instance of each.

use std::fmt;

use k8s_openapi::api::{
    apps::v1::{Deployment, ReplicaSet},
    core::v1::{Namespace, Node, Pod},
};
use kube::discovery::{ApiResource, Scope};

use crate::error::{Error, Result};

/// A queryable resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Deployment,
    Pod,
    Namespace,
    Node,
    ReplicaSet,
}

impl ResourceKind {
    /// Every kind, in registration order
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Deployment,
        ResourceKind::Pod,
        ResourceKind::Namespace,
        ResourceKind::Node,
        ResourceKind::ReplicaSet,
    ];

    /// Canonical table name (e.g., "k8s_pod")
    pub fn table_name(self) -> &'static str {
        match self {
            ResourceKind::Deployment => "k8s_deployment",
            ResourceKind::Pod => "k8s_pod",
            ResourceKind::Namespace => "k8s_namespace",
            ResourceKind::Node => "k8s_node",
            ResourceKind::ReplicaSet => "k8s_replicaset",
        }
    }

    /// kubectl-style names that resolve to the same table
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            ResourceKind::Deployment => &["deployments", "deployment", "deploy"],
            ResourceKind::Pod => &["pods", "pod", "po"],
            ResourceKind::Namespace => &["namespaces", "namespace", "ns"],
            ResourceKind::Node => &["nodes", "node", "no"],
            ResourceKind::ReplicaSet => &["replicasets", "replicaset", "rs"],
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ResourceKind::Deployment => {
                "Kubernetes Deployment enables declarative updates for Pods and ReplicaSets."
            }
            ResourceKind::Pod => {
                "Kubernetes Pod is a collection of containers that can run on a host. This resource is created by clients and scheduled onto hosts."
            }
            ResourceKind::Namespace => "Kubernetes Namespace provides a scope for Names.",
            ResourceKind::Node => {
                "Kubernetes Node is a worker machine, virtual or physical, on which pods are scheduled."
            }
            ResourceKind::ReplicaSet => {
                "Kubernetes ReplicaSet ensures that a specified number of pod replicas are running at any given time."
            }
        }
    }

    /// API resource definition, taken from k8s-openapi's compile-time type info
    pub fn api_resource(self) -> ApiResource {
        match self {
            ResourceKind::Deployment => ApiResource::erase::<Deployment>(&()),
            ResourceKind::Pod => ApiResource::erase::<Pod>(&()),
            ResourceKind::Namespace => ApiResource::erase::<Namespace>(&()),
            ResourceKind::Node => ApiResource::erase::<Node>(&()),
            ResourceKind::ReplicaSet => ApiResource::erase::<ReplicaSet>(&()),
        }
    }

    pub fn scope(self) -> Scope {
        match self {
            ResourceKind::Deployment | ResourceKind::Pod | ResourceKind::ReplicaSet => {
                Scope::Namespaced
            }
            ResourceKind::Namespace | ResourceKind::Node => Scope::Cluster,
        }
    }

    pub fn is_namespaced(self) -> bool {
        self.scope() == Scope::Namespaced
    }

    /// Exact canonical table name only
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.table_name() == name)
    }

    /// kubectl-style shorthand or canonical name, case-insensitive.
    /// Used by the command line before resolving against the registry.
    pub fn from_alias(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.table_name() == name || kind.aliases().contains(&name.as_str()))
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Pod => "Pod",
            ResourceKind::Namespace => "Namespace",
            ResourceKind::Node => "Node",
            ResourceKind::ReplicaSet => "ReplicaSet",
        };
        f.write_str(kind)
    }
}

/// Identifies exactly one resource instance.
/// Namespaced kinds need both parts; cluster-scoped kinds only the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    pub name: String,
    pub namespace: Option<String>,
}

impl ResourceKey {
    pub fn namespaced(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
        }
    }

    pub fn cluster_scoped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    /// Check the key has exactly the parts the kind requires
    pub fn validate_for(&self, kind: ResourceKind) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidKey {
                kind,
                reason: "name must not be empty".to_string(),
            });
        }

        match (&self.namespace, kind.is_namespaced()) {
            (Some(ns), true) if ns.is_empty() => Err(Error::InvalidKey {
                kind,
                reason: "namespace must not be empty".to_string(),
            }),
            (None, true) => Err(Error::InvalidKey {
                kind,
                reason: "namespace is required".to_string(),
            }),
            (Some(ns), false) => Err(Error::InvalidKey {
                kind,
                reason: format!("{} is cluster-scoped, got namespace '{}'", kind, ns),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}
