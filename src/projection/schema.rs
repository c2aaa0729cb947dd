// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Declarative column tables for each resource kind
//!
//! Every schema is laid out as:
//! primary identity columns, resource-specific columns, spec/status blobs,
//! then secondary metadata columns.

use super::columns::{ColumnSpec, ColumnType, Extractor, boolean, int, json, text, timestamp};
use crate::kubernetes::ResourceKind;

/// Identity columns shared by every table
const PRIMARY: &[ColumnSpec] = &[
    text("name", "metadata.name", "Name of the object. Name must be unique within a namespace."),
    text(
        "namespace",
        "metadata.namespace",
        "Namespace defines the space within which each name must be unique.",
    ),
    text("uid", "metadata.uid", "UID is the unique in time and space value for this object."),
    text(
        "cluster_name",
        "metadata.clusterName",
        "The name of the cluster which the object belongs to.",
    ),
];

const SPEC_STATUS: &[ColumnSpec] = &[
    json("spec", "spec", "Desired state of the object."),
    json("status", "status", "Most recently observed status of the object."),
];

/// Metadata columns shared by every table, after the kind-specific ones
const SECONDARY: &[ColumnSpec] = &[
    text("kind", "kind", "Type of resource."),
    text(
        "api_version",
        "apiVersion",
        "The versioned schema of this representation of an object.",
    ),
    text(
        "generate_name",
        "metadata.generateName",
        "Optional prefix used by the server to generate a unique name if name is not provided.",
    ),
    text(
        "self_link",
        "metadata.selfLink",
        "URL representing this object. Deprecated and not set on recent clusters.",
    ),
    text(
        "resource_version",
        "metadata.resourceVersion",
        "Opaque value for the internal version of this object.",
    ),
    int(
        "generation",
        "metadata.generation",
        "Sequence number representing a specific generation of the desired state.",
    ),
    timestamp(
        "creation_timestamp",
        "metadata.creationTimestamp",
        "Time when this object was created.",
    ),
    timestamp(
        "deletion_timestamp",
        "metadata.deletionTimestamp",
        "Time after which this resource will be deleted.",
    ),
    int(
        "deletion_grace_period_seconds",
        "metadata.deletionGracePeriodSeconds",
        "Seconds allowed for graceful termination before the object is removed.",
    ),
    json(
        "labels",
        "metadata.labels",
        "Map of string keys and values used to organize and categorize objects.",
    ),
    json(
        "annotations",
        "metadata.annotations",
        "Unstructured key value map set by external tools to store arbitrary metadata.",
    ),
    json(
        "owner_references",
        "metadata.ownerReferences",
        "List of objects depended by this object.",
    ),
    json(
        "finalizers",
        "metadata.finalizers",
        "Must be empty before the object is deleted from the registry.",
    ),
    json(
        "managed_fields",
        "metadata.managedFields",
        "Which workflow and version manage each field set.",
    ),
    ColumnSpec::new(
        "raw",
        ColumnType::Json,
        Extractor::Whole,
        "The complete object as returned by the API server.",
    ),
];

const POD: &[ColumnSpec] = &[
    text("node_name", "spec.nodeName", "Node the pod is scheduled onto."),
    text(
        "service_account_name",
        "spec.serviceAccountName",
        "Name of the ServiceAccount used to run this pod.",
    ),
    text(
        "restart_policy",
        "spec.restartPolicy",
        "Restart policy for all containers within the pod (Always, OnFailure, Never).",
    ),
    text("dns_policy", "spec.dnsPolicy", "DNS policy for the pod."),
    text(
        "scheduler_name",
        "spec.schedulerName",
        "Scheduler that dispatches the pod.",
    ),
    text(
        "priority_class_name",
        "spec.priorityClassName",
        "Priority class of the pod.",
    ),
    int("priority", "spec.priority", "Priority value resolved from the priority class."),
    boolean(
        "host_network",
        "spec.hostNetwork",
        "Whether the pod uses the host's network namespace.",
    ),
    int(
        "termination_grace_period_seconds",
        "spec.terminationGracePeriodSeconds",
        "Seconds the pod needs to terminate gracefully.",
    ),
    text(
        "phase",
        "status.phase",
        "Lifecycle phase of the pod (Pending, Running, Succeeded, Failed, Unknown).",
    ),
    text("pod_ip", "status.podIP", "IP address allocated to the pod."),
    text("host_ip", "status.hostIP", "IP address of the host the pod runs on."),
    text("qos_class", "status.qosClass", "Quality of Service class assigned to the pod."),
    timestamp(
        "start_time",
        "status.startTime",
        "Time the pod was acknowledged by the kubelet.",
    ),
    json("volumes", "spec.volumes", "Volumes that can be mounted by containers."),
    json("containers", "spec.containers", "Containers belonging to the pod."),
    json(
        "init_containers",
        "spec.initContainers",
        "Initialization containers run before the app containers start.",
    ),
    json(
        "node_selector",
        "spec.nodeSelector",
        "Labels a node must carry for the pod to fit on it.",
    ),
    json("tolerations", "spec.tolerations", "Tolerations of the pod."),
    json("affinity", "spec.affinity", "Scheduling constraints of the pod."),
    json(
        "container_statuses",
        "status.containerStatuses",
        "Status of each container in the pod.",
    ),
    json("conditions", "status.conditions", "Current service state of the pod."),
];

const DEPLOYMENT: &[ColumnSpec] = &[
    int("replicas", "spec.replicas", "Number of desired pods."),
    int(
        "ready_replicas",
        "status.readyReplicas",
        "Number of pods targeted by this deployment with a Ready condition.",
    ),
    int(
        "available_replicas",
        "status.availableReplicas",
        "Number of available pods targeted by this deployment.",
    ),
    int(
        "updated_replicas",
        "status.updatedReplicas",
        "Number of non-terminated pods that have the desired template spec.",
    ),
    int(
        "unavailable_replicas",
        "status.unavailableReplicas",
        "Number of pods still required for the deployment to be fully available.",
    ),
    int(
        "observed_generation",
        "status.observedGeneration",
        "Generation observed by the deployment controller.",
    ),
    boolean("paused", "spec.paused", "Whether the deployment is paused."),
    int(
        "min_ready_seconds",
        "spec.minReadySeconds",
        "Seconds a new pod must be ready before it is considered available.",
    ),
    int(
        "revision_history_limit",
        "spec.revisionHistoryLimit",
        "Number of old ReplicaSets kept to allow rollback.",
    ),
    int(
        "progress_deadline_seconds",
        "spec.progressDeadlineSeconds",
        "Seconds before a stalled deployment is reported as failed.",
    ),
    json(
        "strategy",
        "spec.strategy",
        "Strategy used to replace existing pods with new ones.",
    ),
    json("selector", "spec.selector", "Label selector for pods."),
    json("template", "spec.template", "Template describing the pods to create."),
    json(
        "conditions",
        "status.conditions",
        "Latest available observations of the deployment's state.",
    ),
];

const REPLICASET: &[ColumnSpec] = &[
    int("replicas", "spec.replicas", "Number of desired replicas."),
    int(
        "fully_labeled_replicas",
        "status.fullyLabeledReplicas",
        "Number of pods whose labels match the replica set's pod template labels.",
    ),
    int(
        "ready_replicas",
        "status.readyReplicas",
        "Number of pods targeted by this replica set with a Ready condition.",
    ),
    int(
        "available_replicas",
        "status.availableReplicas",
        "Number of available pods for this replica set.",
    ),
    int(
        "observed_generation",
        "status.observedGeneration",
        "Generation of the most recently observed replica set.",
    ),
    int(
        "min_ready_seconds",
        "spec.minReadySeconds",
        "Seconds a new pod must be ready before it is considered available.",
    ),
    json("selector", "spec.selector", "Label query over pods that should match the replica count."),
    json("template", "spec.template", "Template describing the pods to create."),
    json(
        "conditions",
        "status.conditions",
        "Latest available observations of the replica set's state.",
    ),
];

const NAMESPACE: &[ColumnSpec] = &[text(
    "phase",
    "status.phase",
    "Current lifecycle phase of the namespace (Active, Terminating).",
)];

const NODE: &[ColumnSpec] = &[
    text("pod_cidr", "spec.podCIDR", "Pod IP range assigned to the node."),
    json("pod_cidrs", "spec.podCIDRs", "IP ranges assigned to the node for pods."),
    text(
        "provider_id",
        "spec.providerID",
        "ID of the node assigned by the cloud provider.",
    ),
    boolean(
        "unschedulable",
        "spec.unschedulable",
        "Whether new pods are prevented from being scheduled on the node.",
    ),
    json("taints", "spec.taints", "Taints applied to the node."),
    json("capacity", "status.capacity", "Total resources of the node."),
    json(
        "allocatable",
        "status.allocatable",
        "Resources of the node available for scheduling.",
    ),
    json("addresses", "status.addresses", "Addresses reachable to the node."),
    json("node_info", "status.nodeInfo", "General information about the node."),
    json("conditions", "status.conditions", "Current observed conditions of the node."),
];

fn kind_columns(kind: ResourceKind) -> &'static [ColumnSpec] {
    match kind {
        ResourceKind::Deployment => DEPLOYMENT,
        ResourceKind::Pod => POD,
        ResourceKind::Namespace => NAMESPACE,
        ResourceKind::Node => NODE,
        ResourceKind::ReplicaSet => REPLICASET,
    }
}

/// Ordered columns of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    kind: ResourceKind,
    columns: Vec<ColumnSpec>,
}

impl TableSchema {
    pub fn for_kind(kind: ResourceKind) -> Self {
        let columns = [PRIMARY, kind_columns(kind), SPEC_STATUS, SECONDARY].concat();
        Self { kind, columns }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Schema for a resource kind
pub fn schema_for(kind: ResourceKind) -> TableSchema {
    TableSchema::for_kind(kind)
}
