//! The provenance graph document: nodes, edges and alternates keyed by
//! qualified name.

use super::merge;
use super::qname::{Namespace, QualifiedName};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Activity,
    Entity,
}

/// Activity or entity of the provenance graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: QualifiedName,
    pub kind: NodeKind,
    /// Distinct label values, in the order they were collected.
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
}

impl Node {
    pub fn activity(id: QualifiedName, label: Option<String>) -> Self {
        Self {
            id,
            kind: NodeKind::Activity,
            labels: label.into_iter().collect(),
            type_tag: None,
        }
    }

    pub fn entity(id: QualifiedName, label: Option<String>) -> Self {
        Self {
            id,
            kind: NodeKind::Entity,
            labels: label.into_iter().collect(),
            type_tag: None,
        }
    }

    pub fn with_type(mut self, type_tag: &str) -> Self {
        self.type_tag = Some(type_tag.to_string());
        self
    }

    pub fn has_labels(&self) -> bool {
        !self.labels.is_empty()
    }

    /// First collected label.
    pub fn label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Append `label` unless a label with the same text exists.
    pub fn add_label(&mut self, label: &str) {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Used,
    WasGeneratedBy,
}

/// Usage (`activity -> entity`) or generation (`entity -> activity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub id: QualifiedName,
    pub kind: EdgeKind,
    pub from: QualifiedName,
    pub to: QualifiedName,
}

/// Unkeyed alternate-name relation between an alias and the name it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alternate {
    pub alias: QualifiedName,
    pub primary: QualifiedName,
}

/// The provenance graph of one source.
///
/// Node and edge identifiers are unique; both keep first-insertion order,
/// so the same annotation stream always yields the same document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphDocument {
    namespace: Namespace,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    alternates: Vec<Alternate>,
    #[serde(skip)]
    node_index: HashMap<QualifiedName, usize>,
    #[serde(skip)]
    edge_index: HashMap<QualifiedName, usize>,
}

impl GraphDocument {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            nodes: Vec::new(),
            edges: Vec::new(),
            alternates: Vec::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn alternates(&self) -> &[Alternate] {
        &self.alternates
    }

    pub fn node(&self, id: &QualifiedName) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Look a node up by its unqualified annotation value.
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.node(&self.namespace.qualify(name))
    }

    pub fn edge(&self, id: &QualifiedName) -> Option<&Edge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.alternates.is_empty()
    }

    /// Insert `incoming` or merge it into the node with the same identifier.
    pub(crate) fn upsert_node(&mut self, incoming: Node, description: Option<&str>) {
        match self.node_index.get(&incoming.id).copied() {
            Some(i) => {
                let existing = self.nodes[i].clone();
                log::trace!(
                    "merge {} ({:?})",
                    incoming.id,
                    merge::SlotState::of(Some(&existing))
                );
                self.nodes[i] = merge::merge(Some(existing), incoming, description);
            }
            None => {
                self.node_index.insert(incoming.id.clone(), self.nodes.len());
                self.nodes.push(incoming);
            }
        }
    }

    /// Insert `node` only when its identifier is still free.
    pub(crate) fn ensure_node(&mut self, node: Node) {
        if !self.node_index.contains_key(&node.id) {
            self.upsert_node(node, None);
        }
    }

    /// Add a label to an activity node; other nodes are left alone.
    pub(crate) fn label_activity(&mut self, id: &QualifiedName, label: &str) -> bool {
        let Some(i) = self.node_index.get(id).copied() else {
            return false;
        };
        let node = &mut self.nodes[i];
        if node.kind != NodeKind::Activity {
            return false;
        }
        node.add_label(label);
        true
    }

    /// Insert an edge; an edge with the same identifier is replaced in place.
    pub(crate) fn put_edge(&mut self, edge: Edge) {
        match self.edge_index.get(&edge.id).copied() {
            Some(i) => self.edges[i] = edge,
            None => {
                self.edge_index.insert(edge.id.clone(), self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    pub(crate) fn add_alternate(&mut self, alternate: Alternate) {
        if !self.alternates.contains(&alternate) {
            self.alternates.push(alternate);
        }
    }
}
