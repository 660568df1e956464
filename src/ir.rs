use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::layout::StructuralError;

pub const DEFAULT_NEW_LABEL: &str = "New Node";

/// One task in the breakdown. The flat list of these is the only persisted shape;
/// child lists and depth are always derived from `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WbsNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl WbsNode {
    pub fn root(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent_id: None,
        }
    }

    pub fn child(
        id: impl Into<String>,
        label: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parent_id: Some(parent.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbsEdge {
    pub from: String,
    pub to: String,
}

impl WbsEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn id(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}

/// Parent→child edges implied by the parent references, in input order.
pub fn edges_from_parents(nodes: &[WbsNode]) -> Vec<WbsEdge> {
    nodes
        .iter()
        .filter_map(|node| {
            node.parent_id
                .as_ref()
                .map(|parent| WbsEdge::new(parent.clone(), node.id.clone()))
        })
        .collect()
}

/// Editable breakdown backed by a flat node list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbsDocument {
    pub nodes: Vec<WbsNode>,
}

impl WbsDocument {
    pub fn new(nodes: Vec<WbsNode>) -> Self {
        Self { nodes }
    }

    pub fn edges(&self) -> Vec<WbsEdge> {
        edges_from_parents(&self.nodes)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&WbsNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Appends a child with a generated id under `parent_id` and returns the new id.
    pub fn add_child(
        &mut self,
        parent_id: &str,
        label: Option<&str>,
    ) -> Result<String, StructuralError> {
        let id = generate_node_id(&self.nodes);
        self.add_child_with_id(parent_id, id, label)
    }

    pub fn add_child_with_id(
        &mut self,
        parent_id: &str,
        id: String,
        label: Option<&str>,
    ) -> Result<String, StructuralError> {
        if !self.contains(parent_id) {
            return Err(StructuralError::DanglingParent {
                node: id,
                parent: parent_id.to_string(),
            });
        }
        if self.contains(&id) {
            return Err(StructuralError::DuplicateId { id });
        }
        debug!(parent = parent_id, child = %id, "adding child node");
        self.nodes.push(WbsNode::child(
            id.clone(),
            label.unwrap_or(DEFAULT_NEW_LABEL),
            parent_id,
        ));
        Ok(id)
    }
}

/// Fresh UUID v4 identifier not already used by `nodes`.
pub fn generate_node_id(nodes: &[WbsNode]) -> String {
    let taken: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    loop {
        let id = uuid::Uuid::new_v4().to_string();
        if !taken.contains(id.as_str()) {
            return id;
        }
    }
}
