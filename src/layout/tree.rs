use std::collections::HashMap;
use tracing::{instrument, trace};

use crate::ir::WbsNode;

use super::error::StructuralError;

/// Arena entry; `parent` and `children` are indices into [`Tree::nodes`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub parent: Option<usize>,
    /// Left-to-right order, same as the input list.
    pub children: Vec<usize>,
    pub depth: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Rooted tree rebuilt from a flat parent-pointer list. Arena index == input index.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<TreeNode>,
    root: usize,
    index: HashMap<String, usize>,
}

impl Tree {
    /// Checks, in order: unique ids, resolvable parents, exactly one root, full reachability.
    #[instrument(level = "debug", skip_all, fields(nodes = input.len()))]
    pub fn build(input: &[WbsNode]) -> Result<Self, StructuralError> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(input.len());
        for (idx, node) in input.iter().enumerate() {
            if index.insert(node.id.clone(), idx).is_some() {
                return Err(StructuralError::DuplicateId {
                    id: node.id.clone(),
                });
            }
        }

        let mut nodes: Vec<TreeNode> = input
            .iter()
            .map(|node| TreeNode {
                id: node.id.clone(),
                label: node.label.clone(),
                parent: None,
                children: Vec::new(),
                depth: 0,
            })
            .collect();

        let mut roots: Vec<usize> = Vec::new();
        for (idx, node) in input.iter().enumerate() {
            let Some(parent_id) = node.parent_id.as_deref() else {
                roots.push(idx);
                continue;
            };
            let Some(&parent) = index.get(parent_id) else {
                return Err(StructuralError::DanglingParent {
                    node: node.id.clone(),
                    parent: parent_id.to_string(),
                });
            };
            nodes[idx].parent = Some(parent);
            nodes[parent].children.push(idx);
        }

        let root = match roots.as_slice() {
            [] => return Err(StructuralError::NoRoot),
            [root] => *root,
            _ => {
                return Err(StructuralError::MultipleRoots {
                    roots: roots.iter().map(|&idx| input[idx].id.clone()).collect(),
                });
            }
        };

        // Depth from the root; anything left unvisited hangs off a parent cycle.
        let mut visited = vec![false; nodes.len()];
        let mut stack = vec![(root, 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            visited[idx] = true;
            nodes[idx].depth = depth;
            stack.extend(nodes[idx].children.iter().map(|&child| (child, depth + 1)));
        }
        if let Some(orphan) = visited.iter().position(|seen| !seen) {
            return Err(StructuralError::Unreachable {
                node: input[orphan].id.clone(),
                root: input[root].id.clone(),
            });
        }

        trace!(root = %input[root].id, "tree rebuilt");
        Ok(Self { nodes, root, index })
    }

    pub fn root(&self) -> usize {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &TreeNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn find(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].children
    }

    /// Parent before children, children left to right.
    pub fn pre_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev());
        }
        order
    }
}
