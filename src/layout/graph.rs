use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::{debug, instrument};

use crate::config::{LayoutConfig, LayoutEngine};
use crate::ir::{WbsEdge, WbsNode, edges_from_parents, generate_node_id};

use super::error::StructuralError;
use super::position::route_between;
use super::types::{Layout, NodeLayout};

/// Node/edge set after validation: unique ids, resolvable endpoints, one root, all reachable.
struct CheckedGraph {
    root: usize,
    depth: Vec<usize>,
    pre_order: Vec<usize>,
    edges: Vec<WbsEdge>,
}

fn check_graph(nodes: &[WbsNode], edges: &[WbsEdge]) -> Result<CheckedGraph, StructuralError> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        if index.insert(node.id.as_str(), idx).is_some() {
            return Err(StructuralError::DuplicateId {
                id: node.id.clone(),
            });
        }
    }

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut unique_edges = Vec::with_capacity(edges.len());
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut has_parent = vec![false; nodes.len()];
    for edge in edges {
        let (Some(&from), Some(&to)) = (index.get(edge.from.as_str()), index.get(edge.to.as_str()))
        else {
            return Err(StructuralError::DanglingParent {
                node: edge.to.clone(),
                parent: edge.from.clone(),
            });
        };
        if !seen.insert((edge.from.as_str(), edge.to.as_str())) {
            continue;
        }
        outgoing[from].push(to);
        has_parent[to] = true;
        unique_edges.push(edge.clone());
    }

    let roots: Vec<usize> = (0..nodes.len()).filter(|&idx| !has_parent[idx]).collect();
    let root = match roots.as_slice() {
        [] => return Err(StructuralError::NoRoot),
        [root] => *root,
        _ => {
            return Err(StructuralError::MultipleRoots {
                roots: roots.iter().map(|&idx| nodes[idx].id.clone()).collect(),
            });
        }
    };

    // Shortest distance from the root is the rank the solver will assign on a tree.
    let mut depth = vec![usize::MAX; nodes.len()];
    depth[root] = 0;
    let mut queue = VecDeque::from([root]);
    while let Some(idx) = queue.pop_front() {
        for &child in &outgoing[idx] {
            if depth[child] == usize::MAX {
                depth[child] = depth[idx] + 1;
                queue.push_back(child);
            }
        }
    }
    if let Some(orphan) = depth.iter().position(|&d| d == usize::MAX) {
        return Err(StructuralError::Unreachable {
            node: nodes[orphan].id.clone(),
            root: nodes[root].id.clone(),
        });
    }

    let mut visited = vec![false; nodes.len()];
    let mut pre_order = Vec::with_capacity(nodes.len());
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        if std::mem::replace(&mut visited[idx], true) {
            continue;
        }
        pre_order.push(idx);
        stack.extend(outgoing[idx].iter().rev().filter(|&&child| !visited[child]));
    }

    Ok(CheckedGraph {
        root,
        depth,
        pre_order,
        edges: unique_edges,
    })
}

/// Lays out an arbitrary single-root node/edge set with the dagre solver.
#[instrument(level = "debug", skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
pub fn relayout_graph(
    nodes: &[WbsNode],
    edges: &[WbsEdge],
    config: &LayoutConfig,
) -> Result<Layout, StructuralError> {
    let checked = check_graph(nodes, edges)?;

    let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
        DagreGraph::new(Some(GraphOption {
            directed: Some(true),
            multigraph: Some(false),
            compound: Some(false),
        }));

    let mut graph_config = DagreConfig::default();
    graph_config.rankdir = Some("tb".to_string());
    graph_config.nodesep = Some(config.sibling_gap);
    graph_config.ranksep = Some(config.child_gap);
    graph_config.marginx = Some(0.0);
    graph_config.marginy = Some(0.0);
    dagre_graph.set_graph(graph_config);

    for (order, node) in nodes.iter().enumerate() {
        let mut dagre_node = DagreNode::default();
        dagre_node.width = config.node_width;
        dagre_node.height = config.node_height;
        // Input order as the in-rank hint keeps siblings stable across re-layouts.
        dagre_node.order = Some(order);
        dagre_graph.set_node(node.id.clone(), Some(dagre_node));
    }
    for edge in &checked.edges {
        let _ = dagre_graph.set_edge(&edge.from, &edge.to, Some(DagreEdge::default()), None);
    }

    dagre_layout::run_layout(&mut dagre_graph);

    let mut node_layouts = BTreeMap::new();
    for (idx, node) in nodes.iter().enumerate() {
        let Some((cx, cy)) = solver_center(&dagre_graph, &node.id) else {
            debug!(node = %node.id, "solver returned no position, node omitted");
            continue;
        };
        node_layouts.insert(
            node.id.clone(),
            NodeLayout {
                id: node.id.clone(),
                label: node.label.clone(),
                x: cx - config.node_width / 2.0,
                y: cy - config.node_height / 2.0,
                width: config.node_width,
                height: config.node_height,
                depth: checked.depth[idx],
                subtree: None,
            },
        );
    }

    let edge_layouts = checked
        .edges
        .iter()
        .filter_map(|edge| route_between(&node_layouts, edge, config))
        .collect();
    let order = checked
        .pre_order
        .iter()
        .map(|&idx| nodes[idx].id.clone())
        .collect();

    let mut layout = Layout::assemble(LayoutEngine::Graph, node_layouts, order, edge_layouts);
    if let Some(bounds) = layout.bounds() {
        layout.translate(-bounds.min_x, -bounds.min_y);
    }
    debug!(
        root = %nodes[checked.root].id,
        width = layout.width,
        height = layout.height,
        "graph layout complete"
    );
    Ok(layout)
}

/// Center of `id` as placed by the solver.
fn solver_center(
    graph: &DagreGraph<DagreConfig, DagreNode, DagreEdge>,
    id: &str,
) -> Option<(f32, f32)> {
    graph.node(&id.to_string()).map(|placed| (placed.x, placed.y))
}

/// Flat parent-pointer list through the dagre solver.
pub fn layout_graph(nodes: &[WbsNode], config: &LayoutConfig) -> Result<Layout, StructuralError> {
    relayout_graph(nodes, &edges_from_parents(nodes), config)
}

/// Mutable node/edge collection that is extended in place and re-laid out wholesale.
#[derive(Debug, Clone)]
pub struct GraphState {
    nodes: Vec<WbsNode>,
    edges: Vec<WbsEdge>,
    layout: Layout,
}

impl GraphState {
    pub fn new(nodes: Vec<WbsNode>, config: &LayoutConfig) -> Result<Self, StructuralError> {
        let edges = edges_from_parents(&nodes);
        Self::from_parts(nodes, edges, config)
    }

    pub fn from_parts(
        nodes: Vec<WbsNode>,
        edges: Vec<WbsEdge>,
        config: &LayoutConfig,
    ) -> Result<Self, StructuralError> {
        let layout = relayout_graph(&nodes, &edges, config)?;
        Ok(Self {
            nodes,
            edges,
            layout,
        })
    }

    pub fn nodes(&self) -> &[WbsNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[WbsEdge] {
        &self.edges
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Appends one child under `parent_id` and re-lays out. State is untouched on error.
    pub fn add_node(
        &mut self,
        parent_id: &str,
        label: Option<&str>,
        config: &LayoutConfig,
    ) -> Result<String, StructuralError> {
        let id = generate_node_id(&self.nodes);
        if !self.nodes.iter().any(|node| node.id == parent_id) {
            return Err(StructuralError::DanglingParent {
                node: id,
                parent: parent_id.to_string(),
            });
        }
        let mut nodes = self.nodes.clone();
        nodes.push(WbsNode::child(
            id.clone(),
            label.unwrap_or(crate::ir::DEFAULT_NEW_LABEL),
            parent_id,
        ));
        let mut edges = self.edges.clone();
        edges.push(WbsEdge::new(parent_id, id.clone()));

        let layout = relayout_graph(&nodes, &edges, config)?;
        self.nodes = nodes;
        self.edges = edges;
        self.layout = layout;
        Ok(id)
    }
}
