mod error;
mod graph;
mod position;
pub mod routing;
pub mod tree;
pub(crate) mod types;
mod width;

pub use error::StructuralError;
pub use graph::{GraphState, layout_graph, relayout_graph};
pub use position::{Placement, assign_positions, layout_tree, place_children};
pub use routing::{EdgePath, PathSegment, route_edge, route_edge_with_threshold};
pub use tree::{Tree, TreeNode};
pub use types::*;
pub use width::SubtreeWidths;

use crate::config::{LayoutConfig, LayoutEngine};
use crate::ir::WbsNode;

/// Lays out a flat node list with the engine selected in `config`.
pub fn compute_layout(nodes: &[WbsNode], config: &LayoutConfig) -> Result<Layout, StructuralError> {
    match config.engine {
        LayoutEngine::Subtree => layout_tree(nodes, config),
        LayoutEngine::Graph => layout_graph(nodes, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_is_selected_by_config() {
        let nodes = vec![
            WbsNode::root("r", "Root"),
            WbsNode::child("a", "A", "r"),
            WbsNode::child("b", "B", "r"),
        ];
        let mut config = LayoutConfig::default();
        let subtree = compute_layout(&nodes, &config).unwrap();
        assert_eq!(subtree.engine, LayoutEngine::Subtree);
        assert!(subtree.nodes.values().all(|n| n.subtree.is_some()));

        config.engine = LayoutEngine::Graph;
        let graph = compute_layout(&nodes, &config).unwrap();
        assert_eq!(graph.engine, LayoutEngine::Graph);
        assert!(graph.nodes.values().all(|n| n.subtree.is_none()));
        assert_eq!(graph.order, subtree.order);
    }

    #[test]
    fn both_engines_share_error_reasons() {
        let nodes = vec![WbsNode::root("r", "Root"), WbsNode::child("a", "A", "missing")];
        for engine in [LayoutEngine::Subtree, LayoutEngine::Graph] {
            let config = LayoutConfig {
                engine,
                ..LayoutConfig::default()
            };
            let err = compute_layout(&nodes, &config).unwrap_err();
            assert_eq!(err.reason(), "dangling-parent");
        }
    }
}
