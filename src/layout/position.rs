use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

use crate::config::{LayoutConfig, LayoutEngine};
use crate::ir::{WbsEdge, WbsNode};

use super::error::StructuralError;
use super::routing::route_edge_with_threshold;
use super::tree::Tree;
use super::types::{EdgeLayout, Layout, NodeLayout, Point, Span};
use super::width::SubtreeWidths;

/// Where a subtree goes: its top-left anchor and the span it reserves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub idx: usize,
    pub anchor: Point,
    pub width: f32,
}

impl Placement {
    pub fn span(&self) -> Span {
        Span {
            x: self.anchor.x,
            width: self.width,
        }
    }

    /// Node box top-left; the box is centered over the subtree span.
    pub fn node_origin(&self, config: &LayoutConfig) -> Point {
        Point::new(self.anchor.x + (self.width - config.node_width) / 2.0, self.anchor.y)
    }
}

/// Places one child at `cursor` and returns its placement with the advanced cursor.
fn place_child(
    cursor: f32,
    child: usize,
    row_y: f32,
    widths: &SubtreeWidths,
    gap: f32,
) -> (Placement, f32) {
    let width = widths.get(child);
    let placement = Placement {
        idx: child,
        anchor: Point::new(cursor, row_y),
        width,
    };
    (placement, cursor + width + gap)
}

/// Child placements of `parent`, left to right. The cursor lives only inside this call.
pub fn place_children(
    tree: &Tree,
    widths: &SubtreeWidths,
    parent: Placement,
    config: &LayoutConfig,
) -> Vec<Placement> {
    let children = tree.children(parent.idx);
    if children.is_empty() {
        return Vec::new();
    }
    let children_width = widths.children_width(tree, parent.idx, config.sibling_gap);
    let start_x = parent.anchor.x + (parent.width - children_width) / 2.0;
    let row_y = parent.anchor.y + config.node_height + config.child_gap;
    trace!(
        node = %tree.node(parent.idx).id,
        children_width,
        start_x,
        "placing children"
    );

    let (placements, _) = children.iter().fold(
        (Vec::with_capacity(children.len()), start_x),
        |(mut placements, cursor), &child| {
            let (placement, next) = place_child(cursor, child, row_y, widths, config.sibling_gap);
            placements.push(placement);
            (placements, next)
        },
    );
    placements
}

/// Pre-order placement of the whole tree with the root subtree anchored at `origin`.
pub fn assign_positions(
    tree: &Tree,
    widths: &SubtreeWidths,
    origin: Point,
    config: &LayoutConfig,
) -> Vec<Placement> {
    let root = Placement {
        idx: tree.root(),
        anchor: origin,
        width: widths.get(tree.root()),
    };
    let mut placed = Vec::with_capacity(tree.len());
    let mut stack = vec![root];
    while let Some(placement) = stack.pop() {
        let children = place_children(tree, widths, placement, config);
        placed.push(placement);
        stack.extend(children.into_iter().rev());
    }
    placed
}

/// Full rebuild from a flat node list using the subtree-width engine.
#[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
pub fn layout_tree(nodes: &[WbsNode], config: &LayoutConfig) -> Result<Layout, StructuralError> {
    let tree = Tree::build(nodes)?;
    let widths = SubtreeWidths::compute(&tree, config);
    let placements = assign_positions(&tree, &widths, Point::default(), config);

    let mut node_layouts = BTreeMap::new();
    let mut order = Vec::with_capacity(placements.len());
    for placement in &placements {
        let node = tree.node(placement.idx);
        let origin = placement.node_origin(config);
        order.push(node.id.clone());
        node_layouts.insert(
            node.id.clone(),
            NodeLayout {
                id: node.id.clone(),
                label: node.label.clone(),
                x: origin.x,
                y: origin.y,
                width: config.node_width,
                height: config.node_height,
                depth: node.depth,
                subtree: Some(placement.span()),
            },
        );
    }

    let edges = placements
        .iter()
        .filter_map(|placement| {
            let parent = tree.node(placement.idx).parent?;
            Some(WbsEdge::new(
                tree.node(parent).id.clone(),
                tree.node(placement.idx).id.clone(),
            ))
        })
        .filter_map(|edge| route_between(&node_layouts, &edge, config))
        .collect::<Vec<_>>();

    debug!(
        nodes = node_layouts.len(),
        edges = edges.len(),
        width = widths.get(tree.root()),
        "subtree layout complete"
    );
    Ok(Layout::assemble(LayoutEngine::Subtree, node_layouts, order, edges))
}

/// Bottom-center of `edge.from` to top-center of `edge.to`.
pub(crate) fn route_between(
    nodes: &BTreeMap<String, NodeLayout>,
    edge: &WbsEdge,
    config: &LayoutConfig,
) -> Option<EdgeLayout> {
    let parent = nodes.get(&edge.from)?;
    let child = nodes.get(&edge.to)?;
    let start = parent.bottom_center();
    let end = child.top_center();
    let path = route_edge_with_threshold(
        start,
        end,
        config.edge_corner_radius,
        config.child_gap,
        config.edge_bend_threshold,
    );
    Some(EdgeLayout {
        id: edge.id(),
        from: edge.from.clone(),
        to: edge.to.clone(),
        start,
        end,
        path,
    })
}
