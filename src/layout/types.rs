use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::LayoutEngine;

use super::routing::EdgePath;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Horizontal extent `[x, x + width]` reserved for a whole subtree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub x: f32,
    pub width: f32,
}

impl Span {
    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub label: String,
    /// Top-left corner of the node box.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    /// Only the subtree engine reserves spans.
    pub subtree: Option<Span>,
}

impl NodeLayout {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.center_x(), self.y + self.height)
    }

    pub fn top_center(&self) -> Point {
        Point::new(self.center_x(), self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub start: Point,
    pub end: Point,
    pub path: EdgePath,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub engine: LayoutEngine,
    pub nodes: BTreeMap<String, NodeLayout>,
    /// Node ids in pre-order (parent first, children left to right).
    pub order: Vec<String>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub(crate) fn assemble(
        engine: LayoutEngine,
        nodes: BTreeMap<String, NodeLayout>,
        order: Vec<String>,
        edges: Vec<EdgeLayout>,
    ) -> Self {
        let mut layout = Self {
            engine,
            nodes,
            order,
            edges,
            width: 0.0,
            height: 0.0,
        };
        if let Some(bounds) = layout.bounds() {
            layout.width = bounds.width();
            layout.height = bounds.height();
        }
        layout
    }

    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.get(id)
    }

    /// Nodes in pre-order.
    pub fn ordered_nodes(&self) -> impl Iterator<Item = &NodeLayout> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut iter = self.nodes.values();
        let first = iter.next()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x + first.width,
            max_y: first.y + first.height,
        };
        Some(iter.fold(init, |acc, node| Bounds {
            min_x: acc.min_x.min(node.x),
            min_y: acc.min_y.min(node.y),
            max_x: acc.max_x.max(node.x + node.width),
            max_y: acc.max_y.max(node.y + node.height),
        }))
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        for node in self.nodes.values_mut() {
            node.x += dx;
            node.y += dy;
            if let Some(span) = node.subtree.as_mut() {
                span.x += dx;
            }
        }
        for edge in &mut self.edges {
            edge.start = edge.start.offset(dx, dy);
            edge.end = edge.end.offset(dx, dy);
            edge.path = edge.path.translated(dx, dy);
        }
    }
}
