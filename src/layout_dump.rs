use crate::layout::{Layout, PathSegment, Span};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub engine: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtree: Option<Span>,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub path: String,
    pub segments: Vec<SegmentDump>,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SegmentDump {
    Move { to: [f32; 2] },
    Line { to: [f32; 2] },
    Cubic { c1: [f32; 2], c2: [f32; 2], to: [f32; 2] },
    Arc { corner: [f32; 2], to: [f32; 2], radius: f32, clockwise: bool },
}

impl From<&PathSegment> for SegmentDump {
    fn from(segment: &PathSegment) -> Self {
        match *segment {
            PathSegment::MoveTo(p) => SegmentDump::Move { to: [p.x, p.y] },
            PathSegment::LineTo(p) => SegmentDump::Line { to: [p.x, p.y] },
            PathSegment::CubicTo { c1, c2, to } => SegmentDump::Cubic {
                c1: [c1.x, c1.y],
                c2: [c2.x, c2.y],
                to: [to.x, to.y],
            },
            PathSegment::ArcTo {
                corner,
                to,
                radius,
                clockwise,
            } => SegmentDump::Arc {
                corner: [corner.x, corner.y],
                to: [to.x, to.y],
                radius,
                clockwise,
            },
        }
    }
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .ordered_nodes()
            .map(|node| NodeDump {
                id: node.id.clone(),
                label: node.label.clone(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                depth: node.depth,
                subtree: node.subtree,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                path: edge.path.to_svg_path(),
                segments: edge.path.segments.iter().map(SegmentDump::from).collect(),
                points: edge.path.polyline().iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect();

        LayoutDump {
            engine: format!("{:?}", layout.engine).to_lowercase(),
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }
}

pub fn layout_dump_json(layout: &Layout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
