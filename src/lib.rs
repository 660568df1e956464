#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, LayoutEngine, RenderConfig};
pub use ir::{WbsDocument, WbsEdge, WbsNode};
pub use layout::{
    EdgePath, GraphState, Layout, PathSegment, Point, StructuralError, compute_layout,
    layout_tree, relayout_graph, route_edge,
};
pub use parser::parse_input;
pub use render::render_svg;
pub use theme::Theme;

/// Parses `input` (outline or node list) and renders an SVG preview.
pub fn render_with_config(input: &str, config: &Config) -> anyhow::Result<String> {
    let parsed = parse_input(input)?;
    let config = match parsed.init_config {
        Some(init) => config::merge_init_config(config.clone(), init)?,
        None => config.clone(),
    };
    let layout = compute_layout(&parsed.nodes, &config.layout)?;
    Ok(render_svg(&layout, &config.theme, &config.render))
}
