use crate::config::RenderConfig;
use crate::layout::{Layout, NodeLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Static SVG preview: rounded task cards with centered labels and routed connectors.
pub fn render_svg(layout: &Layout, theme: &Theme, config: &RenderConfig) -> String {
    let mut layout = layout.clone();
    let margin = config.margin.max(0.0);
    if let Some(bounds) = layout.bounds() {
        layout.translate(margin - bounds.min_x, margin - bounds.min_y);
    }
    let width = layout.width + margin * 2.0;
    let height = layout.height + margin * 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&config.background)
    ));

    // Edges first so cards paint over the connector ends.
    svg.push_str("<g class=\"wbs-edges\">");
    for edge in &layout.edges {
        svg.push_str(&format!(
            "<path class=\"wbs-edge\" data-id=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
            escape_xml(&edge.id),
            edge.path.to_svg_path(),
            escape_xml(&theme.edge_color),
            theme.edge_width
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"wbs-nodes\">");
    for node in layout.ordered_nodes() {
        svg.push_str(&node_svg(node, theme));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn node_svg(node: &NodeLayout, theme: &Theme) -> String {
    let radius = theme.node_corner_radius;
    let center_x = node.x + node.width / 2.0;
    let center_y = node.y + node.height / 2.0;
    format!(
        "<g class=\"wbs-node\" data-id=\"{id}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/><text x=\"{center_x:.2}\" y=\"{center_y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
        node.x,
        node.y,
        node.width,
        node.height,
        escape_xml(&theme.node_fill),
        escape_xml(&theme.node_stroke),
        theme.node_stroke_width,
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.text_color),
        escape_xml(&node.label),
        id = escape_xml(&node.id),
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(svg.as_bytes())?;
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
