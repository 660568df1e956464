use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutEngine {
    /// Recursive subtree-width layout with children centered under their parent.
    #[default]
    Subtree,
    /// Hierarchical layout delegated to the dagre solver.
    Graph,
}

impl LayoutEngine {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "subtree" | "tree" => Some(Self::Subtree),
            "graph" | "dagre" => Some(Self::Graph),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Horizontal clearance between adjacent sibling subtrees.
    pub sibling_gap: f32,
    /// Vertical distance between a parent row and its children's row.
    pub child_gap: f32,
    pub edge_corner_radius: f32,
    /// Offsets below `edge_bend_threshold * edge_corner_radius` get a bezier instead of arcs.
    pub edge_bend_threshold: f32,
    pub engine: LayoutEngine,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 100.0,
            node_height: 40.0,
            sibling_gap: 10.0,
            child_gap: 40.0,
            edge_corner_radius: 10.0,
            edge_bend_threshold: 2.0,
            engine: LayoutEngine::Subtree,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Blank space around the diagram in the rendered output.
    pub margin: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutOverrides>,
    render: Option<RenderOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    node_stroke_width: Option<f32>,
    node_corner_radius: Option<f32>,
    text_color: Option<String>,
    edge_color: Option<String>,
    edge_width: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOverrides {
    node_width: Option<f32>,
    node_height: Option<f32>,
    sibling_gap: Option<f32>,
    child_gap: Option<f32>,
    edge_corner_radius: Option<f32>,
    edge_bend_threshold: Option<f32>,
    engine: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderOverrides {
    margin: Option<f32>,
    background: Option<String>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(Config::default(), parsed)
}

/// Applies an inline `%%{init: ...}%%` directive on top of an existing config.
pub fn merge_init_config(config: Config, init: serde_json::Value) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_value(init)?;
    apply_config_file(config, parsed)
}

fn apply_config_file(mut config: Config, parsed: ConfigFile) -> anyhow::Result<Config> {
    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => anyhow::bail!("unknown theme `{other}`"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.node_stroke_width {
            config.theme.node_stroke_width = v;
        }
        if let Some(v) = vars.node_corner_radius {
            config.theme.node_corner_radius = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.edge_color {
            config.theme.edge_color = v;
        }
        if let Some(v) = vars.edge_width {
            config.theme.edge_width = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v.clone();
            config.render.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.node_width {
            config.layout.node_width = v;
        }
        if let Some(v) = layout.node_height {
            config.layout.node_height = v;
        }
        if let Some(v) = layout.sibling_gap {
            config.layout.sibling_gap = v;
        }
        if let Some(v) = layout.child_gap {
            config.layout.child_gap = v;
        }
        if let Some(v) = layout.edge_corner_radius {
            config.layout.edge_corner_radius = v;
        }
        if let Some(v) = layout.edge_bend_threshold {
            config.layout.edge_bend_threshold = v;
        }
        if let Some(v) = layout.engine {
            config.layout.engine = LayoutEngine::from_token(&v)
                .ok_or_else(|| anyhow::anyhow!("unknown layout engine `{v}`"))?;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.margin {
            config.render.margin = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}
