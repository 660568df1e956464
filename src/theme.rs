use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub node_fill: String,
    pub node_stroke: String,
    pub node_stroke_width: f32,
    pub node_corner_radius: f32,
    pub text_color: String,
    pub edge_color: String,
    pub edge_width: f32,
    pub background: String,
}

impl Theme {
    /// White task cards joined by orange connectors.
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            node_fill: "#FFFFFF".to_string(),
            node_stroke: "#000000".to_string(),
            node_stroke_width: 1.0,
            node_corner_radius: 10.0,
            text_color: "#000000".to_string(),
            edge_color: "#FF8844".to_string(),
            edge_width: 2.0,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            node_fill: "#F8FAFF".to_string(),
            node_stroke: "#C7D2E5".to_string(),
            node_stroke_width: 1.4,
            node_corner_radius: 8.0,
            text_color: "#1C2430".to_string(),
            edge_color: "#7A8AA6".to_string(),
            edge_width: 1.4,
            background: "#FFFFFF".to_string(),
        }
    }
}
