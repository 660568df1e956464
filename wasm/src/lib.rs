use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wbs_layout::config::{Config, LayoutEngine};
use wbs_layout::layout_dump::layout_dump_json;
use wbs_layout::parser::parse_node_list;
use wbs_layout::{Theme, WbsDocument, compute_layout, render_with_config};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WbsRenderOptions {
    theme: Option<String>,
    engine: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
}

fn build_config(options: WbsRenderOptions) -> Result<Config, String> {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("modern") {
        config.theme = Theme::modern();
        config.render.background = config.theme.background.clone();
    }
    if let Some(engine) = options.engine {
        config.layout.engine =
            LayoutEngine::from_token(&engine).ok_or_else(|| format!("unknown engine `{engine}`"))?;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    Ok(config)
}

fn parse_options(options_json: Option<String>) -> Result<Config, JsValue> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<WbsRenderOptions>(&raw)
            .map_err(|error| JsValue::from_str(&error.to_string()))?,
        None => WbsRenderOptions::default(),
    };
    build_config(options).map_err(|error| JsValue::from_str(&error))
}

/// Outline or node-list input to an SVG string.
#[wasm_bindgen]
pub fn render_wbs_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    render_with_config(input, &config).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Node list to the JSON geometry dump the host draws itself.
#[wasm_bindgen]
pub fn layout_wbs_json(nodes_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = parse_options(options_json)?;
    let nodes = parse_node_list(nodes_json).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let layout = compute_layout(&nodes, &config.layout)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    layout_dump_json(&layout).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Appends a child under `parent_id` and returns the extended node list.
#[wasm_bindgen]
pub fn add_wbs_child(nodes_json: &str, parent_id: &str) -> Result<String, JsValue> {
    add_child_json(nodes_json, parent_id).map_err(|error| JsValue::from_str(&error))
}

fn add_child_json(nodes_json: &str, parent_id: &str) -> Result<String, String> {
    let nodes = parse_node_list(nodes_json).map_err(|error| error.to_string())?;
    let mut document = WbsDocument::new(nodes);
    document
        .add_child(parent_id, None)
        .map_err(|error| error.to_string())?;
    serde_json::to_string(&document.nodes).map_err(|error| error.to_string())
}
