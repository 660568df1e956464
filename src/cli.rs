use crate::config::{Config, LayoutEngine, load_config, merge_init_config};
use crate::ir::WbsDocument;
use crate::layout::{Layout, compute_layout};
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::parser::parse_input;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

#[derive(Parser, Debug)]
#[command(name = "wbsr", version, about = "Work-breakdown-structure tree layout and SVG preview")]
pub struct Args {
    /// Input file (outline or JSON node list) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout engine, overrides the config file
    #[arg(long = "engine", value_enum)]
    pub engine: Option<EngineArg>,

    /// Append a "New Node" child under this node id before layout (repeatable)
    #[arg(long = "add-child", value_name = "PARENT_ID")]
    pub add_child: Vec<String>,

    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short = 'd', long = "debug", action = ArgAction::Count)]
    pub debug: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum EngineArg {
    Subtree,
    Graph,
}

impl From<EngineArg> for LayoutEngine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Subtree => LayoutEngine::Subtree,
            EngineArg::Graph => LayoutEngine::Graph,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.debug);

    let mut config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let parsed = parse_input(&input)?;
    if let Some(init_cfg) = parsed.init_config {
        config = merge_init_config(config, init_cfg)?;
    }
    if let Some(engine) = args.engine {
        config.layout.engine = engine.into();
    }

    let mut document = WbsDocument::new(parsed.nodes);
    for parent in &args.add_child {
        let id = document.add_child(parent, None)?;
        info!(parent = %parent, id = %id, "added child");
    }

    let layout = layout_document(&document, &config)?;
    match (args.output_format, args.output.as_deref()) {
        (OutputFormat::Svg, output) => {
            let svg = render_svg(&layout, &config.theme, &config.render);
            write_output_svg(&svg, output)?;
        }
        (OutputFormat::Json, Some(path)) => write_layout_dump(path, &layout)?,
        (OutputFormat::Json, None) => {
            let mut stdout = io::stdout();
            stdout.write_all(layout_dump_json(&layout)?.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn layout_document(document: &WbsDocument, config: &Config) -> Result<Layout> {
    let layout = compute_layout(&document.nodes, &config.layout)?;
    debug!(
        engine = ?layout.engine,
        nodes = layout.nodes.len(),
        width = layout.width,
        height = layout.height,
        "layout ready"
    );
    Ok(layout)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let _ = tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .try_init();
}
