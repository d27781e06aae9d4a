mod load;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use callgraph_layout::{LabelEstimate, LayoutEngine, PlacementMode, RouteStyle, Vec2};
use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Static,
    Dynamic,
}

impl From<Mode> for PlacementMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Static => PlacementMode::Static,
            Mode::Dynamic => PlacementMode::Dynamic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Style {
    Curved,
    Direct,
}

impl From<Style> for RouteStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Curved => RouteStyle::Curved,
            Style::Direct => RouteStyle::Direct,
        }
    }
}

/// Lay out a service call graph and print node positions and edge paths
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Graph document (JSON), read from stdin when omitted or `-`
    input: Option<PathBuf>,

    /// Layout configuration (RON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum)]
    mode: Option<Mode>,

    #[arg(long)]
    width: Option<f32>,

    #[arg(long)]
    height: Option<f32>,

    #[arg(long, value_enum)]
    route_style: Option<Style>,

    /// Where to write the layout, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let mut config = match &args.config {
        Some(path) => load::config(path)?,
        None => Default::default(),
    };
    if let Some(mode) = args.mode {
        config.mode = mode.into();
    }
    if let Some(style) = args.route_style {
        config.route_style = style.into();
    }
    config.canvas = Vec2::new(
        args.width.unwrap_or(config.canvas.x),
        args.height.unwrap_or(config.canvas.y),
    );
    debug!("Layout configuration: {config:?}");

    let engine = LayoutEngine::new(config).context("Invalid layout configuration")?;
    let data = load::graph(args.input.as_deref())?;

    let sizes = LabelEstimate::new(data.nodes.iter().map(|n| (n.id, n.name.as_str())));
    let layout = engine.render(&data).layout(&sizes);
    info!(
        "Laid out {} nodes and {} edges on {} levels",
        layout.nodes.len(),
        layout.edges.len(),
        layout.max_level + 1
    );

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &layout)?;
    } else {
        serde_json::to_writer(&mut writer, &layout)?;
    }
    writeln!(writer)?;
    writer.flush().context("Failed to write layout")?;

    Ok(())
}
