use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use callgraph_layout::{GraphData, LayoutConfig};
use tracing::debug;

/// Read a layout configuration from a RON file
pub fn config(path: &Path) -> Result<LayoutConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("Invalid config {}", path.display()))
}

pub fn parse_config(text: &str) -> Result<LayoutConfig> {
    Ok(ron::from_str(text)?)
}

/// Read a graph document from a file, or from stdin for `None` and `-`
pub fn graph(path: Option<&Path>) -> Result<GraphData> {
    let text = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph {}", path.display()))?,
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read graph from stdin")?;
            text
        }
    };

    let data = parse_graph(&text)?;
    debug!(
        "Loaded graph with {} nodes and {} links",
        data.nodes.len(),
        data.links.len()
    );
    Ok(data)
}

pub fn parse_graph(text: &str) -> Result<GraphData> {
    serde_json::from_str(text).context("Failed to parse graph document")
}
