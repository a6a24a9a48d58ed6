//! Command implementations.

pub mod decision;
pub mod graph;

use anyhow::{Context, Result};
use std::path::Path;

use blossom_policy::Graph;

/// Load a graph snapshot from a file.
pub fn load_graph(path: &Path) -> Result<Graph> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read graph {}", path.display()))?;
    Graph::from_bytes(&bytes).with_context(|| format!("failed to load graph {}", path.display()))
}
