//! Graph commands.

use anyhow::{bail, Context, Result};
use std::path::Path;

use blossom_core::utils::BlossomConfig;
use blossom_policy::pap;
use tracing::info;

use super::load_graph;

/// Write the policy skeleton for the configured super user.
pub fn bootstrap(config: &BlossomConfig, output: &Path) -> Result<()> {
    let graph = pap::bootstrap(&config.policy)?;
    let bytes = graph.to_bytes()?;

    std::fs::write(output, bytes)
        .with_context(|| format!("failed to write graph {}", output.display()))?;

    info!(path = %output.display(), nodes = graph.len(), "policy graph written");
    println!(
        "Wrote policy graph with {} nodes to {}",
        graph.len(),
        output.display()
    );
    Ok(())
}

/// Print every node, or the edges of a single node.
pub fn inspect(path: &Path, node: Option<&str>) -> Result<()> {
    let graph = load_graph(path)?;

    let Some(name) = node else {
        for node in graph.nodes() {
            println!("{}\t{}", node.node_type, node.name);
        }
        return Ok(());
    };

    let Some(node) = graph.node(name) else {
        bail!("no node named {}", name);
    };

    println!("{}\t{}", node.node_type, node.name);
    for (key, value) in &node.properties {
        println!("  property  {}={}", key, value);
    }
    for parent in graph.parents(name) {
        println!("  parent    {}", parent);
    }
    for child in graph.children(name) {
        println!("  child     {}", child);
    }
    for (target, ops) in graph.associations_from(name) {
        println!("  grants    {} {}", target, ops);
    }
    for (source, ops) in graph.associations_to(name) {
        println!("  granted   {} {}", source, ops);
    }
    Ok(())
}
