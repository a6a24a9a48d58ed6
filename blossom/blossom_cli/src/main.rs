use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use blossom_core::utils::BlossomConfig;
use blossom_policy::Operation;

mod commands;

/// Blossom Command Line Interface
///
/// Build, inspect and query Blossom policy graphs.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the policy skeleton graph to a file
    Bootstrap {
        /// Where to write the graph snapshot
        #[clap(long)]
        output: PathBuf,
    },

    /// Decide whether an identity holds an operation on a node
    Decide {
        /// Path to a graph snapshot
        #[clap(long)]
        graph: PathBuf,

        /// The caller identity, e.g. super:BlossomMSP
        #[clap(long)]
        identity: String,

        /// The target node
        #[clap(long)]
        target: String,

        /// The operation, e.g. checkout
        #[clap(long)]
        operation: Operation,
    },

    /// Show the operations an identity holds on a node, per policy class
    Privileges {
        /// Path to a graph snapshot
        #[clap(long)]
        graph: PathBuf,

        /// The caller identity
        #[clap(long)]
        identity: String,

        /// The target node
        #[clap(long)]
        target: String,

        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
    },

    /// List the nodes of a graph, or the edges of one node
    Inspect {
        /// Path to a graph snapshot
        #[clap(long)]
        graph: PathBuf,

        /// Show only this node
        #[clap(long)]
        node: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BlossomConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BlossomConfig::default(),
    };
    init_logging(&config);

    match cli.command {
        Commands::Bootstrap { output } => commands::graph::bootstrap(&config, &output),
        Commands::Decide {
            graph,
            identity,
            target,
            operation,
        } => commands::decision::decide(&graph, &identity, &target, operation),
        Commands::Privileges {
            graph,
            identity,
            target,
            json,
        } => commands::decision::privileges(&graph, &identity, &target, json),
        Commands::Inspect { graph, node } => commands::graph::inspect(&graph, node.as_deref()),
    }
}

/// Install the fmt subscriber on stderr. `RUST_LOG` takes precedence over
/// the configured level.
fn init_logging(config: &BlossomConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
