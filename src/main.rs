// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use graph_freeze::backends::InMemorySession;
use graph_freeze::config::{
    load_and_validate_config, load_graph, load_values, save_graph, FreezeConfig, Mode,
};
use graph_freeze::freeze::convert_variables_to_constants;
use graph_freeze::graph::{extract_sub_graph, Graph};
use graph_freeze::observability::messages::run::{GraphLoaded, GraphWritten, RunStarted};
use graph_freeze::observability::messages::{PhaseSpan, StructuredLog};
use graph_freeze::prune::remove_training_nodes;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

/// Paths in a config are relative to the config file itself.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <config.yaml|config.toml|config.json>", args[0]);
        eprintln!("Example: {} model/freeze.yaml", args[0]);
        std::process::exit(1);
    }

    if let Err(e) = run(Path::new(&args[1])).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config_path: &Path) -> Result<()> {
    let cfg = load_and_validate_config(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));

    let start_msg = RunStarted {
        mode: cfg.mode.as_str(),
        config: config_path,
    };
    let span = start_msg.span("run");
    start_msg.log();

    execute(&cfg, base).instrument(span).await
}

/// Load the input graph, transform it, write the result and print a summary.
async fn execute(cfg: &FreezeConfig, base: &Path) -> Result<()> {
    let graph_path = resolve(base, &cfg.graph);
    let graph = load_graph(&graph_path)
        .with_context(|| format!("loading graph {}", graph_path.display()))?;
    GraphLoaded {
        path: &graph_path,
        node_count: graph.nodes.len(),
    }
    .log();

    let start = Instant::now();
    let (result, converted) = transform(cfg, base, &graph).await?;
    let elapsed = start.elapsed();

    let output_path = resolve(base, &cfg.output);
    save_graph(&output_path, &result)
        .with_context(|| format!("writing graph {}", output_path.display()))?;
    GraphWritten {
        path: &output_path,
        node_count: result.nodes.len(),
    }
    .log();

    println!("🧊 graph-freeze ({})", cfg.mode.as_str());
    println!("═══════════════════════════════════");
    println!("Input:      {} ({} nodes)", graph_path.display(), graph.nodes.len());
    println!("Output:     {} ({} nodes)", output_path.display(), result.nodes.len());
    if cfg.mode == Mode::Freeze {
        println!("Converted:  {} variables", converted);
    }
    println!("Time:       {:?}", elapsed);

    Ok(())
}

/// Apply the configured mode. Returns the new graph and the number of
/// variables converted (zero outside `freeze`).
async fn transform(cfg: &FreezeConfig, base: &Path, graph: &Graph) -> Result<(Graph, usize)> {
    let (result, converted) = match cfg.mode {
        Mode::Extract => (extract_sub_graph(graph, &cfg.output_nodes)?, 0),
        Mode::Freeze => {
            let values_path = cfg
                .values
                .as_ref()
                .map(|v| resolve(base, v))
                .context("mode 'freeze' requires a values file")?;
            let values = load_values(&values_path)
                .with_context(|| format!("loading values {}", values_path.display()))?;
            let session = InMemorySession::from(values);

            let filter = cfg.variable_filter();
            let frozen =
                convert_variables_to_constants(&session, graph, &cfg.output_nodes, &filter).await?;
            (frozen.graph, frozen.converted)
        }
        Mode::PruneOnly => {
            let protected = cfg.protected_nodes();
            return Ok((remove_training_nodes(graph, Some(&protected[..])), 0));
        }
    };

    if cfg.prune.enabled {
        let protected = cfg.protected_nodes();
        return Ok((remove_training_nodes(&result, Some(&protected[..])), converted));
    }
    Ok((result, converted))
}
