//! `cngraph` - common-neighbor graph of an edge list.
//!
//! ```text
//! cngraph graph.edgelist 8 --strategy round-robin --report results.csv
//! cngraph graph.edgelist --config engine.json --chunk-size 50
//! ```

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use cngraph::io::{self as cio, TimingReport};
use cngraph::{AdjacencyGraph, EdgePolicy, EngineConfig, EngineOverrides, Strategy};

#[derive(Parser)]
#[command(name = "cngraph")]
#[command(about = "Counts common neighbors for every vertex pair of an undirected graph", long_about = None)]
struct Cli {
    /// Edge list: one `u v` pair per line
    input: PathBuf,

    /// Number of worker threads (overrides `workers` from `--config`; defaults
    /// to the available parallelism)
    workers: Option<usize>,

    /// Row scheduling strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Rows per dynamic claim
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Initial per-worker buffer capacity, in triples
    #[arg(long)]
    buffer_capacity: Option<usize>,

    /// Collapse duplicate edges and drop self-loops
    #[arg(long, default_value_t = false)]
    simple: bool,

    /// Never use more workers than available cores
    #[arg(long, default_value_t = false)]
    clamp_to_cores: bool,

    /// Result file (defaults to the input path with a `.cng` extension)
    #[arg(long)]
    output: Option<PathBuf>,

    /// CSV timing report
    #[arg(long)]
    report: Option<PathBuf>,

    /// JSON timing report
    #[arg(long)]
    json: Option<PathBuf>,

    /// Engine configuration file (JSON); explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Shared chunk cursor, buffers drained in worker order
    Dynamic,
    /// Fixed round-robin rows, one locked flush per worker
    RoundRobin,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Dynamic => Strategy::DynamicChunk,
            StrategyArg::RoundRobin => Strategy::StaticRoundRobin,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = engine_config(&cli)?;

    let started = Instant::now();
    let edges = cio::load_edge_list(&cli.input)
        .with_context(|| format!("Failed to read edge list {}", cli.input.display()))?;
    let policy = if cli.simple {
        EdgePolicy::Simple
    } else {
        EdgePolicy::Multigraph
    };
    let graph = AdjacencyGraph::from_edges_with(&edges, policy);
    drop(edges);
    println!(
        "Loaded {} vertices, {} edges in {:.2?}",
        graph.vertex_count(),
        graph.edge_count(),
        started.elapsed()
    );

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cio::output_path_for(&cli.input));
    let mut writer = cio::create_result_file(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let timings = cngraph::run_into(&graph, &config, &mut writer)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;
    let written = writer.written();
    writer
        .finish()
        .with_context(|| format!("Failed to flush {}", output.display()))?;

    cio::write_summary(io::stdout().lock(), &timings)?;

    if let Some(path) = &cli.report {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        cio::write_csv_report(BufWriter::new(file), &timings)?;
        println!("CSV report written to {}", path.display());
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        let report = TimingReport::new(&config, graph.vertex_count(), &timings);
        cio::write_json_report(BufWriter::new(file), &report)?;
        println!("JSON report written to {}", path.display());
    }

    println!("Wrote {written} triples to {}", output.display());
    Ok(())
}

fn engine_config(cli: &Cli) -> Result<EngineConfig> {
    let base = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let overrides = EngineOverrides {
        workers: cli.workers,
        strategy: cli.strategy.map(Strategy::from),
        chunk_size: cli.chunk_size,
        buffer_capacity: cli.buffer_capacity,
        clamp_to_cores: cli.clamp_to_cores,
    };
    let requested = overrides.workers.unwrap_or(base.workers);
    let config = base.with_overrides(&overrides);
    if config.workers != requested {
        println!("Clamping workers to {} (available cores)", config.workers);
    }

    config.validate().context("Invalid engine configuration")?;
    Ok(config)
}
