use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "cngraph workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the strategy benchmarks and write a scaling report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Criterion group holding one benchmark per (strategy, workers).
const GROUP: &str = "common_neighbors";

const STRATEGIES: &[&str] = &["dynamic-chunk", "static-round-robin"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Running strategy benchmarks...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", "engine_benchmark", "--", GROUP]);

    if quick {
        cmd.arg("--measurement-time").arg("0.5");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd.status().context("Failed to run cargo bench")?;
    if !status.success() {
        anyhow::bail!("Benchmark run failed");
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

/// Mean time in nanoseconds, keyed by strategy then worker count.
type Results = BTreeMap<String, BTreeMap<usize, f64>>;

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let group_dir = Path::new("target/criterion").join(GROUP);
    if !group_dir.exists() {
        eprintln!("No criterion output found at {}", group_dir.display());
        return Ok(());
    }

    let results = collect_results(&group_dir)?;

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::io::Write;
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Strategy Scaling Report")?;
    writeln!(file)?;

    let mut workers: Vec<usize> = results.values().flat_map(|m| m.keys().copied()).collect();
    workers.sort_unstable();
    workers.dedup();

    // Header
    write!(file, "| Workers |")?;
    for strategy in STRATEGIES {
        write!(file, " {strategy} (ms) | speedup |")?;
    }
    writeln!(file)?;

    // Separator
    write!(file, "|---|")?;
    for _ in STRATEGIES {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    // Rows
    for w in workers {
        write!(file, "| {w} |")?;
        for strategy in STRATEGIES {
            let by_workers = results.get(*strategy);
            let baseline = by_workers.and_then(|m| m.get(&1)).copied();
            match by_workers.and_then(|m| m.get(&w)) {
                Some(&ns) => {
                    let speedup = baseline.map_or(0.0, |b| b / ns);
                    write!(file, " {:.2} | **{speedup:.2}x** |", ns / 1e6)?;
                }
                None => write!(file, " N/A | - |")?,
            }
        }
        writeln!(file)?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

/// Layout: `<group>/<strategy>/<workers>/new/estimates.json`.
fn collect_results(group_dir: &Path) -> Result<Results> {
    let mut results = Results::new();

    for strategy_entry in fs::read_dir(group_dir)?.flatten() {
        let strategy_dir = strategy_entry.path();
        let Some(strategy) = strategy_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !strategy_dir.is_dir() || strategy == "report" {
            continue;
        }

        for workers_entry in fs::read_dir(&strategy_dir)?.flatten() {
            let workers_dir = workers_entry.path();
            let Some(workers) = workers_dir
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<usize>().ok())
            else {
                continue;
            };

            let estimates = workers_dir.join("new").join("estimates.json");
            let Ok(content) = fs::read_to_string(&estimates) else {
                continue;
            };
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("Malformed {}", estimates.display()))?;
            if let Some(mean) = json
                .get("mean")
                .and_then(|m| m.get("point_estimate"))
                .and_then(serde_json::Value::as_f64)
            {
                results
                    .entry(strategy.to_string())
                    .or_default()
                    .insert(workers, mean);
            }
        }
    }

    Ok(results)
}
