//! Human, CSV and JSON renderings of run timings.

use std::io::Write;

use serde::Serialize;

use crate::engine::{EngineConfig, PhaseTimings, WorkerSample};
use crate::error::CngError;

/// A self-describing timing report: the raw samples plus the derived phase
/// latencies and the configuration that produced them.
#[derive(Debug, Serialize)]
pub struct TimingReport<'a> {
    /// Engine configuration of the run.
    pub config: &'a EngineConfig,
    /// Vertices in the input graph.
    pub vertices: usize,
    /// Triples emitted.
    pub triples: usize,
    /// Per-worker samples.
    pub workers: &'a [WorkerSample],
    /// Slowest worker, in seconds.
    pub parallel_secs: f64,
    /// Sequential collection, in seconds.
    pub sequential_secs: f64,
    /// Parallel plus sequential, in seconds.
    pub total_secs: f64,
}

impl<'a> TimingReport<'a> {
    /// Builds a report for one run.
    pub fn new(config: &'a EngineConfig, vertices: usize, timings: &'a PhaseTimings) -> Self {
        Self {
            config,
            vertices,
            triples: timings.triples(),
            workers: &timings.workers,
            parallel_secs: timings.parallel_phase().as_secs_f64(),
            sequential_secs: timings.sequential.as_secs_f64(),
            total_secs: timings.total().as_secs_f64(),
        }
    }
}

/// Writes the console summary: one line per worker, then the phase totals
/// and the summed worker time.
///
/// # Errors
///
/// Returns [`CngError::Io`] if the writer fails.
pub fn write_summary<W: Write>(mut out: W, timings: &PhaseTimings) -> Result<(), CngError> {
    for w in &timings.workers {
        writeln!(
            out,
            "worker {}: {:.6} s ({} rows, {} triples)",
            w.worker,
            w.elapsed.as_secs_f64(),
            w.rows,
            w.triples
        )?;
    }
    writeln!(out, "parallel phase (slowest worker): {:.6} s", timings.parallel_phase().as_secs_f64())?;
    writeln!(out, "sum of worker time: {:.6} s", timings.worker_time_sum().as_secs_f64())?;
    writeln!(out, "sequential phase: {:.6} s", timings.sequential.as_secs_f64())?;
    writeln!(out, "total: {:.6} s", timings.total().as_secs_f64())?;
    Ok(())
}

/// Writes the CSV report used for plotting.
///
/// ```text
/// worker,seconds
/// 0,0.012345
/// ...
/// parallel_phase,0.020000
/// sequential_phase,0.001000
/// total,0.021000
/// ```
///
/// # Errors
///
/// Returns [`CngError::Io`] if the writer fails.
pub fn write_csv_report<W: Write>(mut out: W, timings: &PhaseTimings) -> Result<(), CngError> {
    writeln!(out, "worker,seconds")?;
    for w in &timings.workers {
        writeln!(out, "{},{:.6}", w.worker, w.elapsed.as_secs_f64())?;
    }
    writeln!(out, "parallel_phase,{:.6}", timings.parallel_phase().as_secs_f64())?;
    writeln!(out, "sequential_phase,{:.6}", timings.sequential.as_secs_f64())?;
    writeln!(out, "total,{:.6}", timings.total().as_secs_f64())?;
    out.flush()?;
    Ok(())
}

/// Writes `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CngError::Report`] if serialization fails and [`CngError::Io`]
/// if the trailing newline cannot be written.
pub fn write_json_report<W: Write>(mut out: W, report: &TimingReport<'_>) -> Result<(), CngError> {
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}
