//! The parallel common-neighbor engine.
//!
//! Row `i` of the pair space covers every pair `(i, j)` with `j > i`. Rows are
//! distributed across a fixed set of workers by one of two strategies, each
//! worker scans its rows into a private [`WorkerBuffer`], and the buffers are
//! merged into a single [`ResultSink`].

mod buffer;
mod collector;
mod partition;
mod pool;
mod timing;
mod triple;

use core::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, info_span, trace};

pub use buffer::{WorkerBuffer, DEFAULT_BUFFER_CAPACITY};
pub use collector::{ResultSink, TripleWriter};
pub use partition::{round_robin_rows, ChunkCursor, DEFAULT_CHUNK_SIZE};
pub use timing::{PhaseTimings, WorkerSample};
pub use triple::ResultTriple;

use crate::error::CngError;
use crate::graph::{common_count, AdjacencyGraph, Vertex};
use collector::{drain_in_order, LockedSink};
use timing::Stopwatch;

/// How rows are assigned to workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Blocks of `chunk_size` consecutive rows are claimed from a shared atomic
    /// cursor by whichever worker is idle. Buffers are drained in worker order
    /// after every worker has finished.
    #[default]
    DynamicChunk,
    /// Worker `t` owns rows `t, t + W, t + 2W, …`. Each worker flushes its
    /// whole buffer under one shared lock when it finishes, so output order
    /// follows worker arrival.
    StaticRoundRobin,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DynamicChunk => "dynamic-chunk",
            Self::StaticRoundRobin => "static-round-robin",
        })
    }
}

/// Engine parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of worker threads, at least one.
    pub workers: usize,
    /// Row scheduling strategy.
    pub strategy: Strategy,
    /// Rows per dynamic claim. Ignored by [`Strategy::StaticRoundRobin`].
    pub chunk_size: usize,
    /// Initial capacity of each worker buffer, in triples.
    pub buffer_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(available_workers())
    }
}

impl EngineConfig {
    /// Dynamic-chunk configuration with `workers` threads and default tuning.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            strategy: Strategy::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    /// Sets the scheduling strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the number of rows per dynamic claim.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the initial worker buffer capacity.
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Limits the worker count to the machine's available parallelism.
    #[must_use]
    pub fn clamped_to_available(mut self) -> Self {
        self.workers = self.workers.min(available_workers());
        self
    }

    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CngError::Report`] if `text` is not a valid configuration.
    pub fn from_json(text: &str) -> Result<Self, CngError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Applies `overrides` on top of this configuration. Clamping, when
    /// requested, runs after the worker override.
    #[must_use]
    pub fn with_overrides(mut self, overrides: &EngineOverrides) -> Self {
        if let Some(workers) = overrides.workers {
            self.workers = workers;
        }
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        if let Some(chunk_size) = overrides.chunk_size {
            self.chunk_size = chunk_size;
        }
        if let Some(capacity) = overrides.buffer_capacity {
            self.buffer_capacity = capacity;
        }
        if overrides.clamp_to_cores {
            self = self.clamped_to_available();
        }
        self
    }

    /// Checks the engine preconditions.
    ///
    /// # Errors
    ///
    /// Returns [`CngError::InvalidConfig`] if `workers` or `chunk_size` is zero.
    pub fn validate(&self) -> Result<(), CngError> {
        if self.workers == 0 {
            return Err(CngError::InvalidConfig("workers must be > 0"));
        }
        if self.chunk_size == 0 {
            return Err(CngError::InvalidConfig("chunk_size must be > 0"));
        }
        Ok(())
    }
}

/// Explicit settings that take precedence over a loaded [`EngineConfig`].
///
/// `None` keeps the base value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineOverrides {
    /// Worker thread count.
    pub workers: Option<usize>,
    /// Scheduling strategy.
    pub strategy: Option<Strategy>,
    /// Rows per dynamic claim.
    pub chunk_size: Option<usize>,
    /// Initial worker buffer capacity.
    pub buffer_capacity: Option<usize>,
    /// Lower `workers` to the available parallelism. Never raises it.
    pub clamp_to_cores: bool,
}

fn available_workers() -> usize {
    std::thread::available_parallelism().map_or(1, usize::from)
}

/// Result stream and timings of an in-memory run.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    /// All triples in collection order.
    pub results: Vec<ResultTriple>,
    /// Per-worker and per-phase timings.
    pub timings: PhaseTimings,
}

/// Computes every positive common-neighbor count of `graph` in memory.
///
/// # Errors
///
/// Returns [`CngError::InvalidConfig`] if `config` fails validation.
pub fn run(graph: &AdjacencyGraph, config: &EngineConfig) -> Result<RunOutput, CngError> {
    let mut results = Vec::new();
    let timings = run_into(graph, config, &mut results)?;
    Ok(RunOutput { results, timings })
}

/// Computes every positive common-neighbor count of `graph`, streaming the
/// triples into `sink`.
///
/// Under [`Strategy::DynamicChunk`] the sink sees one batch per worker, in
/// worker order, after all workers finish. Under
/// [`Strategy::StaticRoundRobin`] each worker writes its batch as soon as it
/// is done, in arrival order.
///
/// # Errors
///
/// Returns [`CngError::InvalidConfig`] if `config` fails validation, or the
/// first error reported by `sink`.
pub fn run_into<S>(
    graph: &AdjacencyGraph,
    config: &EngineConfig,
    sink: &mut S,
) -> Result<PhaseTimings, CngError>
where
    S: ResultSink + Send + ?Sized,
{
    config.validate()?;

    let span = info_span!(
        "cngraph_run",
        vertices = graph.vertex_count(),
        workers = config.workers,
        strategy = %config.strategy,
    );
    let _enter = span.enter();
    info!(edges = graph.edge_count(), max_degree = graph.max_degree(), "starting compute phase");

    let timings = match config.strategy {
        Strategy::DynamicChunk => run_dynamic(graph, config, sink, &span)?,
        Strategy::StaticRoundRobin => run_round_robin(graph, config, sink, &span)?,
    };

    info!(
        triples = timings.triples(),
        parallel_secs = timings.parallel_phase().as_secs_f64(),
        sequential_secs = timings.sequential.as_secs_f64(),
        "run finished"
    );
    Ok(timings)
}

fn run_dynamic<S>(
    graph: &AdjacencyGraph,
    config: &EngineConfig,
    sink: &mut S,
    span: &tracing::Span,
) -> Result<PhaseTimings, CngError>
where
    S: ResultSink + ?Sized,
{
    let cursor = ChunkCursor::new(graph.vertex_count(), config.chunk_size);

    pool::parallel_compute_then_commit(
        config.workers,
        |worker| {
            let _span = debug_span!(parent: span, "worker", index = worker).entered();
            let mut buffer = WorkerBuffer::with_capacity(config.buffer_capacity);

            let clock = Stopwatch::start();
            let mut rows = 0;
            while let Some(block) = cursor.claim() {
                trace!(start = block.start, end = block.end, "claimed chunk");
                rows += block.len();
                for i in block {
                    scan_row(graph, i, &mut buffer);
                }
            }
            let elapsed = clock.elapsed();

            debug!(rows, triples = buffer.len(), secs = elapsed.as_secs_f64(), "worker done");
            let sample = WorkerSample {
                worker,
                rows,
                triples: buffer.len(),
                elapsed,
            };
            (buffer, sample)
        },
        |work| {
            let (buffers, workers): (Vec<_>, Vec<_>) = work.into_iter().unzip();
            let clock = Stopwatch::start();
            drain_in_order(sink, &buffers)?;
            Ok(PhaseTimings {
                workers,
                sequential: clock.elapsed(),
            })
        },
    )
}

fn run_round_robin<S>(
    graph: &AdjacencyGraph,
    config: &EngineConfig,
    sink: &mut S,
    span: &tracing::Span,
) -> Result<PhaseTimings, CngError>
where
    S: ResultSink + Send + ?Sized,
{
    let n = graph.vertex_count();
    let locked = LockedSink::new(sink);

    pool::parallel_compute_then_commit(
        config.workers,
        |worker| {
            let _span = debug_span!(parent: span, "worker", index = worker).entered();
            let mut buffer = WorkerBuffer::with_capacity(config.buffer_capacity);

            let clock = Stopwatch::start();
            let mut rows = 0;
            for i in round_robin_rows(worker, config.workers, n) {
                rows += 1;
                scan_row(graph, i, &mut buffer);
            }
            let elapsed = clock.elapsed();

            debug!(rows, triples = buffer.len(), secs = elapsed.as_secs_f64(), "worker done");
            let held = locked.flush(buffer.as_slice())?;
            Ok::<_, CngError>((
                WorkerSample {
                    worker,
                    rows,
                    triples: buffer.len(),
                    elapsed,
                },
                held,
            ))
        },
        |work| {
            let mut timings = PhaseTimings::default();
            for outcome in work {
                let (sample, held) = outcome?;
                timings.workers.push(sample);
                timings.sequential += held;
            }
            Ok(timings)
        },
    )
}

/// Enumerates row `i`: every `j > i` with a positive common count.
#[inline]
fn scan_row(graph: &AdjacencyGraph, i: usize, buffer: &mut WorkerBuffer) {
    let left = graph.neighbors(i);
    // An isolated vertex shares nothing with anyone.
    if left.is_empty() {
        return;
    }
    for j in (i + 1)..graph.vertex_count() {
        let count = common_count(left, graph.neighbors(j));
        if count > 0 {
            #[allow(clippy::cast_possible_truncation)]
            buffer.push(ResultTriple::new(i as Vertex, j as Vertex, count));
        }
    }
}
