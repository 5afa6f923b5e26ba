//! Fixed-size scoped worker pool (std-only, minimal overhead).
//!
//! Workers borrow the graph directly from the caller's stack; nothing is
//! `Arc`-wrapped or copied. Every worker owns its context (buffer, stopwatch)
//! for the whole compute phase and hands it back through its join handle, so
//! aggregation only ever sees finished workers.

use std::thread;

use crate::error::CngError;

/// Runs a two-phase parallel pattern:
///
/// 1. A parallel **compute phase** where `workers` named threads each run
///    `compute(worker_index)` against shared read-only state.
/// 2. A sequential **commit phase** that receives the per-worker outputs in
///    worker-index order, after every worker has been joined.
///
/// A worker panic is re-raised on the calling thread once the scope closes.
///
/// # Errors
///
/// Returns [`CngError::Io`] if a worker thread cannot be spawned; any workers
/// already started are still joined before returning. Errors from `commit`
/// are passed through.
pub(crate) fn parallel_compute_then_commit<W, R>(
    workers: usize,
    compute: impl Fn(usize) -> W + Sync,
    commit: impl FnOnce(Vec<W>) -> Result<R, CngError>,
) -> Result<R, CngError>
where
    W: Send,
{
    assert!(workers != 0, "workers must be > 0");

    let work: Vec<W> = thread::scope(|scope| {
        let compute = &compute;
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let handle = thread::Builder::new()
                .name(format!("cngraph-worker-{worker}"))
                .spawn_scoped(scope, move || compute(worker))?;
            handles.push(handle);
        }
        Ok::<_, CngError>(
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
                .collect::<Vec<W>>(),
        )
    })?;

    commit(work)
}
