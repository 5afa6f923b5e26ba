//! Row assignment for the two scheduling strategies.
//!
//! A *row* is the set of pairs `(i, j)` with fixed `i` and `j > i`. Rows are
//! never split: whoever claims row `i` enumerates all of it.

use core::iter::StepBy;
use core::ops::Range;
use core::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

/// Default number of consecutive rows handed out per dynamic claim.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// A shared cursor that hands out blocks of consecutive rows on demand.
///
/// Each [`claim`](Self::claim) is a single `fetch_add`, so total contention is
/// bounded by `rows / chunk` claims no matter how many pairs a row holds.
pub struct ChunkCursor {
    next: CachePadded<AtomicUsize>,
    rows: usize,
    chunk: usize,
}

impl ChunkCursor {
    /// Creates a cursor over rows `[0, rows)` handing out `chunk` rows at a time.
    ///
    /// # Panics
    ///
    /// Panics if `chunk == 0`.
    pub fn new(rows: usize, chunk: usize) -> Self {
        assert!(chunk != 0, "chunk size must be > 0");
        Self {
            next: CachePadded::new(AtomicUsize::new(0)),
            rows,
            chunk,
        }
    }

    /// Claims the next unclaimed block, or `None` once every row is taken.
    ///
    /// Every row in `[0, rows)` is returned by exactly one successful claim.
    #[inline]
    pub fn claim(&self) -> Option<Range<usize>> {
        // Keeps exhausted workers from pushing the counter further.
        if self.next.load(Ordering::Relaxed) >= self.rows {
            return None;
        }
        // Relaxed is enough: the counter only partitions indices, results are
        // published through the thread join.
        let start = self.next.fetch_add(self.chunk, Ordering::Relaxed);
        if start >= self.rows {
            return None;
        }
        Some(start..self.rows.min(start.saturating_add(self.chunk)))
    }

    /// Total rows covered by this cursor.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows per claim.
    pub fn chunk(&self) -> usize {
        self.chunk
    }
}

/// Rows owned by `worker` under static round-robin: `worker, worker + workers, …`.
///
/// Surplus workers (`worker >= rows`) get an empty sequence.
///
/// # Panics
///
/// Panics if `workers == 0`.
#[inline]
pub fn round_robin_rows(worker: usize, workers: usize, rows: usize) -> StepBy<Range<usize>> {
    assert!(workers != 0, "workers must be > 0");
    (worker.min(rows)..rows).step_by(workers)
}
