//! Per-worker result accumulation.

use super::ResultTriple;

/// Initial buffer capacity, in triples.
pub const DEFAULT_BUFFER_CAPACITY: usize = 100_000;

/// A growable, worker-private accumulator of result triples.
///
/// Exactly one worker owns a buffer during the compute phase, so pushes never
/// contend. Capacity doubles whenever the buffer fills.
#[derive(Debug, Default)]
pub struct WorkerBuffer {
    triples: Vec<ResultTriple>,
}

impl WorkerBuffer {
    /// Creates a buffer with room for `capacity` triples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triples: Vec::with_capacity(capacity),
        }
    }

    /// Appends a triple, doubling capacity first if the buffer is full.
    #[inline]
    pub fn push(&mut self, triple: ResultTriple) {
        if self.triples.len() == self.triples.capacity() {
            let grow = self.triples.capacity().max(1);
            self.triples.reserve_exact(grow);
        }
        self.triples.push(triple);
    }

    /// Number of buffered triples.
    #[inline]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns `true` if nothing has been buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Current capacity, in triples.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.triples.capacity()
    }

    /// Buffered triples in discovery order.
    #[inline]
    pub fn as_slice(&self) -> &[ResultTriple] {
        &self.triples
    }

    /// Consumes the buffer, returning its triples.
    pub fn into_vec(self) -> Vec<ResultTriple> {
        self.triples
    }
}

impl AsRef<[ResultTriple]> for WorkerBuffer {
    fn as_ref(&self) -> &[ResultTriple] {
        &self.triples
    }
}
