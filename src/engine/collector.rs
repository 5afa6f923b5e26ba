//! Destinations for the merged result stream.

use std::io::Write;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::ResultTriple;
use crate::error::CngError;

/// Receives result triples in batches, one batch per worker flush.
pub trait ResultSink {
    /// Appends `batch` to the output stream.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn accept(&mut self, batch: &[ResultTriple]) -> Result<(), CngError>;
}

impl ResultSink for Vec<ResultTriple> {
    fn accept(&mut self, batch: &[ResultTriple]) -> Result<(), CngError> {
        self.extend_from_slice(batch);
        Ok(())
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn accept(&mut self, batch: &[ResultTriple]) -> Result<(), CngError> {
        (**self).accept(batch)
    }
}

/// Writes triples as `a b count\n` lines to any [`Write`].
///
/// Wrap files in a `BufWriter`; every triple is a separate `write!`.
pub struct TripleWriter<W: Write> {
    inner: W,
    written: usize,
}

impl<W: Write> TripleWriter<W> {
    /// Wraps a writer.
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    /// Number of triples written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the inner writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn finish(mut self) -> Result<W, CngError> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> ResultSink for TripleWriter<W> {
    fn accept(&mut self, batch: &[ResultTriple]) -> Result<(), CngError> {
        for t in batch {
            writeln!(self.inner, "{t}")?;
        }
        self.written += batch.len();
        Ok(())
    }
}

/// A sink shared by all workers behind one lock.
///
/// Each worker calls [`flush`](Self::flush) exactly once, so the lock is taken
/// `workers` times per run regardless of result volume.
pub(crate) struct LockedSink<'a, S: ?Sized> {
    inner: Mutex<&'a mut S>,
}

impl<'a, S: ResultSink + ?Sized> LockedSink<'a, S> {
    pub(crate) fn new(inner: &'a mut S) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Writes a whole worker batch in one critical section and returns how long
    /// the lock was held.
    pub(crate) fn flush(&self, batch: &[ResultTriple]) -> Result<Duration, CngError> {
        // A poisoned lock means another worker panicked; that panic resurfaces
        // at the join, so keep writing.
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let held = Instant::now();
        guard.accept(batch)?;
        Ok(held.elapsed())
    }
}

/// Drains worker buffers into `sink` in worker-index order.
pub(crate) fn drain_in_order<S, I>(sink: &mut S, batches: I) -> Result<usize, CngError>
where
    S: ResultSink + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<[ResultTriple]>,
{
    let mut total = 0;
    for batch in batches {
        let batch = batch.as_ref();
        sink.accept(batch)?;
        total += batch.len();
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_emits_one_line_per_triple() {
        let mut w = TripleWriter::new(Vec::new());
        w.accept(&[ResultTriple::new(0, 1, 1), ResultTriple::new(2, 9, 4)])
            .unwrap();
        assert_eq!(w.written(), 2);
        let bytes = w.finish().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "0 1 1\n2 9 4\n");
    }

    #[test]
    fn drain_preserves_batch_order() {
        let batches = vec![
            vec![ResultTriple::new(4, 5, 1)],
            vec![],
            vec![ResultTriple::new(0, 1, 2), ResultTriple::new(0, 2, 3)],
        ];
        let mut out = Vec::new();
        let n = drain_in_order(&mut out, &batches).unwrap();
        assert_eq!(n, 3);
        assert_eq!(
            out,
            vec![
                ResultTriple::new(4, 5, 1),
                ResultTriple::new(0, 1, 2),
                ResultTriple::new(0, 2, 3),
            ]
        );
    }

    #[test]
    fn locked_sink_accepts_concurrent_flushes() {
        let mut out: Vec<ResultTriple> = Vec::new();
        {
            let sink = LockedSink::new(&mut out);
            std::thread::scope(|scope| {
                let sink = &sink;
                for t in 0..4u32 {
                    scope.spawn(move || {
                        let batch: Vec<_> = (0..8).map(|j| ResultTriple::new(t, 10 + j, 1)).collect();
                        sink.flush(&batch).unwrap();
                    });
                }
            });
        }
        assert_eq!(out.len(), 32);
        // Each worker's batch stays contiguous.
        for chunk in out.chunks(8) {
            assert!(chunk.iter().all(|t| t.a == chunk[0].a));
        }
    }

    struct FailingSink;

    impl ResultSink for FailingSink {
        fn accept(&mut self, _batch: &[ResultTriple]) -> Result<(), CngError> {
            Err(CngError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")))
        }
    }

    #[test]
    fn sink_errors_propagate() {
        let mut sink = FailingSink;
        let err = drain_in_order(&mut sink, [vec![ResultTriple::new(0, 1, 1)]]).unwrap_err();
        assert!(matches!(err, CngError::Io(_)));
    }
}
