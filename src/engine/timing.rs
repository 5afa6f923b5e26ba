//! Per-worker and per-phase wall-clock samples.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// What one worker did during the compute phase.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerSample {
    /// Worker index in `[0, workers)`.
    pub worker: usize,
    /// Rows this worker enumerated.
    pub rows: usize,
    /// Triples this worker produced.
    pub triples: usize,
    /// Wall-clock time of the compute loop, excluding buffer setup and flush.
    #[serde(with = "seconds")]
    pub elapsed: Duration,
}

/// Timing for a whole run.
///
/// The parallel phase is gated by its slowest worker, so its latency is the
/// maximum per-worker time, not the sum.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    /// One sample per worker, in worker-index order.
    pub workers: Vec<WorkerSample>,
    /// Time spent in strictly sequential collection.
    ///
    /// Under the dynamic strategy this is the post-join drain. Under static
    /// round-robin it is the total time workers spent inside the output lock.
    #[serde(with = "seconds")]
    pub sequential: Duration,
}

impl PhaseTimings {
    /// Per-worker compute durations, in worker-index order.
    pub fn per_worker(&self) -> Vec<Duration> {
        self.workers.iter().map(|w| w.elapsed).collect()
    }

    /// Slowest worker's compute time.
    pub fn parallel_phase(&self) -> Duration {
        self.workers
            .iter()
            .map(|w| w.elapsed)
            .max()
            .unwrap_or_default()
    }

    /// Sum of every worker's compute time: the CPU time the parallel phase
    /// consumed, as opposed to its latency.
    pub fn worker_time_sum(&self) -> Duration {
        self.workers.iter().map(|w| w.elapsed).sum()
    }

    /// Parallel latency plus sequential collection.
    pub fn total(&self) -> Duration {
        self.parallel_phase() + self.sequential
    }

    /// Total rows across workers.
    pub fn rows(&self) -> usize {
        self.workers.iter().map(|w| w.rows).sum()
    }

    /// Total triples across workers.
    pub fn triples(&self) -> usize {
        self.workers.iter().map(|w| w.triples).sum()
    }
}

/// Started at construction, read once.
pub(crate) struct Stopwatch(Instant);

impl Stopwatch {
    #[inline]
    pub(crate) fn start() -> Self {
        Self(Instant::now())
    }

    #[inline]
    pub(crate) fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// Serializes a `Duration` as fractional seconds.
mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(worker: usize, ms: u64) -> WorkerSample {
        WorkerSample {
            worker,
            rows: worker + 1,
            triples: 2 * worker,
            elapsed: Duration::from_millis(ms),
        }
    }

    #[test]
    fn parallel_phase_is_slowest_worker() {
        let t = PhaseTimings {
            workers: vec![sample(0, 30), sample(1, 70), sample(2, 10)],
            sequential: Duration::from_millis(5),
        };
        assert_eq!(t.parallel_phase(), Duration::from_millis(70));
        assert_eq!(t.total(), Duration::from_millis(75));
        assert_eq!(t.worker_time_sum(), Duration::from_millis(110));
        assert_eq!(t.rows(), 6);
        assert_eq!(t.triples(), 6);
        assert_eq!(
            t.per_worker(),
            vec![
                Duration::from_millis(30),
                Duration::from_millis(70),
                Duration::from_millis(10)
            ]
        );
    }

    #[test]
    fn empty_timings_are_zero() {
        let t = PhaseTimings::default();
        assert_eq!(t.parallel_phase(), Duration::ZERO);
        assert_eq!(t.total(), Duration::ZERO);
        assert_eq!(t.worker_time_sum(), Duration::ZERO);
    }

    #[test]
    fn json_uses_fractional_seconds() {
        let t = PhaseTimings {
            workers: vec![sample(0, 1500)],
            sequential: Duration::from_millis(250),
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["workers"][0]["elapsed"], 1.5);
        assert_eq!(json["sequential"], 0.25);

        let back: PhaseTimings = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }
}
