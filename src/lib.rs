//! # `cngraph` - Parallel Common-Neighbor Counting
//!
//! Computes, for every pair of vertices in an undirected graph, how many
//! neighbors the two vertices share, and emits every pair with a positive
//! count as a `(a, b, count)` triple.
//!
//! ## Architecture
//!
//! The pair space is \(O(V^2)\) and the cost of a pair is proportional to the
//! degrees of its endpoints, so the interesting part is how work is handed
//! out and how results are gathered back.
//!
//! 1. **Adjacency store** ([`AdjacencyGraph`]): a CSR layout where every row
//!    is sorted ascending. Immutable once built.
//! 2. **Intersection kernel** ([`common_count`]): a two-pointer merge over two
//!    sorted rows. Allocation-free and safe to call from any number of threads.
//! 3. **Scheduling** ([`Strategy`]): rows are handed out either through a
//!    shared atomic chunk cursor ([`Strategy::DynamicChunk`]) or by a fixed
//!    round-robin assignment ([`Strategy::StaticRoundRobin`]).
//! 4. **Collection** ([`engine::ResultSink`]): each worker fills a private
//!    [`engine::WorkerBuffer`]. Buffers are either drained in worker order after
//!    the join, or flushed once per worker under a single output lock.
//! 5. **Timing** ([`PhaseTimings`]): per-worker compute time plus the duration
//!    of the sequential collection phase.
//!
//! ## Example
//!
//! ```rust
//! use cngraph::{AdjacencyGraph, EngineConfig, ResultTriple, Strategy};
//!
//! let graph = AdjacencyGraph::from_edges(&[(0, 1), (0, 2), (1, 2)]);
//! let config = EngineConfig::new(2).with_strategy(Strategy::DynamicChunk);
//!
//! let mut out = cngraph::run(&graph, &config).unwrap();
//! out.results.sort_unstable();
//!
//! assert_eq!(
//!     out.results,
//!     vec![
//!         ResultTriple::new(0, 1, 1),
//!         ResultTriple::new(0, 2, 1),
//!         ResultTriple::new(1, 2, 1),
//!     ]
//! );
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod engine;
pub mod error;
pub mod graph;
pub mod io;

pub use engine::{run, run_into, EngineConfig, EngineOverrides, PhaseTimings, ResultTriple, RunOutput, Strategy};
pub use error::CngError;
pub use graph::{common_count, AdjacencyGraph, EdgePolicy, Vertex};

// Compile-time layout checks for the hot-path types.
const _: () = {
    use core::mem;

    // Triples are three packed `u32`s; buffers of them stay dense.
    assert!(mem::size_of::<ResultTriple>() == 12);
    assert!(mem::align_of::<ResultTriple>() == mem::align_of::<u32>());

    assert!(mem::size_of::<Vertex>() == 4);
};
