//! Graph storage and the intersection kernel.
//!
//! - `adjacency`: sorted CSR adjacency built from an undirected edge list
//! - `intersect`: merge-based common-neighbor counting over sorted rows

pub mod adjacency;
pub mod intersect;

pub use adjacency::{AdjacencyGraph, EdgePolicy};
pub use intersect::common_count;

/// Dense vertex identifier in `[0, V)`.
pub type Vertex = u32;
