//! The `(a, b, count)` record every strategy emits.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::Vertex;

/// One edge of the common-neighbor graph: `a < b` share `count > 0` neighbors.
///
/// Ordering is lexicographic on `(a, b, count)`, so sorting a result stream
/// gives the canonical row-major order.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResultTriple {
    /// Smaller endpoint.
    pub a: Vertex,
    /// Larger endpoint.
    pub b: Vertex,
    /// Number of shared neighbors.
    pub count: u32,
}

impl ResultTriple {
    /// Creates a triple.
    #[inline]
    pub const fn new(a: Vertex, b: Vertex, count: u32) -> Self {
        debug_assert!(a < b);
        Self { a, b, count }
    }
}

/// Formats as the output line body `a b count`.
impl fmt::Display for ResultTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.a, self.b, self.count)
    }
}
