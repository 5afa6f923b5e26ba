//! A compact CSR (compressed sparse row) adjacency store for undirected graphs.
//!
//! Every row is sorted ascending, which is what the merge-based
//! [`common_count`](crate::graph::common_count) kernel requires.
//!
//! Memory layout:
//! - `offsets`: `Vec<usize>` of length `n + 1` (row offsets)
//! - `targets`: contiguous `u32` neighbor ids, row-major
//!
//! Construction is two-pass (degree count, then scatter), so no row is ever
//! grown one element at a time.

use serde::{Deserialize, Serialize};

use super::Vertex;
use crate::error::CngError;

/// How duplicate edges and self-loops are treated during construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Keep every edge as given. A repeated edge `(u, v)` appears twice in both
    /// rows and a self-loop `(u, u)` appends `u` to its own row twice, so both
    /// inflate degrees and common-neighbor counts.
    #[default]
    Multigraph,
    /// Drop self-loops and collapse repeated neighbors.
    Simple,
}

/// An immutable undirected graph with sorted adjacency rows.
///
/// ### Performance Characteristics
/// | Operation | Complexity | Notes |
/// |-----------|------------|-------|
/// | `from_edges` | \(O(V + E \log d)\) | Counting build plus per-row sort |
/// | `neighbors` | \(O(1)\) | Borrowed sorted slice |
/// | `degree` | \(O(1)\) | Offset difference |
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    offsets: Vec<usize>,
    targets: Vec<Vertex>,
    edge_count: usize,
}

impl AdjacencyGraph {
    /// Builds a multigraph from an undirected edge list.
    ///
    /// The vertex count is `1 + max id` referenced by any edge, or zero for an
    /// empty list.
    pub fn from_edges(edges: &[(Vertex, Vertex)]) -> Self {
        Self::from_edges_with(edges, EdgePolicy::Multigraph)
    }

    /// Builds a graph from an undirected edge list under the given policy.
    pub fn from_edges_with(edges: &[(Vertex, Vertex)], policy: EdgePolicy) -> Self {
        let n = edges
            .iter()
            .map(|&(u, v)| u.max(v) as usize + 1)
            .max()
            .unwrap_or(0);

        let keep = |u: Vertex, v: Vertex| policy == EdgePolicy::Multigraph || u != v;

        let mut degree = vec![0usize; n];
        for &(u, v) in edges {
            if keep(u, v) {
                degree[u as usize] += 1;
                degree[v as usize] += 1;
            }
        }

        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut total = 0usize;
        for d in &degree {
            total += d;
            offsets.push(total);
        }

        // Reuse the degree array as per-row write cursors.
        let mut cursor = degree;
        cursor.copy_from_slice(&offsets[..n]);

        let mut targets = vec![0 as Vertex; total];
        let mut kept = 0usize;
        for &(u, v) in edges {
            if !keep(u, v) {
                continue;
            }
            kept += 1;
            targets[cursor[u as usize]] = v;
            cursor[u as usize] += 1;
            targets[cursor[v as usize]] = u;
            cursor[v as usize] += 1;
        }

        sort_rows(&offsets, &mut targets);

        let mut graph = Self {
            offsets,
            targets,
            edge_count: kept,
        };
        if policy == EdgePolicy::Simple {
            graph.dedup_rows();
        }
        graph
    }

    /// Builds a graph from per-vertex neighbor lists, sorting each row.
    ///
    /// The lists are taken as-is: no symmetry is enforced, and the edge count
    /// is half the total row length.
    ///
    /// # Panics
    ///
    /// Panics if any neighbor id is out of bounds for `adjacency.len()`.
    pub fn from_adjacency(adjacency: Vec<Vec<Vertex>>) -> Self {
        let n = adjacency.len();
        let mut rows = adjacency;
        for (u, row) in rows.iter_mut().enumerate() {
            for &v in row.iter() {
                assert!((v as usize) < n, "edge {u}->{v} is out of bounds for n={n}");
            }
            row.sort_unstable();
        }
        Self::flatten(rows)
    }

    /// Builds a graph from neighbor lists that are already sorted ascending.
    ///
    /// # Errors
    ///
    /// Returns [`CngError::UnsortedAdjacency`] naming the first row that is
    /// out of order.
    ///
    /// # Panics
    ///
    /// Panics if any neighbor id is out of bounds for `adjacency.len()`.
    pub fn from_sorted_adjacency(adjacency: Vec<Vec<Vertex>>) -> Result<Self, CngError> {
        let n = adjacency.len();
        for (u, row) in adjacency.iter().enumerate() {
            if row.windows(2).any(|w| w[0] > w[1]) {
                return Err(CngError::UnsortedAdjacency { vertex: u });
            }
            for &v in row {
                assert!((v as usize) < n, "edge {u}->{v} is out of bounds for n={n}");
            }
        }
        Ok(Self::flatten(adjacency))
    }

    /// Extends the vertex range so that it covers at least `n` vertices.
    ///
    /// The new vertices are isolated.
    #[must_use]
    pub fn with_isolated_vertices(mut self, n: usize) -> Self {
        if self.offsets.is_empty() {
            self.offsets.push(0);
        }
        let total = self.targets.len();
        while self.vertex_count() < n {
            self.offsets.push(total);
        }
        self
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        // `offsets` is length `n + 1` by construction.
        self.offsets.len().saturating_sub(1)
    }

    /// Number of undirected edges kept by construction.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns `true` when the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Returns the sorted neighbor row of `vertex`.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of bounds.
    #[inline]
    pub fn neighbors(&self, vertex: usize) -> &[Vertex] {
        assert!(vertex < self.vertex_count(), "vertex {vertex} out of bounds");
        &self.targets[self.offsets[vertex]..self.offsets[vertex + 1]]
    }

    /// Returns the degree of `vertex`, counting duplicates.
    ///
    /// # Panics
    ///
    /// Panics if `vertex` is out of bounds.
    #[inline]
    pub fn degree(&self, vertex: usize) -> usize {
        assert!(vertex < self.vertex_count(), "vertex {vertex} out of bounds");
        self.offsets[vertex + 1] - self.offsets[vertex]
    }

    /// Largest degree in the graph, or zero when empty.
    pub fn max_degree(&self) -> usize {
        self.offsets
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    fn flatten(rows: Vec<Vec<Vertex>>) -> Self {
        let total: usize = rows.iter().map(Vec::len).sum();
        let mut offsets = Vec::with_capacity(rows.len() + 1);
        let mut targets = Vec::with_capacity(total);
        offsets.push(0);
        for row in rows {
            targets.extend_from_slice(&row);
            offsets.push(targets.len());
        }
        Self {
            offsets,
            edge_count: total / 2,
            targets,
        }
    }

    /// Collapses repeated neighbors in place. Rows must already be sorted.
    fn dedup_rows(&mut self) {
        let n = self.vertex_count();
        let mut offsets = Vec::with_capacity(n + 1);
        offsets.push(0);
        let mut write = 0usize;
        for v in 0..n {
            let mut last = None;
            for read in self.offsets[v]..self.offsets[v + 1] {
                let x = self.targets[read];
                if last != Some(x) {
                    self.targets[write] = x;
                    write += 1;
                    last = Some(x);
                }
            }
            offsets.push(write);
        }
        self.targets.truncate(write);
        self.offsets = offsets;
        self.edge_count = write / 2;
    }
}

/// Splits `targets` into one mutable slice per row.
fn rows_mut<'a>(offsets: &[usize], mut targets: &'a mut [Vertex]) -> Vec<&'a mut [Vertex]> {
    let mut rows = Vec::with_capacity(offsets.len().saturating_sub(1));
    for w in offsets.windows(2) {
        let (row, rest) = core::mem::take(&mut targets).split_at_mut(w[1] - w[0]);
        rows.push(row);
        targets = rest;
    }
    rows
}

/// Sorts each row ascending by numeric value.
fn sort_rows(offsets: &[usize], targets: &mut [Vertex]) {
    let rows = rows_mut(offsets, targets);

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        rows.into_par_iter().for_each(|row| row.sort_unstable());
    }

    #[cfg(not(feature = "parallel"))]
    for row in rows {
        row.sort_unstable();
    }
}
