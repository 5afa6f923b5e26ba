//! Error type shared by graph construction, the engine and the I/O adapters.

use core::fmt;

/// Everything that can stop a run.
///
/// Allocation failure is deliberately absent: buffer growth goes through the
/// global allocator, which aborts the process rather than returning a
/// truncated buffer.
#[derive(Debug)]
pub enum CngError {
    /// Reading input or writing output failed.
    Io(std::io::Error),
    /// An edge-list line did not hold exactly two non-negative integers.
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending line, trimmed.
        content: String,
    },
    /// The engine configuration violates a precondition.
    InvalidConfig(&'static str),
    /// An adjacency row handed in as pre-sorted was not ascending.
    UnsortedAdjacency {
        /// The vertex whose row is out of order.
        vertex: usize,
    },
    /// Serializing or deserializing a report or config failed.
    Report(serde_json::Error),
}

impl fmt::Display for CngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "i/o error: {e}"),
            Self::Parse { line, content } => {
                write!(f, "line {line}: expected two vertex ids, found {content:?}")
            }
            Self::InvalidConfig(what) => write!(f, "invalid engine configuration: {what}"),
            Self::UnsortedAdjacency { vertex } => {
                write!(f, "adjacency row of vertex {vertex} is not sorted ascending")
            }
            Self::Report(e) => write!(f, "report serialization failed: {e}"),
        }
    }
}

impl std::error::Error for CngError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Report(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CngError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for CngError {
    fn from(e: serde_json::Error) -> Self {
        Self::Report(e)
    }
}
