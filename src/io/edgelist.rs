//! Whitespace-separated edge-list parsing.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::CngError;
use crate::graph::Vertex;

/// Reads `u v` pairs, one per line.
///
/// Blank lines and lines starting with `#` or `%` are skipped. Every other
/// line must hold exactly two non-negative integers; anything else is a fatal
/// [`CngError::Parse`].
///
/// # Errors
///
/// Returns [`CngError::Io`] if reading fails, or [`CngError::Parse`] for the
/// first malformed line.
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<Vec<(Vertex, Vertex)>, CngError> {
    let mut edges = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }
        let edge = parse_edge(trimmed).ok_or_else(|| CngError::Parse {
            line: idx + 1,
            content: trimmed.to_string(),
        })?;
        edges.push(edge);
    }
    Ok(edges)
}

/// Opens `path` and reads it with [`read_edge_list`].
///
/// # Errors
///
/// See [`read_edge_list`]; a missing file is [`CngError::Io`].
pub fn load_edge_list(path: &Path) -> Result<Vec<(Vertex, Vertex)>, CngError> {
    read_edge_list(BufReader::new(File::open(path)?))
}

fn parse_edge(line: &str) -> Option<(Vertex, Vertex)> {
    let mut fields = line.split_whitespace();
    let u = fields.next()?.parse().ok()?;
    let v = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((u, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_pairs_and_skips_comments() {
        let text = "# web graph\n0 1\n\n  2\t3  \n% another comment\n10 4\n";
        let edges = read_edge_list(text.as_bytes()).unwrap();
        assert_eq!(edges, vec![(0, 1), (2, 3), (10, 4)]);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert!(read_edge_list("".as_bytes()).unwrap().is_empty());
        assert!(read_edge_list("\n# only a comment\n".as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_fatal() {
        for (text, bad_line) in [
            ("0 1\n1 x\n", 2),
            ("0\n", 1),
            ("0 1\n2 3 4\n", 2),
            ("-1 2\n", 1),
            ("0 1\n\n5000000000 1\n", 3),
        ] {
            match read_edge_list(text.as_bytes()) {
                Err(CngError::Parse { line, .. }) => assert_eq!(line, bad_line, "{text:?}"),
                other => panic!("expected parse error for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_edge_list(Path::new("/definitely/not/here.edgelist")).unwrap_err();
        assert!(matches!(err, CngError::Io(_)));
    }
}
