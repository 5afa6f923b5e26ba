use std::fs;
use std::io::Write;

use cngraph::io::{create_result_file, load_edge_list, output_path_for, write_results};
use cngraph::{AdjacencyGraph, CngError, EngineConfig, Strategy};

fn parse_lines(text: &str) -> Vec<(u32, u32, u32)> {
    let mut rows: Vec<_> = text
        .lines()
        .map(|line| {
            let f: Vec<u32> = line.split(' ').map(|x| x.parse().unwrap()).collect();
            assert_eq!(f.len(), 3, "line {line:?}");
            (f[0], f[1], f[2])
        })
        .collect();
    rows.sort_unstable();
    rows
}

#[test]
fn file_to_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("square.edgelist");
    let mut f = fs::File::create(&input).unwrap();
    // 4-cycle plus one diagonal.
    writeln!(f, "# square").unwrap();
    writeln!(f, "0 1\n1 2\n2 3\n3 0\n0 2").unwrap();
    drop(f);

    let edges = load_edge_list(&input).unwrap();
    let graph = AdjacencyGraph::from_edges(&edges);
    let out = cngraph::run(&graph, &EngineConfig::new(2)).unwrap();

    let output = output_path_for(&input);
    assert_eq!(output.file_name().unwrap(), "square.cng");
    write_results(&output, &out.results).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.ends_with('\n'));
    // 0: [1,2,3] 1: [0,2] 2: [0,1,3] 3: [0,2]
    assert_eq!(
        parse_lines(&text),
        vec![(0, 1, 1), (0, 2, 2), (0, 3, 1), (1, 2, 1), (1, 3, 2), (2, 3, 1)]
    );
}

#[test]
fn round_robin_streams_straight_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("triangle.cng");
    let graph = AdjacencyGraph::from_edges(&[(0, 1), (0, 2), (1, 2)]);

    let mut writer = create_result_file(&output).unwrap();
    let config = EngineConfig::new(4).with_strategy(Strategy::StaticRoundRobin);
    cngraph::run_into(&graph, &config, &mut writer).unwrap();
    writer.finish().unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(parse_lines(&text), vec![(0, 1, 1), (0, 2, 1), (1, 2, 1)]);
}

#[test]
fn malformed_file_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.edgelist");
    fs::write(&input, "0 1\n1 2\nnot an edge\n").unwrap();

    match load_edge_list(&input) {
        Err(CngError::Parse { line, content }) => {
            assert_eq!(line, 3);
            assert_eq!(content, "not an edge");
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn empty_file_gives_empty_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.edgelist");
    fs::write(&input, "").unwrap();

    let graph = AdjacencyGraph::from_edges(&load_edge_list(&input).unwrap());
    let out = cngraph::run(&graph, &EngineConfig::new(3)).unwrap();
    assert!(out.results.is_empty());

    let output = output_path_for(&input);
    write_results(&output, &out.results).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "");
}
