//! File-facing adapters around the engine: edge-list input, result output and
//! timing reports.

mod edgelist;
mod report;

pub use edgelist::{load_edge_list, read_edge_list};
pub use report::{write_csv_report, write_json_report, write_summary, TimingReport};

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::engine::{ResultSink, ResultTriple, TripleWriter};
use crate::error::CngError;

/// Extension of result files.
pub const RESULT_EXTENSION: &str = "cng";

/// Derives the result path for an input edge list: `graph.edgelist` becomes
/// `graph.cng`, and `graph` becomes `graph.cng`.
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension(RESULT_EXTENSION)
}

/// Creates `path` and returns a buffered triple writer over it.
///
/// # Errors
///
/// Returns [`CngError::Io`] if the file cannot be created.
pub fn create_result_file(path: &Path) -> Result<TripleWriter<BufWriter<File>>, CngError> {
    Ok(TripleWriter::new(BufWriter::new(File::create(path)?)))
}

/// Writes `results` to `path`, one `a b count` line per triple.
///
/// # Errors
///
/// Returns [`CngError::Io`] on any create or write failure.
pub fn write_results(path: &Path, results: &[ResultTriple]) -> Result<(), CngError> {
    let mut writer = create_result_file(path)?;
    writer.accept(results)?;
    writer.finish()?;
    Ok(())
}
