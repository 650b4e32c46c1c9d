//! Delimited-text I/O: turns timing files into rows for [`parse_rows`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::error::SourceError;
use crate::parse::parse_rows;
use crate::record::BenchmarkRecord;

/// Read all rows of a comma-separated source.
///
/// Rows may have differing field counts; the metadata line is a single
/// field.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_owned).collect()))
        .collect()
}

/// Parse an in-memory source. `name` identifies it in errors.
pub fn parse_text(name: &str, text: &str) -> Result<BenchmarkRecord, SourceError> {
    let rows = read_rows(text.as_bytes()).map_err(|source| SourceError::Csv {
        path: name.into(),
        source,
    })?;
    parse_rows(rows).map_err(|error| SourceError::Parse {
        source_name: name.to_string(),
        error,
    })
}

/// Read and parse one timing file.
pub fn load_file(path: &Path) -> Result<BenchmarkRecord, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file).map_err(|source| SourceError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let record = parse_rows(rows).map_err(|error| SourceError::Parse {
        source_name: path.display().to_string(),
        error,
    })?;

    info!(
        path = %path.display(),
        matrix = record.matrix_name(),
        nnz = record.nonzero_count(),
        threads = record.thread_counts().len(),
        "loaded benchmark record"
    );
    Ok(record)
}
