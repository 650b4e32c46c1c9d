//! Error types for timing ingestion.

use std::path::PathBuf;

/// Errors raised while building a [`BenchmarkRecord`](crate::BenchmarkRecord)
/// from one timing source.
///
/// Every variant is fatal for the source it was raised on; no partial record
/// is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The leading `# <matrix> <rows> <cols> <nnz>` line is missing, too
    /// short, or has non-numeric dimensions.
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    /// A three-field data row has an unparseable thread count or elapsed time.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow {
        /// 1-based row number within the source.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },
    /// The source contained no `serial` row.
    #[error("no serial baseline row found")]
    MissingSerialBaseline,
}

/// Errors raised while reading and aggregating timing sources.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Aggregation was requested over zero sources.
    #[error("no benchmark sources found")]
    EmptySourceSet,
    /// A source was read but failed to parse.
    #[error("failed to parse {source_name}")]
    Parse {
        /// Name of the failing source (usually its path).
        source_name: String,
        /// Underlying parse failure.
        #[source]
        error: ParseError,
    },
    /// A source file could not be opened.
    #[error("failed to read {}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// A source file is not valid delimited text.
    #[error("failed to read CSV rows from {}", path.display())]
    Csv {
        /// File being read.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },
    /// Directory traversal failed.
    #[error("failed to scan directory")]
    Walk(#[from] walkdir::Error),
}

impl SourceError {
    /// Name of the source that failed to parse, if this is a parse failure.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Self::Parse { source_name, .. } => Some(source_name),
            _ => None,
        }
    }
}
