//! SpMV benchmark timing analysis.
//!
//! Ingests the per-matrix timing files written by the SpMV benchmark driver
//! (`# <matrix> <rows> <cols> <nnz>` followed by `threads,strategy,seconds`
//! rows), validates them into [`BenchmarkRecord`]s, derives GFLOP/s
//! throughput on demand, and renders terminal tables and SVG charts.
//!
//! Pipeline: source rows → [`parse`] → [`BenchmarkRecord`] → [`metrics`]
//!           → [`aggregate`](mod@aggregate) (directories) → [`output`] / [`chart`].

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod metrics;
pub mod output;
pub mod parse;
pub mod record;
pub mod source;

pub use aggregate::{aggregate, load_dir, load_path};
pub use error::{ParseError, SourceError};
pub use metrics::{MISSING_THROUGHPUT, MatrixSeries, MetricView};
pub use parse::parse_rows;
pub use record::{BenchmarkRecord, MatrixHeader, Strategy};
pub use source::{load_file, parse_text};
