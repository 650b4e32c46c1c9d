//! Record parser: one timing source in, one [`BenchmarkRecord`] out.
//!
//! A source is an ordered sequence of rows, each a list of fields as handed
//! over by a delimited-text reader:
//!
//! ```text
//! # cage14 1505785 1505785 27130349
//! 1,serial,2.1
//! 4,static,0.6
//! 4,nnzbal,0.55
//! ```
//!
//! Row handling is deliberately asymmetric. Comment rows, rows without
//! exactly three fields and rows with an unknown strategy token are skipped.
//! A three-field row whose thread count or elapsed time does not parse
//! aborts the whole source.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::ParseError;
use crate::record::{BenchmarkRecord, MatrixHeader, Strategy};

/// Parse one timing source into a [`BenchmarkRecord`].
///
/// The first non-blank row must be the `# <matrix> <rows> <cols> <nnz>`
/// metadata line. The serial baseline check runs only after every row has
/// been consumed.
pub fn parse_rows<I, R, F>(rows: I) -> Result<BenchmarkRecord, ParseError>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[F]>,
    F: AsRef<str>,
{
    let mut rows = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| (idx + 1, row))
        .filter(|(_, row)| !is_blank(row.as_ref()));

    let (_, first) = rows
        .next()
        .ok_or_else(|| ParseError::MalformedHeader("source is empty".into()))?;
    let header = parse_header(first.as_ref())?;
    let work = header.work_gflop();

    let mut serial_elapsed = None;
    let mut scheduled = BTreeMap::new();

    for (line, row) in rows {
        let fields = row.as_ref();

        if fields
            .first()
            .is_some_and(|f| f.as_ref().trim_start().starts_with('#'))
        {
            debug!(line, "skipping comment row");
            continue;
        }

        let [threads, strategy, elapsed] = fields else {
            debug!(line, fields = fields.len(), "skipping row without 3 fields");
            continue;
        };

        let threads = parse_threads(line, threads.as_ref())?;
        let elapsed = parse_elapsed(line, elapsed.as_ref(), work)?;

        let Some(strategy) = Strategy::from_token(strategy.as_ref()) else {
            debug!(line, token = strategy.as_ref().trim(), "ignoring unknown strategy");
            continue;
        };

        match strategy {
            Strategy::Serial => {
                if let Some(previous) = serial_elapsed.replace(elapsed) {
                    warn!(
                        matrix = %header.name,
                        line,
                        previous,
                        elapsed,
                        "duplicate serial row, keeping the last one"
                    );
                }
            }
            Strategy::Static | Strategy::NnzBalanced => {
                if threads == 0 {
                    return Err(ParseError::MalformedRow {
                        line,
                        reason: "thread count must be positive".into(),
                    });
                }
                if scheduled.insert((strategy, threads), elapsed).is_some() {
                    debug!(line, %strategy, threads, "overwriting earlier sample");
                }
            }
        }
    }

    let serial_elapsed = serial_elapsed.ok_or(ParseError::MissingSerialBaseline)?;

    Ok(BenchmarkRecord::new(header, serial_elapsed, scheduled))
}

/// Parse the `# <matrix> <rows> <cols> <nnz>` metadata line.
///
/// Fields are rejoined before tokenizing so a header split by the field
/// delimiter still parses. The matrix name is the first token; the last
/// three tokens are the dimensions and nonzero count.
fn parse_header<F: AsRef<str>>(fields: &[F]) -> Result<MatrixHeader, ParseError> {
    let joined = fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");

    let body = joined.trim().strip_prefix('#').ok_or_else(|| {
        ParseError::MalformedHeader(format!("expected '#' metadata line, found '{}'", joined.trim()))
    })?;

    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(ParseError::MalformedHeader(format!(
            "expected '# <matrix> <rows> <cols> <nnz>', found {} token(s)",
            tokens.len()
        )));
    }

    let n = tokens.len();
    let rows = parse_dimension("rows", tokens[n - 3])?;
    let cols = parse_dimension("cols", tokens[n - 2])?;
    let nnz = parse_dimension("nnz", tokens[n - 1])?;
    if nnz == 0 {
        return Err(ParseError::MalformedHeader("nnz must be positive".into()));
    }

    Ok(MatrixHeader {
        name: tokens[0].to_string(),
        rows,
        cols,
        nnz,
    })
}

fn parse_dimension(what: &str, token: &str) -> Result<u64, ParseError> {
    token
        .parse()
        .map_err(|e| ParseError::MalformedHeader(format!("invalid {what} '{token}': {e}")))
}

/// Serial rows carry a thread count that is never checked beyond parsing;
/// scheduled rows reject zero in [`parse_rows`].
fn parse_threads(line: usize, field: &str) -> Result<u32, ParseError> {
    let field = field.trim();
    field.parse().map_err(|e| ParseError::MalformedRow {
        line,
        reason: format!("invalid thread count '{field}': {e}"),
    })
}

/// Elapsed seconds, rejected unless `work / elapsed` is a finite GFLOP/s.
fn parse_elapsed(line: usize, field: &str, work: f64) -> Result<f64, ParseError> {
    let field = field.trim();
    let elapsed: f64 = field.parse().map_err(|e| ParseError::MalformedRow {
        line,
        reason: format!("invalid elapsed time '{field}': {e}"),
    })?;
    if !elapsed.is_finite() || elapsed <= 0.0 {
        return Err(ParseError::MalformedRow {
            line,
            reason: format!("elapsed time must be positive and finite, found {elapsed}"),
        });
    }
    if !(work / elapsed).is_finite() {
        return Err(ParseError::MalformedRow {
            line,
            reason: format!("elapsed time {elapsed} is too small to derive a throughput"),
        });
    }
    Ok(elapsed)
}

fn is_blank<F: AsRef<str>>(fields: &[F]) -> bool {
    fields.iter().all(|f| f.as_ref().trim().is_empty())
}
