//! Aggregator: many timing sources into an ordered list of records.
//!
//! Sources are parsed independently. The first failing source aborts the
//! whole aggregation so a matrix never silently disappears from a
//! comparison. Directory discovery is sorted by file name, which makes the
//! output order reproducible across platforms.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::SourceError;
use crate::record::BenchmarkRecord;
use crate::source::{load_file, parse_text};

/// File extension of timing sources.
pub const SOURCE_EXTENSION: &str = "csv";

/// Parse named in-memory sources, preserving their order.
pub fn aggregate<I, N, T>(sources: I) -> Result<Vec<BenchmarkRecord>, SourceError>
where
    I: IntoIterator<Item = (N, T)>,
    N: AsRef<str>,
    T: AsRef<str>,
{
    let records = sources
        .into_iter()
        .map(|(name, text)| parse_text(name.as_ref(), text.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    if records.is_empty() {
        return Err(SourceError::EmptySourceSet);
    }
    Ok(records)
}

/// List the timing files directly inside `dir`, sorted by file name.
///
/// Symlinks are resolved, so a linked timing file counts like a regular one.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_source_extension(entry.path()) {
            paths.push(entry.into_path());
        } else {
            debug!(path = %entry.path().display(), "skipping non-source entry");
        }
    }
    Ok(paths)
}

/// Load every timing file in `dir`.
pub fn load_dir(dir: &Path) -> Result<Vec<BenchmarkRecord>, SourceError> {
    let paths = discover(dir)?;
    if paths.is_empty() {
        return Err(SourceError::EmptySourceSet);
    }

    let records = paths
        .iter()
        .map(|path| load_file(path))
        .collect::<Result<Vec<_>, _>>()?;

    info!(dir = %dir.display(), count = records.len(), "aggregated benchmark records");
    Ok(records)
}

/// Load a single timing file, or every timing file in a directory.
pub fn load_path(path: &Path) -> Result<Vec<BenchmarkRecord>, SourceError> {
    if path.is_dir() {
        load_dir(path)
    } else {
        Ok(vec![load_file(path)?])
    }
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}
