//! Configuration loading for spmv-plot.
//!
//! Reads an optional `spmv-plot.toml`. Every key has a default, so a missing
//! default file is not an error; a file named with `--config` must exist.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use spmv_perf::chart::ChartOptions;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "spmv-plot.toml";

/// Smallest accepted chart dimension in pixels.
const MIN_CHART_SIZE: u32 = 200;

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    plot: PlotConfig,
}

/// `[plot]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PlotConfig {
    /// Thread counts shown in per-matrix charts.
    pub threads: Vec<u32>,
    /// Thread count used by the cross-matrix comparison.
    pub reference_threads: u32,
    /// Chart width in pixels.
    pub width: u32,
    /// Chart height in pixels.
    pub height: u32,
    /// Text prepended to chart titles.
    pub title_prefix: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        let chart = ChartOptions::default();
        Self {
            threads: vec![1, 2, 4, 8, 16, 32, 64],
            reference_threads: 64,
            width: chart.width,
            height: chart.height,
            title_prefix: chart.title_prefix,
        }
    }
}

impl PlotConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        validate_threads(&self.threads)?;
        ensure!(self.reference_threads > 0, "reference-threads must be positive");
        ensure!(
            self.width >= MIN_CHART_SIZE && self.height >= MIN_CHART_SIZE,
            "chart size {}x{} is below the {MIN_CHART_SIZE}px minimum",
            self.width,
            self.height
        );
        Ok(())
    }

    /// Canvas settings for chart rendering.
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            title_prefix: self.title_prefix.clone(),
        }
    }
}

/// Thread lists must be non-empty, positive and strictly ascending.
pub fn validate_threads(threads: &[u32]) -> Result<()> {
    ensure!(!threads.is_empty(), "thread list is empty");
    ensure!(threads.iter().all(|&t| t > 0), "thread counts must be positive");
    ensure!(
        threads.windows(2).all(|w| w[0] < w[1]),
        "thread counts must be strictly ascending: {threads:?}"
    );
    Ok(())
}

/// Parse and validate configuration text.
pub fn parse(text: &str) -> Result<PlotConfig> {
    let file: ConfigFile = toml::from_str(text).context("parsing configuration")?;
    file.plot.validate()?;
    Ok(file.plot)
}

/// Load the configuration.
///
/// With `explicit` set, that file must exist. Otherwise
/// [`DEFAULT_CONFIG_FILE`] is used if present, and defaults if not.
pub fn load(explicit: Option<&Path>) -> Result<PlotConfig> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if !default.is_file() {
                tracing::debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                return Ok(PlotConfig::default());
            }
            default
        }
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(parse("").unwrap(), PlotConfig::default());
    }

    #[test]
    fn partial_plot_section() {
        let config = parse("[plot]\nthreads = [1, 4, 16]\nreference-threads = 16\n").unwrap();
        assert_eq!(config.threads, vec![1, 4, 16]);
        assert_eq!(config.reference_threads, 16);
        assert_eq!(config.width, PlotConfig::default().width);
    }

    #[test]
    fn chart_options_follow_config() {
        let config = parse("[plot]\nwidth = 1200\nheight = 600\ntitle-prefix = \"CSR\"\n").unwrap();
        let opts = config.chart_options();
        assert_eq!((opts.width, opts.height), (1200, 600));
        assert_eq!(opts.title_prefix, "CSR");
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(parse("[plot]\ncolour = \"red\"\n").is_err());
        assert!(parse("[render]\n").is_err());
    }

    #[test]
    fn rejects_bad_threads() {
        assert!(parse("[plot]\nthreads = []\n").is_err());
        assert!(parse("[plot]\nthreads = [0, 2]\n").is_err());
        assert!(parse("[plot]\nthreads = [4, 2]\n").is_err());
        assert!(parse("[plot]\nthreads = [2, 2]\n").is_err());
    }

    #[test]
    fn rejects_tiny_charts() {
        assert!(parse("[plot]\nwidth = 50\n").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[plot]\nreference-threads = 8\n").unwrap();
        assert_eq!(load(Some(&path)).unwrap().reference_threads, 8);
    }
}
