//! Subcommand implementations.
//!
//! Bridges the `spmv_perf` parsing and rendering modules to the filesystem:
//! input validation, output directory creation and chart file naming.

use std::path::Path;

use anyhow::{Context, Result, bail};
use spmv_perf::{MatrixSeries, chart, output};
use tracing::warn;

use crate::cli::{CompareArgs, ExportArgs, MatrixArgs};
use crate::config::{PlotConfig, validate_threads};

/// File name of the cross-matrix comparison chart.
pub const COMPARISON_CHART: &str = "spmv_gflops_comparison.svg";

/// `spmv-plot matrix`: table plus bar and line charts for one matrix.
pub fn cmd_matrix(args: &MatrixArgs, config: &PlotConfig) -> Result<()> {
    if !args.csv.is_file() {
        bail!("file '{}' not found", args.csv.display());
    }

    let threads = if args.threads.is_empty() {
        config.threads.clone()
    } else {
        validate_threads(&args.threads)?;
        args.threads.clone()
    };

    let record = spmv_perf::load_file(&args.csv)
        .with_context(|| format!("loading {}", args.csv.display()))?;
    let series = MatrixSeries::from_record(&record);

    let recorded = series.thread_counts();
    for &t in threads.iter().filter(|t| !recorded.contains(*t)) {
        warn!(
            matrix = %series.matrix_name,
            threads = t,
            "no scheduled samples, plotting as missing"
        );
    }

    output::print_matrix_table(&series, &threads);

    ensure_dir(&args.outdir)?;
    let opts = config.chart_options();
    let stem = file_stem(&series.matrix_name);

    let bar_path = args.outdir.join(format!("{stem}_bar.svg"));
    write_chart(&bar_path, &chart::matrix_bar_chart(&series, &threads, &opts))?;
    println!("Saved bar chart as: {}", bar_path.display());

    let line_path = args.outdir.join(format!("{stem}_line.svg"));
    write_chart(&line_path, &chart::matrix_line_chart(&series, &threads, &opts))?;
    println!("Saved line chart as: {}", line_path.display());

    Ok(())
}

/// `spmv-plot compare`: every matrix in a directory at one thread count.
pub fn cmd_compare(args: &CompareArgs, config: &PlotConfig) -> Result<()> {
    if !args.input.is_dir() {
        bail!("input folder '{}' does not exist", args.input.display());
    }

    let threads = args.threads.unwrap_or(config.reference_threads);
    if threads == 0 {
        bail!("--threads must be positive");
    }

    let records = spmv_perf::load_dir(&args.input)
        .with_context(|| format!("loading timing files from {}", args.input.display()))?;
    let series: Vec<MatrixSeries> = records.iter().map(MatrixSeries::from_record).collect();

    output::print_comparison_table(&series, threads);

    ensure_dir(&args.output)?;
    let path = args.output.join(COMPARISON_CHART);
    write_chart(
        &path,
        &chart::comparison_chart(&series, threads, &config.chart_options()),
    )?;
    println!("Plot saved as: {}", path.display());

    Ok(())
}

/// `spmv-plot export`: derived series as pretty-printed JSON.
pub fn cmd_export(args: &ExportArgs) -> Result<()> {
    let records = spmv_perf::load_path(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    let series: Vec<MatrixSeries> = records.iter().map(MatrixSeries::from_record).collect();

    let json = serde_json::to_string_pretty(&series).context("serializing series to JSON")?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                ensure_dir(parent)?;
            }
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} matrices to {}", series.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        tracing::info!(dir = %dir.display(), "creating output directory");
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }
    Ok(())
}

fn write_chart(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg).with_context(|| format!("writing chart {}", path.display()))
}

/// Matrix names come from file contents; keep them out of path syntax.
fn file_stem(matrix_name: &str) -> String {
    matrix_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect()
}
