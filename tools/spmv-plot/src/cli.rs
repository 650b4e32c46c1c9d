//! Command-line interface definitions for spmv-plot.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SpMV benchmark reporting tool.
#[derive(Parser)]
#[command(name = "spmv-plot", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./spmv-plot.toml if present).
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Only print errors and results.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log skipped rows and other parsing diagnostics.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Report one matrix: GFLOP/s per thread count as bar and line charts.
    Matrix(MatrixArgs),
    /// Compare every matrix in a directory at one thread count.
    Compare(CompareArgs),
    /// Export derived GFLOP/s as JSON.
    Export(ExportArgs),
}

/// Arguments for the `matrix` subcommand.
#[derive(Parser)]
pub struct MatrixArgs {
    /// Input timing file.
    #[arg(long)]
    pub csv: PathBuf,

    /// Output directory for the charts (created if missing).
    #[arg(long)]
    pub outdir: PathBuf,

    /// Thread counts to plot, comma separated (overrides the config file).
    #[arg(long, value_delimiter = ',')]
    pub threads: Vec<u32>,
}

/// Arguments for the `compare` subcommand.
#[derive(Parser)]
pub struct CompareArgs {
    /// Directory containing timing files.
    #[arg(long)]
    pub input: PathBuf,

    /// Output directory for the chart (created if missing).
    #[arg(long)]
    pub output: PathBuf,

    /// Thread count used to extract GFLOP/s (overrides the config file).
    #[arg(long)]
    pub threads: Option<u32>,
}

/// Arguments for the `export` subcommand.
#[derive(Parser)]
pub struct ExportArgs {
    /// Timing file or directory of timing files.
    #[arg(long)]
    pub input: PathBuf,

    /// Output JSON file (default: stdout).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
