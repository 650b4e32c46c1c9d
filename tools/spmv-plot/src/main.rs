//! SpMV benchmark reporting tool.
//!
//! Turns the timing files written by the SpMV benchmark driver into GFLOP/s
//! tables, SVG charts and JSON.
//!
//! Pipeline: load config → read timing files → derive GFLOP/s →
//!           print tables → write charts.

mod cli;
mod config;
mod logging;
mod plot_cmd;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init(logging::Verbosity::from_flags(cli.quiet, cli.verbose))?;
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        cli::Command::Matrix(ref args) => plot_cmd::cmd_matrix(args, &config),
        cli::Command::Compare(ref args) => plot_cmd::cmd_compare(args, &config),
        cli::Command::Export(ref args) => plot_cmd::cmd_export(args),
    }
}
