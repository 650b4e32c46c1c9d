//! Diagnostic logging setup.
//!
//! Three levels selected by CLI flags, unless `RUST_LOG` is set:
//! - **Quiet** (`-q`): errors only
//! - **Default** (no flag): per-file load summaries and warnings
//! - **Verbose** (`-v`): skipped rows, unknown strategies, config resolution
//!
//! Logs go to stderr so stdout carries only tables and JSON.

use anyhow::{Result, anyhow};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Default,
    Verbose,
}

impl Verbosity {
    /// Resolve the level from the `-q`/`-v` flags.
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Default
        }
    }

    const fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Default => Level::INFO,
            Self::Verbose => Level::DEBUG,
        }
    }
}

/// Install the global subscriber.
pub fn init(verbosity: Verbosity) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(verbosity.level()).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))
}
