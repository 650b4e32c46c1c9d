//! The in-memory performance model for one timing source.

use std::collections::BTreeMap;
use std::fmt;

/// Parallel work-partitioning scheme used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// Single-threaded baseline.
    Serial,
    /// Rows split evenly across threads.
    Static,
    /// Rows split so each thread gets a similar number of nonzeros.
    NnzBalanced,
}

impl Strategy {
    /// Classify a strategy token as written by the benchmark driver.
    ///
    /// The token is trimmed first. Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "serial" => Some(Self::Serial),
            "static" => Some(Self::Static),
            "nnzbal" => Some(Self::NnzBalanced),
            _ => None,
        }
    }

    /// The token the benchmark driver writes for this strategy.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Static => "static",
            Self::NnzBalanced => "nnzbal",
        }
    }

    /// Human-readable label used in tables and chart legends.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Serial => "Serial",
            Self::Static => "Static Scheduling",
            Self::NnzBalanced => "NNZ-Balanced Scheduling",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Matrix metadata from the `# <matrix> <rows> <cols> <nnz>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixHeader {
    /// Matrix identifier.
    pub name: String,
    /// Number of rows.
    pub rows: u64,
    /// Number of columns.
    pub cols: u64,
    /// Number of stored nonzeros. Always positive.
    pub nnz: u64,
}

/// One parsed timing source.
///
/// Built once by [`parse_rows`](crate::parse_rows) and immutable afterwards.
/// Only raw elapsed times are stored; throughput is derived on demand by
/// [`metrics`](crate::metrics).
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    header: MatrixHeader,
    serial_elapsed: f64,
    scheduled_elapsed: BTreeMap<(Strategy, u32), f64>,
}

impl BenchmarkRecord {
    pub(crate) const fn new(
        header: MatrixHeader,
        serial_elapsed: f64,
        scheduled_elapsed: BTreeMap<(Strategy, u32), f64>,
    ) -> Self {
        Self {
            header,
            serial_elapsed,
            scheduled_elapsed,
        }
    }

    /// Matrix metadata.
    pub const fn header(&self) -> &MatrixHeader {
        &self.header
    }

    /// Matrix identifier.
    pub fn matrix_name(&self) -> &str {
        &self.header.name
    }

    /// Number of rows.
    pub const fn row_count(&self) -> u64 {
        self.header.rows
    }

    /// Number of columns.
    pub const fn col_count(&self) -> u64 {
        self.header.cols
    }

    /// Number of stored nonzeros.
    pub const fn nonzero_count(&self) -> u64 {
        self.header.nnz
    }

    /// Elapsed seconds of the serial baseline run.
    pub const fn serial_elapsed(&self) -> f64 {
        self.serial_elapsed
    }

    /// Elapsed seconds for a scheduled run, if one was recorded.
    ///
    /// `Strategy::Serial` returns the baseline regardless of `threads`.
    pub fn elapsed(&self, strategy: Strategy, threads: u32) -> Option<f64> {
        match strategy {
            Strategy::Serial => Some(self.serial_elapsed),
            Strategy::Static | Strategy::NnzBalanced => {
                self.scheduled_elapsed.get(&(strategy, threads)).copied()
            }
        }
    }

    /// All scheduled samples for one strategy, ascending by thread count.
    pub fn scheduled(&self, strategy: Strategy) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.scheduled_elapsed
            .iter()
            .filter(move |((s, _), _)| *s == strategy)
            .map(|(&(_, threads), &elapsed)| (threads, elapsed))
    }

    /// Every thread count that has at least one scheduled sample, ascending.
    pub fn thread_counts(&self) -> Vec<u32> {
        let mut threads: Vec<u32> = self.scheduled_elapsed.keys().map(|&(_, t)| t).collect();
        threads.sort_unstable();
        threads.dedup();
        threads
    }
}
