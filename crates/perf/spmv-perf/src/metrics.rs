//! Metric deriver: GFLOP/s throughput from raw elapsed times.
//!
//! One SpMV pass performs two floating-point operations per stored nonzero,
//! so the work of a run is `2 * nnz / 1e9` GFLOP and its throughput is that
//! work divided by the elapsed seconds. Nothing here is cached or written
//! back to the record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::{BenchmarkRecord, MatrixHeader, Strategy};

/// Floating-point operations per nonzero in one SpMV pass.
pub const FLOPS_PER_NONZERO: f64 = 2.0;

/// Throughput reported for a (strategy, thread count) pair with no sample.
pub const MISSING_THROUGHPUT: f64 = 0.0;

impl MatrixHeader {
    /// Work of one SpMV pass over this matrix in GFLOP.
    pub fn work_gflop(&self) -> f64 {
        FLOPS_PER_NONZERO * self.nnz as f64 / 1e9
    }
}

impl BenchmarkRecord {
    /// Work of one SpMV pass in GFLOP.
    pub fn work_constant(&self) -> f64 {
        self.header().work_gflop()
    }

    /// Throughput of the serial baseline in GFLOP/s.
    pub fn serial_throughput(&self) -> f64 {
        self.work_constant() / self.serial_elapsed()
    }

    /// Throughput of one run in GFLOP/s, or [`MISSING_THROUGHPUT`] when no
    /// sample exists for the pair.
    pub fn throughput_at(&self, strategy: Strategy, threads: u32) -> f64 {
        self.elapsed(strategy, threads)
            .map_or(MISSING_THROUGHPUT, |elapsed| self.work_constant() / elapsed)
    }

    /// Thread count → GFLOP/s for every recorded sample of one strategy.
    pub fn throughput_series(&self, strategy: Strategy) -> BTreeMap<u32, f64> {
        let work = self.work_constant();
        self.scheduled(strategy)
            .map(|(threads, elapsed)| (threads, work / elapsed))
            .collect()
    }

    /// Snapshot of all three strategies at one thread count.
    pub fn view_at(&self, threads: u32) -> MetricView {
        MetricView {
            threads,
            serial_throughput: self.serial_throughput(),
            static_throughput: self.throughput_at(Strategy::Static, threads),
            nnz_balanced_throughput: self.throughput_at(Strategy::NnzBalanced, threads),
        }
    }
}

/// Derived throughput of one record at one thread count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricView {
    /// Thread count the view was taken at.
    pub threads: u32,
    /// Serial baseline GFLOP/s.
    pub serial_throughput: f64,
    /// Static scheduling GFLOP/s, or [`MISSING_THROUGHPUT`].
    pub static_throughput: f64,
    /// NNZ-balanced scheduling GFLOP/s, or [`MISSING_THROUGHPUT`].
    pub nnz_balanced_throughput: f64,
}

impl MetricView {
    /// Throughput for one strategy.
    pub const fn get(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Serial => self.serial_throughput,
            Strategy::Static => self.static_throughput,
            Strategy::NnzBalanced => self.nnz_balanced_throughput,
        }
    }

    /// Speedup of a strategy over the serial baseline.
    ///
    /// Missing samples report a speedup of 0.
    pub fn speedup(&self, strategy: Strategy) -> f64 {
        let value = self.get(strategy);
        if value == MISSING_THROUGHPUT || self.serial_throughput <= 0.0 {
            return 0.0;
        }
        value / self.serial_throughput
    }
}

/// Per-matrix throughput handed to presentation code and JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSeries {
    /// Matrix identifier.
    pub matrix_name: String,
    /// Number of rows.
    pub rows: u64,
    /// Number of columns.
    pub cols: u64,
    /// Number of stored nonzeros.
    pub nnz: u64,
    /// Work of one SpMV pass in GFLOP.
    pub work_gflop: f64,
    /// Serial baseline GFLOP/s.
    pub serial_throughput: f64,
    /// Thread count → GFLOP/s under static scheduling.
    #[serde(rename = "static")]
    pub static_throughput: BTreeMap<u32, f64>,
    /// Thread count → GFLOP/s under nnz-balanced scheduling.
    #[serde(rename = "nnzbal")]
    pub nnz_balanced_throughput: BTreeMap<u32, f64>,
}

impl MatrixSeries {
    /// Derive the series for one record.
    pub fn from_record(record: &BenchmarkRecord) -> Self {
        Self {
            matrix_name: record.matrix_name().to_string(),
            rows: record.row_count(),
            cols: record.col_count(),
            nnz: record.nonzero_count(),
            work_gflop: record.work_constant(),
            serial_throughput: record.serial_throughput(),
            static_throughput: record.throughput_series(Strategy::Static),
            nnz_balanced_throughput: record.throughput_series(Strategy::NnzBalanced),
        }
    }

    /// GFLOP/s for a strategy at a thread count, or [`MISSING_THROUGHPUT`].
    ///
    /// The serial series is flat: every thread count reports the baseline.
    pub fn at(&self, strategy: Strategy, threads: u32) -> f64 {
        let series = match strategy {
            Strategy::Serial => return self.serial_throughput,
            Strategy::Static => &self.static_throughput,
            Strategy::NnzBalanced => &self.nnz_balanced_throughput,
        };
        series.get(&threads).copied().unwrap_or(MISSING_THROUGHPUT)
    }

    /// Snapshot of all three strategies at one thread count.
    pub fn view_at(&self, threads: u32) -> MetricView {
        MetricView {
            threads,
            serial_throughput: self.serial_throughput,
            static_throughput: self.at(Strategy::Static, threads),
            nnz_balanced_throughput: self.at(Strategy::NnzBalanced, threads),
        }
    }

    /// Every thread count with at least one scheduled sample, ascending.
    pub fn thread_counts(&self) -> Vec<u32> {
        let mut threads: Vec<u32> = self
            .static_throughput
            .keys()
            .chain(self.nnz_balanced_throughput.keys())
            .copied()
            .collect();
        threads.sort_unstable();
        threads.dedup();
        threads
    }
}
