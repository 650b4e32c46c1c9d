//! Terminal output formatting for derived throughput.

use std::fmt::Write as _;

use crate::metrics::{MISSING_THROUGHPUT, MatrixSeries};
use crate::record::Strategy;

/// Format one matrix's throughput and speedup at each thread count.
pub fn format_matrix_table(series: &MatrixSeries, threads: &[u32]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n  Matrix: {} ({} x {}, {} nnz, {:.6} GFLOP per pass)",
        series.matrix_name, series.rows, series.cols, series.nnz, series.work_gflop
    );
    let _ = writeln!(
        out,
        "  {:>8}  {:>12}  {:>12}  {:>12}  {:>9}  {:>9}",
        "Threads", "Serial", "Static", "NNZ-Bal", "Static x", "NNZ-Bal x"
    );
    let _ = writeln!(
        out,
        "  {:->8}  {:->12}  {:->12}  {:->12}  {:->9}  {:->9}",
        "", "", "", "", "", ""
    );

    for &t in threads {
        let view = series.view_at(t);
        let _ = writeln!(
            out,
            "  {:>8}  {:>12}  {:>12}  {:>12}  {:>9}  {:>9}",
            t,
            gflops(view.serial_throughput),
            gflops(view.static_throughput),
            gflops(view.nnz_balanced_throughput),
            speedup(view.speedup(Strategy::Static)),
            speedup(view.speedup(Strategy::NnzBalanced)),
        );
    }

    out
}

/// Format a cross-matrix comparison at one reference thread count.
pub fn format_comparison_table(series: &[MatrixSeries], threads: u32) -> String {
    let mut out = String::new();

    if series.is_empty() {
        out.push_str("  No benchmark records to display.\n");
        return out;
    }

    let max_name = series
        .iter()
        .map(|s| s.matrix_name.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let _ = writeln!(out, "\n  GFLOP/s at {threads} threads:");
    let _ = writeln!(
        out,
        "  {:<width$}  {:>12}  {:>12}  {:>12}",
        "Matrix",
        "Serial",
        "Static",
        "NNZ-Bal",
        width = max_name
    );
    let _ = writeln!(
        out,
        "  {:-<width$}  {:->12}  {:->12}  {:->12}",
        "",
        "",
        "",
        "",
        width = max_name
    );

    for s in series {
        let view = s.view_at(threads);
        let _ = writeln!(
            out,
            "  {:<width$}  {:>12}  {:>12}  {:>12}",
            s.matrix_name,
            gflops(view.serial_throughput),
            gflops(view.static_throughput),
            gflops(view.nnz_balanced_throughput),
            width = max_name
        );
    }

    out
}

/// Print [`format_matrix_table`] to stdout.
pub fn print_matrix_table(series: &MatrixSeries, threads: &[u32]) {
    print!("{}", format_matrix_table(series, threads));
}

/// Print [`format_comparison_table`] to stdout.
pub fn print_comparison_table(series: &[MatrixSeries], threads: u32) {
    print!("{}", format_comparison_table(series, threads));
}

fn gflops(value: f64) -> String {
    if value == MISSING_THROUGHPUT {
        "-".to_string()
    } else {
        format!("{value:.4}")
    }
}

fn speedup(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format!("{value:.2}x")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_text;

    fn series(text: &str) -> MatrixSeries {
        MatrixSeries::from_record(&parse_text("test.csv", text).unwrap())
    }

    #[test]
    fn matrix_table_marks_missing_pairs() {
        let s = series("# m 10 10 1000000\n1,serial,1.0\n2,static,0.5\n");
        let table = format_matrix_table(&s, &[2, 4]);

        assert!(table.contains("Matrix: m (10 x 10, 1000000 nnz"));
        let row2 = table.lines().find(|l| l.trim_start().starts_with("2 ")).unwrap();
        assert!(row2.contains("0.0040"));
        assert!(row2.contains("2.00x"));
        let row4 = table.lines().find(|l| l.trim_start().starts_with("4 ")).unwrap();
        assert!(row4.contains('-'));
    }

    #[test]
    fn comparison_table_lists_every_matrix() {
        let a = series("# alpha 1 1 1000000\n1,serial,1.0\n64,static,0.1\n");
        let b = series("# a_much_longer_name 1 1 1000000\n1,serial,2.0\n64,nnzbal,0.2\n");
        let table = format_comparison_table(&[a, b], 64);

        assert!(table.contains("GFLOP/s at 64 threads"));
        assert!(table.contains("alpha"));
        assert!(table.contains("a_much_longer_name"));
        assert!(table.contains("0.0200"));
    }

    #[test]
    fn comparison_table_empty() {
        assert!(format_comparison_table(&[], 8).contains("No benchmark records"));
    }
}
