//! Integration tests for the spmv-plot binary.
//!
//! Each test writes timing files into a temporary directory, runs the binary
//! as a subprocess, and inspects its exit status and output files.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const CAGE14: &str = "# cage14 1505785 1505785 27130349\n\
                      1,serial,2.1\n\
                      4,static,0.6\n\
                      4,nnzbal,0.55\n";

const BCSSTK: &str = "# bcsstk17 10974 10974 428650\n\
                      1,serial,0.0012\n\
                      4,static,0.0004\n\
                      4,nnzbal,0.00035\n";

const MALFORMED: &str = "# broken 10 10 100\n\
                         1,serial,1.0\n\
                         4,static,not-a-number\n";

fn spmv_plot() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_spmv-plot"));
    cmd.arg("--quiet");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("failed to write fixture");
    path
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "spmv-plot failed (exit={:?}):\nstdout:\n{}\nstderr:\n{}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn matrix_writes_bar_and_line_charts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "cage14.csv", CAGE14);
    let outdir = dir.path().join("plots/nested");

    let output = spmv_plot()
        .args(["matrix", "--threads", "1,4,8", "--csv"])
        .arg(&csv)
        .arg("--outdir")
        .arg(&outdir)
        .output()
        .expect("failed to execute spmv-plot matrix");
    assert_success(&output);

    let bar = std::fs::read_to_string(outdir.join("cage14_bar.svg")).unwrap();
    assert!(bar.contains("Matrix: cage14"));
    assert!(outdir.join("cage14_line.svg").is_file());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0.0258"), "serial GFLOP/s missing:\n{stdout}");
    assert!(stdout.contains("0.0904"), "static GFLOP/s missing:\n{stdout}");
}

#[test]
fn matrix_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = spmv_plot()
        .args(["matrix", "--csv"])
        .arg(dir.path().join("absent.csv"))
        .arg("--outdir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.csv"));
}

#[test]
fn matrix_requires_serial_baseline() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write(dir.path(), "noserial.csv", "# m 1 1 10\n4,static,0.1\n");

    let output = spmv_plot()
        .args(["matrix", "--csv"])
        .arg(&csv)
        .arg("--outdir")
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no serial baseline"));
}

#[test]
fn compare_writes_comparison_chart() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("csv");
    std::fs::create_dir(&input).unwrap();
    write(&input, "cage14.csv", CAGE14);
    write(&input, "bcsstk17.csv", BCSSTK);
    let out = dir.path().join("out");

    let output = spmv_plot()
        .args(["compare", "--threads", "4", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();
    assert_success(&output);

    let svg = std::fs::read_to_string(out.join("spmv_gflops_comparison.svg")).unwrap();
    assert!(svg.contains(">cage14</text>"));
    assert!(svg.contains(">bcsstk17</text>"));
    assert!(svg.contains("GFLOP/s - 4 Threads"));
}

#[test]
fn compare_fails_on_malformed_source() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.csv", CAGE14);
    write(dir.path(), "b.csv", MALFORMED);
    write(dir.path(), "c.csv", BCSSTK);
    let out = dir.path().join("out");

    let output = spmv_plot()
        .args(["compare", "--input"])
        .arg(dir.path())
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("b.csv"), "failing source not named:\n{stderr}");
    assert!(!out.join("spmv_gflops_comparison.svg").exists());
}

#[test]
fn compare_rejects_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = spmv_plot()
        .args(["compare", "--input"])
        .arg(dir.path())
        .arg("--output")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no benchmark sources found"));
}

#[test]
fn export_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "cage14.csv", CAGE14);
    let json_path = dir.path().join("report/series.json");

    let output = spmv_plot()
        .args(["export", "--input"])
        .arg(dir.path())
        .arg("-o")
        .arg(&json_path)
        .output()
        .unwrap();
    assert_success(&output);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[0]["matrix_name"], "cage14");
    let static4 = json[0]["static"]["4"].as_f64().unwrap();
    assert!((static4 - 0.090_43).abs() < 1e-4);
}

#[test]
fn config_file_sets_reference_threads() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("csv");
    std::fs::create_dir(&input).unwrap();
    write(&input, "cage14.csv", CAGE14);
    let config = write(dir.path(), "custom.toml", "[plot]\nreference-threads = 4\n");

    let output = spmv_plot()
        .arg("--config")
        .arg(&config)
        .args(["compare", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("out"))
        .output()
        .unwrap();
    assert_success(&output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("GFLOP/s at 4 threads"));
}
