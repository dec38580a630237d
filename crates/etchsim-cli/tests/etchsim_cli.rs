use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn trench(count: usize, depth: f64) -> Vec<[f64; 2]> {
    (0..count)
        .map(|index| {
            let x = index as f64 / (count - 1) as f64 * 2.0 - 1.0;
            [x, -depth * (1.0 - x * x)]
        })
        .collect()
}

fn write_table(dir: &Path) -> std::path::PathBuf {
    let table = json!({
        "2_0.5_3_2_20": {"points": trench(120, 1.0), "depth": 10.0},
        "4_0.5_3_2_20": {"points": trench(120, 2.0), "depth": 20.0},
        "2_1.5_3_2_20": {"points": trench(120, 3.0), "depth": 30.0},
        "4_1.5_3_2_20": {"points": trench(120, 4.0), "depth": 40.0},
    });
    let path = dir.join("etching_db.json");
    fs::write(
        &path,
        serde_json::to_string(&table).expect("table should serialize"),
    )
    .expect("table should be written");
    path
}

fn run_etchsim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_etchsim"))
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("etchsim should launch")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|error| {
        panic!(
            "stdout should be JSON ({}): {}",
            error,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn predict_command_reports_blend_and_writes_svg() {
    let temp = TempDir::new().expect("tempdir should be created");
    let table = write_table(temp.path());
    let svg = temp.path().join("out/profile.svg");

    let output = run_etchsim(&[
        "predict",
        "--table",
        table.to_str().expect("utf8 path"),
        "--ion",
        "3",
        "--neutral",
        "1",
        "--dep-ion",
        "3",
        "--dep-neutral",
        "2",
        "--cycles",
        "20",
        "--svg",
        svg.to_str().expect("utf8 path"),
        "--json",
    ]);

    assert!(
        output.status.success(),
        "predict should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report = stdout_json(&output);
    assert_eq!(report["profileDepth"], json!(35.0));
    assert_eq!(report["pointCount"], json!(390));
    assert_eq!(report["ionWeight"], json!(0.5));
    assert_eq!(report["usedFallback"], json!(false));
    assert_eq!(report["warnings"], json!([]));

    let document = fs::read_to_string(&svg).expect("svg should be written");
    assert_eq!(document.matches("<circle").count(), 390);
}

#[test]
fn predict_command_prints_human_summary_with_warnings() {
    let temp = TempDir::new().expect("tempdir should be created");
    let table = write_table(temp.path());

    let output = run_etchsim(&[
        "predict",
        "--table",
        table.to_str().expect("utf8 path"),
        "--ion",
        "3",
        "--neutral",
        "1",
        "--cycles",
        "70",
    ]);

    assert!(output.status.success(), "missing corners fall back");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Predicted profile depth: 0"), "stdout: {}", stdout);
    assert!(
        stdout.contains("Warning: lookup entry 2_0.5_3_2_70 missing"),
        "stdout: {}",
        stdout
    );
}

#[test]
fn keys_command_lists_sorted_keys() {
    let temp = TempDir::new().expect("tempdir should be created");
    let table = write_table(temp.path());

    let output = run_etchsim(&["keys", "--table", table.to_str().expect("utf8 path")]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "2_0.5_3_2_20\n2_1.5_3_2_20\n4_0.5_3_2_20\n4_1.5_3_2_20\n"
    );
}

#[test]
fn reconstruct_command_renders_smoothed_curve() {
    let temp = TempDir::new().expect("tempdir should be created");
    let points = temp.path().join("points.json");
    fs::write(
        &points,
        serde_json::to_string(&trench(101, 5.0)).expect("points should serialize"),
    )
    .expect("points should be written");
    let svg = temp.path().join("rebuilt.svg");

    let output = run_etchsim(&[
        "reconstruct",
        "--points",
        points.to_str().expect("utf8 path"),
        "--samples",
        "120",
        "--top-k",
        "30",
        "--svg",
        svg.to_str().expect("utf8 path"),
    ]);

    assert!(
        output.status.success(),
        "reconstruct should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let document = fs::read_to_string(&svg).expect("svg should be written");
    assert_eq!(document.matches("<circle").count(), 110);
}

#[test]
fn flux_command_derives_parameters_from_csv() {
    let temp = TempDir::new().expect("tempdir should be created");
    let csv = temp.path().join("flux.csv");
    let samples: Vec<String> = (0..20)
        .map(|index| if index % 2 == 0 { "0" } else { "5000" }.to_string())
        .collect();
    let header: Vec<String> = (0..=20).map(|column| format!("c{}", column)).collect();
    let row = format!("12.5,{}", samples.join(","));
    let content = format!("{}\n{}\n{}\n{}\n{}\n", header.join(","), row, row, row, row);
    fs::write(&csv, content).expect("csv should be written");

    let output = run_etchsim(&[
        "flux",
        "--csv",
        csv.to_str().expect("utf8 path"),
        "--start",
        "0",
        "--end",
        "20",
        "--json",
    ]);

    assert!(
        output.status.success(),
        "flux should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report = stdout_json(&output);
    assert_eq!(report["measuredDepth"], json!(12.5));
    assert_eq!(report["averageIonFlux"], json!(5000.0));
    assert_eq!(report["nCycles"], json!(10));
    assert_eq!(report["sampleCount"], json!(20));
    assert_eq!(report["parameters"]["etchIonFlux"], json!(5.0));
    assert_eq!(report["parameters"]["etchNeuFlux"], json!(0.5));
    assert_eq!(report["parameters"]["depIonFlux"], json!(3.0));
    assert_eq!(report["prediction"], Value::Null);
}

#[test]
fn missing_required_argument_is_a_usage_error() {
    let output = run_etchsim(&["predict", "--ion", "3"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INPUT.CLI_USAGE]"), "stderr: {}", stderr);
    assert!(stderr.contains("FATAL EXIT CODE: 2"), "stderr: {}", stderr);
}

#[test]
fn unreadable_table_maps_to_io_exit_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let missing = temp.path().join("absent.json");

    let output = run_etchsim(&["keys", "--table", missing.to_str().expect("utf8 path")]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[IO.LOOKUP_READ]"), "stderr: {}", stderr);
}

#[test]
fn blend_command_morphs_two_curves() {
    let temp = TempDir::new().expect("tempdir should be created");
    let first = temp.path().join("first.json");
    let second = temp.path().join("second.json");
    fs::write(
        &first,
        serde_json::to_string(&trench(101, 2.0)).expect("points should serialize"),
    )
    .expect("points should be written");
    fs::write(
        &second,
        serde_json::to_string(&trench(80, 6.0)).expect("points should serialize"),
    )
    .expect("points should be written");
    let svg = temp.path().join("blend.svg");

    let output = run_etchsim(&[
        "blend",
        "--first",
        first.to_str().expect("utf8 path"),
        "--second",
        second.to_str().expect("utf8 path"),
        "--weight",
        "0.25",
        "--samples",
        "150",
        "--svg",
        svg.to_str().expect("utf8 path"),
    ]);

    assert!(
        output.status.success(),
        "blend should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let document = fs::read_to_string(&svg).expect("svg should be written");
    assert_eq!(document.matches("<circle").count(), 140);
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("into 140 points"),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn blend_command_rejects_collapsing_smoothing() {
    let temp = TempDir::new().expect("tempdir should be created");
    let points = temp.path().join("points.json");
    fs::write(
        &points,
        serde_json::to_string(&trench(20, 1.0)).expect("points should serialize"),
    )
    .expect("points should be written");
    let path = points.to_str().expect("utf8 path");
    let svg = temp.path().join("blend.svg");

    let output = run_etchsim(&[
        "blend",
        "--first",
        path,
        "--second",
        path,
        "--weight",
        "0.5",
        "--samples",
        "5",
        "--svg",
        svg.to_str().expect("utf8 path"),
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INPUT.SMOOTHING]"), "stderr: {}", stderr);
    assert!(!svg.exists());
}
