use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use lby_core::{HeaderFields, LbyBuilder};
use tempfile::TempDir;

// ===========================================================================
// Helpers
// ===========================================================================

fn lby() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lby"))
}

fn fields(day: u8) -> HeaderFields {
    HeaderFields {
        minute: 0,
        hour: 12,
        day,
        month: 9,
        year: 2025,
    }
}

/// Три записи за 10 и 20 сентября плюс посторонний файл.
fn seed_input(dir: &Path) {
    for (name, day) in [("HC0001.LBY", 10), ("HC0002.LBY", 10), ("HC0003.LBY", 20)] {
        fs::write(dir.join(name), LbyBuilder::new().timestamp(fields(day)).ramp(40).build()).unwrap();
    }
    fs::write(dir.join("readme.txt"), b"not a recording").unwrap();
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn convert(
    input: &Path,
    output: &Path,
    extra: &[&str],
) -> Output {
    lby()
        .arg("-q")
        .arg("convert")
        .arg("-i")
        .arg(input)
        .arg("-o")
        .arg(output)
        .args(extra)
        .output()
        .unwrap()
}

// ===========================================================================
// convert
// ===========================================================================

#[test]
fn test_convert_all_to_csv() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    seed_input(input.path());

    let out = convert(input.path(), output.path(), &["--all"]);
    assert!(out.status.success(), "{out:?}");
    assert!(stdout(&out).contains("Processed 3 files, 0 errors."));

    let csv = fs::read_to_string(output.path().join("HC0003.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("time_s,force_kN"));
    assert_eq!(lines.next(), Some("0.0,0.0"));
    assert_eq!(csv.lines().count(), 1 + 50);
}

#[test]
fn test_convert_json_selected_dates() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    seed_input(input.path());

    // диапазон покрывает 10 сентября в любом часовом поясе хоста
    let out = convert(
        input.path(),
        output.path(),
        &["--json", "--dates", "2025-09-11..2025-09-09"],
    );
    assert!(out.status.success(), "{out:?}");

    let doc: serde_json::Value =
        serde_json::from_slice(&fs::read(output.path().join("HC0001.json")).unwrap()).unwrap();
    let values = doc["values"].as_array().unwrap();
    assert_eq!(values.len(), 50);
    assert_eq!(values[1]["time_s"], 0.5);
    assert!(!output.path().join("HC0003.json").exists());
}

#[test]
fn test_convert_dry_run_and_skip() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let out_dir: PathBuf = output.path().join("csv");
    seed_input(input.path());

    let out = convert(input.path(), &out_dir, &["--all", "--dry-run"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Dry run complete. Would process 3 files, 0 errors."));
    assert!(!out_dir.exists());

    let out = convert(input.path(), &out_dir, &["--all"]);
    assert!(out.status.success());

    fs::write(out_dir.join("HC0001.csv"), "keep").unwrap();
    let out = convert(input.path(), &out_dir, &["--all"]);
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(out_dir.join("HC0001.csv")).unwrap(), "keep");

    let out = convert(input.path(), &out_dir, &["--all", "--force", "--jobs", "1"]);
    assert!(out.status.success());
    assert_ne!(fs::read_to_string(out_dir.join("HC0001.csv")).unwrap(), "keep");
}

#[test]
fn test_convert_missing_input_fails() {
    let output = TempDir::new().unwrap();
    let missing = output.path().join("absent");

    let out = convert(&missing, output.path(), &["--all"]);
    assert!(!out.status.success());
}

#[test]
fn test_convert_unknown_dates_fail() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    seed_input(input.path());

    let out = convert(input.path(), output.path(), &["--dates", "2030-01-01"]);
    assert!(!out.status.success());

    let out = convert(input.path(), output.path(), &["--dates", "not-a-date"]);
    assert!(!out.status.success());
}

// ===========================================================================
// stage
// ===========================================================================

#[test]
fn test_stage_creates_canonical_links() {
    let root = TempDir::new().unwrap();
    let intake = root.path().join("_Intake");
    let day = intake.join("2025-09-10_import");
    fs::create_dir_all(&day).unwrap();
    seed_input(&day);
    fs::write(day.join("IMG_0001.MOV"), b"movie").unwrap();

    let out = lby()
        .args(["-q", "stage", "2025-09-10", "--intake-dir"])
        .arg(&intake)
        .output()
        .unwrap();
    assert!(out.status.success(), "{out:?}");
    assert!(stdout(&out).contains("Processed 3 files, 0 errors."));

    let mut staged: Vec<String> = fs::read_dir(root.path().join("_StagedUTC"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    staged.sort();

    assert_eq!(staged.len(), 3);
    assert!(staged.iter().all(|n| n.contains("__HCV5S__HC000") && n.ends_with(".lby")));
    assert!(staged[0].ends_with("__HC0001.lby"));
}

#[test]
fn test_stage_missing_day_fails() {
    let root = TempDir::new().unwrap();

    let out = lby()
        .args(["-q", "stage", "--date", "2025-09-10", "--intake-dir"])
        .arg(root.path().join("_Intake"))
        .output()
        .unwrap();
    assert!(!out.status.success());
}
