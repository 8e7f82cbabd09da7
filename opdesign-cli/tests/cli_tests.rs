//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

/// Build command for the opdesign-cli binary (finds it in target/debug when run via cargo test).
fn opdesign_cli() -> Command {
    cargo_bin_cmd!("opdesign-cli")
}

/// Path to opdesign library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("opdesign")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = opdesign_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Op-amp"));
}

#[test]
fn test_cli_version() {
    let mut cmd = opdesign_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_list() {
    let mut cmd = opdesign_cli();

    cmd.arg("list");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Schmitt Trigger"))
        .stdout(predicate::str::contains("schmitt_trigger.tex"));
}

#[test]
fn test_cli_list_turkish() {
    let mut cmd = opdesign_cli();

    cmd.arg("list").arg("--language").arg("tr");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Alçak Geçiren Filtre"))
        .stdout(predicate::str::contains("alcak_geciren_filtre.tex"));
}

#[test]
fn test_cli_match() {
    let mut cmd = opdesign_cli();

    cmd.arg("match").arg("inverting amplifier");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Inverting Amplifier"))
        .stdout(predicate::str::contains("Exact"));
}

#[test]
fn test_cli_match_json() {
    let mut cmd = opdesign_cli();

    cmd.arg("match")
        .arg("schmitt")
        .arg("--strict")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["archetype"]["circuit_type"], "Schmitt Trigger");
    assert_eq!(json["kind"], "substring");
}

#[test]
fn test_cli_match_nothing() {
    let mut cmd = opdesign_cli();

    cmd.arg("match").arg("xyzzy");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No circuit matches"));
}

#[test]
fn test_cli_compute_inverting() {
    let mut cmd = opdesign_cli();

    cmd.arg("compute")
        .arg("Inverting Amplifier")
        .arg("--gain")
        .arg("10");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("100.00 kΩ"))
        .stdout(predicate::str::contains("-10.00"));
}

#[test]
fn test_cli_compute_engineering_notation_json() {
    let mut cmd = opdesign_cli();

    cmd.arg("compute")
        .arg("integrator")
        .arg("--tau")
        .arg("1ms")
        .arg("--format")
        .arg("json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["kind"], "integrator");
    let c = json["values"]["C"]["value"].as_f64().unwrap();
    assert!((c - 1e-7).abs() < 1e-15);
}

#[test]
fn test_cli_compute_negative_gain() {
    let mut cmd = opdesign_cli();

    cmd.arg("compute")
        .arg("summing amplifier")
        .arg("--gain")
        .arg("-2")
        .arg("--gain2")
        .arg("-5");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("5.00 kΩ"))
        .stdout(predicate::str::contains("2.00 kΩ"));
}

#[test]
fn test_cli_compute_domain_error() {
    let mut cmd = opdesign_cli();

    cmd.arg("compute").arg("schmitt trigger").arg("--vut").arg("20");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_cli_compute_bad_number() {
    let mut cmd = opdesign_cli();

    cmd.arg("compute").arg("low-pass filter").arg("--cutoff").arg("fast");
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("fast"));
}

#[test]
fn test_cli_design_writes_document() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = opdesign_cli();

    cmd.arg("design")
        .arg("inverting amplifier")
        .arg("--templates")
        .arg(fixtures_dir().join("templates"))
        .arg("--out")
        .arg(out.path())
        .write_stdin("4\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("40.00 kΩ"))
        .stderr(predicate::str::contains("Desired gain [10]"));

    let document = std::fs::read_to_string(out.path().join("inverting_amplifier.tex")).unwrap();
    assert!(document.contains(r"R_2 = 40.0\\ k\\Ohm"));
    assert!(!document.contains("<<"));
}

#[test]
fn test_cli_design_prompts_for_query_and_defaults() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = opdesign_cli();

    cmd.arg("design")
        .arg("--templates")
        .arg(fixtures_dir().join("templates"))
        .arg("--out")
        .arg(out.path())
        .arg("--format")
        .arg("json")
        .write_stdin("low-pass filter\n\n");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["result"]["targets"]["cutoff_hz"], 1000.0);
    assert!(out.path().join("low-pass_filter.tex").exists());
}

#[test]
fn test_cli_design_missing_template() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = opdesign_cli();

    cmd.arg("design")
        .arg("voltage follower")
        .arg("--templates")
        .arg(fixtures_dir().join("templates"))
        .arg("--out")
        .arg(out.path());
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template not found"))
        .stderr(predicate::str::contains("inverting_amplifier.tex"));
}

#[test]
fn test_cli_design_no_document() {
    let mut cmd = opdesign_cli();

    cmd.arg("design")
        .arg("difference amplifier")
        .arg("--gain")
        .arg("3")
        .arg("--no-document");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("30.00 kΩ"));
}

#[test]
fn test_cli_config_file() {
    let mut cmd = opdesign_cli();

    cmd.arg("compute")
        .arg("Tersleyici Yükselteç")
        .arg("--gain")
        .arg("2")
        .arg("--config")
        .arg(fixtures_dir().join("partial_config.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("4.70 kΩ"))
        .stdout(predicate::str::contains("9.40 kΩ"));
}

#[test]
fn test_cli_custom_catalog() {
    let mut cmd = opdesign_cli();

    cmd.arg("list")
        .arg("--catalog")
        .arg(fixtures_dir().join("near_duplicates.json"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Notch Filter"));
}

#[test]
fn test_cli_design_all_caps_turkish_query() {
    let mut cmd = opdesign_cli();

    cmd.arg("design")
        .arg("TOPLAYICI")
        .arg("--strict")
        .arg("--language")
        .arg("tr")
        .arg("--no-document")
        .write_stdin("\n\n");
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Selected: Toplayıcı"))
        .stdout(predicate::str::contains("1.00 kΩ"));
}
