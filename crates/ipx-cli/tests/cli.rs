use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const POLICY_DUMP: &str = r#"{
  "pages": [
    {"text": "MOTOR INSURANCE POLICY\nPolicy No: MOT/2024/001234\n\nTotal Amount Due: 16,700.00"},
    {"tables": [[["Description", "Amount"], ["Net Own Damage Premium", "12,500.00"]]]}
  ]
}"#;

fn write_dump(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, POLICY_DUMP).unwrap();
    path
}

fn ipx() -> Command {
    Command::cargo_bin("ipx").unwrap()
}

fn process(path: &Path, format: &str) -> Command {
    let mut cmd = ipx();
    cmd.arg("process").arg(path).args(["--format", format]);
    cmd
}

#[test]
fn test_missing_input_fails() {
    ipx()
        .args(["process", "/nonexistent/policy.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input file not found"));
}

#[test]
fn test_text_listing_is_sorted() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");

    let output = process(&path, "text").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();

    assert!(stdout.contains("Document: policy.json"));
    assert!(stdout.contains("Document Type: auto_insurance"));

    let own_damage = stdout.find("OWN DAMAGE PREMIUM:").unwrap();
    let policy = stdout.find("POLICY NUMBER:").unwrap();
    let total = stdout.find("TOTAL PREMIUM:").unwrap();
    assert!(own_damage < policy && policy < total);
    assert!(stdout.contains("Table 1 (Page 2): financial_data"));
}

#[test]
fn test_json_output_has_four_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");

    let output = process(&path, "json").assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys.len(), 4);
    for key in ["document_metadata", "fields", "tables_extracted", "warnings"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["fields"]["total_premium"]["value"], 16700.0);
    assert_eq!(json["fields"]["own_damage_premium"]["confidence"], 0.89);
    assert_eq!(json["document_metadata"]["pages"], 2);
}

#[test]
fn test_csv_output() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");

    process(&path, "csv")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("field,value,confidence,page\n"))
        .stdout(predicate::str::contains("own_damage_premium,12500,0.89,2"))
        .stdout(predicate::str::contains("policy_number,MOT/2024/001234,"));
}

#[test]
fn test_field_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");

    process(&path, "csv")
        .args(["--field", "total_premium"])
        .assert()
        .success()
        .stdout(predicate::str::contains("total_premium,16700,"))
        .stdout(predicate::str::contains("policy_number").not());
}

#[test]
fn test_unknown_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");

    process(&path, "csv")
        .args(["--field", "shoe_size"])
        .assert()
        .failure();
}

#[test]
fn test_unreadable_pdf_reports_warning() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    fs::write(&path, "not a pdf").unwrap();

    process(&path, "text")
        .assert()
        .success()
        .stdout(predicate::str::contains("Document Type: unknown"))
        .stdout(predicate::str::contains("Error processing PDF"));
}

#[test]
fn test_output_file() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");
    let out = dir.path().join("out.json");

    process(&path, "json")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(json["document_metadata"]["filename"], "policy.json");
}

#[test]
fn test_explicit_config_is_used() {
    let dir = TempDir::new().unwrap();
    let path = write_dump(&dir, "policy.json");
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"pdf": {"max_pages": 1}}"#).unwrap();

    let output = process(&path, "json")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(json["document_metadata"]["pages"], 1);
    assert!(json["fields"].get("own_damage_premium").is_none());
}

#[test]
fn test_batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    write_dump(&dir, "a.json");
    write_dump(&dir, "b.json");
    let out_dir = dir.path().join("out");
    let pattern = format!("{}/*.json", dir.path().display());

    ipx()
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 successful, 0 failed"));

    assert!(out_dir.join("a_extracted.json").exists());
    assert!(out_dir.join("b_extracted.json").exists());

    let summary = fs::read_to_string(out_dir.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("a.json,success,auto_insurance,2,"));
}

#[test]
fn test_batch_into_input_directory_keeps_inputs() {
    let dir = TempDir::new().unwrap();
    let input = write_dump(&dir, "a.json");
    let pattern = format!("{}/*.json", dir.path().display());

    ipx()
        .args(["batch", &pattern, "--output-dir"])
        .arg(dir.path())
        .assert()
        .success();

    assert_eq!(fs::read_to_string(input).unwrap(), POLICY_DUMP);
    assert!(dir.path().join("a_extracted.json").exists());
}

#[test]
fn test_batch_refuses_colliding_outputs() {
    let dir = TempDir::new().unwrap();
    write_dump(&dir, "a.json");
    fs::write(dir.path().join("a.pdf"), "not a pdf").unwrap();
    let pattern = format!("{}/a.*", dir.path().display());

    ipx()
        .args(["batch", &pattern, "--output-dir"])
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("would both write"));
}

#[test]
fn test_batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/*.pdf", dir.path().display());

    ipx()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files found"));
}

#[test]
fn test_config_set_and_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("ipx.json");

    ipx()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "extraction.gst_noise_floor", "100"])
        .assert()
        .success();

    ipx()
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "extraction.gst_noise_floor"])
        .assert()
        .success()
        .stdout("100.0\n");

    ipx()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "pdf.max_pages", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for pdf.max_pages"));
}
