use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn run_json(args: &[&str], expected_exit_code: i32) -> Value {
    let output = cargo_bin_cmd!("occdox")
        .current_dir(crate_root())
        .args(args)
        .output()
        .expect("run occdox");
    assert_eq!(output.status.code(), Some(expected_exit_code));
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("parse json")
}

#[test]
fn text_format_lists_signatures_and_summary() {
    cargo_bin_cmd!("occdox")
        .current_dir(crate_root())
        .args(["extract", "tests/cases/sample.xml", "--format", "text"])
        .assert()
        .code(0)
        .stdout(contains(
            "io.module copy(CHAN BYTE src?, VAL INT len, CHAN BYTE dst!)",
        ))
        .stdout(contains("mat.module sum(VAL [][]INT grid)"))
        .stdout(contains(
            "status=pass exit_code=0 imports=2 procedures=2 diagnostics=1",
        ));
}

#[test]
fn procs_filters_by_module_name() {
    let result = run_json(
        &[
            "procs",
            "--module",
            "io.module",
            "tests/cases/sample.xml",
            "--format",
            "json",
        ],
        0,
    );
    let imports = result["imports"].as_array().expect("imports array");
    assert_eq!(imports.len(), 1);
    assert_eq!(imports[0]["module_name"], "io.module");
}

#[test]
fn missing_input_reports_io_error() {
    let result = run_json(
        &["extract", "tests/cases/absent.xml", "--format", "json"],
        2,
    );
    assert_eq!(result["status"], "error");
    assert_eq!(result["exit_code"], 2);
    assert_eq!(result["error"]["kind"], "io");
    assert_eq!(result["imports"].as_array().expect("imports").len(), 0);
    assert_eq!(result["inputs"][0]["sha256"], "UNKNOWN");
}

#[test]
fn malformed_input_reports_malformed_error() {
    let result = run_json(
        &["extract", "tests/cases/broken.xml", "--format", "json"],
        2,
    );
    assert_eq!(result["status"], "error");
    assert_eq!(result["error"]["kind"], "malformed");
    assert_eq!(result["imports"].as_array().expect("imports").len(), 0);
}

#[test]
fn output_flag_writes_result_file() {
    let temp = TempDir::new().expect("tmp dir");
    let result_path = temp.path().join("result.json");

    cargo_bin_cmd!("occdox")
        .current_dir(crate_root())
        .args([
            "extract",
            "tests/cases/sample.xml",
            "--format",
            "json",
            "--output",
            result_path.to_str().expect("result path utf8"),
        ])
        .assert()
        .code(0);

    let text = fs::read_to_string(&result_path).expect("read result file");
    let result: Value = serde_json::from_str(&text).expect("parse result json");
    assert_eq!(result["status"], "pass");
    assert_eq!(result["imports"].as_array().expect("imports").len(), 2);
}
