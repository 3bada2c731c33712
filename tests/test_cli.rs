//! CLI tests driving the built binary
mod common;

use common::{curl2code, TestEnv};
use predicates::prelude::*;

// ============================================================================
// Basic Conversion
// ============================================================================

#[test]
fn test_default_target_is_javascript_fetch() {
    curl2code()
        .arg("curl https://x.test/users")
        .assert()
        .success()
        .stdout(predicate::str::contains("await fetch("))
        .stdout(predicate::str::contains("https://x.test/users"));
}

#[test]
fn test_language_and_framework_flags() {
    curl2code()
        .args(["-l", "python", "-f", "httpx", "curl -X POST -d '{\"a\":1}' https://x.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("import httpx"))
        .stdout(predicate::str::contains("json=payload"));
}

#[test]
fn test_language_flag_defaults_framework() {
    curl2code()
        .args(["-l", "go", "curl https://x.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package main"));
}

#[test]
fn test_command_from_stdin() {
    curl2code()
        .args(["-l", "ruby"])
        .write_stdin("curl -H 'Accept: application/json' \\\n  https://x.test/s\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("require 'net/http'"));
}

#[test]
fn test_dash_reads_stdin() {
    curl2code()
        .args(["-l", "php", "-"])
        .write_stdin("curl https://x.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("curl_init("));
}

#[test]
fn test_no_comments_and_tabs() {
    curl2code()
        .args(["-l", "go", "--no-comments", "--tabs", "curl https://x.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// Example usage").not())
        .stdout(predicate::str::contains("\t"));
}

// ============================================================================
// Failures and Warnings
// ============================================================================

#[test]
fn test_unsupported_language_exits_with_error() {
    curl2code()
        .args(["-l", "cobol", "curl https://x.test"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Unsupported language: cobol"));
}

#[test]
fn test_unsupported_framework_lists_alternatives() {
    curl2code()
        .args(["-l", "rust", "-f", "ureq", "curl https://x.test"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("reqwest"));
}

#[test]
fn test_missing_url() {
    curl2code()
        .arg("curl -X POST")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no URL found"));
}

#[test]
fn test_warnings_go_to_stderr() {
    curl2code()
        .arg("curl -k https://x.test")
        .assert()
        .success()
        .stderr(predicate::str::contains("warning:"));
}

#[test]
fn test_invalid_error_handling_value() {
    curl2code()
        .args(["--error-handling", "loud", "curl https://x.test"])
        .assert()
        .failure();
}

// ============================================================================
// JSON Output
// ============================================================================

#[test]
fn test_json_output() {
    let output = curl2code()
        .args(["--json", "curl -H 'Authorization: Bearer abc' https://x.test"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["request"]["url"], "https://x.test");
    assert_eq!(value["code"]["fileName"], "request.js");
    assert_eq!(value["code"]["envVars"]["BEARER_TOKEN"], "abc");
}

#[test]
fn test_list_languages() {
    curl2code()
        .arg("--list-languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("typescript"))
        .stdout(predicate::str::contains("requests, httpx"));
}

#[test]
fn test_list_languages_json() {
    let output = curl2code().args(["--list-languages", "--json"]).output().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(7));
    assert_eq!(value[0]["id"], "javascript");
}

// ============================================================================
// Batch
// ============================================================================

#[test]
fn test_batch_isolates_failures() {
    let env = TestEnv::new();
    let batch = env.file("commands.txt", "curl -H 'X: y'\n\ncurl https://x.test/ok\n");
    let output = env.cmd().args(["--json", "--batch"]).arg(&batch).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = value.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["success"], false);
    assert_eq!(results[1]["success"], true);
}

#[test]
fn test_batch_text_output_has_headers() {
    let env = TestEnv::new();
    let batch = env.file("commands.txt", "curl https://a.test\ncurl https://b.test\n");
    env.cmd()
        .args(["-l", "python", "--batch"])
        .arg(&batch)
        .assert()
        .success()
        .stdout(predicate::str::contains("==> 1: request.py <=="))
        .stdout(predicate::str::contains("==> 2: request.py <=="));
}

#[test]
fn test_missing_batch_file() {
    curl2code()
        .args(["--batch", "/nonexistent/commands.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read batch file"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_defaults_apply() {
    let env = TestEnv::new().with_config("[defaults]\nlanguage = \"rust\"\nframework = \"reqwest\"\n");
    env.cmd()
        .arg("curl https://x.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("reqwest::"));
}

#[test]
fn test_flags_override_config() {
    let env = TestEnv::new().with_config("[defaults]\nlanguage = \"rust\"\nframework = \"reqwest\"\n");
    env.cmd()
        .args(["-l", "php", "curl https://x.test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<?php"));
}

#[test]
fn test_invalid_config_reported() {
    let env = TestEnv::new().with_config("[defaults\n");
    env.cmd()
        .arg("curl https://x.test")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config TOML"));
}

#[test]
fn test_sample_response_declares_response_data() {
    let env = TestEnv::new();
    let sample = env.file("sample.json", r#"{"id": 1, "name": "x"}"#);
    env.cmd()
        .args(["-l", "typescript", "--sample-response"])
        .arg(&sample)
        .arg("curl https://x.test")
        .assert()
        .success()
        .stdout(predicate::str::contains("ResponseData"));
}
