//! HAR captures as CLI input
mod common;

use common::{curl2code, TestEnv};
use predicates::prelude::*;

const CHROME_HAR: &str = r#"{
  "log": {
    "version": "1.2",
    "creator": {"name": "WebInspector", "version": "537.36"},
    "entries": [
      {
        "startedDateTime": "2024-03-01T10:00:00.000Z",
        "time": 42.1,
        "request": {
          "method": "POST",
          "url": "https://api.example.com/v1/orders?draft=true",
          "httpVersion": "http/2.0",
          "headers": [
            {"name": ":method", "value": "POST"},
            {"name": ":authority", "value": "api.example.com"},
            {"name": "content-type", "value": "application/json"},
            {"name": "content-length", "value": "27"},
            {"name": "x-api-key", "value": "sk_live_123"}
          ],
          "queryString": [{"name": "draft", "value": "true"}],
          "cookies": [],
          "headersSize": -1,
          "bodySize": 27,
          "postData": {"mimeType": "application/json", "text": "{\"item\":\"book\",\"qty\":2}"}
        },
        "response": {"status": 201, "statusText": "Created", "httpVersion": "http/2.0",
                     "headers": [], "content": {"size": 0, "mimeType": "application/json"}},
        "timings": {"send": 0, "wait": 40, "receive": 2}
      },
      {
        "request": {"method": "GET", "url": "https://api.example.com/v1/other", "headers": []}
      }
    ]
  }
}"#;

#[test]
fn test_har_on_stdin_converts_first_entry() {
    curl2code()
        .args(["-l", "python", "-f", "requests"])
        .write_stdin(CHROME_HAR)
        .assert()
        .success()
        .stdout(predicate::str::contains("requests.post("))
        .stdout(predicate::str::contains("https://api.example.com/v1/orders"))
        .stdout(predicate::str::contains("v1/other").not())
        .stdout(predicate::str::contains(":authority").not());
}

#[test]
fn test_har_json_output_carries_request() {
    let output = curl2code()
        .args(["--json", "-l", "go"])
        .write_stdin(CHROME_HAR)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["request"]["method"], "POST");
    assert_eq!(value["request"]["queryParams"]["draft"], "true");
    assert_eq!(value["request"]["body"]["type"], "json");
    assert!(value["request"]["headers"].get("content-length").is_none());
    assert!(value["code"]["envVars"].get("X_API_KEY").is_some());
}

#[test]
fn test_har_file_as_argument() {
    let env = TestEnv::new();
    let path = env.file("capture.har", CHROME_HAR);
    let text = std::fs::read_to_string(&path).unwrap();
    env.cmd()
        .args(["-l", "rust"])
        .arg(text)
        .assert()
        .success()
        .stdout(predicate::str::contains("reqwest"));
}

#[test]
fn test_broken_har_is_reported() {
    curl2code()
        .write_stdin(r#"{"log": {"entries": [{"request": {"method": "GET", "url": "#)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"));
}
