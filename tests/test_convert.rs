//! Library-level conversion properties

use curl2code::codegen::LANGUAGES;
use curl2code::models::{Body, DataType, HttpMethod};
use curl2code::{batch_convert, convert, detect_and_normalize, GenerationOptions};

fn options(language: &str, framework: &str) -> GenerationOptions {
    GenerationOptions::new(language, framework)
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_single_url_always_parses() {
    for cmd in [
        "curl https://x.test",
        "curl -s -L 'https://x.test/a?b=1'",
        "curl x.test/path",
        "curl -X DELETE http://localhost:8080/items/1",
    ] {
        let result = convert(cmd, &options("javascript", "fetch"));
        assert!(result.success, "{}: {:?}", cmd, result.error);
        assert!(!result.request.unwrap().url.is_empty());
    }
}

#[test]
fn test_quoted_header_is_not_split() {
    let request = convert(r#"curl -H "X-Test: a b" https://x.test"#, &options("python", "requests"))
        .request
        .unwrap();
    assert_eq!(request.headers.len(), 1);
    assert_eq!(request.header("X-Test"), Some("a b"));
}

#[test]
fn test_data_promotes_to_post_json() {
    let request = convert(r#"curl -d '{"a":1}' https://x.test"#, &options("go", "net/http"))
        .request
        .unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.data_type(), Some(DataType::Json));
}

#[test]
fn test_multipart_file_detection() {
    let request = convert(r#"curl -F "file=@photo.png" https://x.test"#, &options("ruby", "net/http"))
        .request
        .unwrap();
    assert!(request.is_multipart());
    assert_eq!(request.files.len(), 1);
    assert_eq!(request.files[0].file_name, "photo.png");
    assert!(matches!(request.body, Some(Body::Multipart(_))));
}

// ============================================================================
// Generation
// ============================================================================

#[test]
fn test_typed_targets_declare_request_body() {
    let cmd = r#"curl -X POST -H 'Content-Type: application/json' -d '{"name":"a","age":3}' https://x.test/users"#;
    for (language, framework) in [
        ("typescript", "fetch"),
        ("typescript", "axios"),
        ("go", "net/http"),
        ("rust", "reqwest"),
    ] {
        let code = convert(cmd, &options(language, framework)).code.unwrap();
        let types = code.types.unwrap_or_default();
        assert!(types.contains("RequestBody"), "{}/{}", language, framework);
    }
}

#[test]
fn test_conversion_is_idempotent() {
    let cmd = r#"curl -u me:pw -H 'X-Api-Key: k1' -d 'a=1&b=2' https://x.test/form"#;
    for info in LANGUAGES {
        for framework in info.frameworks {
            let opts = options(info.id, framework);
            let first = convert(cmd, &opts).code.unwrap().code;
            let second = convert(cmd, &opts).code.unwrap().code;
            assert_eq!(first, second, "{}/{}", info.id, framework);
        }
    }
}

#[test]
fn test_bearer_token_is_extracted() {
    let result = convert("curl -H 'Authorization: Bearer abc123' https://x.test", &options("javascript", "fetch"));
    let code = result.code.unwrap();
    assert_eq!(code.env_vars.get("BEARER_TOKEN").map(String::as_str), Some("abc123"));
    assert!(code.code.contains("process.env.BEARER_TOKEN"));
    assert!(!code.code.contains("abc123"));
}

#[test]
fn test_bearer_token_stays_inline_without_extraction() {
    let opts = GenerationOptions { extract_env_vars: false, ..options("python", "requests") };
    let code = convert("curl -H 'Authorization: Bearer abc123' https://x.test", &opts).code.unwrap();
    assert!(code.env_vars.is_empty());
    assert!(code.code.contains("Bearer abc123"));
}

#[test]
fn test_every_registered_target_generates() {
    let cmd = r#"curl -X PUT -H 'Accept: application/json' -d '{"ok":true}' 'https://x.test/items/1?v=2'"#;
    for info in LANGUAGES {
        for framework in info.frameworks {
            let result = convert(cmd, &options(info.id, framework));
            assert!(result.success, "{}/{}: {:?}", info.id, framework, result.error);
            let code = result.code.unwrap();
            assert!(code.code.contains("x.test"));
            assert_eq!(code.extension, info.extension);
        }
    }
}

#[test]
fn test_indentation_options() {
    let opts = GenerationOptions {
        indent_type: curl2code::models::IndentType::Tabs,
        ..options("javascript", "axios")
    };
    let code = convert("curl https://x.test", &opts).code.unwrap().code;
    assert!(code.lines().any(|l| l.starts_with('\t')));
    assert!(!code.lines().any(|l| l.starts_with("  ")));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_unsupported_language_is_a_result() {
    let result = convert("curl https://x.test", &options("cobol", "any"));
    assert!(!result.success);
    assert!(result.code.is_none());
    assert!(result.error.unwrap().contains("Unsupported language: cobol"));
}

#[test]
fn test_unsupported_framework_keeps_parsed_request() {
    let result = convert("curl -X PUT https://x.test/a", &options("python", "urllib"));
    assert!(!result.success);
    assert!(result.code.is_none());
    assert_eq!(result.request.map(|r| r.method), Some(HttpMethod::Put));
}

#[test]
fn test_generation_fault_is_a_result() {
    let opts = GenerationOptions { indent_size: 0, ..options("python", "requests") };
    let result = convert("curl https://x.test", &opts);
    assert!(!result.success);
    assert!(result.request.is_some());
    assert!(result.error.unwrap().starts_with("Code generation failed"));
}

#[test]
fn test_non_curl_input_fails() {
    let result = convert("http GET https://x.test", &options("javascript", "fetch"));
    assert!(!result.success);
    assert!(result.error.is_some());
}

#[test]
fn test_batch_isolation_preserves_order() {
    let commands = vec!["curl -H 'X: y'".to_string(), "curl https://x.test".to_string()];
    let results = batch_convert(&commands, &options("php", "curl"));
    assert_eq!(results.len(), 2);
    assert!(!results[0].success);
    assert_eq!(results[0].error.as_deref(), Some("no URL found"));
    assert!(results[1].success);
}

#[test]
fn test_har_input_converts() {
    let har = r#"{"log":{"entries":[{"request":{"method":"PATCH","url":"https://x.test/a",
        "headers":[{"name":"Authorization","value":"Bearer t0k"}],
        "postData":{"mimeType":"application/json","text":"{\"x\":1}"}}}]}}"#;
    let command = detect_and_normalize(har).unwrap();
    let result = convert(&command, &options("python", "httpx"));
    assert!(result.success);
    let request = result.request.unwrap();
    assert_eq!(request.method, HttpMethod::Patch);
    assert_eq!(result.code.unwrap().env_vars.get("BEARER_TOKEN").map(String::as_str), Some("t0k"));
}
