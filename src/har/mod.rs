//! Input format detection
//!
//! Accepts either a curl command or a HAR capture; a capture is rewritten
//! into an equivalent curl command built from its first request.

pub mod types;

use tracing::{debug, warn};

use crate::curl::is_program_token;
use crate::errors::{ConvertError, Result};

pub use types::{HarCapture, HarEntry, HarPostData, HarRequest};

/// Headers that the synthesized command must not carry
const DROPPED_HEADERS: &[&str] = &["content-length", "host"];

/// Return a curl command for `input`, or `None` when it is neither curl nor HAR
pub fn detect_and_normalize(input: &str) -> Option<String> {
    match normalize(input) {
        Ok(command) => Some(command),
        Err(err) => {
            debug!("Input not normalizable: {}", err);
            None
        }
    }
}

/// Like [`detect_and_normalize`], reporting why normalization failed
pub fn normalize(input: &str) -> Result<String> {
    if input.split_whitespace().any(is_program_token) {
        return Ok(input.to_string());
    }
    if !looks_like_har(input) {
        return Err(ConvertError::NotNormalizable);
    }

    let capture: HarCapture = serde_json::from_str(input.trim()).map_err(|e| {
        warn!("Input looked like HAR but failed to parse: {}", e);
        ConvertError::NotNormalizable
    })?;
    let entry = capture.entries().first().ok_or(ConvertError::NotNormalizable)?;
    debug!(method = %entry.request.method, url = %entry.request.url, "Normalizing HAR entry");
    Ok(har_to_curl(&entry.request))
}

fn looks_like_har(input: &str) -> bool {
    input.contains("\"method\"")
        && input.contains("\"url\"")
        && (input.contains("\"log\"") || input.contains("\"entries\""))
}

/// Synthesize a single-line curl command from a HAR request
pub fn har_to_curl(request: &HarRequest) -> String {
    let mut parts = vec!["curl".to_string()];
    let method = request.method.to_ascii_uppercase();
    let post_data = request.post_data.as_ref();

    let form_params = post_data
        .and_then(|p| p.params.as_ref())
        .filter(|params| !params.is_empty())
        .filter(|_| post_data.map_or(false, |p| uses_params(p)));

    let text = post_data.and_then(|p| p.text.as_deref()).filter(|t| !t.is_empty());
    // A GET with a body would otherwise be promoted to POST
    if method != "GET" || form_params.is_some() || text.is_some() {
        parts.push("-X".to_string());
        parts.push(method);
    }

    for header in &request.headers {
        let name = header.name.as_str();
        if name.starts_with(':') || DROPPED_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h)) {
            continue;
        }
        // The multipart boundary belongs to the original capture
        if form_params.is_some() && name.eq_ignore_ascii_case("content-type") {
            continue;
        }
        parts.push("-H".to_string());
        parts.push(shell_quote(&format!("{}: {}", name, header.value)));
    }

    match (form_params, post_data) {
        (Some(params), _) => {
            for param in params {
                let value = match &param.file_name {
                    Some(file) => {
                        let mut spec = format!("@{}", file);
                        if let Some(ct) = &param.content_type {
                            spec.push_str(&format!(";type={}", ct));
                        }
                        spec
                    }
                    None => param.value.clone().unwrap_or_default(),
                };
                parts.push("-F".to_string());
                parts.push(shell_quote(&format!("{}={}", param.name, value)));
            }
        }
        (None, Some(data)) => {
            if let Some(text) = text {
                if request.header("content-type").is_none() && !data.mime_type.is_empty() {
                    parts.push("-H".to_string());
                    parts.push(shell_quote(&format!("Content-Type: {}", data.mime_type)));
                }
                parts.push("--data-raw".to_string());
                parts.push(shell_quote(text));
            }
        }
        (None, None) => {}
    }

    parts.push(shell_quote(&request.url));
    parts.join(" ")
}

/// Multipart captures, or captures whose params carry no text rendition
fn uses_params(data: &HarPostData) -> bool {
    data.mime_type.to_ascii_lowercase().starts_with("multipart/")
        || data.text.as_deref().map_or(true, str::is_empty)
}

/// Quote for a POSIX shell, single quotes throughout
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}
