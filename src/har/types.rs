//! HAR (HTTP Archive) data structures
//!
//! The request half of HAR 1.2; responses and timings are not read.

use serde::Deserialize;

/// Root of a capture
///
/// Browsers write `{"log": {"entries": [...]}}`; some tools drop the `log`
/// wrapper and put `entries` at the top level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarCapture {
    #[serde(default)]
    pub log: Option<HarLog>,

    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

impl HarCapture {
    pub fn entries(&self) -> &[HarEntry] {
        match &self.log {
            Some(log) if !log.entries.is_empty() => &log.entries,
            _ => &self.entries,
        }
    }
}

/// HAR log containing all entries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarLog {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

/// A single recorded exchange
#[derive(Debug, Clone, Deserialize)]
pub struct HarEntry {
    pub request: HarRequest,
}

/// HTTP request details
#[derive(Debug, Clone, Deserialize)]
pub struct HarRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,

    /// Full URL, query string included; `queryString` is not read
    pub url: String,

    #[serde(default)]
    pub headers: Vec<HarHeader>,

    #[serde(rename = "postData", default)]
    pub post_data: Option<HarPostData>,
}

impl HarRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarHeader {
    pub name: String,
    pub value: String,
}

/// POST data
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarPostData {
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,

    /// Posted text (for non-multipart)
    #[serde(default)]
    pub text: Option<String>,

    /// Posted parameters (for form data)
    #[serde(default)]
    pub params: Option<Vec<HarPostParam>>,
}

/// POST parameter
#[derive(Debug, Clone, Deserialize)]
pub struct HarPostParam {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_under_log() {
        let json = r#"{"log":{"version":"1.2","entries":[{"request":{"method":"GET","url":"https://x.test","headers":[]}}]}}"#;
        let capture: HarCapture = serde_json::from_str(json).unwrap();
        assert_eq!(capture.entries().len(), 1);
        assert_eq!(capture.entries()[0].request.url, "https://x.test");
    }

    #[test]
    fn test_top_level_entries() {
        let json = r#"{"entries":[{"request":{"method":"POST","url":"https://x.test","postData":{"mimeType":"text/plain","text":"hi"}}}]}"#;
        let capture: HarCapture = serde_json::from_str(json).unwrap();
        let request = &capture.entries()[0].request;
        assert_eq!(request.post_data.as_ref().unwrap().text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_unread_fields_are_skipped() {
        let json = r#"{"log":{"version":"1.2","entries":[{"request":{"method":"GET","url":"https://x.test/?a=1",
            "httpVersion":"HTTP/2","queryString":[{"name":"a","value":"1"}],"cookies":[]},
            "response":{"status":200}}]}}"#;
        let capture: HarCapture = serde_json::from_str(json).unwrap();
        assert_eq!(capture.entries()[0].request.url, "https://x.test/?a=1");
    }

    #[test]
    fn test_header_lookup() {
        let request = HarRequest {
            method: "GET".to_string(),
            url: "https://x.test".to_string(),
            headers: vec![HarHeader { name: "Content-Type".to_string(), value: "text/csv".to_string() }],
            post_data: None,
        };
        assert_eq!(request.header("content-type"), Some("text/csv"));
    }
}
