//! The parsed request model
//!
//! [`ParsedRequest`] is the intermediate representation every backend renders
//! from. It is produced once per parse and never mutated afterwards.
//!
//! # Why IndexMap?
//!
//! Header, cookie, query and form order is preserved so that generated code
//! reads in the order the user wrote the command, and so two conversions of
//! the same command render byte-identical output.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;

/// Headers dictionary - header name (as supplied) to value
pub type HeadersDict = IndexMap<String, String>;

/// Query parameters dictionary - preserves user-specified order
pub type QueryParamsDict = IndexMap<String, String>;

/// Cookies dictionary - cookie name to value
pub type CookiesDict = IndexMap<String, String>;

/// Form data - ordered, duplicate keys allowed
pub type FormPairs = Vec<(String, String)>;

/// User agent recorded when the command supplies none
pub const DEFAULT_USER_AGENT: &str = "curl/8.5.0";

/// Standard HTTP verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    /// Parse a verb case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            "TRACE" => Some(HttpMethod::Trace),
            "CONNECT" => Some(HttpMethod::Connect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
        }
    }

    /// Lowercase verb, for client APIs with one method per verb
    pub fn as_lower(&self) -> String {
        self.as_str().to_ascii_lowercase()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body classification tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Json,
    Form,
    Multipart,
    Raw,
    Binary,
}

impl DataType {
    /// Content-Type implied by the data type, if one should be set
    pub fn implied_content_type(&self) -> Option<&'static str> {
        match self {
            DataType::Json => Some("application/json"),
            DataType::Form => Some("application/x-www-form-urlencoded"),
            // The client library picks the boundary, so the header is left to it
            DataType::Multipart => None,
            DataType::Raw => Some("text/plain"),
            DataType::Binary => Some("application/octet-stream"),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Json => "json",
            DataType::Form => "form",
            DataType::Multipart => "multipart",
            DataType::Raw => "raw",
            DataType::Binary => "binary",
        };
        f.write_str(s)
    }
}

/// A single multipart field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MultipartField {
    /// Plain text field
    Text { name: String, value: String },
    /// File upload, index into [`ParsedRequest::files`]
    File { index: usize },
}

/// Request body, already classified
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Body {
    Json(JsonValue),
    Form(FormPairs),
    Multipart(Vec<MultipartField>),
    Raw(String),
    /// Inline binary payload (`--data-binary` text)
    Binary(String),
    /// Payload read from a file (`-d @path`), holding the path
    File(String),
}

impl Body {
    pub fn data_type(&self) -> DataType {
        match self {
            Body::Json(_) => DataType::Json,
            Body::Form(_) => DataType::Form,
            Body::Multipart(_) => DataType::Multipart,
            Body::Raw(_) => DataType::Raw,
            Body::Binary(_) | Body::File(_) => DataType::Binary,
        }
    }

    /// File name when the payload refers to a file (`@path`)
    pub fn file_reference(&self) -> Option<&str> {
        match self {
            Body::File(path) => Some(path),
            _ => None,
        }
    }
}

/// File upload for multipart requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
}

/// Authentication, from `-u` or an `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Auth {
    Basic { username: String, password: String },
    Bearer { token: String },
    #[serde(rename = "apikey")]
    ApiKey { scheme: String, key: String },
    Custom { scheme: String, credentials: String },
}

impl Auth {
    pub fn kind(&self) -> &'static str {
        match self {
            Auth::Basic { .. } => "basic",
            Auth::Bearer { .. } => "bearer",
            Auth::ApiKey { .. } => "apikey",
            Auth::Custom { .. } => "custom",
        }
    }
}

/// Transport flags
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptions {
    pub follow_redirects: bool,
    pub max_redirects: Option<u32>,
    /// Whole-request timeout in seconds (`--max-time`)
    pub timeout: Option<f64>,
    pub connect_timeout: Option<f64>,
    pub proxy: Option<String>,
    pub insecure: bool,
    pub compressed: bool,
    pub user_agent: Option<String>,
    pub cert: Option<String>,
    pub key: Option<String>,
    pub cacert: Option<String>,
    pub http_version: Option<String>,
    /// `--digest` / `--ntlm` were requested
    pub auth_scheme_hint: Option<String>,
}

/// The canonical intermediate representation of an HTTP call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRequest {
    pub method: HttpMethod,
    /// Origin and path, query string removed
    pub url: String,
    pub headers: HeadersDict,
    pub body: Option<Body>,
    /// The body text exactly as supplied on the command line
    pub raw_body: Option<String>,
    pub auth: Option<Auth>,
    pub cookies: CookiesDict,
    pub files: Vec<FileUpload>,
    pub query_params: QueryParamsDict,
    pub options: TransportOptions,
}

impl ParsedRequest {
    pub fn data_type(&self) -> Option<DataType> {
        self.body.as_ref().map(Body::data_type)
    }

    pub fn is_multipart(&self) -> bool {
        matches!(self.body, Some(Body::Multipart(_)))
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// URL with the query string re-attached
    pub fn full_url(&self) -> String {
        if self.query_params.is_empty() {
            return self.url.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_params.iter())
            .finish();
        format!("{}?{}", self.url, query)
    }

    /// JSON body value, if the body is JSON
    pub fn json_body(&self) -> Option<&JsonValue> {
        match &self.body {
            Some(Body::Json(v)) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!(HttpMethod::parse("post"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("Delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("FETCH"), None);
    }

    #[test]
    fn test_full_url_reattaches_query() {
        let mut query_params = QueryParamsDict::new();
        query_params.insert("q".to_string(), "a b".to_string());
        query_params.insert("page".to_string(), "2".to_string());
        let req = ParsedRequest {
            method: HttpMethod::Get,
            url: "https://x.test/search".to_string(),
            headers: HeadersDict::new(),
            body: None,
            raw_body: None,
            auth: None,
            cookies: CookiesDict::new(),
            files: Vec::new(),
            query_params,
            options: TransportOptions::default(),
        };
        assert_eq!(req.full_url(), "https://x.test/search?q=a+b&page=2");
    }

    #[test]
    fn test_binary_file_reference() {
        assert_eq!(Body::File("data.bin".into()).file_reference(), Some("data.bin"));
        assert_eq!(Body::File("data.bin".into()).data_type(), DataType::Binary);
        assert_eq!(Body::Binary("@data.bin".into()).file_reference(), None);
        assert_eq!(Body::Raw("@x".into()).file_reference(), None);
    }
}
