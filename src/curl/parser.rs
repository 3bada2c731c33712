//! curl command parsing
//!
//! Walks the token stream with an explicit [`TokenCursor`] and fills a
//! private [`RequestDraft`]; [`RequestDraft::finish`] then runs the
//! post-processing steps (query extraction, body classification, method
//! promotion, Content-Type inference) and freezes the result into a
//! [`ParsedRequest`].

use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::form_urlencoded;

use super::flags::{lookup_long, lookup_short, Flag};
use super::tokenizer::tokenize_command;
use crate::errors::{ConvertError, Result};
use crate::models::{
    Auth, Body, CookiesDict, FileUpload, FormPairs, HeadersDict, HttpMethod, MultipartField,
    ParsedRequest, QueryParamsDict, TransportOptions, DEFAULT_USER_AGENT,
};

static SCHEME_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://\S+$").expect("Invalid scheme URL regex")
});

static BARE_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:localhost|(?:[a-zA-Z0-9\-]+\.)+[a-zA-Z0-9\-]+|\[[0-9a-fA-F:]+\])(?::\d+)?(?:[/?#]\S*)?$")
        .expect("Invalid bare host regex")
});

/// A parsed request plus the non-fatal observations made while parsing
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub request: ParsedRequest,
    pub warnings: Vec<String>,
}

/// Parse a curl command string into a [`ParseOutcome`]
pub fn parse_curl_command(cmd: &str) -> Result<ParseOutcome> {
    let tokens = tokenize_command(cmd)?;
    parse_tokens(&tokens)
}

/// Parse tokens (program name already removed)
pub fn parse_tokens(tokens: &[String]) -> Result<ParseOutcome> {
    let mut cursor = TokenCursor::new(tokens);
    let mut draft = RequestDraft::default();
    let mut options_done = false;

    while let Some(token) = cursor.next() {
        if options_done {
            draft.positional(token);
        } else if token == "--" {
            options_done = true;
        } else if let Some(long) = token.strip_prefix("--") {
            draft.long_option(long, &mut cursor);
        } else if token.len() > 1 && token.starts_with('-') {
            draft.short_options(&token[1..], &mut cursor);
        } else {
            draft.positional(token);
        }
    }

    draft.finish()
}

/// Explicit read position over the token slice
#[derive(Debug)]
pub struct TokenCursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for TokenCursor<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataKind {
    /// `-d`, `--data`, `--data-ascii`, `--json`
    Plain,
    Raw,
    Binary,
    UrlEncode,
}

#[derive(Debug, Clone)]
struct DataPart {
    kind: DataKind,
    value: String,
}

impl DataPart {
    fn is_file_reference(&self) -> bool {
        matches!(self.kind, DataKind::Plain | DataKind::Binary)
            && self.value.len() > 1
            && self.value.starts_with('@')
    }

    /// The bytes curl would send for this part
    fn encoded(&self) -> String {
        match self.kind {
            DataKind::UrlEncode => match self.value.split_once('=') {
                Some((name, content)) if !name.is_empty() => {
                    format!("{}={}", name, urlencoding::encode(content))
                }
                Some((_, content)) => urlencoding::encode(content).into_owned(),
                None => urlencoding::encode(&self.value).into_owned(),
            },
            _ => self.value.clone(),
        }
    }
}

/// Mutable state collected while walking the tokens
#[derive(Debug, Default)]
struct RequestDraft {
    method: Option<HttpMethod>,
    url: Option<String>,
    headers: HeadersDict,
    data: Vec<DataPart>,
    json: bool,
    multipart: Vec<MultipartField>,
    files: Vec<FileUpload>,
    user: Option<String>,
    flag_auth: Option<Auth>,
    header_auth: Option<Auth>,
    cookies: CookiesDict,
    options: TransportOptions,
    get_mode: bool,
    head: bool,
    warnings: Vec<String>,
}

impl RequestDraft {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn long_option<'a>(&mut self, spec: &'a str, cursor: &mut TokenCursor<'a>) {
        let (name, inline) = match spec.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (spec, None),
        };

        match lookup_long(name) {
            Some(flag) if flag.takes_arg() => {
                let value = inline.or_else(|| cursor.next());
                self.apply(flag, value, name);
            }
            Some(flag) => self.apply(flag, None, name),
            None => self.warn(format!("Ignored unsupported option --{}", name)),
        }
    }

    /// A cluster of short options such as `-sSL`, `-XPOST` or `-H`
    fn short_options<'a>(&mut self, letters: &'a str, cursor: &mut TokenCursor<'a>) {
        for (idx, c) in letters.char_indices() {
            match lookup_short(c) {
                Some(flag) if flag.takes_arg() => {
                    let rest = &letters[idx + c.len_utf8()..];
                    let value = if rest.is_empty() { cursor.next() } else { Some(rest) };
                    self.apply(flag, value, &c.to_string());
                    return;
                }
                Some(flag) => self.apply(flag, None, &c.to_string()),
                None => {
                    self.warn(format!("Ignored unsupported option -{}", c));
                    return;
                }
            }
        }
    }

    fn apply(&mut self, flag: Flag, value: Option<&str>, origin: &str) {
        let value = match (flag.takes_arg(), value) {
            (true, None) => {
                debug!(option = origin, "Option is missing its argument");
                return;
            }
            (_, value) => value.unwrap_or_default(),
        };

        match flag {
            Flag::Url => self.set_url(value),
            Flag::Request => match HttpMethod::parse(value) {
                Some(method) => self.method = Some(method),
                None => self.warn(format!("Ignored unknown request method '{}'", value)),
            },
            Flag::Header => self.add_header(value),
            Flag::Data => self.push_data(DataKind::Plain, value),
            Flag::DataRaw => self.push_data(DataKind::Raw, value),
            Flag::DataBinary => self.push_data(DataKind::Binary, value),
            Flag::DataUrlencode => self.push_data(DataKind::UrlEncode, value),
            Flag::Json => {
                self.json = true;
                self.push_data(DataKind::Plain, value);
            }
            Flag::Form => self.add_form_field(value, true),
            Flag::FormString => self.add_form_field(value, false),
            Flag::User => self.user = Some(value.to_string()),
            Flag::OAuth2Bearer => {
                self.flag_auth = Some(Auth::Bearer { token: value.to_string() });
            }
            Flag::Basic => {}
            Flag::Digest => self.options.auth_scheme_hint = Some("digest".to_string()),
            Flag::Ntlm => self.options.auth_scheme_hint = Some("ntlm".to_string()),
            Flag::Cookie => self.add_cookies(value),
            Flag::UserAgent => self.set_header("User-Agent", value),
            Flag::Referer => self.set_header("Referer", value),
            Flag::Get => self.get_mode = true,
            Flag::Head => self.head = true,
            Flag::Location | Flag::LocationTrusted => self.options.follow_redirects = true,
            Flag::MaxRedirs => match value.parse::<i64>() {
                Ok(n) if n >= 0 => self.options.max_redirects = u32::try_from(n).ok(),
                Ok(_) => self.options.max_redirects = None,
                Err(_) => self.warn(format!("Ignored invalid --max-redirs value '{}'", value)),
            },
            Flag::MaxTime => match parse_seconds(value) {
                Some(secs) => self.options.timeout = Some(secs),
                None => self.warn(format!("Ignored invalid --max-time value '{}'", value)),
            },
            Flag::ConnectTimeout => match parse_seconds(value) {
                Some(secs) => self.options.connect_timeout = Some(secs),
                None => self.warn(format!("Ignored invalid --connect-timeout value '{}'", value)),
            },
            Flag::Insecure => self.options.insecure = true,
            Flag::Compressed => self.options.compressed = true,
            Flag::Proxy => self.options.proxy = Some(value.to_string()),
            Flag::Cert => self.options.cert = Some(value.to_string()),
            Flag::Key => self.options.key = Some(value.to_string()),
            Flag::CaCert => self.options.cacert = Some(value.to_string()),
            Flag::Http10 => self.options.http_version = Some("1.0".to_string()),
            Flag::Http11 => self.options.http_version = Some("1.1".to_string()),
            Flag::Http2 => self.options.http_version = Some("2".to_string()),
            Flag::Http3 => self.options.http_version = Some("3".to_string()),
            Flag::NoOp | Flag::NoOpWithArg => {
                debug!(option = origin, "Option has no effect on generated code");
            }
        }
    }

    fn positional(&mut self, token: &str) {
        if self.url.is_none() && looks_like_url(token) {
            self.set_url(token);
        } else {
            self.warn(format!("Ignored extra argument '{}'", token));
        }
    }

    fn set_url(&mut self, value: &str) {
        let value = value.trim();
        if self.url.is_some() || value.is_empty() {
            return;
        }
        self.url = Some(normalize_scheme(value));
    }

    fn push_data(&mut self, kind: DataKind, value: &str) {
        self.data.push(DataPart { kind, value: value.to_string() });
    }

    fn add_header(&mut self, raw: &str) {
        if let Some((name, value)) = raw.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() {
                self.warn(format!("Ignored malformed header '{}'", raw));
            } else if value.is_empty() {
                // `-H "Name:"` removes a header
                self.remove_header(name);
            } else {
                self.set_header(name, value);
            }
        } else if let Some(name) = raw.strip_suffix(';') {
            // `-H "Name;"` sends the header with an empty value
            self.set_header(name.trim(), "");
        } else {
            self.warn(format!("Ignored malformed header '{}'", raw));
        }
    }

    /// Insert or overwrite (case-insensitively) keeping the original position
    fn set_header(&mut self, name: &str, value: &str) {
        if name.eq_ignore_ascii_case("Authorization") {
            self.header_auth = parse_authorization(value);
        } else if name.eq_ignore_ascii_case("Cookie") {
            self.add_cookies(value);
        }

        let existing = self.headers.keys().position(|k| k.eq_ignore_ascii_case(name));
        match existing {
            Some(idx) => {
                if let Some((_, slot)) = self.headers.get_index_mut(idx) {
                    *slot = value.to_string();
                }
            }
            None => {
                self.headers.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn remove_header(&mut self, name: &str) {
        if name.eq_ignore_ascii_case("Authorization") {
            self.header_auth = None;
        }
        if let Some(key) = self.headers.keys().find(|k| k.eq_ignore_ascii_case(name)).cloned() {
            self.headers.shift_remove(&key);
        }
    }

    fn add_cookies(&mut self, raw: &str) {
        if !raw.contains('=') {
            self.warn(format!("Ignored cookie jar file '{}'", raw));
            return;
        }
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if !name.is_empty() {
                    self.cookies.insert(name.trim().to_string(), value.trim().to_string());
                }
            }
        }
    }

    fn add_form_field(&mut self, raw: &str, allow_files: bool) {
        let Some((name, value)) = raw.split_once('=') else {
            self.warn(format!("Ignored malformed form field '{}'", raw));
            return;
        };
        let name = name.to_string();

        if allow_files {
            if let Some(spec) = value.strip_prefix('@') {
                let mut parts = spec.split(';');
                let file_name = parts.next().unwrap_or_default().to_string();
                let mut content_type = None;
                for attr in parts {
                    if let Some(mime) = attr.trim().strip_prefix("type=") {
                        content_type = Some(mime.to_string());
                    }
                }
                self.files.push(FileUpload { field_name: name, file_name, content_type });
                self.multipart.push(MultipartField::File { index: self.files.len() - 1 });
                return;
            }
            if let Some(path) = value.strip_prefix('<') {
                self.warn(format!(
                    "Form field '{}' reads its value from '{}'; the file name is used as the value",
                    name, path
                ));
            }
        }

        self.multipart.push(MultipartField::Text { name, value: value.to_string() });
    }

    fn build_body(&mut self, query_params: &mut QueryParamsDict) -> (Option<Body>, Option<String>) {
        if !self.multipart.is_empty() {
            if !self.data.is_empty() {
                self.warn("Both -d and -F were given; the multipart form is used".to_string());
            }
            return (Some(Body::Multipart(std::mem::take(&mut self.multipart))), None);
        }
        if self.data.is_empty() {
            return (None, None);
        }

        let joined = self.data.iter().map(DataPart::encoded).collect::<Vec<_>>().join("&");

        if self.get_mode {
            query_params.extend(form_urlencoded::parse(joined.as_bytes()).into_owned());
            return (None, None);
        }

        if self.data.len() == 1 && self.data[0].is_file_reference() {
            self.warn(format!(
                "Body is read from file '{}'; its contents are not inlined",
                &joined[1..]
            ));
            return (Some(Body::File(joined[1..].to_string())), Some(joined));
        }

        let binary = self.data.iter().any(|p| p.kind == DataKind::Binary);
        let body = classify_body(&joined, binary);
        if self.json && !matches!(body, Body::Json(_)) {
            self.warn("--json payload is not valid JSON; sending it as-is".to_string());
        }
        (Some(body), Some(joined))
    }

    fn finish(mut self) -> Result<ParseOutcome> {
        let raw_url = self.url.take().ok_or(ConvertError::MissingUrl)?;
        let (url, mut query_params) = split_query(&raw_url);
        if url.is_empty() {
            return Err(ConvertError::MissingUrl);
        }

        let (body, raw_body) = self.build_body(&mut query_params);

        let method = match self.method {
            Some(method) => method,
            None if self.head => HttpMethod::Head,
            None if body.is_some() => HttpMethod::Post,
            None => HttpMethod::Get,
        };

        if self.json {
            self.set_default_header("Accept", "application/json");
        }
        if let Some(content_type) = body.as_ref().and_then(|b| b.data_type().implied_content_type()) {
            self.set_default_header("Content-Type", content_type);
        }

        let auth = self.resolve_auth();

        let mut options = std::mem::take(&mut self.options);
        options.user_agent = Some(
            header_value(&self.headers, "User-Agent").unwrap_or(DEFAULT_USER_AGENT).to_string(),
        );

        debug!(%method, url = %url, data_type = ?body.as_ref().map(Body::data_type), "Parsed curl command");

        Ok(ParseOutcome {
            request: ParsedRequest {
                method,
                url,
                headers: self.headers,
                body,
                raw_body,
                auth,
                cookies: self.cookies,
                files: self.files,
                query_params,
                options,
            },
            warnings: self.warnings,
        })
    }

    fn set_default_header(&mut self, name: &str, value: &str) {
        if header_value(&self.headers, name).is_none() {
            self.headers.insert(name.to_string(), value.to_string());
        }
    }

    /// `-u` wins over `--oauth2-bearer`, which wins over an Authorization header
    fn resolve_auth(&mut self) -> Option<Auth> {
        if let Some(user) = self.user.take() {
            let (username, password) = match user.split_once(':') {
                Some((u, p)) => (u.to_string(), p.to_string()),
                None => (user, String::new()),
            };
            if let Some(scheme) = self.options.auth_scheme_hint.clone() {
                self.warn(format!("{} authentication is rendered as basic authentication", scheme));
            }
            if self.header_auth.is_some() {
                self.warn("Both -u and an Authorization header were given; -u is used".to_string());
            }
            return Some(Auth::Basic { username, password });
        }
        self.flag_auth.take().or_else(|| self.header_auth.take())
    }
}

fn header_value<'a>(headers: &'a HeadersDict, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Whether a positional token can be the request URL
pub fn looks_like_url(token: &str) -> bool {
    SCHEME_URL.is_match(token) || BARE_HOST.is_match(token)
}

/// Promote a bare host to `https://`
pub fn normalize_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

/// Split `origin+path` from the query string; the fragment is dropped
pub fn split_query(raw: &str) -> (String, QueryParamsDict) {
    let without_fragment = raw.split('#').next().unwrap_or(raw);
    match without_fragment.split_once('?') {
        Some((base, query)) => (
            base.to_string(),
            form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        ),
        None => (without_fragment.to_string(), QueryParamsDict::new()),
    }
}

/// Derive an [`Auth`] from an Authorization header value
pub fn parse_authorization(value: &str) -> Option<Auth> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let Some((scheme, rest)) = value.split_once(char::is_whitespace) else {
        return Some(Auth::Custom { scheme: String::new(), credentials: value.to_string() });
    };
    let rest = rest.trim();

    let auth = match scheme.to_ascii_lowercase().as_str() {
        "bearer" => Auth::Bearer { token: rest.to_string() },
        "basic" => match decode_basic(rest) {
            Some((username, password)) => Auth::Basic { username, password },
            None => Auth::Custom { scheme: scheme.to_string(), credentials: rest.to_string() },
        },
        "apikey" | "api-key" | "token" => Auth::ApiKey {
            scheme: scheme.to_string(),
            key: rest.to_string(),
        },
        _ => Auth::Custom { scheme: scheme.to_string(), credentials: rest.to_string() },
    };
    Some(auth)
}

/// Finite, non-negative seconds
fn parse_seconds(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|secs| secs.is_finite() && *secs >= 0.0)
}

fn decode_basic(encoded: &str) -> Option<(String, String)> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let (user, pass) = text.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Classify a body: JSON first, then form-encoded, else raw (or binary)
pub fn classify_body(text: &str, binary: bool) -> Body {
    if let Some(value) = sniff_json(text) {
        return Body::Json(value);
    }
    if let Some(pairs) = sniff_form(text) {
        return Body::Form(pairs);
    }
    if binary {
        Body::Binary(text.to_string())
    } else {
        Body::Raw(text.to_string())
    }
}

/// JSON object or array, if the text parses as one
pub fn sniff_json(text: &str) -> Option<JsonValue> {
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Body looks like JSON but does not parse; treating it as text");
            None
        }
    }
}

/// `key=value&...` pairs, if every segment has a plain key
pub fn sniff_form(text: &str) -> Option<FormPairs> {
    if text.is_empty() {
        return None;
    }
    let is_form = text.split('&').all(|pair| match pair.split_once('=') {
        Some((key, _)) => {
            !key.is_empty()
                && key
                    .chars()
                    .all(|c| !c.is_whitespace() && !matches!(c, '{' | '}' | '"' | '<' | '>' | '[' | ']'))
        }
        None => false,
    });
    if !is_form {
        return None;
    }
    Some(form_urlencoded::parse(text.as_bytes()).into_owned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DataType;

    fn parse(cmd: &str) -> ParseOutcome {
        parse_curl_command(cmd).unwrap()
    }

    #[test]
    fn test_simple_get() {
        let out = parse("curl https://example.com");
        assert_eq!(out.request.url, "https://example.com");
        assert_eq!(out.request.method, HttpMethod::Get);
        assert!(out.request.body.is_none());
        assert_eq!(out.request.options.user_agent.as_deref(), Some(DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_bare_host_promoted_to_https() {
        let out = parse("curl x.test/api");
        assert_eq!(out.request.url, "https://x.test/api");
    }

    #[test]
    fn test_post_with_form_data() {
        let out = parse("curl -X POST -d 'name=John&age=30' https://example.com");
        assert_eq!(out.request.method, HttpMethod::Post);
        assert_eq!(out.request.data_type(), Some(DataType::Form));
        assert_eq!(
            out.request.body,
            Some(Body::Form(vec![
                ("name".to_string(), "John".to_string()),
                ("age".to_string(), "30".to_string())
            ]))
        );
        assert_eq!(
            out.request.header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_json_body_promotes_method() {
        let out = parse(r#"curl -d '{"a":1}' https://x.test"#);
        assert_eq!(out.request.method, HttpMethod::Post);
        assert_eq!(out.request.data_type(), Some(DataType::Json));
        assert_eq!(out.request.header("Content-Type"), Some("application/json"));
        assert_eq!(out.request.raw_body.as_deref(), Some(r#"{"a":1}"#));
    }

    #[test]
    fn test_explicit_content_type_is_kept() {
        let out = parse(r#"curl -H 'content-type: application/vnd.api+json' -d '{"a":1}' https://x.test"#);
        assert_eq!(out.request.headers.len(), 1);
        assert_eq!(out.request.header("Content-Type"), Some("application/vnd.api+json"));
    }

    #[test]
    fn test_unparsable_json_falls_back_to_raw() {
        let out = parse(r#"curl -d '{"a":' https://x.test"#);
        assert_eq!(out.request.data_type(), Some(DataType::Raw));
        assert_eq!(out.request.header("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_headers_with_spaces_and_overwrite() {
        let out = parse(r#"curl -H "X-Test: a b" -H 'Accept: text/html' -H 'x-test: c' https://x.test"#);
        assert_eq!(out.request.headers.len(), 2);
        assert_eq!(out.request.headers.get_index(0), Some((&"X-Test".to_string(), &"c".to_string())));
    }

    #[test]
    fn test_empty_header_removes() {
        let out = parse("curl -H 'Accept: text/html' -H 'Accept:' https://x.test");
        assert!(out.request.headers.is_empty());
    }

    #[test]
    fn test_multipart_file_upload() {
        let out = parse(r#"curl -F "file=@photo.png;type=image/png" -F 'title=Holiday' https://x.test"#);
        assert!(out.request.is_multipart());
        assert_eq!(out.request.method, HttpMethod::Post);
        assert_eq!(out.request.files.len(), 1);
        assert_eq!(out.request.files[0].file_name, "photo.png");
        assert_eq!(out.request.files[0].content_type.as_deref(), Some("image/png"));
        assert!(out.request.header("Content-Type").is_none());
    }

    #[test]
    fn test_form_string_never_uploads() {
        let out = parse("curl --form-string 'handle=@me' https://x.test");
        assert!(out.request.files.is_empty());
        assert_eq!(
            out.request.body,
            Some(Body::Multipart(vec![MultipartField::Text {
                name: "handle".into(),
                value: "@me".into()
            }]))
        );
    }

    #[test]
    fn test_basic_auth_flag() {
        let out = parse("curl -u user:pass https://example.com");
        assert_eq!(
            out.request.auth,
            Some(Auth::Basic { username: "user".into(), password: "pass".into() })
        );
    }

    #[test]
    fn test_bearer_token_header() {
        let out = parse("curl -H 'Authorization: Bearer token123' https://example.com");
        assert_eq!(out.request.auth, Some(Auth::Bearer { token: "token123".into() }));
        assert_eq!(out.request.header("Authorization"), Some("Bearer token123"));
    }

    #[test]
    fn test_basic_authorization_header_is_decoded() {
        // "alice:s3cret"
        let out = parse("curl -H 'Authorization: Basic YWxpY2U6czNjcmV0' https://x.test");
        assert_eq!(
            out.request.auth,
            Some(Auth::Basic { username: "alice".into(), password: "s3cret".into() })
        );
    }

    #[test]
    fn test_authorization_schemes() {
        assert!(matches!(parse_authorization("ApiKey abc"), Some(Auth::ApiKey { .. })));
        assert!(matches!(parse_authorization("Digest x=1"), Some(Auth::Custom { .. })));
        assert!(matches!(parse_authorization("abc123"), Some(Auth::Custom { .. })));
        assert_eq!(parse_authorization("  "), None);
    }

    #[test]
    fn test_cookies() {
        let out = parse("curl -b 'session=abc; theme=dark' https://x.test");
        assert_eq!(out.request.cookies.get("session").map(String::as_str), Some("abc"));
        assert_eq!(out.request.cookies.get("theme").map(String::as_str), Some("dark"));
    }

    #[test]
    fn test_cookie_jar_is_ignored_with_warning() {
        let out = parse("curl -b cookies.txt https://x.test");
        assert!(out.request.cookies.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_combined_flags() {
        let out = parse("curl -sSLk https://example.com");
        assert!(out.request.options.follow_redirects);
        assert!(out.request.options.insecure);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_attached_short_value_and_long_equals() {
        let out = parse("curl -XPUT --max-time=2.5 --data=a=b https://x.test");
        assert_eq!(out.request.method, HttpMethod::Put);
        assert_eq!(out.request.options.timeout, Some(2.5));
        assert_eq!(out.request.raw_body.as_deref(), Some("a=b"));
    }

    #[test]
    fn test_transport_options() {
        let out = parse(
            "curl --compressed -x http://proxy:8080 --cert client.pem --max-redirs 5 -A 'MyAgent/1.0' https://x.test",
        );
        let opts = &out.request.options;
        assert!(opts.compressed);
        assert_eq!(opts.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(opts.cert.as_deref(), Some("client.pem"));
        assert_eq!(opts.max_redirects, Some(5));
        assert_eq!(opts.user_agent.as_deref(), Some("MyAgent/1.0"));
        assert_eq!(out.request.header("User-Agent"), Some("MyAgent/1.0"));
    }

    #[test]
    fn test_query_params_extracted() {
        let out = parse("curl 'https://x.test/search?q=rust+lang&page=2#top'");
        assert_eq!(out.request.url, "https://x.test/search");
        assert_eq!(out.request.query_params.get("q").map(String::as_str), Some("rust lang"));
        assert_eq!(out.request.query_params.get("page").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_get_mode_moves_data_to_query() {
        let out = parse("curl -G -d q=test -d limit=5 https://x.test/search");
        assert_eq!(out.request.method, HttpMethod::Get);
        assert!(out.request.body.is_none());
        assert_eq!(out.request.query_params.len(), 2);
    }

    #[test]
    fn test_multiple_data_joined() {
        let out = parse("curl -d a=1 -d b=2 https://x.test");
        assert_eq!(out.request.raw_body.as_deref(), Some("a=1&b=2"));
    }

    #[test]
    fn test_data_urlencode() {
        let out = parse("curl --data-urlencode 'msg=hello world&more' https://x.test");
        assert_eq!(out.request.raw_body.as_deref(), Some("msg=hello%20world%26more"));
        assert_eq!(
            out.request.body,
            Some(Body::Form(vec![("msg".into(), "hello world&more".into())]))
        );
    }

    #[test]
    fn test_data_file_reference() {
        let out = parse("curl --data-binary @payload.bin https://x.test");
        assert_eq!(out.request.data_type(), Some(DataType::Binary));
        assert_eq!(out.request.body, Some(Body::File("payload.bin".into())));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_unusable_timeouts_are_ignored() {
        for value in ["inf", "NaN", "-1", "soon"] {
            let out = parse(&format!("curl -m {} --connect-timeout {} https://x.test", value, value));
            assert_eq!(out.request.options.timeout, None, "{}", value);
            assert_eq!(out.request.options.connect_timeout, None, "{}", value);
            assert_eq!(out.warnings.len(), 2, "{}", value);
        }
        let out = parse("curl -m 2.5 https://x.test");
        assert_eq!(out.request.options.timeout, Some(2.5));
    }

    #[test]
    fn test_raw_at_sign_is_not_a_file() {
        let out = parse("curl --data-raw '@x' --data-binary y https://x.test");
        assert_eq!(out.request.body, Some(Body::Binary("@x&y".into())));
        assert_eq!(out.request.body.as_ref().and_then(Body::file_reference), None);
        assert!(out.warnings.is_empty());

        let out = parse("curl --data-raw '@x' https://x.test");
        assert_eq!(out.request.body, Some(Body::Raw("@x".into())));
    }

    #[test]
    fn test_json_flag_sets_headers() {
        let out = parse(r#"curl --json '{"x":true}' https://x.test"#);
        assert_eq!(out.request.method, HttpMethod::Post);
        assert_eq!(out.request.header("Accept"), Some("application/json"));
        assert_eq!(out.request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_head_flag() {
        let out = parse("curl -I https://x.test");
        assert_eq!(out.request.method, HttpMethod::Head);
    }

    #[test]
    fn test_unknown_method_ignored() {
        let out = parse("curl -X FROB https://x.test");
        assert_eq!(out.request.method, HttpMethod::Get);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_value_flags_do_not_swallow_url() {
        let out = parse("curl -o out.json -w '%{http_code}' https://x.test/data");
        assert_eq!(out.request.url, "https://x.test/data");
    }

    #[test]
    fn test_missing_flag_argument_is_ignored() {
        let out = parse("curl https://x.test -H");
        assert!(out.request.headers.is_empty());
    }

    #[test]
    fn test_missing_url() {
        assert!(matches!(parse_curl_command("curl -X POST"), Err(ConvertError::MissingUrl)));
    }

    #[test]
    fn test_first_url_wins() {
        let out = parse("curl https://a.test https://b.test");
        assert_eq!(out.request.url, "https://a.test");
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_digest_hint_warns() {
        let out = parse("curl --digest -u bob:pw https://x.test");
        assert_eq!(out.request.options.auth_scheme_hint.as_deref(), Some("digest"));
        assert!(out.warnings.iter().any(|w| w.contains("digest")));
    }

    #[test]
    fn test_sniff_form_rejects_text() {
        assert!(sniff_form("hello world").is_none());
        assert!(sniff_form("a=1&b").is_none());
        assert!(sniff_form("{\"a\"=1}").is_none());
        assert_eq!(sniff_form("a=1").map(|p| p.len()), Some(1));
    }

    #[test]
    fn test_cursor_position() {
        let tokens = vec!["-H".to_string(), "A: b".to_string()];
        let mut cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.next(), Some("-H"));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next(), Some("A: b"));
        assert_eq!(cursor.next(), None);
    }
}
