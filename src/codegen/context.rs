//! Per-conversion rendering context shared by all backends
//!
//! Resolves the parts of a [`ParsedRequest`] that every backend renders the
//! same way: which headers are emitted, which values are pulled out into
//! environment variables, the effective timeout and the type declarations.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::{Auth, Body, ErrorHandling, GenerationOptions, ParsedRequest};
use crate::types::{declarations_for, TypeDialect};

use super::writer::CodeWriter;

pub const BEARER_TOKEN_VAR: &str = "BEARER_TOKEN";
pub const API_KEY_VAR: &str = "API_KEY";
pub const BASIC_USERNAME_VAR: &str = "BASIC_AUTH_USERNAME";
pub const BASIC_PASSWORD_VAR: &str = "BASIC_AUTH_PASSWORD";

/// A value in generated code: either inlined or read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Literal(String),
    /// `prefix` followed by the value of environment variable `var`
    Env { var: String, prefix: String },
}

impl Fragment {
    /// Same value with `text` prepended
    pub fn prefixed(&self, text: &str) -> Fragment {
        match self {
            Fragment::Literal(s) => Fragment::Literal(format!("{}{}", text, s)),
            Fragment::Env { var, prefix } => Fragment::Env { var: var.clone(), prefix: format!("{}{}", text, prefix) },
        }
    }
}

/// How a backend spells literals and environment lookups
pub trait Syntax {
    fn string(&self, s: &str) -> String;

    fn env(&self, var: &str) -> String;

    fn concat(&self, left: &str, right: &str) -> String {
        format!("{} + {}", left, right)
    }

    fn fragment(&self, fragment: &Fragment) -> String {
        match fragment {
            Fragment::Literal(s) => self.string(s),
            Fragment::Env { var, prefix } if prefix.is_empty() => self.env(var),
            Fragment::Env { var, prefix } => self.concat(&self.string(prefix), &self.env(var)),
        }
    }
}

pub struct RenderContext<'a> {
    pub request: &'a ParsedRequest,
    pub options: &'a GenerationOptions,
    /// Headers to emit, in order
    pub headers: Vec<(String, Fragment)>,
    /// Username and password for native basic-auth support
    pub basic_auth: Option<(Fragment, Fragment)>,
    /// Extracted variable name to original value
    pub env_vars: IndexMap<String, String>,
}

impl<'a> RenderContext<'a> {
    pub fn new(request: &'a ParsedRequest, options: &'a GenerationOptions) -> Self {
        let mut ctx = Self {
            request,
            options,
            headers: Vec::new(),
            basic_auth: None,
            env_vars: IndexMap::new(),
        };
        ctx.resolve_headers();
        debug!(headers = ctx.headers.len(), env_vars = ctx.env_vars.len(), "Resolved render context");
        ctx
    }

    fn resolve_headers(&mut self) {
        let request = self.request;
        let auth_header = match &request.auth {
            Some(Auth::Basic { username, password }) => {
                let user = self.secret(BASIC_USERNAME_VAR, username, "");
                let pass = self.secret(BASIC_PASSWORD_VAR, password, "");
                self.basic_auth = Some((user, pass));
                None
            }
            Some(Auth::Bearer { token }) => Some(self.secret(BEARER_TOKEN_VAR, token, "Bearer ")),
            Some(Auth::ApiKey { scheme, key }) => Some(self.secret(API_KEY_VAR, key, &format!("{} ", scheme))),
            Some(Auth::Custom { scheme, credentials }) => Some(Fragment::Literal(
                request
                    .header("Authorization")
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} {}", scheme, credentials).trim().to_string()),
            )),
            None => None,
        };
        let mut auth_header = auth_header;

        for (name, value) in &request.headers {
            let lower = name.to_ascii_lowercase();
            match lower.as_str() {
                "content-length" => continue,
                // The client library writes the boundary itself
                "content-type" if request.is_multipart() => continue,
                "authorization" => {
                    if request.auth.is_none() {
                        self.headers.push((name.clone(), Fragment::Literal(value.clone())));
                    } else if let Some(fragment) = auth_header.take() {
                        self.headers.push((name.clone(), fragment));
                    }
                }
                _ if is_secret_header(&lower) => {
                    let fragment = self.secret(&env_name(name), value, "");
                    self.headers.push((name.clone(), fragment));
                }
                _ => self.headers.push((name.clone(), Fragment::Literal(value.clone()))),
            }
        }

        if let Some(fragment) = auth_header {
            self.headers.push(("Authorization".to_string(), fragment));
        }

        if !request.cookies.is_empty() && !request.has_header("Cookie") {
            let cookie = request
                .cookies
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("; ");
            self.headers.push(("Cookie".to_string(), Fragment::Literal(cookie)));
        }
    }

    /// Route a sensitive value through an environment variable when enabled
    fn secret(&mut self, preferred: &str, value: &str, prefix: &str) -> Fragment {
        if !self.options.extract_env_vars {
            return Fragment::Literal(format!("{}{}", prefix, value));
        }
        let mut var = preferred.to_string();
        let mut n = 2;
        while self.env_vars.contains_key(&var) {
            var = format!("{}_{}", preferred, n);
            n += 1;
        }
        self.env_vars.insert(var.clone(), value.to_string());
        Fragment::Env { var, prefix: prefix.to_string() }
    }

    pub fn indent(&self) -> String {
        self.options.indent_unit()
    }

    pub fn writer(&self) -> CodeWriter {
        CodeWriter::new(self.indent())
    }

    pub fn comments(&self) -> bool {
        self.options.include_comments
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.options.error_handling
    }

    pub fn guarded(&self) -> bool {
        self.options.error_handling != ErrorHandling::None
    }

    pub fn checks_status(&self) -> bool {
        self.options.error_handling == ErrorHandling::Comprehensive
    }

    /// Effective timeout: the option wins over `--max-time`
    pub fn timeout_ms(&self) -> Option<u64> {
        self.options
            .timeout
            .or_else(|| self.request.options.timeout.map(|secs| (secs * 1000.0).round() as u64))
    }

    /// Whether the generated code should decode the response as JSON
    pub fn expects_json(&self) -> bool {
        self.options.sample_response.is_some()
            || self.request.header("Accept").is_some_and(|v| v.contains("json"))
            || matches!(self.request.body, Some(Body::Json(_)))
    }

    pub fn has_query(&self) -> bool {
        !self.request.query_params.is_empty()
    }

    /// `METHOD url` summary line
    pub fn summary(&self) -> String {
        format!("{} {}", self.request.method, self.request.full_url())
    }

    /// Retry scaffold comment text, without comment markers
    pub fn retry_lines(&self) -> Vec<String> {
        if !self.options.retry_logic {
            return Vec::new();
        }
        vec![
            format!(
                "Retry policy: up to {} attempts with exponential backoff.",
                self.options.retry_attempts.max(1)
            ),
            "Wrap the request below in a loop and wait 2^attempt * 100 ms between failed attempts.".to_string(),
        ]
    }

    /// `RequestBody` and `ResponseData` declarations, when types are enabled
    pub fn type_declarations(&self, dialect: TypeDialect) -> Option<String> {
        if !self.options.include_types {
            return None;
        }
        let indent = self.indent();
        let mut blocks = Vec::new();
        if let Some(body) = self.request.json_body() {
            blocks.push(declarations_for(body, "RequestBody", dialect, &indent));
        }
        if let Some(sample) = &self.options.sample_response {
            blocks.push(declarations_for(sample, "ResponseData", dialect, &indent));
        }
        if blocks.is_empty() {
            None
        } else {
            Some(blocks.join("\n\n"))
        }
    }

    /// Whether `RequestBody` was declared
    pub fn typed_body(&self) -> bool {
        self.options.include_types && self.request.json_body().is_some()
    }

    /// Whether `ResponseData` was declared
    pub fn typed_response(&self) -> bool {
        self.options.include_types && self.options.sample_response.is_some()
    }
}

/// Milliseconds as a seconds literal: `5000` -> `5.0`, `250` -> `0.25`
pub fn seconds_literal(ms: u64) -> String {
    let secs = ms as f64 / 1000.0;
    if secs.fract() == 0.0 {
        format!("{:.1}", secs)
    } else {
        secs.to_string()
    }
}

fn is_secret_header(lower: &str) -> bool {
    lower != "authorization" && (lower.contains("key") || lower.contains("token"))
}

/// `X-API-Key` -> `X_API_KEY`
pub fn env_name(header: &str) -> String {
    header
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}
