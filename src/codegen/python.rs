//! Python backends (requests, httpx)

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::{ConvertError, Result};
use crate::models::{Body, GeneratedCode, GenerationOptions, HttpMethod, MultipartField, ParsedRequest};

use super::context::{seconds_literal, RenderContext, Syntax};
use super::literal::{python_string, render_value, PYTHON_LITERAL};
use super::writer::CodeWriter;
use super::{finish, CodeGenerator, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Client {
    Requests,
    Httpx,
}

pub fn register(registry: &mut Registry) {
    registry.insert(("python", "requests"), |o| Box::new(PythonGenerator::new(o, Client::Requests)));
    registry.insert(("python", "httpx"), |o| Box::new(PythonGenerator::new(o, Client::Httpx)));
}

struct PySyntax;

impl Syntax for PySyntax {
    fn string(&self, s: &str) -> String {
        python_string(s)
    }

    fn env(&self, var: &str) -> String {
        format!("os.environ[\"{}\"]", var)
    }
}

pub struct PythonGenerator {
    options: GenerationOptions,
    client: Client,
}

impl PythonGenerator {
    fn new(options: GenerationOptions, client: Client) -> Self {
        Self { options, client }
    }

    fn is_async(&self) -> bool {
        self.client == Client::Httpx && self.options.async_style
    }

    fn module(&self) -> &'static str {
        match self.client {
            Client::Requests => "requests",
            Client::Httpx => "httpx",
        }
    }

    fn imports(&self, ctx: &RenderContext) -> Vec<String> {
        let request = ctx.request;
        let mut imports = Vec::new();
        if self.is_async() {
            imports.push("import asyncio".to_string());
        }
        if !ctx.env_vars.is_empty() {
            imports.push("import os".to_string());
        }
        if !request.files.is_empty() || request.body.as_ref().and_then(Body::file_reference).is_some() {
            imports.push("from pathlib import Path".to_string());
        }
        imports.push(format!("import {}", self.module()));
        imports
    }

    /// Keyword name used to pass the body
    fn body_keyword(&self, body: &Body) -> &'static str {
        match (body, self.client) {
            (Body::Json(_), _) => "json",
            (Body::Form(_), _) | (Body::Multipart(_), _) => "data",
            (Body::Raw(_) | Body::Binary(_) | Body::File(_), Client::Requests) => "data",
            (Body::Raw(_) | Body::Binary(_) | Body::File(_), Client::Httpx) => "content",
        }
    }

    fn preamble(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let request = ctx.request;
        w.line(format!("url = {}", python_string(&request.url)));

        if ctx.has_query() {
            w.block("params = {", "}", |w| {
                for (k, v) in &request.query_params {
                    w.line(format!("{}: {},", python_string(k), python_string(v)));
                }
            });
        }

        if !ctx.headers.is_empty() {
            w.block("headers = {", "}", |w| {
                for (name, value) in &ctx.headers {
                    w.line(format!("{}: {},", python_string(name), PySyntax.fragment(value)));
                }
            });
        }

        if let Some((user, pass)) = &ctx.basic_auth {
            w.line(format!("auth = ({}, {})", PySyntax.fragment(user), PySyntax.fragment(pass)));
        }

        match &request.body {
            Some(Body::Json(value)) => {
                w.lines(format!("payload = {}", render_value(value, &PYTHON_LITERAL, w.unit(), 0)));
            }
            Some(Body::Form(pairs)) => {
                w.block("payload = {", "}", |w| {
                    for (k, values) in group_pairs(pairs) {
                        let value = match values.as_slice() {
                            [single] => python_string(single),
                            many => format!(
                                "[{}]",
                                many.iter().map(|v| python_string(v)).collect::<Vec<_>>().join(", ")
                            ),
                        };
                        w.line(format!("{}: {},", python_string(&k), value));
                    }
                });
            }
            Some(Body::Multipart(fields)) => {
                w.block("payload = {", "}", |w| {
                    for field in fields {
                        if let MultipartField::Text { name, value } = field {
                            w.line(format!("{}: {},", python_string(name), python_string(value)));
                        }
                    }
                });
                w.block("files = {", "}", |w| {
                    for file in &request.files {
                        let content_type = file
                            .content_type
                            .as_ref()
                            .map(|ct| format!(", {}", python_string(ct)))
                            .unwrap_or_default();
                        w.line(format!(
                            "{}: ({}, Path({}).read_bytes(){}),",
                            python_string(&file.field_name),
                            python_string(&file.file_name),
                            python_string(&file.file_name),
                            content_type
                        ));
                    }
                });
            }
            Some(Body::Raw(text)) => {
                w.line(format!("payload = {}", python_string(text)));
            }
            Some(Body::Binary(inline)) => {
                w.line(format!("payload = {}", python_string(inline)));
            }
            Some(Body::File(path)) => {
                w.line(format!("payload = Path({}).read_bytes()", python_string(path)));
            }
            None => {}
        }
    }

    /// Transport settings, as keyword arguments
    fn transport_kwargs(&self, ctx: &RenderContext) -> Vec<String> {
        let o = &ctx.request.options;
        let mut kwargs = Vec::new();
        if let Some(ms) = ctx.timeout_ms() {
            kwargs.push(format!("timeout={}", seconds_literal(ms)));
        }
        match (o.follow_redirects, self.client) {
            (true, Client::Requests) => kwargs.push("allow_redirects=True".to_string()),
            (true, Client::Httpx) => kwargs.push("follow_redirects=True".to_string()),
            // httpx does not follow redirects unless asked
            (false, Client::Requests) => kwargs.push("allow_redirects=False".to_string()),
            (false, Client::Httpx) => {}
        }
        if self.client == Client::Httpx {
            if let Some(max) = o.max_redirects {
                kwargs.push(format!("max_redirects={}", max));
            }
        }
        if o.insecure {
            kwargs.push("verify=False".to_string());
        } else if let Some(ca) = &o.cacert {
            kwargs.push(format!("verify={}", python_string(ca)));
        }
        if let Some(proxy) = &o.proxy {
            kwargs.push(match self.client {
                Client::Requests => format!(
                    "proxies={{\"http\": {}, \"https\": {}}}",
                    python_string(proxy),
                    python_string(proxy)
                ),
                Client::Httpx => format!("proxy={}", python_string(proxy)),
            });
        }
        match (&o.cert, &o.key) {
            (Some(cert), Some(key)) => kwargs.push(format!("cert=({}, {})", python_string(cert), python_string(key))),
            (Some(cert), None) => kwargs.push(format!("cert={}", python_string(cert))),
            _ => {}
        }
        kwargs
    }

    /// Per-request keyword arguments
    fn request_kwargs(&self, ctx: &RenderContext) -> Vec<String> {
        let request = ctx.request;
        let mut kwargs = vec!["url".to_string()];
        if ctx.has_query() {
            kwargs.push("params=params".to_string());
        }
        if !ctx.headers.is_empty() {
            kwargs.push("headers=headers".to_string());
        }
        if let Some(body) = &request.body {
            kwargs.push(format!("{}=payload", self.body_keyword(body)));
            if request.is_multipart() {
                kwargs.push("files=files".to_string());
            }
        }
        if ctx.basic_auth.is_some() {
            kwargs.push("auth=auth".to_string());
        }
        if self.client == Client::Requests {
            kwargs.extend(self.transport_kwargs(ctx));
        }
        kwargs
    }

    /// `requests.post(` / `client.request("GET",` and so on
    fn call_head(&self, request: &ParsedRequest, receiver: &str) -> String {
        let simple = match request.method {
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => true,
            HttpMethod::Get | HttpMethod::Delete | HttpMethod::Head | HttpMethod::Options => {
                // httpx only accepts a body on the generic entry point
                self.client == Client::Requests || request.body.is_none()
            }
            HttpMethod::Trace | HttpMethod::Connect => false,
        };
        if simple {
            format!("{}.{}(", receiver, request.method.as_lower())
        } else {
            format!("{}.request({}, ", receiver, python_string(request.method.as_str()))
        }
    }

    fn send(&self, ctx: &RenderContext, w: &mut CodeWriter, receiver: &str) {
        let head = self.call_head(ctx.request, receiver);
        let awaited = if self.is_async() { "await " } else { "" };
        let kwargs = self.request_kwargs(ctx);
        if let Some(rest) = head.strip_suffix(", ") {
            // Generic entry point takes the method first
            w.line(format!("response = {}{},", awaited, rest));
        } else {
            w.line(format!("response = {}{}", awaited, head));
        }
        w.indent();
        for kwarg in &kwargs {
            w.line(format!("{},", kwarg));
        }
        w.dedent();
        w.line(")");

        if ctx.checks_status() {
            let failed = match self.client {
                Client::Requests => "if not response.ok:",
                Client::Httpx => "if response.is_error:",
            };
            w.scope(failed, |w| {
                w.line("raise RuntimeError(f\"Request failed with status {response.status_code}\")");
            });
        }
        w.line(if ctx.expects_json() { "return response.json()" } else { "return response.text" });
    }

    fn guarded_send(&self, ctx: &RenderContext, w: &mut CodeWriter, receiver: &str) {
        if !ctx.guarded() {
            self.send(ctx, w, receiver);
            return;
        }
        w.scope("try:", |w| self.send(ctx, w, receiver));
        w.scope(format!("except {}.{} as exc:", self.module(), self.exception()), |w| {
            w.line("print(f\"Request failed: {exc}\")");
            w.line("raise");
        });
    }

    fn exception(&self) -> &'static str {
        match self.client {
            Client::Requests => "RequestException",
            Client::Httpx => "HTTPError",
        }
    }

    fn render(&self, ctx: &RenderContext) -> (String, Vec<String>) {
        let request = ctx.request;
        let imports = self.imports(ctx);
        let mut w = ctx.writer();

        for import in &imports {
            w.line(import);
        }
        w.blank();

        for note in ctx.comments().then(|| self.notes(request)).unwrap_or_default() {
            w.line(format!("# Note: {}", note));
        }
        for line in ctx.retry_lines() {
            w.line(format!("# {}", line));
        }
        w.blank();

        let def = if self.is_async() { "async def make_request():" } else { "def make_request():" };
        w.scope(def, |w| {
            if ctx.comments() {
                w.line(format!("\"\"\"{}\"\"\"", ctx.summary().replace('\\', "\\\\").replace('"', "\\\"")));
            }
            self.preamble(ctx, w);
            w.blank();
            match self.client {
                Client::Requests => self.guarded_send(ctx, w, "requests"),
                Client::Httpx => {
                    let settings = self.transport_kwargs(ctx).join(", ");
                    let (kind, with) = if self.is_async() {
                        ("AsyncClient", "async with")
                    } else {
                        ("Client", "with")
                    };
                    w.scope(format!("{} httpx.{}({}) as client:", with, kind, settings), |w| {
                        self.guarded_send(ctx, w, "client")
                    });
                }
            }
        });

        if ctx.comments() {
            w.blank();
            w.line("# Example usage");
            w.scope("if __name__ == \"__main__\":", |w| {
                if self.is_async() {
                    w.line("print(asyncio.run(make_request()))");
                } else {
                    w.line("print(make_request())");
                }
            });
        }

        (w.finish(), imports)
    }

    fn test_scaffold(&self) -> String {
        let mut w = CodeWriter::new(self.options.indent_unit());
        if self.is_async() {
            w.line("import asyncio");
            w.blank();
        }
        w.line("from request import make_request");
        w.blank();
        w.blank();
        w.scope("def test_make_request_returns_body():", |w| {
            if self.is_async() {
                w.line("data = asyncio.run(make_request())");
            } else {
                w.line("data = make_request()");
            }
            w.line("assert data is not None");
        });
        w.finish()
    }
}

/// Group form pairs by key, keeping first-seen order
fn group_pairs(pairs: &[(String, String)]) -> IndexMap<String, Vec<String>> {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();
    for (k, v) in pairs {
        grouped.entry(k.clone()).or_default().push(v.clone());
    }
    grouped
}

impl CodeGenerator for PythonGenerator {
    fn language(&self) -> &'static str {
        "python"
    }

    fn framework(&self) -> &'static str {
        self.module()
    }

    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode> {
        if self.options.indent_unit().is_empty() {
            return Err(ConvertError::Generation(
                "Python blocks need indentation; indent size must be at least 1".to_string(),
            ));
        }
        let ctx = RenderContext::new(request, &self.options);
        let (code, imports) = self.render(&ctx);
        debug!(framework = self.framework(), "Rendered Python");

        let generated = GeneratedCode {
            code,
            test_scaffold: self.options.include_tests.then(|| self.test_scaffold()),
            imports,
            dependencies: vec![self.module().to_string()],
            ..GeneratedCode::default()
        };
        Ok(finish(&ctx, self.language(), self.framework(), generated))
    }

    fn notes(&self, request: &ParsedRequest) -> Vec<String> {
        let mut notes = Vec::new();
        if self.client == Client::Requests {
            if !self.options.async_style {
                notes.push("requests is blocking only; the non-blocking style is not available".to_string());
            }
            if request.options.max_redirects.is_some() {
                notes.push("requests limits redirects per session; --max-redirs was dropped".to_string());
            }
        }
        if request.options.key.is_some() && request.options.cert.is_none() {
            notes.push("--key without --cert cannot be expressed; it was dropped".to_string());
        }
        notes
    }
}
