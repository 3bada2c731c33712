//! Rust backend (reqwest, async or blocking)

use tracing::debug;

use crate::errors::Result;
use crate::models::{Body, GeneratedCode, GenerationOptions, HttpMethod, MultipartField, ParsedRequest};
use crate::types::TypeDialect;

use super::context::{Fragment, RenderContext, Syntax};
use super::literal::{render_json, rust_string};
use super::writer::CodeWriter;
use super::{finish, CodeGenerator, Registry};

pub fn register(registry: &mut Registry) {
    registry.insert(("rust", "reqwest"), |o| Box::new(RustGenerator::new(o)));
}

struct RustSyntax;

impl Syntax for RustSyntax {
    fn string(&self, s: &str) -> String {
        rust_string(s)
    }

    fn env(&self, var: &str) -> String {
        format!("std::env::var(\"{}\")?", var)
    }

    fn fragment(&self, fragment: &Fragment) -> String {
        match fragment {
            Fragment::Literal(s) => self.string(s),
            Fragment::Env { var, prefix } if prefix.is_empty() => self.env(var),
            Fragment::Env { var, prefix } => {
                let template = format!("{}{{}}", prefix.replace('{', "{{").replace('}', "}}"));
                format!("format!({}, {})", rust_string(&template), self.env(var))
            }
        }
    }
}

pub struct RustGenerator {
    options: GenerationOptions,
}

impl RustGenerator {
    fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    fn is_async(&self) -> bool {
        self.options.async_style
    }

    /// `reqwest::` or `reqwest::blocking::`
    fn namespace(&self) -> &'static str {
        if self.is_async() {
            "reqwest::"
        } else {
            "reqwest::blocking::"
        }
    }

    fn awaited(&self) -> &'static str {
        if self.is_async() {
            ".await"
        } else {
            ""
        }
    }

    fn reqwest_features(&self, request: &ParsedRequest) -> Vec<&'static str> {
        let mut features = Vec::new();
        if matches!(request.body, Some(Body::Json(_))) || (self.options.include_types && self.options.sample_response.is_some()) {
            features.push("json");
        }
        if request.is_multipart() {
            features.push("multipart");
        }
        if !self.is_async() {
            features.push("blocking");
        }
        if request.options.compressed {
            features.push("gzip");
        }
        features
    }

    fn dependencies(&self, ctx: &RenderContext) -> Vec<String> {
        let mut deps = vec!["reqwest".to_string()];
        if self.is_async() {
            deps.push("tokio".to_string());
        }
        if ctx.request.json_body().is_some() {
            deps.push("serde_json".to_string());
        }
        if ctx.typed_body() || ctx.typed_response() {
            deps.push("serde".to_string());
        }
        deps
    }

    fn imports(&self, ctx: &RenderContext) -> Vec<String> {
        let o = &ctx.request.options;
        let mut imports = Vec::new();
        if ctx.typed_body() || ctx.typed_response() {
            imports.push("use serde::{Deserialize, Serialize};".to_string());
        }
        if ctx.timeout_ms().is_some() || o.connect_timeout.is_some() {
            imports.push("use std::time::Duration;".to_string());
        }
        imports
    }

    fn response_type(&self, ctx: &RenderContext) -> &'static str {
        if ctx.typed_response() {
            "ResponseData"
        } else {
            "String"
        }
    }

    fn builder_calls(&self, ctx: &RenderContext) -> Vec<String> {
        let o = &ctx.request.options;
        let mut calls = Vec::new();
        if let Some(ms) = ctx.timeout_ms() {
            calls.push(format!(".timeout(Duration::from_millis({}))", ms));
        }
        if let Some(secs) = o.connect_timeout {
            calls.push(format!(".connect_timeout(Duration::from_millis({}))", (secs * 1000.0).round() as u64));
        }
        if o.insecure {
            calls.push(".danger_accept_invalid_certs(true)".to_string());
        }
        if let Some(ca) = &o.cacert {
            calls.push(format!(
                ".add_root_certificate(reqwest::Certificate::from_pem(&std::fs::read({})?)?)",
                rust_string(ca)
            ));
        }
        if let Some(proxy) = &o.proxy {
            calls.push(format!(".proxy(reqwest::Proxy::all({})?)", rust_string(proxy)));
        }
        match (o.follow_redirects, o.max_redirects) {
            (false, _) => calls.push(".redirect(reqwest::redirect::Policy::none())".to_string()),
            (true, Some(max)) => calls.push(format!(".redirect(reqwest::redirect::Policy::limited({}))", max)),
            (true, None) => {}
        }
        if o.compressed {
            calls.push(".gzip(true)".to_string());
        }
        calls
    }

    fn client(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let calls = self.builder_calls(ctx);
        if calls.is_empty() {
            w.line(format!("let client = {}Client::new();", self.namespace()));
            return;
        }
        w.line(format!("let client = {}Client::builder()", self.namespace()));
        w.indent();
        for call in &calls {
            w.line(call);
        }
        w.line(".build()?;");
        w.dedent();
    }

    /// Body declarations, returning the builder call that attaches the body
    fn body(&self, ctx: &RenderContext, w: &mut CodeWriter) -> Option<String> {
        let request = ctx.request;
        match request.body.as_ref()? {
            Body::Json(value) => {
                let json = render_json(value, w.unit(), 0);
                if ctx.typed_body() {
                    w.lines(format!("let body: RequestBody = serde_json::from_value(serde_json::json!({}))?;", json));
                } else {
                    w.lines(format!("let body = serde_json::json!({});", json));
                }
                Some(".json(&body)".to_string())
            }
            Body::Form(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("({}, {})", rust_string(k), rust_string(v)))
                    .collect();
                Some(format!(".form(&[{}])", pairs.join(", ")))
            }
            Body::Multipart(fields) => {
                let multipart = format!("{}multipart", self.namespace());
                w.line(format!("let form = {}::Form::new()", multipart));
                w.indent();
                for field in fields {
                    match field {
                        MultipartField::Text { name, value } => {
                            w.line(format!(".text({}, {})", rust_string(name), rust_string(value)));
                        }
                        MultipartField::File { index } => {
                            let Some(file) = request.files.get(*index) else { continue };
                            let mime = file
                                .content_type
                                .as_ref()
                                .map(|ct| format!(".mime_str({})?", rust_string(ct)))
                                .unwrap_or_default();
                            w.line(format!(
                                ".part({}, {}::Part::bytes(std::fs::read({})?).file_name({}){})",
                                rust_string(&file.field_name),
                                multipart,
                                rust_string(&file.file_name),
                                rust_string(&file.file_name),
                                mime
                            ));
                        }
                    }
                }
                w.terminate(";");
                w.dedent();
                Some(".multipart(form)".to_string())
            }
            Body::Raw(text) => Some(format!(".body({})", rust_string(text))),
            Body::Binary(inline) => Some(format!(".body({})", rust_string(inline))),
            Body::File(path) => Some(format!(".body(std::fs::read({})?)", rust_string(path))),
        }
    }

    fn method_call(&self, request: &ParsedRequest) -> String {
        let url = rust_string(&request.url);
        match request.method {
            HttpMethod::Get | HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete | HttpMethod::Head => {
                format!(".{}({})", request.method.as_lower(), url)
            }
            other => format!(".request(reqwest::Method::{}, {})", other.as_str(), url),
        }
    }

    fn make_request(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let request = ctx.request;
        let signature = format!(
            "{}fn make_request() -> Result<{}, Box<dyn std::error::Error>> {{",
            if self.is_async() { "async " } else { "" },
            self.response_type(ctx)
        );
        w.block(signature, "}", |w| {
            self.client(ctx, w);
            let attach = self.body(ctx, w);
            w.blank();

            w.line("let response = client");
            w.indent();
            w.line(self.method_call(request));
            if ctx.has_query() {
                let pairs: Vec<String> = request
                    .query_params
                    .iter()
                    .map(|(k, v)| format!("({}, {})", rust_string(k), rust_string(v)))
                    .collect();
                w.line(format!(".query(&[{}])", pairs.join(", ")));
            }
            for (name, value) in &ctx.headers {
                w.line(format!(".header({}, {})", rust_string(name), RustSyntax.fragment(value)));
            }
            if let Some((user, pass)) = &ctx.basic_auth {
                w.line(format!(
                    ".basic_auth({}, Some({}))",
                    RustSyntax.fragment(user),
                    RustSyntax.fragment(pass)
                ));
            }
            if let Some(attach) = attach {
                w.line(attach);
            }
            w.line(".send()");
            if self.is_async() {
                w.line(".await?;");
            } else {
                w.terminate("?;");
            }
            w.dedent();
            w.blank();

            if ctx.checks_status() {
                w.block("if !response.status().is_success() {", "}", |w| {
                    w.line("return Err(format!(\"Request failed with status {}\", response.status()).into());");
                });
                w.blank();
            }
            if ctx.typed_response() {
                w.line(format!("let data = response.json::<ResponseData>(){}?;", self.awaited()));
            } else {
                w.line(format!("let data = response.text(){}?;", self.awaited()));
            }
            w.line("Ok(data)");
        });
    }

    fn main_fn(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        if self.is_async() {
            w.line("#[tokio::main]");
        }
        let prefix = if self.is_async() { "async " } else { "" };
        let print = if ctx.typed_response() { "println!(\"{:#?}\", data)" } else { "println!(\"{}\", data)" };
        if ctx.guarded() {
            w.block(format!("{}fn main() {{", prefix), "}", |w| {
                w.block(format!("match make_request(){} {{", self.awaited()), "}", |w| {
                    w.line(format!("Ok(data) => {},", print));
                    w.block("Err(err) => {", "}", |w| {
                        w.line("eprintln!(\"Request failed: {}\", err);");
                        w.line("std::process::exit(1);");
                    });
                });
            });
        } else {
            w.block(format!("{}fn main() -> Result<(), Box<dyn std::error::Error>> {{", prefix), "}", |w| {
                w.line(format!("let data = make_request(){}?;", self.awaited()));
                w.line(format!("{};", print));
                w.line("Ok(())");
            });
        }
    }

    fn render(&self, ctx: &RenderContext) -> (String, Vec<String>, Option<String>) {
        let request = ctx.request;
        let imports = self.imports(ctx);
        let types = ctx.type_declarations(TypeDialect::Rust);
        let mut w = ctx.writer();

        if ctx.comments() {
            w.line(format!("// {}", ctx.summary()));
            w.line("//");
            w.line("// Cargo.toml:");
            let features = self.reqwest_features(request);
            if features.is_empty() {
                w.line("// reqwest = \"0.12\"");
            } else {
                let quoted: Vec<String> = features.iter().map(|f| format!("\"{}\"", f)).collect();
                w.line(format!("// reqwest = {{ version = \"0.12\", features = [{}] }}", quoted.join(", ")));
            }
            if self.is_async() {
                w.line("// tokio = { version = \"1\", features = [\"full\"] }");
            }
            if request.json_body().is_some() {
                w.line("// serde_json = \"1\"");
            }
            if ctx.typed_body() || ctx.typed_response() {
                w.line("// serde = { version = \"1\", features = [\"derive\"] }");
            }
            for note in self.notes(request) {
                w.line(format!("// Note: {}", note));
            }
        }
        for line in ctx.retry_lines() {
            w.line(format!("// {}", line));
        }
        w.blank();

        for import in &imports {
            w.line(import);
        }
        w.blank();

        if let Some(types) = &types {
            w.lines(types);
            w.blank();
        }

        self.make_request(ctx, &mut w);
        w.blank();
        if ctx.comments() {
            w.line("// Example usage");
        }
        self.main_fn(ctx, &mut w);

        (w.finish(), imports, types)
    }

    fn test_scaffold(&self) -> String {
        let mut w = CodeWriter::new(self.options.indent_unit());
        w.line("#[cfg(test)]");
        w.block("mod tests {", "}", |w| {
            w.line("use super::*;");
            w.blank();
            if self.is_async() {
                w.line("#[tokio::test]");
                w.block("async fn make_request_returns_body() {", "}", |w| {
                    w.line("let result = make_request().await;");
                    w.line("assert!(result.is_ok(), \"request failed: {:?}\", result.err());");
                });
            } else {
                w.line("#[test]");
                w.block("fn make_request_returns_body() {", "}", |w| {
                    w.line("let result = make_request();");
                    w.line("assert!(result.is_ok(), \"request failed: {:?}\", result.err());");
                });
            }
        });
        w.finish()
    }
}

impl CodeGenerator for RustGenerator {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn framework(&self) -> &'static str {
        "reqwest"
    }

    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode> {
        let ctx = RenderContext::new(request, &self.options);
        let (code, imports, types) = self.render(&ctx);
        debug!(blocking = !self.is_async(), "Rendered Rust");

        let generated = GeneratedCode {
            code,
            types,
            test_scaffold: self.options.include_tests.then(|| self.test_scaffold()),
            imports,
            dependencies: self.dependencies(&ctx),
            ..GeneratedCode::default()
        };
        Ok(finish(&ctx, self.language(), self.framework(), generated))
    }

    fn notes(&self, request: &ParsedRequest) -> Vec<String> {
        let mut notes = Vec::new();
        if request.options.cert.is_some() || request.options.key.is_some() {
            notes.push("client certificates need a TLS identity; --cert/--key were dropped".to_string());
        }
        notes
    }
}
