//! Go backend (net/http)

use std::collections::BTreeSet;

use tracing::debug;

use crate::errors::Result;
use crate::models::{Body, GeneratedCode, GenerationOptions, MultipartField, ParsedRequest};
use crate::types::TypeDialect;

use super::context::{RenderContext, Syntax};
use super::literal::{go_string, render_json};
use super::writer::CodeWriter;
use super::{finish, CodeGenerator, Registry};

pub fn register(registry: &mut Registry) {
    registry.insert(("go", "net/http"), |o| Box::new(GoGenerator::new(o)));
}

struct GoSyntax;

impl Syntax for GoSyntax {
    fn string(&self, s: &str) -> String {
        go_string(s)
    }

    fn env(&self, var: &str) -> String {
        format!("os.Getenv(\"{}\")", var)
    }
}

pub struct GoGenerator {
    options: GenerationOptions,
}

impl GoGenerator {
    fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    fn client_cert(request: &ParsedRequest) -> Option<(&str, &str)> {
        match (&request.options.cert, &request.options.key) {
            (Some(cert), Some(key)) => Some((cert.as_str(), key.as_str())),
            _ => None,
        }
    }

    /// Standard library packages the rendered program uses
    fn imports(&self, ctx: &RenderContext) -> Vec<String> {
        let request = ctx.request;
        let o = &request.options;
        let mut packages: BTreeSet<&'static str> = BTreeSet::new();
        packages.insert("fmt");
        packages.insert("io");
        packages.insert("net/http");

        if ctx.guarded() || !ctx.env_vars.is_empty() || !request.files.is_empty() {
            packages.insert("os");
        }
        if ctx.has_query() || o.proxy.is_some() {
            packages.insert("net/url");
        }
        match &request.body {
            Some(Body::Json(_)) | Some(Body::Multipart(_)) => {
                packages.insert("bytes");
            }
            Some(Body::Form(_)) => {
                packages.insert("net/url");
                packages.insert("strings");
            }
            Some(Body::Raw(_)) => {
                packages.insert("strings");
            }
            Some(Body::Binary(_)) => {
                packages.insert("strings");
            }
            Some(Body::File(_)) => {
                packages.insert("bytes");
                packages.insert("os");
            }
            None => {}
        }
        if request.is_multipart() {
            packages.insert("mime/multipart");
        }
        if ctx.timeout_ms().is_some() {
            packages.insert("time");
        }
        if o.insecure || Self::client_cert(request).is_some() {
            packages.insert("crypto/tls");
        }
        if ctx.typed_response() {
            packages.insert("encoding/json");
        }
        packages.into_iter().map(|p| format!("\"{}\"", p)).collect()
    }

    /// `lhs, err := call` followed by the configured error check
    fn assign(&self, ctx: &RenderContext, w: &mut CodeWriter, lhs: &str, call: &str, wrap: Option<&str>) {
        if !ctx.guarded() {
            w.line(format!("{}, _ := {}", lhs, call));
            return;
        }
        w.line(format!("{}, err := {}", lhs, call));
        w.block("if err != nil {", "}", |w| {
            match wrap {
                Some(context) => w.line(format!("return nil, fmt.Errorf(\"{}: %w\", err)", context)),
                None => w.line("return nil, err"),
            };
        });
    }

    /// A call that only returns an error
    fn check(&self, ctx: &RenderContext, w: &mut CodeWriter, call: &str) {
        if !ctx.guarded() {
            w.line(call);
            return;
        }
        w.block(format!("if err := {}; err != nil {{", call), "}", |w| {
            w.line("return nil, err");
        });
    }

    /// Emit body preparation, returning the reader expression
    fn body(&self, ctx: &RenderContext, w: &mut CodeWriter) -> String {
        let request = ctx.request;
        match &request.body {
            Some(Body::Json(value)) => {
                let json = render_json(value, w.unit(), 0);
                let literal = if json.contains('`') { go_string(&json) } else { format!("`{}`", json) };
                w.lines(format!("payload := []byte({})", literal));
                "bytes.NewReader(payload)".to_string()
            }
            Some(Body::Form(pairs)) => {
                w.line("form := url.Values{}");
                for (k, v) in pairs {
                    w.line(format!("form.Add({}, {})", go_string(k), go_string(v)));
                }
                "strings.NewReader(form.Encode())".to_string()
            }
            Some(Body::Multipart(fields)) => {
                w.line("var buf bytes.Buffer");
                w.line("writer := multipart.NewWriter(&buf)");
                for field in fields {
                    match field {
                        MultipartField::Text { name, value } => {
                            self.check(ctx, w, &format!("writer.WriteField({}, {})", go_string(name), go_string(value)));
                        }
                        MultipartField::File { index } => {
                            let Some(file) = request.files.get(*index) else { continue };
                            // Distinct names so repeated `:=` declarations stay valid
                            let suffix = if request.files.len() > 1 { (index + 1).to_string() } else { String::new() };
                            let (data, part) = (format!("file{}", suffix), format!("part{}", suffix));
                            self.assign(ctx, w, &data, &format!("os.ReadFile({})", go_string(&file.file_name)), None);
                            self.assign(
                                ctx,
                                w,
                                &part,
                                &format!(
                                    "writer.CreateFormFile({}, {})",
                                    go_string(&file.field_name),
                                    go_string(&file.file_name)
                                ),
                                None,
                            );
                            if ctx.guarded() {
                                self.check(ctx, w, &format!("writeAll({}, {})", part, data));
                            } else {
                                w.line(format!("{}.Write({})", part, data));
                            }
                        }
                    }
                }
                self.check(ctx, w, "writer.Close()");
                "&buf".to_string()
            }
            Some(Body::Raw(text)) => {
                w.line(format!("payload := {}", go_string(text)));
                "strings.NewReader(payload)".to_string()
            }
            Some(Body::Binary(inline)) => {
                w.line(format!("payload := {}", go_string(inline)));
                "strings.NewReader(payload)".to_string()
            }
            Some(Body::File(path)) => {
                self.assign(ctx, w, "payload", &format!("os.ReadFile({})", go_string(path)), None);
                "bytes.NewReader(payload)".to_string()
            }
            None => "nil".to_string(),
        }
    }

    fn client(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let request = ctx.request;
        let o = &request.options;

        if let Some(proxy) = &o.proxy {
            self.assign(ctx, w, "proxyURL", &format!("url.Parse({})", go_string(proxy)), None);
        }
        if let Some((cert, key)) = Self::client_cert(request) {
            self.assign(
                ctx,
                w,
                "clientCert",
                &format!("tls.LoadX509KeyPair({}, {})", go_string(cert), go_string(key)),
                None,
            );
        }

        let mut tls = Vec::new();
        if o.insecure {
            tls.push("InsecureSkipVerify: true".to_string());
        }
        if Self::client_cert(request).is_some() {
            tls.push("Certificates: []tls.Certificate{clientCert}".to_string());
        }

        let mut transport = Vec::new();
        if o.proxy.is_some() {
            transport.push("Proxy: http.ProxyURL(proxyURL),".to_string());
        }
        if !tls.is_empty() {
            transport.push(format!("TLSClientConfig: &tls.Config{{{}}},", tls.join(", ")));
        }

        let timeout = ctx.timeout_ms();
        // Without -L the first response is returned as is
        let limit = if o.follow_redirects { o.max_redirects } else { Some(0) };
        if timeout.is_none() && transport.is_empty() && limit.is_none() {
            w.line("client := &http.Client{}");
            return;
        }

        w.block("client := &http.Client{", "}", |w| {
            if let Some(ms) = timeout {
                w.line(format!("Timeout: {} * time.Millisecond,", ms));
            }
            if !transport.is_empty() {
                w.block("Transport: &http.Transport{", "},", |w| {
                    for entry in &transport {
                        w.line(entry);
                    }
                });
            }
            match limit {
                Some(0) => {
                    w.block("CheckRedirect: func(req *http.Request, via []*http.Request) error {", "},", |w| {
                        w.line("return http.ErrUseLastResponse");
                    });
                }
                Some(max) => {
                    w.block("CheckRedirect: func(req *http.Request, via []*http.Request) error {", "},", |w| {
                        w.block(format!("if len(via) >= {} {{", max), "}", |w| {
                            w.line("return http.ErrUseLastResponse");
                        });
                        w.line("return nil");
                    });
                }
                None => {}
            }
        });
    }

    fn make_request(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let request = ctx.request;
        w.block("func makeRequest() ([]byte, error) {", "}", |w| {
            if ctx.has_query() {
                w.line("params := url.Values{}");
                for (k, v) in &request.query_params {
                    w.line(format!("params.Add({}, {})", go_string(k), go_string(v)));
                }
                w.line(format!("reqURL := {} + params.Encode()", go_string(&format!("{}?", request.url))));
            } else {
                w.line(format!("reqURL := {}", go_string(&request.url)));
            }
            w.blank();

            let reader = self.body(ctx, w);
            self.assign(
                ctx,
                w,
                "req",
                &format!("http.NewRequest({}, reqURL, {})", go_string(request.method.as_str()), reader),
                None,
            );
            for (name, value) in &ctx.headers {
                w.line(format!("req.Header.Set({}, {})", go_string(name), GoSyntax.fragment(value)));
            }
            if request.is_multipart() {
                w.line("req.Header.Set(\"Content-Type\", writer.FormDataContentType())");
            }
            if let Some((user, pass)) = &ctx.basic_auth {
                w.line(format!("req.SetBasicAuth({}, {})", GoSyntax.fragment(user), GoSyntax.fragment(pass)));
            }
            w.blank();

            self.client(ctx, w);
            self.assign(ctx, w, "resp", "client.Do(req)", Some("request failed"));
            w.line("defer resp.Body.Close()");
            w.blank();

            if ctx.checks_status() {
                w.block("if resp.StatusCode < 200 || resp.StatusCode >= 300 {", "}", |w| {
                    w.line("return nil, fmt.Errorf(\"unexpected status: %s\", resp.Status)");
                });
            }
            w.line("return io.ReadAll(resp.Body)");
        });
    }

    fn main_fn(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        w.block("func main() {", "}", |w| {
            if ctx.guarded() {
                w.line("body, err := makeRequest()");
                w.block("if err != nil {", "}", |w| {
                    w.line("fmt.Fprintln(os.Stderr, \"Request failed:\", err)");
                    w.line("os.Exit(1)");
                });
            } else {
                w.line("body, _ := makeRequest()");
            }
            if ctx.typed_response() {
                w.line("var data ResponseData");
                if ctx.guarded() {
                    w.block("if err := json.Unmarshal(body, &data); err != nil {", "}", |w| {
                        w.line("fmt.Fprintln(os.Stderr, \"Invalid response:\", err)");
                        w.line("os.Exit(1)");
                    });
                } else {
                    w.line("json.Unmarshal(body, &data)");
                }
                w.line("fmt.Printf(\"%+v\\n\", data)");
            } else {
                w.line("fmt.Println(string(body))");
            }
        });
    }

    fn render(&self, ctx: &RenderContext) -> (String, Vec<String>, Option<String>) {
        let imports = self.imports(ctx);
        let types = ctx.type_declarations(TypeDialect::Go);
        let mut w = ctx.writer();

        w.line("package main");
        w.blank();
        w.block("import (", ")", |w| {
            for import in &imports {
                w.line(import);
            }
        });
        w.blank();

        if ctx.comments() {
            w.line(format!("// {}", ctx.summary()));
            for note in self.notes(ctx.request) {
                w.line(format!("// Note: {}", note));
            }
        }
        for line in ctx.retry_lines() {
            w.line(format!("// {}", line));
        }
        w.blank();

        if let Some(types) = &types {
            w.lines(types);
            w.blank();
        }

        if ctx.request.is_multipart() && ctx.guarded() {
            w.block("func writeAll(w io.Writer, data []byte) error {", "}", |w| {
                w.line("_, err := w.Write(data)");
                w.line("return err");
            });
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
        w.line("package main");
        w.blank();
        w.line("import \"testing\"");
        w.blank();
        w.block("func TestMakeRequest(t *testing.T) {", "}", |w| {
            w.line("body, err := makeRequest()");
            w.block("if err != nil {", "}", |w| {
                w.line("t.Fatalf(\"makeRequest failed: %v\", err)");
            });
            w.block("if len(body) == 0 {", "}", |w| {
                w.line("t.Log(\"empty response body\")");
            });
        });
        w.finish()
    }
}

impl CodeGenerator for GoGenerator {
    fn language(&self) -> &'static str {
        "go"
    }

    fn framework(&self) -> &'static str {
        "net/http"
    }

    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode> {
        let ctx = RenderContext::new(request, &self.options);
        let (code, imports, types) = self.render(&ctx);
        debug!(imports = imports.len(), "Rendered Go");

        let generated = GeneratedCode {
            code,
            types,
            test_scaffold: self.options.include_tests.then(|| self.test_scaffold()),
            imports,
            ..GeneratedCode::default()
        };
        Ok(finish(&ctx, self.language(), self.framework(), generated))
    }

    fn notes(&self, request: &ParsedRequest) -> Vec<String> {
        let o = &request.options;
        let mut notes = Vec::new();
        if !self.options.async_style {
            notes.push("net/http calls are blocking; run makeRequest in a goroutine for concurrency".to_string());
        }
        if o.cacert.is_some() {
            notes.push("custom CA bundles are not wired up; --cacert was dropped".to_string());
        }
        if o.cert.is_some() != o.key.is_some() {
            notes.push("client certificates need both --cert and --key; the flag was dropped".to_string());
        }
        notes
    }
}
