//! JavaScript and TypeScript backends (fetch, axios)

use tracing::debug;

use crate::errors::Result;
use crate::models::{Body, GeneratedCode, GenerationOptions, MultipartField, ParsedRequest};
use crate::types::TypeDialect;

use super::context::{RenderContext, Syntax};
use super::literal::{js_string, render_value, JS_LITERAL};
use super::writer::CodeWriter;
use super::{finish, CodeGenerator, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Client {
    Fetch,
    Axios,
}

pub fn register(registry: &mut Registry) {
    registry.insert(("javascript", "fetch"), |o| Box::new(JavaScriptGenerator::new(o, false, Client::Fetch)));
    registry.insert(("javascript", "axios"), |o| Box::new(JavaScriptGenerator::new(o, false, Client::Axios)));
    registry.insert(("typescript", "fetch"), |o| Box::new(JavaScriptGenerator::new(o, true, Client::Fetch)));
    registry.insert(("typescript", "axios"), |o| Box::new(JavaScriptGenerator::new(o, true, Client::Axios)));
}

struct JsSyntax {
    typescript: bool,
}

impl Syntax for JsSyntax {
    fn string(&self, s: &str) -> String {
        js_string(s)
    }

    fn env(&self, var: &str) -> String {
        if self.typescript {
            format!("(process.env.{} ?? '')", var)
        } else {
            format!("process.env.{}", var)
        }
    }
}

pub struct JavaScriptGenerator {
    options: GenerationOptions,
    typescript: bool,
    client: Client,
}

impl JavaScriptGenerator {
    fn new(options: GenerationOptions, typescript: bool, client: Client) -> Self {
        Self { options, typescript, client }
    }

    fn syntax(&self) -> JsSyntax {
        JsSyntax { typescript: self.typescript }
    }

    fn reads_files(&self, request: &ParsedRequest) -> bool {
        let o = &request.options;
        !request.files.is_empty()
            || request.body.as_ref().and_then(Body::file_reference).is_some()
            || (self.needs_agent(request) && (o.cert.is_some() || o.key.is_some() || o.cacert.is_some()))
    }

    fn needs_agent(&self, request: &ParsedRequest) -> bool {
        let o = &request.options;
        self.client == Client::Axios && (o.insecure || o.cert.is_some() || o.key.is_some() || o.cacert.is_some())
    }

    fn imports(&self, request: &ParsedRequest) -> Vec<String> {
        let mut imports = Vec::new();
        if self.client == Client::Axios {
            imports.push("import axios from 'axios';".to_string());
        }
        if self.reads_files(request) {
            imports.push("import fs from 'node:fs';".to_string());
        }
        if self.needs_agent(request) {
            imports.push("import https from 'node:https';".to_string());
        }
        imports
    }

    fn dependencies(&self) -> Vec<String> {
        let mut deps = Vec::new();
        if self.client == Client::Axios {
            deps.push("axios".to_string());
        }
        if self.typescript {
            deps.push("typescript".to_string());
            deps.push("@types/node".to_string());
        }
        deps
    }

    fn return_type(&self, ctx: &RenderContext) -> String {
        if !self.typescript {
            return String::new();
        }
        if ctx.typed_response() {
            ": Promise<ResponseData>".to_string()
        } else {
            ": Promise<unknown>".to_string()
        }
    }

    /// url, params, headers and body declarations
    fn preamble(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let syntax = self.syntax();
        let request = ctx.request;

        if ctx.has_query() {
            match self.client {
                Client::Fetch => {
                    w.line("const params = new URLSearchParams({");
                    w.indent();
                    for (k, v) in &request.query_params {
                        w.line(format!("{}: {},", js_string(k), js_string(v)));
                    }
                    w.dedent();
                    w.line("});");
                    w.line(format!("const url = {} + params.toString();", js_string(&format!("{}?", request.url))));
                }
                Client::Axios => {
                    w.line("const url = ".to_string() + &js_string(&request.url) + ";");
                    w.line("const params = {");
                    w.indent();
                    for (k, v) in &request.query_params {
                        w.line(format!("{}: {},", js_string(k), js_string(v)));
                    }
                    w.dedent();
                    w.line("};");
                }
            }
        } else {
            w.line(format!("const url = {};", js_string(&request.url)));
        }

        let fetch_basic = self.client == Client::Fetch && ctx.basic_auth.is_some();
        if !ctx.headers.is_empty() || fetch_basic {
            let annotation = if self.typescript { ": Record<string, string>" } else { "" };
            if ctx.headers.is_empty() {
                w.line(format!("const headers{} = {{}};", annotation));
            } else {
                w.line(format!("const headers{} = {{", annotation));
                w.indent();
                for (name, value) in &ctx.headers {
                    w.line(format!("{}: {},", js_string(name), syntax.fragment(value)));
                }
                w.dedent();
                w.line("};");
            }
            if let (true, Some((user, pass))) = (fetch_basic, &ctx.basic_auth) {
                w.line(format!(
                    "headers['Authorization'] = 'Basic ' + btoa({} + ':' + {});",
                    syntax.fragment(user),
                    syntax.fragment(pass)
                ));
            }
        }

        match &request.body {
            Some(Body::Json(value)) => {
                let annotation = if self.typescript && ctx.typed_body() { ": RequestBody" } else { "" };
                let literal = render_value(value, &JS_LITERAL, w.unit(), 0);
                w.lines(format!("const body{} = {};", annotation, literal));
            }
            Some(Body::Form(pairs)) => {
                w.line("const body = new URLSearchParams();");
                for (k, v) in pairs {
                    w.line(format!("body.append({}, {});", js_string(k), js_string(v)));
                }
            }
            Some(Body::Multipart(fields)) => {
                w.line("const body = new FormData();");
                for field in fields {
                    match field {
                        MultipartField::Text { name, value } => {
                            w.line(format!("body.append({}, {});", js_string(name), js_string(value)));
                        }
                        MultipartField::File { index } => {
                            let Some(file) = request.files.get(*index) else { continue };
                            let blob_options = file
                                .content_type
                                .as_ref()
                                .map(|ct| format!(", {{ type: {} }}", js_string(ct)))
                                .unwrap_or_default();
                            w.line(format!(
                                "body.append({}, new Blob([fs.readFileSync({})]{}), {});",
                                js_string(&file.field_name),
                                js_string(&file.file_name),
                                blob_options,
                                js_string(&file.file_name)
                            ));
                        }
                    }
                }
            }
            Some(Body::Raw(text)) => {
                w.line(format!("const body = {};", js_string(text)));
            }
            Some(Body::Binary(inline)) => {
                w.line(format!("const body = {};", js_string(inline)));
            }
            Some(Body::File(path)) => {
                w.line(format!("const body = fs.readFileSync({});", js_string(path)));
            }
            None => {}
        }
    }

    fn fetch_init(&self, ctx: &RenderContext) -> Vec<String> {
        let request = ctx.request;
        let mut init = vec![format!("method: {},", js_string(request.method.as_str()))];
        if !ctx.headers.is_empty() || ctx.basic_auth.is_some() {
            init.push("headers,".to_string());
        }
        match &request.body {
            Some(Body::Json(_)) => init.push("body: JSON.stringify(body),".to_string()),
            Some(_) => init.push("body,".to_string()),
            None => {}
        }
        if request.options.follow_redirects {
            init.push("redirect: 'follow',".to_string());
        } else {
            init.push("redirect: 'manual',".to_string());
        }
        if let Some(ms) = ctx.timeout_ms() {
            init.push(format!("signal: AbortSignal.timeout({}),", ms));
        }
        init
    }

    fn axios_config(&self, ctx: &RenderContext) -> Vec<String> {
        let syntax = self.syntax();
        let request = ctx.request;
        let o = &request.options;
        let mut config = vec![format!("method: {},", js_string(&request.method.as_lower())), "url,".to_string()];
        if ctx.has_query() {
            config.push("params,".to_string());
        }
        if !ctx.headers.is_empty() {
            config.push("headers,".to_string());
        }
        if request.body.is_some() {
            config.push("data: body,".to_string());
        }
        if let Some((user, pass)) = &ctx.basic_auth {
            config.push(format!(
                "auth: {{ username: {}, password: {} }},",
                syntax.fragment(user),
                syntax.fragment(pass)
            ));
        }
        if let Some(ms) = ctx.timeout_ms() {
            config.push(format!("timeout: {},", ms));
        }
        if !o.follow_redirects {
            config.push("maxRedirects: 0,".to_string());
        } else if let Some(max) = o.max_redirects {
            config.push(format!("maxRedirects: {},", max));
        }
        if let Some(proxy) = o.proxy.as_deref().and_then(proxy_parts) {
            config.push(format!(
                "proxy: {{ protocol: {}, host: {}, port: {} }},",
                js_string(&proxy.0),
                js_string(&proxy.1),
                proxy.2
            ));
        }
        if self.needs_agent(request) {
            let mut agent = Vec::new();
            if o.insecure {
                agent.push("rejectUnauthorized: false".to_string());
            }
            if let Some(cert) = &o.cert {
                agent.push(format!("cert: fs.readFileSync({})", js_string(cert)));
            }
            if let Some(key) = &o.key {
                agent.push(format!("key: fs.readFileSync({})", js_string(key)));
            }
            if let Some(ca) = &o.cacert {
                agent.push(format!("ca: fs.readFileSync({})", js_string(ca)));
            }
            config.push(format!("httpsAgent: new https.Agent({{ {} }}),", agent.join(", ")));
        }
        if ctx.checks_status() {
            config.push("validateStatus: () => true,".to_string());
        }
        config
    }

    fn status_check(&self, w: &mut CodeWriter, status: &str, ok: &str) {
        w.block(format!("if ({}) {{", ok), "}", |w| {
            w.line(format!("throw new Error(`Request failed with status ${{{}}}`);", status));
        });
    }

    fn parse_expr(&self, ctx: &RenderContext, awaited: bool) -> String {
        let method = if ctx.expects_json() { "json" } else { "text" };
        let call = format!("response.{}()", method);
        match (awaited, self.typescript && ctx.typed_response() && method == "json") {
            (true, true) => format!("(await {}) as ResponseData", call),
            (true, false) => format!("await {}", call),
            (false, true) => format!("{} as Promise<ResponseData>", call),
            (false, false) => call,
        }
    }

    /// Body of the function for the awaiting style
    fn await_call(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let (open, config) = match self.client {
            Client::Fetch => ("const response = await fetch(url, {".to_string(), self.fetch_init(ctx)),
            Client::Axios => {
                let generic = if self.typescript && ctx.typed_response() { "<ResponseData>" } else { "" };
                (format!("const response = await axios.request{}({{", generic), self.axios_config(ctx))
            }
        };
        w.line(open);
        w.indent();
        for entry in &config {
            w.line(entry);
        }
        w.dedent();
        w.line("});");

        match self.client {
            Client::Fetch => {
                if ctx.checks_status() {
                    self.status_check(w, "response.status", "!response.ok");
                }
                w.line(format!("const data = {};", self.parse_expr(ctx, true)));
                w.line("return data;");
            }
            Client::Axios => {
                if ctx.checks_status() {
                    self.status_check(w, "response.status", "response.status < 200 || response.status >= 300");
                }
                w.line("return response.data;");
            }
        }
    }

    /// `return fetch(...).then(...)` chain for the promise style
    fn promise_chain(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let (open, config) = match self.client {
            Client::Fetch => ("return fetch(url, {".to_string(), self.fetch_init(ctx)),
            Client::Axios => {
                let generic = if self.typescript && ctx.typed_response() { "<ResponseData>" } else { "" };
                (format!("return axios.request{}({{", generic), self.axios_config(ctx))
            }
        };
        w.line(open);
        w.indent();
        for entry in &config {
            w.line(entry);
        }
        w.dedent();
        w.line("})");
        w.indent();
        w.block(".then((response) => {", "})", |w| match self.client {
            Client::Fetch => {
                if ctx.checks_status() {
                    self.status_check(w, "response.status", "!response.ok");
                }
                w.line(format!("return {};", self.parse_expr(ctx, false)));
            }
            Client::Axios => {
                if ctx.checks_status() {
                    self.status_check(w, "response.status", "response.status < 200 || response.status >= 300");
                }
                w.line("return response.data;");
            }
        });
        if ctx.guarded() {
            w.block(".catch((error) => {", "})", |w| {
                w.line("console.error('Request failed:', error);");
                w.line("throw error;");
            });
        }
        w.dedent();
        w.terminate(";");
    }

    fn render(&self, ctx: &RenderContext) -> (String, Vec<String>, Option<String>) {
        let request = ctx.request;
        let imports = self.imports(request);
        let types = if self.typescript { ctx.type_declarations(TypeDialect::TypeScript) } else { None };
        let mut w = ctx.writer();

        for import in &imports {
            w.line(import);
        }
        w.blank();

        if ctx.comments() {
            w.line(format!("// {}", ctx.summary()));
            for note in self.notes(request) {
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

        let asynchronous = self.options.async_style;
        let signature = format!(
            "export {}function makeRequest(){} {{",
            if asynchronous { "async " } else { "" },
            self.return_type(ctx)
        );
        w.block(signature, "}", |w| {
            self.preamble(ctx, w);
            w.blank();
            if !asynchronous {
                self.promise_chain(ctx, w);
            } else if ctx.guarded() {
                w.block("try {", "} catch (error) {", |w| self.await_call(ctx, w));
                w.indent();
                w.line("console.error('Request failed:', error);");
                w.line("throw error;");
                w.dedent();
                w.line("}");
            } else {
                self.await_call(ctx, w);
            }
        });

        if ctx.comments() {
            w.blank();
            w.line("// Example usage");
            if asynchronous {
                w.line("const data = await makeRequest();");
                w.line("console.log(data);");
            } else {
                w.line("makeRequest().then((data) => console.log(data));");
            }
        }

        (w.finish(), imports, types)
    }

    fn test_scaffold(&self) -> String {
        let mut w = CodeWriter::new(self.options.indent_unit());
        w.line("import { test } from 'node:test';");
        w.line("import assert from 'node:assert/strict';");
        w.line("import { makeRequest } from './request.js';");
        w.blank();
        w.block("test('makeRequest returns a response body', async () => {", "});", |w| {
            w.line("const data = await makeRequest();");
            w.line("assert.notEqual(data, undefined);");
        });
        w.finish()
    }
}

/// Split a proxy URL into protocol, host and port
fn proxy_parts(proxy: &str) -> Option<(String, String, u16)> {
    let with_scheme = if proxy.contains("://") { proxy.to_string() } else { format!("http://{}", proxy) };
    let parsed = url::Url::parse(&with_scheme).ok()?;
    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default()?;
    Some((parsed.scheme().to_string(), host, port))
}

impl CodeGenerator for JavaScriptGenerator {
    fn language(&self) -> &'static str {
        if self.typescript {
            "typescript"
        } else {
            "javascript"
        }
    }

    fn framework(&self) -> &'static str {
        match self.client {
            Client::Fetch => "fetch",
            Client::Axios => "axios",
        }
    }

    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode> {
        let ctx = RenderContext::new(request, &self.options);
        let (code, imports, types) = self.render(&ctx);
        debug!(language = self.language(), framework = self.framework(), "Rendered JavaScript");

        let generated = GeneratedCode {
            code,
            types,
            test_scaffold: self.options.include_tests.then(|| self.test_scaffold()),
            imports,
            dependencies: self.dependencies(),
            ..GeneratedCode::default()
        };
        Ok(finish(&ctx, self.language(), self.framework(), generated))
    }

    fn notes(&self, request: &ParsedRequest) -> Vec<String> {
        let o = &request.options;
        let mut notes = Vec::new();
        if self.client == Client::Fetch {
            if o.insecure {
                notes.push("fetch cannot disable TLS verification per request; --insecure was dropped".to_string());
            }
            if o.proxy.is_some() {
                notes.push("fetch has no proxy option; configure a proxy agent to honour --proxy".to_string());
            }
            if o.cert.is_some() || o.key.is_some() || o.cacert.is_some() {
                notes.push("fetch does not support client certificates; certificate flags were dropped".to_string());
            }
            if o.max_redirects.is_some() {
                notes.push("fetch cannot limit the number of redirects; --max-redirs was dropped".to_string());
            }
        } else if let Some(proxy) = &o.proxy {
            if proxy_parts(proxy).is_none() {
                notes.push(format!("could not parse proxy '{}'; it was dropped", proxy));
            }
        }
        notes
    }
}
