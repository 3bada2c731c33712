//! Ruby backend (net/http)

use tracing::debug;

use crate::errors::Result;
use crate::models::{Body, GeneratedCode, GenerationOptions, HttpMethod, MultipartField, ParsedRequest};

use super::context::{seconds_literal, RenderContext, Syntax};
use super::literal::{render_value, single_quoted, RUBY_LITERAL};
use super::writer::CodeWriter;
use super::{finish, CodeGenerator, Registry};

pub fn register(registry: &mut Registry) {
    registry.insert(("ruby", "net/http"), |o| Box::new(RubyGenerator::new(o)));
}

struct RubySyntax;

impl Syntax for RubySyntax {
    fn string(&self, s: &str) -> String {
        single_quoted(s)
    }

    fn env(&self, var: &str) -> String {
        format!("ENV.fetch('{}')", var)
    }
}

pub struct RubyGenerator {
    options: GenerationOptions,
}

impl RubyGenerator {
    fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    fn request_class(method: HttpMethod) -> String {
        match method {
            HttpMethod::Connect => "Net::HTTPGenericRequest".to_string(),
            other => {
                let lower = other.as_lower();
                let mut chars = lower.chars();
                let class = match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => lower,
                };
                format!("Net::HTTP::{}", class)
            }
        }
    }

    fn requires(&self, ctx: &RenderContext) -> Vec<String> {
        let mut requires = vec!["require 'net/http'".to_string(), "require 'uri'".to_string()];
        if ctx.request.json_body().is_some() || ctx.expects_json() {
            requires.push("require 'json'".to_string());
        }
        if ctx.request.options.insecure {
            requires.push("require 'openssl'".to_string());
        }
        requires
    }

    fn build_request(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let request = ctx.request;
        w.line(format!("uri = URI({})", single_quoted(&request.url)));
        if ctx.has_query() {
            let pairs: Vec<String> = request
                .query_params
                .iter()
                .map(|(k, v)| format!("{} => {}", single_quoted(k), single_quoted(v)))
                .collect();
            w.line(format!("uri.query = URI.encode_www_form({})", pairs.join(", ")));
        }
        w.blank();

        match request.method {
            HttpMethod::Connect => w.line("request = Net::HTTPGenericRequest.new('CONNECT', false, true, uri)"),
            method => w.line(format!("request = {}.new(uri)", Self::request_class(method))),
        };
        for (name, value) in &ctx.headers {
            w.line(format!("request[{}] = {}", single_quoted(name), RubySyntax.fragment(value)));
        }
        if let Some((user, pass)) = &ctx.basic_auth {
            w.line(format!("request.basic_auth({}, {})", RubySyntax.fragment(user), RubySyntax.fragment(pass)));
        }

        match &request.body {
            Some(Body::Json(value)) => {
                w.lines(format!("request.body = JSON.generate({})", render_value(value, &RUBY_LITERAL, w.unit(), 0)));
            }
            Some(Body::Form(pairs)) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("[{}, {}]", single_quoted(k), single_quoted(v)))
                    .collect();
                w.line(format!("request.body = URI.encode_www_form([{}])", pairs.join(", ")));
            }
            Some(Body::Multipart(fields)) => {
                w.block("form = [", "]", |w| {
                    for field in fields {
                        match field {
                            MultipartField::Text { name, value } => {
                                w.line(format!("[{}, {}],", single_quoted(name), single_quoted(value)));
                            }
                            MultipartField::File { index } => {
                                let Some(file) = request.files.get(*index) else { continue };
                                let mut opts = vec![format!("filename: {}", single_quoted(&file.file_name))];
                                if let Some(ct) = &file.content_type {
                                    opts.push(format!("content_type: {}", single_quoted(ct)));
                                }
                                w.line(format!(
                                    "[{}, File.open({}), {{ {} }}],",
                                    single_quoted(&file.field_name),
                                    single_quoted(&file.file_name),
                                    opts.join(", ")
                                ));
                            }
                        }
                    }
                });
                w.line("request.set_form(form, 'multipart/form-data')");
            }
            Some(Body::Raw(text)) => {
                w.line(format!("request.body = {}", single_quoted(text)));
            }
            Some(Body::Binary(inline)) => {
                w.line(format!("request.body = {}", single_quoted(inline)));
            }
            Some(Body::File(path)) => {
                w.line(format!("request.body = File.binread({})", single_quoted(path)));
            }
            None => {}
        }
    }

    fn connection(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let o = &ctx.request.options;
        let proxy = o.proxy.as_deref().and_then(proxy_host_port);
        match &proxy {
            Some((host, port)) => w.line(format!(
                "http = Net::HTTP.new(uri.hostname, uri.port, {}, {})",
                single_quoted(host),
                port
            )),
            None => w.line("http = Net::HTTP.new(uri.hostname, uri.port)"),
        };
        w.line("http.use_ssl = uri.scheme == 'https'");
        if o.insecure {
            w.line("http.verify_mode = OpenSSL::SSL::VERIFY_NONE");
        }
        if let Some(ca) = &o.cacert {
            w.line(format!("http.ca_file = {}", single_quoted(ca)));
        }
        if let Some(ms) = ctx.timeout_ms() {
            w.line(format!("http.read_timeout = {}", seconds_literal(ms)));
        }
        if let Some(secs) = o.connect_timeout {
            w.line(format!("http.open_timeout = {}", seconds_literal((secs * 1000.0).round() as u64)));
        }
    }

    fn send(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        w.line("response = http.request(request)");
        if ctx.checks_status() {
            w.line("raise \"Request failed with status #{response.code}\" unless response.is_a?(Net::HTTPSuccess)");
        }
        if ctx.expects_json() {
            w.line("JSON.parse(response.body)");
        } else {
            w.line("response.body");
        }
    }

    fn render(&self, ctx: &RenderContext) -> (String, Vec<String>) {
        let requires = self.requires(ctx);
        let mut w = ctx.writer();
        for line in &requires {
            w.line(line);
        }
        w.blank();
        if ctx.comments() {
            w.line(format!("# {}", ctx.summary()));
            for note in self.notes(ctx.request) {
                w.line(format!("# Note: {}", note));
            }
        }
        for line in ctx.retry_lines() {
            w.line(format!("# {}", line));
        }
        w.blank();

        w.block("def make_request", "end", |w| {
            self.build_request(ctx, w);
            w.blank();
            self.connection(ctx, w);
            w.blank();
            if ctx.guarded() {
                w.line("begin");
                w.indent();
                self.send(ctx, w);
                w.dedent();
                w.line("rescue StandardError => e");
                w.indent();
                w.line("warn \"Request failed: #{e.message}\"");
                w.line("raise");
                w.dedent();
                w.line("end");
            } else {
                self.send(ctx, w);
            }
        });

        if ctx.comments() {
            w.blank();
            w.line("# Example usage");
            w.line("puts make_request");
        }
        (w.finish(), requires)
    }
}

fn proxy_host_port(proxy: &str) -> Option<(String, u16)> {
    let with_scheme = if proxy.contains("://") { proxy.to_string() } else { format!("http://{}", proxy) };
    let parsed = url::Url::parse(&with_scheme).ok()?;
    Some((parsed.host_str()?.to_string(), parsed.port_or_known_default()?))
}

impl CodeGenerator for RubyGenerator {
    fn language(&self) -> &'static str {
        "ruby"
    }

    fn framework(&self) -> &'static str {
        "net/http"
    }

    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode> {
        let ctx = RenderContext::new(request, &self.options);
        let (code, imports) = self.render(&ctx);
        debug!("Rendered Ruby");

        let generated = GeneratedCode { code, imports, ..GeneratedCode::default() };
        Ok(finish(&ctx, self.language(), self.framework(), generated))
    }

    fn notes(&self, request: &ParsedRequest) -> Vec<String> {
        let o = &request.options;
        let mut notes = Vec::new();
        if o.follow_redirects {
            notes.push("Net::HTTP does not follow redirects; handle Net::HTTPRedirection to honour -L".to_string());
        }
        if !self.options.async_style {
            notes.push("Net::HTTP calls are blocking; the non-blocking style is not available".to_string());
        }
        if o.cert.is_some() || o.key.is_some() {
            notes.push("client certificates need OpenSSL objects; --cert/--key were dropped".to_string());
        }
        if let Some(proxy) = &o.proxy {
            if proxy_host_port(proxy).is_none() {
                notes.push(format!("could not parse proxy '{}'; it was dropped", proxy));
            }
        }
        notes
    }
}
