//! PHP backend (ext-curl)

use std::collections::HashSet;

use tracing::debug;

use crate::errors::Result;
use crate::models::{Body, GeneratedCode, GenerationOptions, HttpMethod, MultipartField, ParsedRequest};

use super::context::{RenderContext, Syntax};
use super::literal::{render_value, single_quoted, PHP_LITERAL};
use super::writer::CodeWriter;
use super::{finish, CodeGenerator, Registry};

pub fn register(registry: &mut Registry) {
    registry.insert(("php", "curl"), |o| Box::new(PhpGenerator::new(o)));
}

struct PhpSyntax;

impl Syntax for PhpSyntax {
    fn string(&self, s: &str) -> String {
        single_quoted(s)
    }

    fn env(&self, var: &str) -> String {
        format!("getenv('{}')", var)
    }

    fn concat(&self, left: &str, right: &str) -> String {
        format!("{} . {}", left, right)
    }
}

pub struct PhpGenerator {
    options: GenerationOptions,
}

impl PhpGenerator {
    fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    fn preamble(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        let request = ctx.request;
        if ctx.has_query() {
            w.block(format!("$url = {} . http_build_query([", single_quoted(&format!("{}?", request.url))), "]);", |w| {
                for (k, v) in &request.query_params {
                    w.line(format!("{} => {},", single_quoted(k), single_quoted(v)));
                }
            });
        } else {
            w.line(format!("$url = {};", single_quoted(&request.url)));
        }

        if !ctx.headers.is_empty() {
            w.block("$headers = [", "];", |w| {
                for (name, value) in &ctx.headers {
                    w.line(format!("{},", PhpSyntax.fragment(&value.prefixed(&format!("{}: ", name)))));
                }
            });
        }

        match &request.body {
            Some(Body::Json(value)) => {
                w.lines(format!("$payload = json_encode({});", render_value(value, &PHP_LITERAL, w.unit(), 0)));
            }
            Some(Body::Form(pairs)) => {
                let mut seen = HashSet::new();
                if pairs.iter().all(|(k, _)| seen.insert(k.as_str())) {
                    w.block("$payload = http_build_query([", "]);", |w| {
                        for (k, v) in pairs {
                            w.line(format!("{} => {},", single_quoted(k), single_quoted(v)));
                        }
                    });
                } else {
                    // Repeated keys cannot live in a PHP array
                    let encoded = url::form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(pairs.iter())
                        .finish();
                    w.line(format!("$payload = {};", single_quoted(&encoded)));
                }
            }
            Some(Body::Multipart(fields)) => {
                w.block("$payload = [", "];", |w| {
                    for field in fields {
                        match field {
                            MultipartField::Text { name, value } => {
                                w.line(format!("{} => {},", single_quoted(name), single_quoted(value)));
                            }
                            MultipartField::File { index } => {
                                let Some(file) = request.files.get(*index) else { continue };
                                w.line(format!(
                                    "{} => new CURLFile({}, {}, {}),",
                                    single_quoted(&file.field_name),
                                    single_quoted(&file.file_name),
                                    single_quoted(file.content_type.as_deref().unwrap_or("")),
                                    single_quoted(&file.file_name)
                                ));
                            }
                        }
                    }
                });
            }
            Some(Body::Raw(text)) => {
                w.line(format!("$payload = {};", single_quoted(text)));
            }
            Some(Body::Binary(inline)) => {
                w.line(format!("$payload = {};", single_quoted(inline)));
            }
            Some(Body::File(path)) => {
                w.line(format!("$payload = file_get_contents({});", single_quoted(path)));
            }
            None => {}
        }
    }

    fn curl_options(&self, ctx: &RenderContext) -> Vec<String> {
        let request = ctx.request;
        let o = &request.options;
        let mut opts = vec!["CURLOPT_RETURNTRANSFER => true".to_string()];
        match request.method {
            // POSTFIELDS switches curl to POST
            HttpMethod::Get if request.body.is_some() => opts.push("CURLOPT_CUSTOMREQUEST => 'GET'".to_string()),
            HttpMethod::Get => {}
            HttpMethod::Head => opts.push("CURLOPT_NOBODY => true".to_string()),
            other => opts.push(format!("CURLOPT_CUSTOMREQUEST => {}", single_quoted(other.as_str()))),
        }
        if !ctx.headers.is_empty() {
            opts.push("CURLOPT_HTTPHEADER => $headers".to_string());
        }
        if request.body.is_some() {
            opts.push("CURLOPT_POSTFIELDS => $payload".to_string());
        }
        if let Some((user, pass)) = &ctx.basic_auth {
            opts.push(format!(
                "CURLOPT_USERPWD => {} . ':' . {}",
                PhpSyntax.fragment(user),
                PhpSyntax.fragment(pass)
            ));
        }
        if o.follow_redirects {
            opts.push("CURLOPT_FOLLOWLOCATION => true".to_string());
        }
        if let Some(max) = o.max_redirects {
            opts.push(format!("CURLOPT_MAXREDIRS => {}", max));
        }
        if let Some(ms) = ctx.timeout_ms() {
            opts.push(format!("CURLOPT_TIMEOUT_MS => {}", ms));
        }
        if let Some(secs) = o.connect_timeout {
            opts.push(format!("CURLOPT_CONNECTTIMEOUT_MS => {}", (secs * 1000.0).round() as u64));
        }
        if o.insecure {
            opts.push("CURLOPT_SSL_VERIFYPEER => false".to_string());
            opts.push("CURLOPT_SSL_VERIFYHOST => 0".to_string());
        }
        if let Some(proxy) = &o.proxy {
            opts.push(format!("CURLOPT_PROXY => {}", single_quoted(proxy)));
        }
        if o.compressed {
            opts.push("CURLOPT_ENCODING => ''".to_string());
        }
        if let Some(cert) = &o.cert {
            opts.push(format!("CURLOPT_SSLCERT => {}", single_quoted(cert)));
        }
        if let Some(key) = &o.key {
            opts.push(format!("CURLOPT_SSLKEY => {}", single_quoted(key)));
        }
        if let Some(ca) = &o.cacert {
            opts.push(format!("CURLOPT_CAINFO => {}", single_quoted(ca)));
        }
        if let Some(version) = o.http_version.as_deref().and_then(http_version_constant) {
            opts.push(format!("CURLOPT_HTTP_VERSION => {}", version));
        }
        opts
    }

    fn make_request(&self, ctx: &RenderContext, w: &mut CodeWriter) {
        w.line("function makeRequest()");
        w.block("{", "}", |w| {
            self.preamble(ctx, w);
            w.blank();

            w.line("$ch = curl_init($url);");
            w.block("curl_setopt_array($ch, [", "]);", |w| {
                for opt in self.curl_options(ctx) {
                    w.line(format!("{},", opt));
                }
            });
            w.blank();

            w.line("$response = curl_exec($ch);");
            if ctx.guarded() {
                w.block("if ($response === false) {", "}", |w| {
                    w.line("$error = curl_error($ch);");
                    w.line("curl_close($ch);");
                    w.line("error_log('Request failed: ' . $error);");
                    w.line("throw new RuntimeException('Request failed: ' . $error);");
                });
            }
            if ctx.checks_status() {
                w.line("$status = curl_getinfo($ch, CURLINFO_HTTP_CODE);");
            }
            w.line("curl_close($ch);");
            if ctx.checks_status() {
                w.block("if ($status < 200 || $status >= 300) {", "}", |w| {
                    w.line("throw new RuntimeException('Request failed with status ' . $status);");
                });
            }
            w.blank();
            if ctx.expects_json() {
                w.line("return json_decode($response, true);");
            } else {
                w.line("return $response;");
            }
        });
    }

    fn render(&self, ctx: &RenderContext) -> String {
        let mut w = ctx.writer();
        w.line("<?php");
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

        self.make_request(ctx, &mut w);

        if ctx.comments() {
            w.blank();
            w.line("// Example usage");
            if ctx.guarded() {
                w.block("try {", "}", |w| {
                    w.line("var_dump(makeRequest());");
                });
                w.block("catch (RuntimeException $e) {", "}", |w| {
                    w.line("fwrite(STDERR, $e->getMessage() . PHP_EOL);");
                    w.line("exit(1);");
                });
            } else {
                w.line("var_dump(makeRequest());");
            }
        }
        w.finish()
    }
}

fn http_version_constant(version: &str) -> Option<&'static str> {
    match version {
        "1.0" => Some("CURL_HTTP_VERSION_1_0"),
        "1.1" => Some("CURL_HTTP_VERSION_1_1"),
        "2" => Some("CURL_HTTP_VERSION_2_0"),
        "3" => Some("CURL_HTTP_VERSION_3"),
        _ => None,
    }
}

impl CodeGenerator for PhpGenerator {
    fn language(&self) -> &'static str {
        "php"
    }

    fn framework(&self) -> &'static str {
        "curl"
    }

    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode> {
        let ctx = RenderContext::new(request, &self.options);
        let code = self.render(&ctx);
        debug!("Rendered PHP");

        let generated = GeneratedCode {
            code,
            dependencies: vec!["ext-curl".to_string()],
            ..GeneratedCode::default()
        };
        Ok(finish(&ctx, self.language(), self.framework(), generated))
    }

    fn notes(&self, _request: &ParsedRequest) -> Vec<String> {
        if self.options.async_style {
            Vec::new()
        } else {
            vec!["ext-curl calls are blocking; the non-blocking style is not available".to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::resolve;
    use crate::curl::parse_curl_command;
    use crate::models::ErrorHandling;

    fn generate(cmd: &str, options: GenerationOptions) -> GeneratedCode {
        let request = parse_curl_command(cmd).unwrap().request;
        resolve("php", "curl", &options).unwrap().generate(&request).unwrap()
    }

    fn php() -> GenerationOptions {
        GenerationOptions { indent_size: 4, ..GenerationOptions::new("php", "curl") }
    }

    #[test]
    fn test_post_json() {
        let out = generate(r#"curl -X POST -d '{"name":"a","ok":true}' https://x.test/users"#, php());
        assert!(out.code.starts_with("<?php\n"));
        assert!(out.code.contains("$payload = json_encode([\n        'name' => 'a',\n        'ok' => true,\n    ]);"));
        assert!(out.code.contains("CURLOPT_CUSTOMREQUEST => 'POST',"));
        assert!(out.code.contains("CURLOPT_POSTFIELDS => $payload,"));
        assert!(out.code.contains("'Content-Type: application/json',"));
        assert_eq!(out.file_name, "request.php");
    }

    #[test]
    fn test_get_with_body_keeps_method() {
        let out = generate("curl -X GET -d 'q=1' https://x.test/search", php());
        assert!(out.code.contains("CURLOPT_CUSTOMREQUEST => 'GET',"));
        assert!(out.code.contains("CURLOPT_POSTFIELDS => $payload,"));

        let out = generate("curl https://x.test/search", php());
        assert!(!out.code.contains("CURLOPT_CUSTOMREQUEST"));
    }

    #[test]
    fn test_env_header_concat() {
        let out = generate("curl -H 'X-Api-Token: s3' https://x.test", php());
        assert!(out.code.contains("'X-Api-Token: ' . getenv('X_API_TOKEN'),"));
        assert!(!out.code.contains("s3"));
    }

    #[test]
    fn test_query_builder() {
        let out = generate("curl 'https://x.test/s?q=a'", php());
        assert!(out.code.contains("$url = 'https://x.test/s?' . http_build_query([\n        'q' => 'a',\n    ]);"));
    }

    #[test]
    fn test_transport_options() {
        let out = generate("curl -k -L --compressed --http2 -u u:p https://x.test", php());
        assert!(out.code.contains("CURLOPT_SSL_VERIFYPEER => false,"));
        assert!(out.code.contains("CURLOPT_FOLLOWLOCATION => true,"));
        assert!(out.code.contains("CURLOPT_ENCODING => '',"));
        assert!(out.code.contains("CURLOPT_HTTP_VERSION => CURL_HTTP_VERSION_2_0,"));
        assert!(out.code.contains("CURLOPT_USERPWD => getenv('BASIC_AUTH_USERNAME') . ':' . getenv('BASIC_AUTH_PASSWORD'),"));
    }

    #[test]
    fn test_multipart_curlfile() {
        let out = generate("curl -F 'doc=@r.pdf;type=application/pdf' https://x.test", php());
        assert!(out.code.contains("'doc' => new CURLFile('r.pdf', 'application/pdf', 'r.pdf'),"));
    }

    #[test]
    fn test_error_levels() {
        let none = generate("curl https://x.test", GenerationOptions { error_handling: ErrorHandling::None, ..php() });
        assert!(!none.code.contains("RuntimeException"));
        let full = generate(
            "curl https://x.test",
            GenerationOptions { error_handling: ErrorHandling::Comprehensive, ..php() },
        );
        assert!(full.code.contains("$status = curl_getinfo($ch, CURLINFO_HTTP_CODE);"));
    }
}
