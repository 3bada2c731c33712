//! Code generation backends
//!
//! Every backend implements [`CodeGenerator`] and registers a constructor
//! for each (language, framework) pair it serves. The orchestrator looks up
//! backends by key only, so adding a target means adding a module and a
//! `register` call below.
//!
//! | Language   | Frameworks        |
//! |------------|-------------------|
//! | javascript | fetch, axios      |
//! | typescript | fetch, axios      |
//! | python     | requests, httpx   |
//! | go         | net/http          |
//! | rust       | reqwest           |
//! | php        | curl              |
//! | ruby       | net/http          |

pub mod context;
pub mod go;
pub mod javascript;
pub mod literal;
pub mod php;
pub mod python;
pub mod ruby;
pub mod rust;
pub mod writer;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::errors::Result;
use crate::models::{GeneratedCode, GenerationOptions, ParsedRequest};

use context::RenderContext;

/// A target-specific code emitter
pub trait CodeGenerator: Send + Sync {
    fn language(&self) -> &'static str;

    fn framework(&self) -> &'static str;

    /// Render the request as target source code
    fn generate(&self, request: &ParsedRequest) -> Result<GeneratedCode>;

    /// Things the generated code cannot express for this request
    fn notes(&self, _request: &ParsedRequest) -> Vec<String> {
        Vec::new()
    }
}

pub type GeneratorFactory = fn(GenerationOptions) -> Box<dyn CodeGenerator>;

pub type Registry = IndexMap<(&'static str, &'static str), GeneratorFactory>;

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut registry = Registry::new();
    javascript::register(&mut registry);
    python::register(&mut registry);
    go::register(&mut registry);
    rust::register(&mut registry);
    php::register(&mut registry);
    ruby::register(&mut registry);
    debug!(backends = registry.len(), "Registered code generators");
    registry
});

/// Static description of a target language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub frameworks: &'static [&'static str],
    pub extension: &'static str,
    /// File stem of the generated program
    pub file_stem: &'static str,
    /// Command used to install dependencies, if the ecosystem has one
    pub install: Option<&'static str>,
}

pub static LANGUAGES: &[LanguageInfo] = &[
    LanguageInfo {
        id: "javascript",
        display_name: "JavaScript",
        frameworks: &["fetch", "axios"],
        extension: "js",
        file_stem: "request",
        install: Some("npm install"),
    },
    LanguageInfo {
        id: "typescript",
        display_name: "TypeScript",
        frameworks: &["fetch", "axios"],
        extension: "ts",
        file_stem: "request",
        install: Some("npm install"),
    },
    LanguageInfo {
        id: "python",
        display_name: "Python",
        frameworks: &["requests", "httpx"],
        extension: "py",
        file_stem: "request",
        install: Some("pip install"),
    },
    LanguageInfo {
        id: "go",
        display_name: "Go",
        frameworks: &["net/http"],
        extension: "go",
        file_stem: "main",
        install: None,
    },
    LanguageInfo {
        id: "rust",
        display_name: "Rust",
        frameworks: &["reqwest"],
        extension: "rs",
        file_stem: "main",
        install: Some("cargo add"),
    },
    LanguageInfo {
        id: "php",
        display_name: "PHP",
        frameworks: &["curl"],
        extension: "php",
        file_stem: "request",
        install: None,
    },
    LanguageInfo {
        id: "ruby",
        display_name: "Ruby",
        frameworks: &["net/http"],
        extension: "rb",
        file_stem: "request",
        install: None,
    },
];

pub fn language_info(id: &str) -> Option<&'static LanguageInfo> {
    LANGUAGES.iter().find(|info| info.id == id)
}

/// Backend for a (language, framework) pair
pub fn resolve(language: &str, framework: &str, options: &GenerationOptions) -> Option<Box<dyn CodeGenerator>> {
    REGISTRY
        .iter()
        .find(|((lang, fw), _)| *lang == language && *fw == framework)
        .map(|(_, factory)| factory(options.clone()))
}

/// Fill in the fields every backend derives the same way
pub(crate) fn finish(ctx: &RenderContext, language: &str, framework: &str, mut code: GeneratedCode) -> GeneratedCode {
    if let Some(info) = language_info(language) {
        code.extension = info.extension.to_string();
        code.file_name = format!("{}.{}", info.file_stem, info.extension);
    }
    code.env_vars = ctx.env_vars.clone();
    code.documentation = Some(documentation(ctx, language, framework, &code));
    code
}

fn documentation(ctx: &RenderContext, language: &str, framework: &str, code: &GeneratedCode) -> String {
    let info = language_info(language);
    let display = info.map(|i| i.display_name).unwrap_or(language);
    let mut doc = format!("# {}\n\n{} client using {}.\n", ctx.summary(), display, framework);

    if !code.env_vars.is_empty() {
        doc.push_str("\n## Environment variables\n\n");
        for name in code.env_vars.keys() {
            doc.push_str(&format!("- `{}`\n", name));
        }
    }

    if !code.dependencies.is_empty() {
        doc.push_str("\n## Dependencies\n\n");
        match info.and_then(|i| i.install) {
            Some(install) => doc.push_str(&format!("```sh\n{} {}\n```\n", install, code.dependencies.join(" "))),
            None => {
                for dep in &code.dependencies {
                    doc.push_str(&format!("- {}\n", dep));
                }
            }
        }
    }

    doc.push_str(&format!("\n## Usage\n\nSave as `{}` and run it.\n", code.file_name));
    doc
}
