//! Conversion orchestrator
//!
//! Validates the request, parses the command, resolves a backend and turns
//! every failure along the way into a failed [`ConversionResult`].

use tracing::{debug, info, warn};

use crate::codegen::{self, language_info, LANGUAGES};
use crate::curl::parse_curl_command;
use crate::errors::{ConvertError, Result};
use crate::models::{ConversionResult, DataType, GeneratedCode, GenerationOptions, ParsedRequest};

/// Bodies above this size get a soft warning
pub const LARGE_BODY_BYTES: usize = 1024 * 1024;

/// Convert one curl command into source code
pub fn convert(command: &str, options: &GenerationOptions) -> ConversionResult {
    let mut warnings = Vec::new();
    let request = match parse(command, options, &mut warnings) {
        Ok(request) => request,
        Err(err) => {
            debug!("Conversion failed: {}", err);
            return ConversionResult::failure(err.to_string(), warnings);
        }
    };
    match generate(&request, options, &mut warnings) {
        Ok(code) => ConversionResult::success(request, code, warnings),
        Err(err) => {
            debug!("Generation failed: {}", err);
            ConversionResult::failure_with(Some(request), err.to_string(), warnings)
        }
    }
}

/// Convert each command independently, preserving input order
pub fn batch_convert(commands: &[String], options: &GenerationOptions) -> Vec<ConversionResult> {
    commands.iter().map(|command| convert(command, options)).collect()
}

fn parse(command: &str, options: &GenerationOptions, warnings: &mut Vec<String>) -> Result<ParsedRequest> {
    validate(command, options)?;

    let outcome = parse_curl_command(command)?;
    if outcome.request.url.is_empty() {
        return Err(ConvertError::MissingUrl);
    }
    warnings.extend(outcome.warnings);
    Ok(outcome.request)
}

fn generate(request: &ParsedRequest, options: &GenerationOptions, warnings: &mut Vec<String>) -> Result<GeneratedCode> {
    let generator = codegen::resolve(&options.language, &options.framework, options)
        .ok_or_else(|| unsupported(&options.language, &options.framework))?;
    info!("Using {} backend ({})", generator.language(), generator.framework());

    warnings.extend(generator.notes(request));
    warnings.extend(body_warnings(request));

    generator.generate(request)
}

fn validate(command: &str, options: &GenerationOptions) -> Result<()> {
    if command.trim().is_empty() {
        return Err(ConvertError::EmptyCommand);
    }
    if !command.to_ascii_lowercase().contains("curl") {
        return Err(ConvertError::NotCurl);
    }
    if language_info(&options.language).is_none() {
        return Err(ConvertError::UnsupportedLanguage(options.language.clone()));
    }
    if options.framework.trim().is_empty() {
        return Err(ConvertError::MissingFramework(options.language.clone()));
    }
    Ok(())
}

fn unsupported(language: &str, framework: &str) -> ConvertError {
    let supported = LANGUAGES
        .iter()
        .find(|info| info.id == language)
        .map(|info| info.frameworks.join(", "))
        .unwrap_or_default();
    ConvertError::UnsupportedTarget {
        language: language.to_string(),
        framework: framework.to_string(),
        supported,
    }
}

/// Size and Content-Type consistency checks
fn body_warnings(request: &ParsedRequest) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(raw) = &request.raw_body {
        if raw.len() > LARGE_BODY_BYTES {
            warn!("Request body is {} bytes", raw.len());
            warnings.push(format!(
                "request body is {} bytes; consider streaming it from a file",
                raw.len()
            ));
        }
    }

    if let (Some(declared), Some(actual)) = (request.header("Content-Type"), request.data_type()) {
        if let Some(expected) = declared_data_type(declared) {
            if expected != actual {
                warnings.push(format!(
                    "Content-Type '{}' does not match the {} body that was supplied",
                    declared, actual
                ));
            }
        }
    }

    warnings
}

fn declared_data_type(content_type: &str) -> Option<DataType> {
    let ct = content_type.to_ascii_lowercase();
    if ct.contains("json") {
        Some(DataType::Json)
    } else if ct.contains("x-www-form-urlencoded") {
        Some(DataType::Form)
    } else if ct.starts_with("multipart/") {
        Some(DataType::Multipart)
    } else {
        None
    }
}
