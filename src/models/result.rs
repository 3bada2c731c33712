//! Generated code bundle and conversion outcome

use indexmap::IndexMap;
use serde::Serialize;

use super::request::ParsedRequest;

/// Output of one backend run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCode {
    /// Complete source text
    pub code: String,
    pub file_name: String,
    pub extension: String,
    /// Structural type declarations, when the target is typed
    pub types: Option<String>,
    pub test_scaffold: Option<String>,
    /// Extracted secrets: variable name to the literal it replaced
    pub env_vars: IndexMap<String, String>,
    pub imports: Vec<String>,
    pub dependencies: Vec<String>,
    pub documentation: Option<String>,
}

/// Outcome of one conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ParsedRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<GeneratedCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl ConversionResult {
    pub fn failure(error: impl Into<String>, warnings: Vec<String>) -> Self {
        Self::failure_with(None, error, warnings)
    }

    /// Failure that happened after the command parsed
    pub fn failure_with(request: Option<ParsedRequest>, error: impl Into<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            request,
            code: None,
            error: Some(error.into()),
            warnings,
        }
    }

    pub fn success(request: ParsedRequest, code: GeneratedCode, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            request: Some(request),
            code: Some(code),
            error: None,
            warnings,
        }
    }
}
