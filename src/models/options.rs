//! Generation options controlling code emission

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// How much error handling to wrap around the request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorHandling {
    /// Direct call, no guard
    None,
    /// try/catch-equivalent that logs failures
    #[default]
    Basic,
    /// Additionally checks the response status before parsing the body
    Comprehensive,
}

impl std::str::FromStr for ErrorHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ErrorHandling::None),
            "basic" => Ok(ErrorHandling::Basic),
            "comprehensive" => Ok(ErrorHandling::Comprehensive),
            other => Err(format!(
                "invalid error handling '{}', expected none, basic or comprehensive",
                other
            )),
        }
    }
}

/// Indentation character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentType {
    #[default]
    Spaces,
    Tabs,
}

/// Caller-supplied configuration for one conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub language: String,
    pub framework: String,
    pub error_handling: ErrorHandling,
    /// Awaiting/blocking style instead of callbacks/promises
    #[serde(rename = "async")]
    pub async_style: bool,
    pub extract_env_vars: bool,
    pub include_types: bool,
    pub retry_logic: bool,
    pub retry_attempts: u32,
    pub include_comments: bool,
    pub indent_size: usize,
    pub indent_type: IndentType,
    /// Request-level timeout in milliseconds
    pub timeout: Option<u64>,
    /// Sample response body used to declare `ResponseData`
    pub sample_response: Option<JsonValue>,
    pub include_tests: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            language: "javascript".to_string(),
            framework: "fetch".to_string(),
            error_handling: ErrorHandling::Basic,
            async_style: true,
            extract_env_vars: true,
            include_types: true,
            retry_logic: false,
            retry_attempts: 3,
            include_comments: true,
            indent_size: 2,
            indent_type: IndentType::Spaces,
            timeout: None,
            sample_response: None,
            include_tests: false,
        }
    }
}

impl GenerationOptions {
    pub fn new(language: impl Into<String>, framework: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            framework: framework.into(),
            ..Self::default()
        }
    }

    /// One level of indentation
    pub fn indent_unit(&self) -> String {
        match self.indent_type {
            IndentType::Tabs => "\t".to_string(),
            IndentType::Spaces => " ".repeat(self.indent_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.error_handling, ErrorHandling::Basic);
        assert!(opts.async_style);
        assert!(opts.extract_env_vars);
        assert!(opts.include_types);
        assert_eq!(opts.indent_unit(), "  ");
    }

    #[test]
    fn test_partial_json_merges_defaults() {
        let opts: GenerationOptions = serde_json::from_str(
            r#"{"language":"python","framework":"requests","async":false,"indentType":"tabs"}"#,
        )
        .unwrap();
        assert_eq!(opts.language, "python");
        assert!(!opts.async_style);
        assert!(opts.include_comments);
        assert_eq!(opts.indent_unit(), "\t");
    }

    #[test]
    fn test_error_handling_from_str() {
        assert_eq!("Comprehensive".parse::<ErrorHandling>(), Ok(ErrorHandling::Comprehensive));
        assert!("loud".parse::<ErrorHandling>().is_err());
    }
}
