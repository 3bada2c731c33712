//! Error types for curl2code

use thiserror::Error;

/// Main error type for curl2code
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Command is empty")]
    EmptyCommand,

    #[error("Not a curl command: expected the command to start with 'curl'")]
    NotCurl,

    #[error("Unterminated {0} quote in curl command")]
    UnterminatedQuote(&'static str),

    #[error("no URL found")]
    MissingUrl,

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Framework is required for language '{0}'")]
    MissingFramework(String),

    #[error("Unsupported combination: {language}/{framework} (supported frameworks for {language}: {supported})")]
    UnsupportedTarget {
        language: String,
        framework: String,
        supported: String,
    },

    #[error("Code generation failed: {0}")]
    Generation(String),

    #[error("no normalized command available")]
    NotNormalizable,

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
