//! curl2code library interface
//!
//! Converts curl command lines into HTTP client code for several languages.
//!
//! # Module Organization
//!
//! - [`curl`] - Tokenizer and command parser
//! - [`models`] - Parsed request, generation options, results
//! - [`types`] - Type inference from sample JSON
//! - [`codegen`] - Generator contract, registry and backends
//! - [`convert`] - Conversion orchestrator (convert, batch_convert)
//! - [`har`] - HAR capture detection and normalization
//! - [`config`] - On-disk defaults
//! - [`cli`] - Command-line arguments
//! - [`errors`] - Error types (ConvertError, Result)
//! - [`status`] - Exit status codes (ExitStatus)

pub mod cli;
pub mod codegen;
pub mod config;
pub mod convert;
pub mod curl;
pub mod errors;
pub mod har;
pub mod models;
pub mod status;
pub mod types;

pub use convert::{batch_convert, convert};
pub use errors::{ConvertError, Result};
pub use har::detect_and_normalize;
pub use models::{ConversionResult, GeneratedCode, GenerationOptions, ParsedRequest};
