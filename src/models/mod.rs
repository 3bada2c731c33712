//! Core data types
//!
//! - [`request`] - the parsed request (intermediate representation)
//! - [`options`] - generation options
//! - [`result`] - generated code and conversion results

pub mod options;
pub mod request;
pub mod result;

pub use options::{ErrorHandling, GenerationOptions, IndentType};
pub use request::{
    Auth, Body, CookiesDict, DataType, FileUpload, FormPairs, HeadersDict, HttpMethod,
    MultipartField, ParsedRequest, QueryParamsDict, TransportOptions, DEFAULT_USER_AGENT,
};
pub use result::{ConversionResult, GeneratedCode};
