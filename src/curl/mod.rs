//! curl command front end
//!
//! - [`tokenizer`] - shell-like splitting (quotes, escapes, line continuations)
//! - [`flags`] - the option table
//! - [`parser`] - tokens to [`ParsedRequest`](crate::models::ParsedRequest)
//!
//! # Example
//!
//! ```
//! use curl2code::curl::parse_curl_command;
//!
//! let outcome = parse_curl_command(r#"curl -d '{"a":1}' https://x.test"#).unwrap();
//! assert_eq!(outcome.request.method.as_str(), "POST");
//! ```

pub mod flags;
pub mod parser;
pub mod tokenizer;

pub use parser::{classify_body, parse_curl_command, parse_tokens, ParseOutcome};
pub use tokenizer::{is_program_token, tokenize, tokenize_command};
