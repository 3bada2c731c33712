//! CLI argument definitions using clap

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::models::ErrorHandling;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "curl2code", version, about = "Convert curl commands into code", long_about = None)]
pub struct Args {
    // =========================================================================
    // INPUT
    // =========================================================================

    /// The curl command, or a HAR capture; read from stdin when absent or "-"
    #[arg(value_name = "COMMAND", allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Convert every command in FILE (one per line, or blank-line separated)
    #[arg(long = "batch", value_name = "FILE", conflicts_with = "command")]
    pub batch: Option<PathBuf>,

    // =========================================================================
    // TARGET
    // =========================================================================

    /// Target language (javascript, typescript, python, go, rust, php, ruby)
    #[arg(short = 'l', long = "language", value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Client library for the target language; defaults to its first framework
    #[arg(short = 'f', long = "framework", value_name = "FRAMEWORK")]
    pub framework: Option<String>,

    /// List supported languages and frameworks, then exit
    #[arg(long = "list-languages", action = ArgAction::SetTrue)]
    pub list_languages: bool,

    // =========================================================================
    // GENERATION
    // =========================================================================

    /// Error handling: none, basic, comprehensive
    #[arg(long = "error-handling", value_name = "LEVEL")]
    pub error_handling: Option<ErrorHandling>,

    /// Emit callback/promise style instead of awaiting calls
    #[arg(long = "sync", action = ArgAction::SetTrue)]
    pub sync: bool,

    /// Keep secrets inline instead of reading them from environment variables
    #[arg(long = "no-env", action = ArgAction::SetTrue)]
    pub no_env: bool,

    /// Skip type declarations
    #[arg(long = "no-types", action = ArgAction::SetTrue)]
    pub no_types: bool,

    /// Skip explanatory comments and example usage
    #[arg(long = "no-comments", action = ArgAction::SetTrue)]
    pub no_comments: bool,

    /// Scaffold retry logic with N attempts
    #[arg(long = "retry", value_name = "N")]
    pub retry: Option<u32>,

    /// Indentation width in spaces
    #[arg(long = "indent", value_name = "N")]
    pub indent: Option<usize>,

    /// Indent with tabs
    #[arg(long = "tabs", action = ArgAction::SetTrue)]
    pub tabs: bool,

    /// Request timeout in milliseconds
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout: Option<u64>,

    /// JSON file describing a sample response, used to declare ResponseData
    #[arg(long = "sample-response", value_name = "FILE")]
    pub sample_response: Option<PathBuf>,

    /// Emit a test scaffold
    #[arg(long = "tests", action = ArgAction::SetTrue)]
    pub tests: bool,

    // =========================================================================
    // OUTPUT
    // =========================================================================

    /// Print conversion results as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    pub json: bool,

    /// Verbose logging to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("curl2code").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_basic_flags() {
        let args = parse(&["-l", "python", "-f", "httpx", "--sync", "--tabs", "curl https://x.test"]);
        assert_eq!(args.language.as_deref(), Some("python"));
        assert_eq!(args.framework.as_deref(), Some("httpx"));
        assert!(args.sync);
        assert!(args.tabs);
        assert_eq!(args.command.as_deref(), Some("curl https://x.test"));
    }

    #[test]
    fn test_error_handling_value() {
        let args = parse(&["--error-handling", "comprehensive", "curl x.test"]);
        assert_eq!(args.error_handling, Some(ErrorHandling::Comprehensive));
        assert!(Args::try_parse_from(["curl2code", "--error-handling", "loud"]).is_err());
    }

    #[test]
    fn test_dash_reads_stdin() {
        let args = parse(&["-"]);
        assert_eq!(args.command.as_deref(), Some("-"));
    }

    #[test]
    fn test_batch_conflicts_with_command() {
        assert!(Args::try_parse_from(["curl2code", "--batch", "a.txt", "curl x.test"]).is_err());
    }
}
