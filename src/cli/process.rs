//! Post-processing argument logic
//!
//! Merges parsed arguments over configured defaults and splits batch input.

use crate::cli::args::Args;
use crate::codegen::language_info;
use crate::curl::is_program_token;
use crate::models::{GenerationOptions, IndentType};

/// Apply command-line flags on top of `base` (built-in plus configured defaults)
pub fn process_args(args: &Args, base: GenerationOptions) -> GenerationOptions {
    let mut options = base;

    if let Some(language) = &args.language {
        if *language != options.language && args.framework.is_none() {
            // The configured framework belongs to another language
            options.framework = language_info(language)
                .and_then(|info| info.frameworks.first())
                .map(|fw| fw.to_string())
                .unwrap_or_default();
        }
        options.language = language.clone();
    }
    if let Some(framework) = &args.framework {
        options.framework = framework.clone();
    }
    if let Some(level) = args.error_handling {
        options.error_handling = level;
    }
    if args.sync {
        options.async_style = false;
    }
    if args.no_env {
        options.extract_env_vars = false;
    }
    if args.no_types {
        options.include_types = false;
    }
    if args.no_comments {
        options.include_comments = false;
    }
    if let Some(attempts) = args.retry {
        options.retry_logic = true;
        options.retry_attempts = attempts;
    }
    if let Some(size) = args.indent {
        options.indent_size = size;
        options.indent_type = IndentType::Spaces;
    }
    if args.tabs {
        options.indent_type = IndentType::Tabs;
    }
    if args.timeout.is_some() {
        options.timeout = args.timeout;
    }
    if args.tests {
        options.include_tests = true;
    }
    options
}

/// Split a batch file into commands
///
/// Blank lines separate commands. Inside a block, lines that each start with
/// the program name are separate commands; anything else is one multi-line
/// command. `#` lines are comments.
pub fn split_batch(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = vec![Vec::new()];
    for line in text.lines() {
        if line.trim_start().starts_with('#') {
            continue;
        }
        if line.trim().is_empty() {
            blocks.push(Vec::new());
        } else if let Some(block) = blocks.last_mut() {
            block.push(line);
        }
    }

    let mut commands = Vec::new();
    for block in blocks.into_iter().filter(|b| !b.is_empty()) {
        let one_per_line = block.iter().all(|line| {
            line.split_whitespace().next().map_or(false, is_program_token) && !line.trim_end().ends_with('\\')
        });
        if one_per_line {
            commands.extend(block.iter().map(|line| line.trim().to_string()));
        } else {
            commands.push(block.join("\n"));
        }
    }
    commands
}
