use std::io::{IsTerminal, Read};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use curl2code::cli::{process_args, split_batch, Args};
use curl2code::codegen::LANGUAGES;
use curl2code::config::Config;
use curl2code::convert::batch_convert;
use curl2code::har::detect_and_normalize;
use curl2code::models::ConversionResult;
use curl2code::status::ExitStatus;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CURL2CODE_LOG";

fn main() -> ExitStatus {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(status) => status,
        Err(err) => {
            eprintln!("curl2code: {:#}", err);
            ExitStatus::Error
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose > 0 { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(args: &Args) -> Result<ExitStatus> {
    if args.list_languages {
        print_languages(args.json)?;
        return Ok(ExitStatus::Success);
    }

    let config = Config::load()?;
    let mut options = process_args(args, config.generation_options());
    if let Some(path) = &args.sample_response {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sample response {}", path.display()))?;
        let value = serde_json::from_str(&text)
            .with_context(|| format!("Sample response {} is not valid JSON", path.display()))?;
        options.sample_response = Some(value);
    }

    let inputs = match &args.batch {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read batch file {}", path.display()))?;
            split_batch(&text)
        }
        None => vec![read_command(args.command.as_deref())?],
    };

    // Unrecognized input goes through unchanged so the converter reports why
    let commands: Vec<String> = inputs
        .into_iter()
        .map(|input| detect_and_normalize(&input).unwrap_or(input))
        .collect();

    let results = batch_convert(&commands, &options);
    if args.json {
        print_json(&results, args.batch.is_some())?;
    } else {
        print_results(&results);
    }

    Ok(ExitStatus::from_outcomes(results.iter().all(|r| r.success)))
}

fn read_command(arg: Option<&str>) -> Result<String> {
    match arg {
        Some(command) if command != "-" => Ok(command.to_string()),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read command from stdin")?;
            Ok(input)
        }
    }
}

fn print_results(results: &[ConversionResult]) {
    let many = results.len() > 1;
    for (index, result) in results.iter().enumerate() {
        if many {
            if index > 0 {
                println!();
            }
            let name = result.code.as_ref().map(|c| c.file_name.as_str()).unwrap_or("-");
            println!("==> {}: {} <==", index + 1, name);
        }
        for warning in &result.warnings {
            eprintln!("warning: {}", warning);
        }
        match (&result.code, &result.error) {
            (Some(code), _) => print!("{}", code.code),
            (None, Some(error)) => eprintln!("error: {}", error),
            (None, None) => {}
        }
    }
}

fn print_json(results: &[ConversionResult], batch: bool) -> Result<()> {
    let text = match results {
        [single] if !batch => serde_json::to_string_pretty(single)?,
        _ => serde_json::to_string_pretty(results)?,
    };
    println!("{}", text);
    Ok(())
}

fn print_languages(as_json: bool) -> Result<()> {
    if as_json {
        let languages: Vec<_> = LANGUAGES
            .iter()
            .map(|info| {
                json!({
                    "id": info.id,
                    "displayName": info.display_name,
                    "frameworks": info.frameworks,
                    "extension": info.extension,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&languages)?);
        return Ok(());
    }
    for info in LANGUAGES {
        println!("{:<12} {:<12} {}", info.id, info.display_name, info.frameworks.join(", "));
    }
    Ok(())
}
