use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wordsync::cli::{AlignArgs, Cli, Command, TranscribeArgs};
use wordsync::error::WordsyncError;
use wordsync::output::{error_json, to_json};
use wordsync::pipeline;

fn main() -> ExitCode {
    // stdout carries the JSON document, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(document) => {
            println!("{document}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let failure = classify(&err);
            error!(code = failure.code().as_str(), "{err:#}");
            println!("{}", error_json(&failure));
            ExitCode::from(failure.code().exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Command::Align(args) => handle_align(&args),
        Command::Transcribe(args) => handle_transcribe(&args),
    }
}

fn handle_align(args: &AlignArgs) -> Result<String> {
    args.validate()
        .context("Failed to validate command-line arguments")?;
    let input = args.transcript_input()?;
    let config = args.model.app_config();
    info!(text = ?args.text, ?input, "aligning reference text");

    let output = pipeline::run_alignment(&args.text, input, &config)
        .context("Failed to align reference text")?;
    Ok(to_json(&output, args.pretty)?)
}

fn handle_transcribe(args: &TranscribeArgs) -> Result<String> {
    let config = args.model.app_config();
    info!(input = ?args.input, model = ?config.model_path, "transcribing audio");

    let output =
        pipeline::transcribe(&args.input, &config).context("Failed to transcribe audio")?;
    Ok(to_json(&output, args.pretty)?)
}

/// Recover the failure category; anything not raised by the library is a usage error.
fn classify(err: &anyhow::Error) -> WordsyncError {
    let message = format!("{err:#}");
    match err.downcast_ref::<WordsyncError>() {
        Some(inner) => WordsyncError::new(inner.code(), message),
        None => WordsyncError::invalid_input(message),
    }
}
