use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{AppConfig, DEFAULT_MODEL};
use crate::pipeline::TranscriptInput;

#[derive(Parser, Debug)]
#[command(
    name = "wordsync",
    version,
    about = "Align a known transcript against recognizer timestamps"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Produce start/end times for every word of a reference text.
    Align(AlignArgs),
    /// Transcribe audio into timestamped segments.
    Transcribe(TranscribeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Whisper model name, resolved to ./models/ggml-<NAME>.bin.
    #[arg(long, short = 'm', default_value = DEFAULT_MODEL)]
    pub model: String,
    /// Explicit ggml model file; overrides --model and WHISPER_MODEL_PATH.
    #[arg(long = "model-path", value_name = "PATH")]
    pub model_path: Option<PathBuf>,
}

impl ModelArgs {
    pub fn app_config(&self) -> AppConfig {
        AppConfig::resolve(&self.model, self.model_path.clone())
    }
}

#[derive(Args, Debug, Clone)]
pub struct AlignArgs {
    /// Reference text file (UTF-8, whitespace separated words).
    #[arg(long, short = 't', value_name = "PATH")]
    pub text: PathBuf,
    /// Audio file to transcribe before aligning.
    #[arg(
        long,
        short = 'a',
        value_name = "PATH",
        conflicts_with = "transcript",
        required_unless_present = "transcript"
    )]
    pub audio: Option<PathBuf>,
    /// Transcript JSON with a "words" or "segments" list.
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
    #[command(flatten)]
    pub model: ModelArgs,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

impl AlignArgs {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.text.is_file(),
            "reference text file does not exist: {:?}",
            self.text
        );
        Ok(())
    }

    pub fn transcript_input(&self) -> Result<TranscriptInput<'_>> {
        match (&self.audio, &self.transcript) {
            (Some(audio), None) => Ok(TranscriptInput::Audio(audio)),
            (None, Some(transcript)) => Ok(TranscriptInput::Transcript(transcript)),
            _ => anyhow::bail!("provide exactly one of --audio or --transcript"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct TranscribeArgs {
    /// Audio file to transcribe.
    #[arg(long, short = 'i', value_name = "PATH")]
    pub input: PathBuf,
    #[command(flatten)]
    pub model: ModelArgs,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}
