//! End-to-end flow: reference text + recognizer output -> aligned words.

use std::path::Path;

use tracing::info;

use crate::alignment::SequentialAligner;
use crate::config::AppConfig;
use crate::error::{Result, WordsyncError};
use crate::reference::load_reference;
use crate::transcription::{self, select_source, RecognizedSegment, TranscriptionSource};
use crate::types::{AlignmentOutput, TranscriptionOutput};

/// Where the recognizer output comes from.
#[derive(Debug, Clone, Copy)]
pub enum TranscriptInput<'a> {
    /// Audio file run through the built-in recognizer.
    Audio(&'a Path),
    /// Previously produced transcript document.
    Transcript(&'a Path),
}

/// Decode an audio file and run the built-in recognizer over it.
#[cfg(feature = "whisper")]
pub fn recognize_audio_file(audio: &Path, config: &AppConfig) -> Result<Vec<RecognizedSegment>> {
    let transcriber = transcription::whisper::WhisperTranscriber::new(&config.model_path)?;
    let decoded = crate::audio::decoder::decode_audio(audio)?;
    info!(
        duration_secs = decoded.duration_secs(),
        sample_rate = decoded.sample_rate,
        "audio decoded"
    );
    transcriber.recognize(&decoded)
}

#[cfg(not(feature = "whisper"))]
pub fn recognize_audio_file(audio: &Path, _config: &AppConfig) -> Result<Vec<RecognizedSegment>> {
    Err(WordsyncError::engine_unavailable(format!(
        "cannot transcribe {}: built without the `whisper` feature",
        audio.display()
    )))
}

/// Transcribe an audio file, preferring token-level word timing.
pub fn transcribe_audio_file(audio: &Path, config: &AppConfig) -> Result<TranscriptionSource> {
    recognize_audio_file(audio, config).map(select_source)
}

/// Produce segment-level transcription output for an audio file.
pub fn transcribe(audio: &Path, config: &AppConfig) -> Result<TranscriptionOutput> {
    let segments = recognize_audio_file(audio, config)?
        .into_iter()
        .map(|recognized| recognized.segment)
        .collect();
    Ok(TranscriptionOutput { segments })
}

fn acquire(input: TranscriptInput<'_>, config: &AppConfig) -> Result<TranscriptionSource> {
    match input {
        TranscriptInput::Audio(path) => {
            if !transcription::engine_available() {
                return Err(WordsyncError::engine_unavailable(
                    "speech recognition is not available in this build; pass --transcript instead",
                ));
            }
            transcribe_audio_file(path, config)
        }
        TranscriptInput::Transcript(path) => transcription::load_transcript_json(path),
    }
}

/// Load the reference text, obtain the transcribed stream and align them.
pub fn run_alignment(
    reference_path: &Path,
    input: TranscriptInput<'_>,
    config: &AppConfig,
) -> Result<AlignmentOutput> {
    let reference = load_reference(reference_path)?;
    info!(reference_words = reference.len(), "reference text loaded");

    let source = acquire(input, config)?;
    let transcribed = source.into_words();

    let aligner = SequentialAligner::new(config.aligner);
    let words = aligner.align(&transcribed, &reference);
    info!(aligned = words.len(), "alignment complete");
    Ok(AlignmentOutput { words })
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::{run_alignment, TranscriptInput};
    use crate::config::AppConfig;
    use crate::error::ErrorCode;
    use crate::types::TimedWord;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config() -> AppConfig {
        AppConfig::resolve("small", Some(PathBuf::from("/nonexistent/model.bin")))
    }

    #[test]
    fn aligns_reference_against_transcript_document() {
        let reference = temp_file("Hello, world!\n\n  -- again\n");
        let transcript = temp_file(
            r#"{"segments": [{"start": 0.0, "end": 1.0, "text": " hello world"}]}"#,
        );

        let output = run_alignment(
            reference.path(),
            TranscriptInput::Transcript(transcript.path()),
            &config(),
        )
        .unwrap();

        assert_eq!(output.words.len(), 3);
        assert_eq!(output.words[0], TimedWord::new(0.0, 0.5, "Hello,"));
        assert_eq!(output.words[1], TimedWord::new(0.5, 1.0, "world!"));
        assert_eq!(output.words[2].text, "again");
        assert!((output.words[2].start - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_reference_is_alignment_failure() {
        let transcript = temp_file(r#"{"words": []}"#);
        let err = run_alignment(
            std::path::Path::new("/no/reference.txt"),
            TranscriptInput::Transcript(transcript.path()),
            &config(),
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlignmentFailed);
    }

    #[test]
    fn audio_without_model_reports_engine_unavailable() {
        let reference = temp_file("hello");
        let err = run_alignment(
            reference.path(),
            TranscriptInput::Audio(std::path::Path::new("/no/audio.wav")),
            &config(),
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::EngineUnavailable);
    }
}
