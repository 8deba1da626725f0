//! whisper.cpp backend via whisper-rs.
//!
//! Segments are returned together with their timestamped tokens, so the
//! caller can build word timing from tokens and interpolate only when the
//! token timing is unusable.

use std::path::Path;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{select_source, RecognizedSegment, TimedToken, TranscriptionSource};
use crate::audio::resample::linear_resample;
use crate::error::{Result, WordsyncError};
use crate::types::{AudioData, Segment};

/// Sample rate whisper models are trained on.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

pub struct WhisperTranscriber {
    ctx: WhisperContext,
}

impl WhisperTranscriber {
    /// Load a ggml model. Missing or unloadable models report `engine_unavailable`.
    pub fn new(model_path: &Path) -> Result<Self> {
        if !model_path.is_file() {
            return Err(WordsyncError::engine_unavailable(format!(
                "whisper model not found at {}; download one with: wget https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-small.bin -P ./models/",
                model_path.display()
            )));
        }
        let path_str = model_path.to_str().ok_or_else(|| {
            WordsyncError::engine_unavailable(format!(
                "whisper model path is not valid UTF-8: {}",
                model_path.display()
            ))
        })?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|err| {
                WordsyncError::engine_unavailable(format!("failed to load whisper model: {err}"))
            })?;
        info!(model = %model_path.display(), "whisper model loaded");
        Ok(Self { ctx })
    }

    /// Run recognition over `audio` and pick word or segment timing.
    pub fn transcribe(&self, audio: &AudioData) -> Result<TranscriptionSource> {
        let recognized = self.recognize(audio)?;
        Ok(select_source(recognized))
    }

    /// Run recognition over `audio`, resampling to 16 kHz first if needed.
    pub fn recognize(&self, audio: &AudioData) -> Result<Vec<RecognizedSegment>> {
        let samples = if audio.sample_rate == WHISPER_SAMPLE_RATE {
            audio.samples.clone()
        } else {
            debug!(
                from = audio.sample_rate,
                to = WHISPER_SAMPLE_RATE,
                "resampling audio for whisper"
            );
            linear_resample(&audio.samples, audio.sample_rate, WHISPER_SAMPLE_RATE)?
        };

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_token_timestamps(true);

        let mut state = self.ctx.create_state().map_err(|err| {
            WordsyncError::transcribe_failed(format!("failed to create whisper state: {err}"))
        })?;
        state.full(params, &samples).map_err(|err| {
            WordsyncError::transcribe_failed(format!("whisper inference failed: {err}"))
        })?;

        let mut recognized = Vec::new();
        for segment in state.as_iter() {
            let text = segment
                .to_str()
                .map_err(|err| {
                    WordsyncError::transcribe_failed(format!("failed to get segment text: {err}"))
                })?
                .to_string();
            // Timestamps are in centiseconds
            let start = segment.start_timestamp() as f64 / 100.0;
            let end = segment.end_timestamp() as f64 / 100.0;

            let mut tokens = Vec::new();
            for index in 0..segment.n_tokens() {
                let Some(token) = segment.get_token(index) else {
                    continue;
                };
                let piece = token
                    .to_str_lossy()
                    .map_err(|err| {
                        WordsyncError::transcribe_failed(format!(
                            "failed to get token text: {err}"
                        ))
                    })?
                    .to_string();
                let data = token.token_data();
                tokens.push(TimedToken::new(piece, data.t0, data.t1));
            }

            recognized.push(RecognizedSegment {
                segment: Segment { start, end, text },
                tokens,
            });
        }
        info!(segments = recognized.len(), "whisper transcription finished");

        Ok(recognized)
    }
}
