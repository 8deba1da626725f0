//! Core types shared by the alignment core and the transcription pipeline

use serde::{Deserialize, Serialize};

/// Raw audio data representation (mono, f32 samples)
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Audio samples, normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz (e.g., 44100)
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// A word with a time span, either recognizer output or aligned output.
///
/// `end >= start` is expected but never checked; out-of-order or non-finite
/// values are carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedWord {
    #[serde(default)]
    pub start: f64, // seconds
    #[serde(default)]
    pub end: f64, // seconds
    #[serde(rename = "word", default)]
    pub text: String,
}

impl TimedWord {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// A segment of transcribed audio with timing but no per-word timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default)]
    pub start: f64, // seconds
    #[serde(default)]
    pub end: f64, // seconds
    #[serde(default)]
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// Document written by `wordsync align`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentOutput {
    pub words: Vec<TimedWord>,
}

/// Document written by `wordsync transcribe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionOutput {
    pub segments: Vec<Segment>,
}
