//! Transcription sources - recognizer output turned into a timed word stream
//!
//! A recognizer either reports per-word timestamps or only segment-level
//! timing. [`TranscriptionSource`] carries whichever one was produced, and
//! [`TranscriptionSource::into_words`] derives the word stream the aligner
//! consumes, interpolating inside segments when needed.

#[cfg(feature = "whisper")]
pub mod whisper;

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Result, WordsyncError};
use crate::types::{Segment, TimedWord};

/// How the transcribed word stream is obtained from a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The engine produced word timestamps; they are used directly.
    WordTimestamps,
    /// Only segments exist; word timing is spread evenly over each segment.
    SegmentInterpolation,
}

/// Recognizer output at whichever granularity the engine supports.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptionSource {
    Words(Vec<TimedWord>),
    Segments(Vec<Segment>),
}

impl TranscriptionSource {
    pub fn strategy(&self) -> Strategy {
        match self {
            TranscriptionSource::Words(_) => Strategy::WordTimestamps,
            TranscriptionSource::Segments(_) => Strategy::SegmentInterpolation,
        }
    }

    /// Produce the ordered transcribed word stream.
    pub fn into_words(self) -> Vec<TimedWord> {
        let strategy = self.strategy();
        let words = match self {
            TranscriptionSource::Words(words) => words,
            TranscriptionSource::Segments(segments) => interpolate_segments(&segments),
        };
        info!(?strategy, words = words.len(), "derived transcribed word stream");
        words
    }
}

/// Split each segment on whitespace and share its time range evenly among
/// the resulting words. Segments without words are skipped.
pub fn interpolate_segments(segments: &[Segment]) -> Vec<TimedWord> {
    let mut words = Vec::new();
    for segment in segments {
        let tokens: Vec<&str> = segment.text.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }
        let count = tokens.len() as f64;
        let duration = segment.end - segment.start;
        for (i, token) in tokens.into_iter().enumerate() {
            let start = segment.start + duration * i as f64 / count;
            let end = segment.start + duration * (i + 1) as f64 / count;
            words.push(TimedWord::new(start, end, token));
        }
    }
    words
}

/// A decoded sub-word token with engine timing in centiseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedToken {
    pub text: String,
    pub t0: i64,
    pub t1: i64,
}

impl TimedToken {
    pub fn new(text: impl Into<String>, t0: i64, t1: i64) -> Self {
        Self {
            text: text.into(),
            t0,
            t1,
        }
    }

    /// Control tokens such as `[_BEG_]`, `[_TT_150]` or `<|endoftext|>`.
    fn is_special(&self) -> bool {
        let text = self.text.trim();
        text.starts_with("[_") || text.starts_with("<|")
    }
}

/// One recognizer segment together with the tokens it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedSegment {
    pub segment: Segment,
    pub tokens: Vec<TimedToken>,
}

/// Group tokens into words: a token with leading whitespace opens a new word,
/// anything else continues the current one. A word spans from its first
/// token's `t0` to its last token's `t1`.
///
/// Returns `None` when the token timing is unusable (negative, reversed, or
/// all zero-length), so the caller can fall back to interpolation.
pub fn words_from_tokens(tokens: &[TimedToken]) -> Option<Vec<TimedWord>> {
    let text_tokens: Vec<&TimedToken> = tokens.iter().filter(|t| !t.is_special()).collect();
    if text_tokens.iter().any(|t| t.t0 < 0 || t.t1 < t.t0) {
        return None;
    }
    if !text_tokens.is_empty() && text_tokens.iter().all(|t| t.t1 == t.t0) {
        return None;
    }

    let mut words = Vec::new();
    let mut current = String::new();
    let mut span: Option<(i64, i64)> = None;
    for token in text_tokens {
        let opens_word = token.text.starts_with(char::is_whitespace);
        if opens_word {
            flush_word(&mut words, &mut current, &mut span);
        }
        current.push_str(token.text.trim());
        span = Some(match span {
            Some((t0, _)) => (t0, token.t1),
            None => (token.t0, token.t1),
        });
    }
    flush_word(&mut words, &mut current, &mut span);
    Some(words)
}

fn flush_word(words: &mut Vec<TimedWord>, current: &mut String, span: &mut Option<(i64, i64)>) {
    if let Some((t0, t1)) = span.take() {
        if !current.is_empty() {
            words.push(TimedWord::new(
                t0 as f64 / 100.0,
                t1 as f64 / 100.0,
                current.as_str(),
            ));
        }
    }
    current.clear();
}

/// Pick word timestamps when every segment's tokens carry usable timing,
/// otherwise keep the segments for interpolation.
pub fn select_source(recognized: Vec<RecognizedSegment>) -> TranscriptionSource {
    let mut words = Vec::new();
    let mut usable = true;
    for entry in &recognized {
        let has_text = !entry.segment.text.trim().is_empty();
        match words_from_tokens(&entry.tokens) {
            Some(segment_words) if !has_text || !segment_words.is_empty() => {
                words.extend(segment_words);
            }
            _ => {
                debug!(
                    start = entry.segment.start,
                    "segment lacks usable token timing; interpolating"
                );
                usable = false;
                break;
            }
        }
    }

    if usable {
        TranscriptionSource::Words(words)
    } else {
        TranscriptionSource::Segments(recognized.into_iter().map(|r| r.segment).collect())
    }
}

#[derive(Debug, Deserialize)]
struct RawTranscript {
    #[serde(default)]
    words: Option<Vec<TimedWord>>,
    #[serde(default)]
    segments: Option<Vec<Segment>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Parse a transcript document.
///
/// Accepts `{"words": [{start, end, word}]}` or `{"segments": [{start, end, text}]}`;
/// a word list takes precedence when both are present. An error document
/// (`{"error": code, "message": text}`) is surfaced as a transcription failure.
pub fn parse_transcript_json(raw: &str) -> Result<TranscriptionSource> {
    let parsed: RawTranscript = serde_json::from_str(raw).map_err(|err| {
        WordsyncError::alignment_failed(format!("failed to parse transcript JSON: {err}"))
    })?;

    if let Some(code) = parsed.error {
        return Err(WordsyncError::transcribe_failed(format!(
            "transcript reports {code}: {}",
            parsed.message.unwrap_or_default()
        )));
    }

    let source = match (parsed.words, parsed.segments) {
        (Some(words), _) => TranscriptionSource::Words(words),
        (None, Some(segments)) => TranscriptionSource::Segments(segments),
        (None, None) => TranscriptionSource::Segments(Vec::new()),
    };
    debug!(strategy = ?source.strategy(), "parsed transcript document");
    Ok(source)
}

/// Read and parse a transcript document from disk.
pub fn load_transcript_json<P: AsRef<Path>>(path: P) -> Result<TranscriptionSource> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|err| {
        WordsyncError::alignment_failed(format!(
            "failed to read transcript {}: {err}",
            path.display()
        ))
    })?;
    parse_transcript_json(&raw)
}

/// Whether this build can run speech recognition on audio files.
pub fn engine_available() -> bool {
    cfg!(feature = "whisper")
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn interpolates_words_evenly_inside_segment() {
        let segments = vec![Segment::new(1.0, 2.0, " one two  three four ")];
        let words = interpolate_segments(&segments);

        assert_eq!(words.len(), 4);
        let expected = [(1.0, 1.25), (1.25, 1.5), (1.5, 1.75), (1.75, 2.0)];
        for (word, (start, end)) in words.iter().zip(expected) {
            assert_relative_eq!(word.start, start, epsilon = 1e-9);
            assert_relative_eq!(word.end, end, epsilon = 1e-9);
        }
        assert_eq!(words[2].text, "three");
    }

    #[test]
    fn skips_empty_segments() {
        let segments = vec![
            Segment::new(0.0, 1.0, "   "),
            Segment::new(1.0, 3.0, "hi there"),
        ];
        let words = interpolate_segments(&segments);
        assert_eq!(
            words,
            vec![
                TimedWord::new(1.0, 2.0, "hi"),
                TimedWord::new(2.0, 3.0, "there")
            ]
        );
    }

    #[test]
    fn word_list_wins_over_segments() {
        let raw = r#"{
            "words": [{"start": 0.1, "end": 0.4, "word": "hey"}],
            "segments": [{"start": 0.0, "end": 1.0, "text": "hey you"}]
        }"#;
        let source = parse_transcript_json(raw).unwrap();
        assert_eq!(source.strategy(), Strategy::WordTimestamps);
        assert_eq!(source.into_words(), vec![TimedWord::new(0.1, 0.4, "hey")]);
    }

    #[test]
    fn segments_only_selects_interpolation() {
        let raw = r#"{"segments": [{"start": 0.0, "end": 1.0, "text": "hey you"}]}"#;
        let source = parse_transcript_json(raw).unwrap();
        assert_eq!(source.strategy(), Strategy::SegmentInterpolation);
        assert_eq!(source.into_words().len(), 2);
    }

    #[test]
    fn missing_fields_default() {
        let raw = r#"{"words": [{"word": "x"}, {"start": 1.5}]}"#;
        let words = parse_transcript_json(raw).unwrap().into_words();
        assert_eq!(
            words,
            vec![TimedWord::new(0.0, 0.0, "x"), TimedWord::new(1.5, 0.0, "")]
        );
    }

    #[test]
    fn empty_document_yields_no_words() {
        let source = parse_transcript_json("{}").unwrap();
        assert!(source.into_words().is_empty());
    }

    #[test]
    fn error_document_is_reported() {
        let raw = r#"{"error": "transcribe_failed", "message": "model missing"}"#;
        let err = parse_transcript_json(raw).unwrap_err();
        assert_eq!(err.code(), ErrorCode::TranscribeFailed);
        assert!(err.message().contains("model missing"));
    }

    #[test]
    fn malformed_json_is_alignment_failure() {
        let err = parse_transcript_json("{not json").unwrap_err();
        assert_eq!(err.code(), ErrorCode::AlignmentFailed);
    }

    fn tokens(items: &[(&str, i64, i64)]) -> Vec<TimedToken> {
        items
            .iter()
            .map(|&(text, t0, t1)| TimedToken::new(text, t0, t1))
            .collect()
    }

    #[test]
    fn groups_sub_word_tokens_into_words() {
        let pieces = tokens(&[
            ("[_BEG_]", 0, 0),
            (" Tw", 50, 70),
            ("inkle", 70, 90),
            (",", 90, 92),
            (" little", 140, 180),
            (" star", 180, 260),
            ("[_TT_260]", 260, 260),
        ]);
        let words = words_from_tokens(&pieces).unwrap();

        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Twinkle,");
        assert_relative_eq!(words[0].start, 0.5, epsilon = 1e-9);
        assert_relative_eq!(words[0].end, 0.92, epsilon = 1e-9);
        assert_eq!(words[1], TimedWord::new(1.4, 1.8, "little"));
        assert_eq!(words[2], TimedWord::new(1.8, 2.6, "star"));
    }

    #[test]
    fn first_token_without_leading_space_starts_a_word() {
        let words = words_from_tokens(&tokens(&[("Hi", 0, 20), (" there", 20, 50)])).unwrap();
        assert_eq!(
            words,
            vec![
                TimedWord::new(0.0, 0.2, "Hi"),
                TimedWord::new(0.2, 0.5, "there")
            ]
        );
    }

    #[test]
    fn unusable_token_timing_is_rejected() {
        assert!(words_from_tokens(&tokens(&[(" a", 0, 0), (" b", 0, 0)])).is_none());
        assert!(words_from_tokens(&tokens(&[(" a", -1, 10)])).is_none());
        assert!(words_from_tokens(&tokens(&[(" a", 30, 10)])).is_none());
    }

    #[test]
    fn select_source_prefers_token_timing() {
        let recognized = vec![
            RecognizedSegment {
                segment: Segment::new(0.0, 1.0, " hello world"),
                tokens: tokens(&[(" hello", 10, 40), (" world", 40, 90)]),
            },
            RecognizedSegment {
                segment: Segment::new(1.0, 1.0, ""),
                tokens: Vec::new(),
            },
        ];
        let source = select_source(recognized);

        assert_eq!(source.strategy(), Strategy::WordTimestamps);
        assert_eq!(
            source.into_words(),
            vec![
                TimedWord::new(0.1, 0.4, "hello"),
                TimedWord::new(0.4, 0.9, "world")
            ]
        );
    }

    #[test]
    fn select_source_falls_back_to_segments() {
        let recognized = vec![
            RecognizedSegment {
                segment: Segment::new(0.0, 1.0, " hello world"),
                tokens: tokens(&[(" hello", 10, 40), (" world", 40, 90)]),
            },
            RecognizedSegment {
                segment: Segment::new(1.0, 2.0, " again"),
                tokens: tokens(&[(" again", 0, 0)]),
            },
        ];
        let source = select_source(recognized);

        assert_eq!(source.strategy(), Strategy::SegmentInterpolation);
        let words = source.into_words();
        assert_eq!(words.len(), 3);
        assert_eq!(words[2], TimedWord::new(1.0, 2.0, "again"));
    }
}
