use tracing::debug;

use super::normalize::normalize;
use crate::types::TimedWord;

/// Tunables for the sequential matcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignerConfig {
    /// Maximum number of transcribed words inspected ahead of the cursor.
    pub window: usize,
    /// Score of a substring match sitting right at the cursor.
    pub partial_base: f64,
    /// Score lost per word of distance from the cursor for substring matches.
    pub partial_decay: f64,
    /// Length in seconds given to a word with no transcribed counterpart.
    pub fallback_duration: f64,
}

impl AlignerConfig {
    pub const DEFAULT_WINDOW: usize = 20;
    pub const DEFAULT_PARTIAL_BASE: f64 = 0.8;
    pub const DEFAULT_PARTIAL_DECAY: f64 = 0.02;
    pub const DEFAULT_FALLBACK_DURATION: f64 = 0.3;
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            window: Self::DEFAULT_WINDOW,
            partial_base: Self::DEFAULT_PARTIAL_BASE,
            partial_decay: Self::DEFAULT_PARTIAL_DECAY,
            fallback_duration: Self::DEFAULT_FALLBACK_DURATION,
        }
    }
}

/// Where the timing of an aligned word came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchSource {
    /// Normalized forms were identical.
    Exact { index: usize },
    /// One normalized form contains the other.
    Partial { index: usize, score: f64 },
    /// Nothing matched inside the window; timing extrapolated from the previous word.
    Synthesized,
}

impl MatchSource {
    /// Index of the transcribed word the timing was copied from.
    pub fn index(&self) -> Option<usize> {
        match *self {
            MatchSource::Exact { index } | MatchSource::Partial { index, .. } => Some(index),
            MatchSource::Synthesized => None,
        }
    }

    /// Match score in [0, 1]; synthesized timing scores zero.
    pub fn confidence(&self) -> f64 {
        match *self {
            MatchSource::Exact { .. } => 1.0,
            MatchSource::Partial { score, .. } => score,
            MatchSource::Synthesized => 0.0,
        }
    }
}

/// Aligned output word together with how it was matched.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedWord {
    pub word: TimedWord,
    pub source: MatchSource,
}

/// Greedy left-to-right matcher with a bounded lookahead window.
///
/// Each reference word either consumes a transcribed word (moving the cursor
/// past it) or receives timing extrapolated from the previously aligned word.
/// The cursor never moves backwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialAligner {
    config: AlignerConfig,
}

impl SequentialAligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Assign a time span to every reference word that has a non-empty
    /// normalized form, preserving reference order and spelling.
    pub fn align<S: AsRef<str>>(&self, transcribed: &[TimedWord], reference: &[S]) -> Vec<TimedWord> {
        self.align_detailed(transcribed, reference)
            .into_iter()
            .map(|aligned| aligned.word)
            .collect()
    }

    /// Same as [`SequentialAligner::align`], keeping the match source of each word.
    pub fn align_detailed<S: AsRef<str>>(
        &self,
        transcribed: &[TimedWord],
        reference: &[S],
    ) -> Vec<AlignedWord> {
        let candidates: Vec<String> = transcribed.iter().map(|w| normalize(&w.text)).collect();
        let mut aligned: Vec<AlignedWord> = Vec::with_capacity(reference.len());
        let mut cursor = 0usize;

        for reference_word in reference {
            let reference_word = reference_word.as_ref();
            let key = normalize(reference_word);
            if key.is_empty() {
                continue;
            }

            let source = self.find_match(&key, &candidates, cursor);
            let word = match source.index() {
                Some(index) => {
                    cursor = index + 1;
                    let matched = &transcribed[index];
                    TimedWord::new(matched.start, matched.end, reference_word)
                }
                None => {
                    let start = aligned.last().map_or(0.0, |previous| previous.word.end);
                    TimedWord::new(start, start + self.config.fallback_duration, reference_word)
                }
            };
            aligned.push(AlignedWord { word, source });
        }

        let synthesized = aligned
            .iter()
            .filter(|a| a.source == MatchSource::Synthesized)
            .count();
        debug!(
            transcribed = transcribed.len(),
            aligned = aligned.len(),
            synthesized,
            "sequential alignment finished"
        );
        aligned
    }

    fn find_match(&self, key: &str, candidates: &[String], cursor: usize) -> MatchSource {
        let window = self
            .config
            .window
            .min(candidates.len().saturating_sub(cursor));

        let mut best_index = None;
        let mut best_score = 0.0;
        for offset in 0..window {
            let index = cursor + offset;
            let candidate = candidates[index].as_str();
            if candidate == key {
                return MatchSource::Exact { index };
            }
            if candidate.contains(key) || key.contains(candidate) {
                let score = self.partial_score(offset);
                // Ties keep the candidate closer to the cursor.
                if score > best_score {
                    best_score = score;
                    best_index = Some(index);
                }
            }
        }

        match best_index {
            Some(index) => MatchSource::Partial {
                index,
                score: best_score,
            },
            None => MatchSource::Synthesized,
        }
    }

    fn partial_score(&self, offset: usize) -> f64 {
        self.config.partial_base - self.config.partial_decay * offset as f64
    }
}
