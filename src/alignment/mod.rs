//! Sequential fuzzy alignment of reference words onto recognizer timestamps.

pub mod normalize;
pub mod sequential;

pub use normalize::normalize;
pub use sequential::{AlignedWord, AlignerConfig, MatchSource, SequentialAligner};

use crate::types::TimedWord;

/// Align `reference` onto `transcribed` with the default tunables.
pub fn align<S: AsRef<str>>(transcribed: &[TimedWord], reference: &[S]) -> Vec<TimedWord> {
    SequentialAligner::default().align(transcribed, reference)
}

/// Align with the default tunables, reporting the match source of each word.
pub fn align_detailed<S: AsRef<str>>(
    transcribed: &[TimedWord],
    reference: &[S],
) -> Vec<AlignedWord> {
    SequentialAligner::default().align_detailed(transcribed, reference)
}
