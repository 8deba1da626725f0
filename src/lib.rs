//! Timing for a known transcript, borrowed from an automatic transcription.
//!
//! The [`alignment`] module holds the core matcher; everything else loads
//! inputs, runs speech recognition and writes results.

pub mod alignment;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod reference;
pub mod transcription;
pub mod types;

pub use alignment::{
    align, align_detailed, AlignedWord, AlignerConfig, MatchSource, SequentialAligner,
};
pub use error::{ErrorCode, Result, WordsyncError};
pub use types::{AlignmentOutput, Segment, TimedWord};
