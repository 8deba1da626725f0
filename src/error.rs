use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Convenient alias for results returned by the orchestration layer.
pub type Result<T> = std::result::Result<T, WordsyncError>;

/// Failure category, reported to callers as a stable machine-readable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Transcription engine not compiled in, or its model could not be loaded.
    EngineUnavailable,
    /// Audio decoding or speech recognition failed.
    TranscribeFailed,
    /// Reference/transcript loading or any other pipeline step failed.
    AlignmentFailed,
    /// Arguments were well-formed but semantically unusable.
    InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EngineUnavailable => "engine_unavailable",
            ErrorCode::TranscribeFailed => "transcribe_failed",
            ErrorCode::AlignmentFailed => "alignment_failed",
            ErrorCode::InvalidInput => "invalid_input",
        }
    }

    /// Process exit status used by the CLI for this category.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::EngineUnavailable | ErrorCode::InvalidInput => 2,
            ErrorCode::TranscribeFailed | ErrorCode::AlignmentFailed => 3,
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for everything around the alignment core.
#[derive(Debug, Clone)]
pub struct WordsyncError {
    code: ErrorCode,
    message: Arc<str>,
}

impl WordsyncError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Arc::from(message.into()),
        }
    }

    pub fn engine_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::EngineUnavailable, message)
    }

    pub fn transcribe_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::TranscribeFailed, message)
    }

    pub fn alignment_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlignmentFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for WordsyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl Error for WordsyncError {}
