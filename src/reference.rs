//! Reference transcript loading.

use std::path::Path;

use crate::error::{Result, WordsyncError};

/// Split reference text into words: lines are trimmed, blank lines dropped,
/// the rest split on whitespace. Spelling, casing and punctuation are kept.
pub fn parse_reference(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(str::split_whitespace)
        .map(str::to_string)
        .collect()
}

/// Read a UTF-8 reference file and split it into words.
pub fn load_reference<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|err| {
        WordsyncError::alignment_failed(format!(
            "failed to read reference text {}: {err}",
            path.display()
        ))
    })?;
    Ok(parse_reference(&text))
}
