//! JSON documents written to stdout.

use serde::Serialize;

use crate::error::{Result, WordsyncError};

#[derive(Debug, Serialize)]
struct ErrorDocument<'a> {
    error: &'a str,
    message: &'a str,
}

/// Serialize a result document, optionally pretty-printed.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.map_err(|err| WordsyncError::alignment_failed(format!("failed to encode output: {err}")))
}

/// `{"error": "<code>", "message": "<text>"}` for a failure.
pub fn error_json(err: &WordsyncError) -> String {
    let document = ErrorDocument {
        error: err.code().as_str(),
        message: err.message(),
    };
    // Two string fields cannot fail to encode.
    serde_json::to_string(&document).unwrap_or_else(|_| {
        format!("{{\"error\":\"{}\",\"message\":\"\"}}", err.code().as_str())
    })
}
