//! Structured error types for the report engine.
//!
//! Three variants cover the real failure sources: request parsing, the
//! measurement backend (font registration), and PDF serialization. Missing
//! field values and empty task selections are not errors; they render as
//! fallback literals.

use thiserror::Error;

/// The unified error type returned by all public API functions.
///
/// Both fatal classes propagate immediately; the engine never retries and
/// never substitutes a smaller font, because that would silently change
/// document semantics.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON input failed to parse as a valid report request.
    #[error("failed to parse report request: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font could not be loaded or parsed by the measurement backend.
    #[error("font error: {0}")]
    Font(String),

    /// PDF serialization failed. No partial artifact is produced.
    #[error("render error: {0}")]
    Render(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  hint: {hint}")
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report request schema. Check field names and types."
                    .to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input — is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        ReportError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: ReportError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.contains("failed to parse report request"));
        assert!(msg.contains("hint:"));
    }
}
