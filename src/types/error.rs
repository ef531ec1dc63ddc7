//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Design Principles
//!
//! - Single unified error type (BabelError) for the entire application
//! - Per-language failures are recorded into that language's
//!   `AnalysisRecord`, never propagated out of the run loop
//! - No panic/unwrap - all errors are recoverable

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BabelError>;

#[derive(Debug, Error)]
pub enum BabelError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    /// Translation backend failed for one target language
    #[error("Translation to '{lang}' failed: {message}")]
    Translation { lang: String, message: String },

    /// Inference backend error (connection, status, malformed body)
    #[error("LLM API error: {0}")]
    LlmApi(String),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// Structural parse failure; recorded per language, never fatal
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not initialized: run 'babelcode init' first")]
    NotInitialized,
}

impl BabelError {
    /// True for transient transport failures worth one more network attempt.
    ///
    /// Extraction retries are a separate, single-shot policy owned by the
    /// pipeline; this only governs HTTP-level backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            BabelError::Http(e) => e.is_connect() || e.is_timeout(),
            BabelError::LlmApi(msg) => {
                let lower = msg.to_lowercase();
                lower.contains("timeout")
                    || lower.contains("overloaded")
                    || lower.contains("503")
                    || lower.contains("502")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let err = BabelError::LlmApi("server returned 503".to_string());
        assert!(err.is_transient());

        let err = BabelError::Config("bad endpoint".to_string());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_display_includes_language() {
        let err = BabelError::Translation {
            lang: "sw".to_string(),
            message: "backend offline".to_string(),
        };
        assert!(err.to_string().contains("'sw'"));
    }
}
