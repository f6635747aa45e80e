//! Issue reference extraction from commit text
//!
//! Each tracker backend declares what its issue identifiers look like as a
//! regular expression; the extractor scans free-form text and returns every
//! occurrence. The matches land directly in gateway calls, so the pattern's
//! whole match must be the identifier the tracker understands.

use crate::settings::Settings;
use regex::Regex;
use thiserror::Error;

/// Errors constructing an extractor
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The configured pattern does not compile
    #[error("invalid issue pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The backend section has no issue_pattern key
    #[error("no issue_pattern configured for backend {0:?}")]
    PatternMissing(String),
}

/// Scans text for issue identifiers using a backend-specific pattern.
#[derive(Debug, Clone)]
pub struct IssueExtractor {
    pattern: Regex,
}

impl IssueExtractor {
    /// Compile an extractor from a pattern string.
    pub fn new(pattern: &str) -> Result<Self, ExtractError> {
        let compiled = Regex::new(pattern).map_err(|source| ExtractError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern: compiled })
    }

    /// Compile an extractor from the backend's `issue_pattern` setting.
    pub fn from_settings(settings: &dyn Settings, backend: &str) -> Result<Self, ExtractError> {
        let pattern = settings
            .string(backend, "issue_pattern")
            .ok_or_else(|| ExtractError::PatternMissing(backend.to_string()))?;
        Self::new(&pattern)
    }

    /// Return every issue identifier in `text`, in order of appearance.
    ///
    /// Repeated mentions are returned repeatedly; callers that want one
    /// action per distinct issue must de-duplicate themselves. Empty text
    /// and text without matches yield an empty vec, never an error.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
