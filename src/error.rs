//! Error types for TrackLink
//!
//! Each module defines its own thiserror enum for the failures it can
//! produce; this module aggregates them into one crate-wide error so hosts
//! can hold a single type at the dispatch boundary.

use crate::extract::ExtractError;
use crate::git::GitError;
use crate::gitweb::LinkError;
use crate::its::ItsError;
use crate::settings::SettingsError;
use crate::topics::TopicError;
use thiserror::Error;

/// Result type alias for TrackLink operations
pub type Result<T> = std::result::Result<T, TrackLinkError>;

/// Comprehensive error type for TrackLink operations
#[derive(Error, Debug)]
pub enum TrackLinkError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Settings(#[from] SettingsError),

    /// Issue pattern errors
    #[error("Issue extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Browser link construction errors
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// Git repository errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// Issue tracker gateway errors
    #[error("Tracker error: {0}")]
    Its(#[from] ItsError),

    /// Topic persistence errors
    #[error("Topic error: {0}")]
    Topic(#[from] TopicError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors (event payloads)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),

    /// Anyhow errors (for more context)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}
