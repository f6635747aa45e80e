//! Issue tracker gateway trait
//!
//! The narrow interface through which hook actions reach the tracker.
//! Implementations own their own transport, retries and timeouts; the
//! router calls each operation at most once per extracted issue and
//! propagates failures without retrying.

use async_trait::async_trait;
use thiserror::Error;

/// Errors crossing the tracker boundary
#[derive(Debug, Error)]
pub enum ItsError {
    /// The tracker rejected the request
    #[error("tracker API error: {0}")]
    Api(String),

    /// Authentication failed
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The issue does not exist on the tracker
    #[error("issue not found: {0}")]
    NotFound(String),

    /// The tracker asked us to back off
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Transport errors
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Gateway to an issue tracker backend.
///
/// `name` doubles as the configuration section for the backend's gate
/// flags and issue pattern.
#[async_trait]
pub trait ItsFacade: Send + Sync {
    /// The backend's name (e.g. "jira")
    fn name(&self) -> &str;

    /// Attach a link to an issue.
    async fn add_related_link(&self, issue: &str, url: &str, label: &str)
        -> Result<(), ItsError>;

    /// Attach a link and post a comment on an issue.
    async fn add_related_link_and_comment(
        &self,
        issue: &str,
        url: &str,
        label: &str,
        comment: &str,
    ) -> Result<(), ItsError>;
}
