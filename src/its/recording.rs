//! Recording gateway for deterministic testing
//!
//! Stores every gateway call in memory and can be scripted to fail a
//! chosen operation, for exercising the router's error paths without a
//! tracker.

use crate::its::facade::{ItsError, ItsFacade};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recorded gateway call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItsOperation {
    RelatedLink {
        issue: String,
        url: String,
        label: String,
    },
    RelatedLinkAndComment {
        issue: String,
        url: String,
        label: String,
        comment: String,
    },
}

/// Which operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    RelatedLink,
    RelatedLinkAndComment,
}

/// In-memory [`ItsFacade`] that records every call.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct RecordingIts {
    name: String,
    inner: Arc<Mutex<RecordingItsInner>>,
}

#[derive(Debug, Default)]
struct RecordingItsInner {
    operations: Vec<ItsOperation>,
    fail_on: Option<FailOn>,
}

impl RecordingIts {
    /// Create a recording gateway named "tracker".
    pub fn new() -> Self {
        Self {
            name: "tracker".to_string(),
            inner: Arc::new(Mutex::new(RecordingItsInner::default())),
        }
    }

    /// Use a different backend name (and so a different config section).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Configure the gateway to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Get all recorded operations, oldest first.
    pub fn operations(&self) -> Vec<ItsOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    fn check_fail(&self, expected: FailOn) -> Result<(), ItsError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_on == Some(expected) {
            return Err(ItsError::Api("scripted failure".to_string()));
        }
        Ok(())
    }

    fn record(&self, op: ItsOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }
}

impl Default for RecordingIts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItsFacade for RecordingIts {
    fn name(&self) -> &str {
        &self.name
    }

    async fn add_related_link(&self, issue: &str, url: &str, label: &str) -> Result<(), ItsError> {
        self.check_fail(FailOn::RelatedLink)?;
        self.record(ItsOperation::RelatedLink {
            issue: issue.to_string(),
            url: url.to_string(),
            label: label.to_string(),
        });
        Ok(())
    }

    async fn add_related_link_and_comment(
        &self,
        issue: &str,
        url: &str,
        label: &str,
        comment: &str,
    ) -> Result<(), ItsError> {
        self.check_fail(FailOn::RelatedLinkAndComment)?;
        self.record(ItsOperation::RelatedLinkAndComment {
            issue: issue.to_string(),
            url: url.to_string(),
            label: label.to_string(),
            comment: comment.to_string(),
        });
        Ok(())
    }
}
