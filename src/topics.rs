//! Change topic persistence
//!
//! Setting a topic writes through the host's change store, which is outside
//! this crate; [`TopicStore`] is the seam. Persistence failures on this path
//! are caught by the router, logged, and swallowed, so implementations only
//! need to report them honestly.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors persisting a topic
#[derive(Debug, Error)]
pub enum TopicError {
    /// The host's change store rejected the write
    #[error("failed to persist topic: {0}")]
    Store(String),
}

/// Writes a change's topic field.
#[async_trait]
pub trait TopicStore: Send + Sync {
    /// Set the topic of change `change_number`, replacing any current value.
    async fn set_topic(&self, change_number: u32, topic: &str) -> Result<(), TopicError>;
}

/// In-memory topic store for tests.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingTopics {
    inner: Arc<Mutex<RecordingTopicsInner>>,
}

#[derive(Debug, Default)]
struct RecordingTopicsInner {
    topics: Vec<(u32, String)>,
    fail_with: Option<String>,
}

impl RecordingTopics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure every `set_topic` call to fail with the given message.
    pub fn fail_with(self, message: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_with = Some(message.into());
        }
        self
    }

    /// All successfully applied writes, oldest first.
    pub fn topics(&self) -> Vec<(u32, String)> {
        let inner = self.inner.lock().unwrap();
        inner.topics.clone()
    }
}

#[async_trait]
impl TopicStore for RecordingTopics {
    async fn set_topic(&self, change_number: u32, topic: &str) -> Result<(), TopicError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(ref message) = inner.fail_with {
            return Err(TopicError::Store(message.clone()));
        }
        inner.topics.push((change_number, topic.to_string()));
        Ok(())
    }
}
