//! TrackLink - issue tracker hooks for code review events
//!
//! TrackLink listens to a review host's event stream and keeps an external
//! issue tracker in step with it: refs that move and changes that merge get
//! browser links (and optionally the commit message as a comment) posted on
//! every issue the commit text mentions, and a freshly uploaded patch set
//! can copy its single referenced issue into the change's topic.
//!
//! # Architecture
//!
//! - **events**: the host's event schema (tagged JSON stream)
//! - **settings**: configuration store seam, YAML-file and in-memory
//! - **extract**: issue identifier extraction from commit text
//! - **gitweb**: browser link construction from URL templates
//! - **git**: commit message access
//! - **topics**: change topic persistence seam
//! - **its**: issue tracker gateways (Jira, recording test double)
//! - **hooks**: the router tying the above together per event
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tracklink::extract::IssueExtractor;
//! use tracklink::git::GitCommitReader;
//! use tracklink::gitweb::GitwebConfig;
//! use tracklink::its::{ItsFacade, JiraFacade};
//! use tracklink::settings::{FileSettings, Settings};
//! use tracklink::topics::RecordingTopics;
//! use tracklink::{Event, HookRouter};
//!
//! # async fn run() -> tracklink::Result<()> {
//! let settings: Arc<dyn Settings> = Arc::new(FileSettings::load_default()?);
//! let browser = Arc::new(GitwebConfig::from_settings(settings.as_ref()));
//! let its = Arc::new(JiraFacade::new("https://jira.example.com")?);
//! let extractor = IssueExtractor::from_settings(settings.as_ref(), its.name())?;
//!
//! let router = HookRouter::new(
//!     settings,
//!     browser,
//!     Arc::new(GitCommitReader::new("/var/lib/review/git")),
//!     its,
//!     // A real host implements TopicStore over its change database
//!     Arc::new(RecordingTopics::new()),
//!     extractor,
//! );
//!
//! let event = Event::from_json(r#"{"type":"dropped-output"}"#)?;
//! router.dispatch(event).await?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod error;
pub mod events;
pub mod extract;
pub mod settings;

// Components
pub mod git;
pub mod gitweb;
pub mod hooks;
pub mod its;
pub mod topics;

// Logging setup
pub mod logging;

// Re-exports
pub use error::{Result, TrackLinkError};
pub use events::Event;
pub use hooks::HookRouter;
