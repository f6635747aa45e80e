//! Issue tracker gateways
//!
//! The narrow interface hook actions are delivered through, plus the
//! bundled backends.
//!
//! # Overview
//!
//! [`ItsFacade`] is the contract: attach a link, attach a link with a
//! comment, and report the backend's name (which keys its configuration
//! section). The router never knows which backend it is talking to.
//!
//! # Built-in Gateways
//!
//! - **Jira**: REST remote links and comments
//! - **Recording**: in-memory gateway for deterministic tests

pub mod facade;
pub mod jira;
pub mod recording;

pub use facade::{ItsError, ItsFacade};
pub use jira::JiraFacade;
pub use recording::{FailOn, ItsOperation, RecordingIts};
