//! Event-to-action routing
//!
//! [`HookRouter`] owns the collaborator seams and turns one review event
//! into tracker actions:
//!
//! - ref-updated: post a browser link on every issue the commit message
//!   mentions (gated by `comment_on_ref_update`)
//! - change-merged: post a browser link for the merge ref on every
//!   mentioned issue, with the commit message as a comment when
//!   `comment_on_merge_includes_commit` is on
//! - patchset-created: copy the issue id into the change's topic when the
//!   commit message mentions exactly one issue (gated by
//!   `set_topic_from_ticket`)
//!
//! All flags default to on and are read fresh per event from the backend's
//! configuration section. Missing browser configuration skips the event's
//! link actions with an info log; tracker failures on the link paths
//! propagate to the caller; topic persistence failures are logged and
//! swallowed.

use crate::events::{ChangeInfo, Event, PatchSetInfo, RefUpdate};
use crate::extract::IssueExtractor;
use crate::git::CommitReader;
use crate::gitweb::{BrowserUrls, LinkBuilder, LinkOutcome};
use crate::its::ItsFacade;
use crate::settings::Settings;
use crate::topics::TopicStore;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Routes review events to issue tracker actions.
pub struct HookRouter {
    settings: Arc<dyn Settings>,
    commits: Arc<dyn CommitReader>,
    its: Arc<dyn ItsFacade>,
    topics: Arc<dyn TopicStore>,
    extractor: IssueExtractor,
    links: LinkBuilder,
}

impl HookRouter {
    pub fn new(
        settings: Arc<dyn Settings>,
        browser: Arc<dyn BrowserUrls>,
        commits: Arc<dyn CommitReader>,
        its: Arc<dyn ItsFacade>,
        topics: Arc<dyn TopicStore>,
        extractor: IssueExtractor,
    ) -> Self {
        let links = LinkBuilder::new(Arc::clone(&settings), browser);
        Self {
            settings,
            commits,
            its,
            topics,
            extractor,
            links,
        }
    }

    /// Process one event to completion.
    ///
    /// Collaborator calls are awaited inline, at most once per extracted
    /// issue; nothing is spawned and nothing is retried here.
    pub async fn dispatch(&self, event: Event) -> Result<()> {
        match event {
            Event::RefUpdated { ref_update, .. } => self.on_ref_updated(ref_update).await,
            Event::ChangeMerged {
                change, patch_set, ..
            } => self.on_change_merged(change, patch_set).await,
            Event::PatchSetCreated {
                change, patch_set, ..
            } => self.on_patch_set_created(change, patch_set).await,
            Event::Unhandled => {
                debug!("Ignoring unhandled event kind");
                Ok(())
            }
        }
    }

    async fn on_ref_updated(&self, update: RefUpdate) -> Result<()> {
        if !self
            .settings
            .flag(self.its.name(), "comment_on_ref_update", true)
        {
            return Ok(());
        }

        let message = self
            .commits
            .commit_message(&update.project, &update.new_rev)?;
        debug!(commit = %update.new_rev, "Read commit message for updated ref");

        let label = format!("Git: {}", update.new_rev);
        let target = match self.links.build(&update.project, &update.new_rev, label)? {
            LinkOutcome::Resolved(target) => target,
            LinkOutcome::Unavailable(reason) => {
                info!(reason = %reason, "Skipping browser link generation");
                return Ok(());
            }
        };

        for issue in self.extractor.extract(&message) {
            debug!(issue = %issue, url = %target.url, "Adding browser link to issue");
            self.its
                .add_related_link(&issue, &target.url, &target.label)
                .await?;
        }

        Ok(())
    }

    async fn on_change_merged(&self, change: ChangeInfo, patch_set: PatchSetInfo) -> Result<()> {
        let label = format!("GitWeb:{}", patch_set.ref_name);
        let target = match self
            .links
            .build(&change.project, &patch_set.ref_name, label)?
        {
            LinkOutcome::Resolved(target) => target,
            LinkOutcome::Unavailable(reason) => {
                info!(reason = %reason, "Merge event, no browser URL available");
                return Ok(());
            }
        };

        let message = self
            .commits
            .commit_message(&change.project, &patch_set.revision)?;
        // Issues come from the full message; only the posted comment is
        // stripped of the Change-Id trailer.
        let issues = self.extractor.extract(&message);

        if self
            .settings
            .flag(self.its.name(), "comment_on_merge_includes_commit", true)
        {
            let comment = strip_change_id(&message);
            for issue in &issues {
                debug!(issue = %issue, url = %target.url, "Adding merge link and comment to issue");
                self.its
                    .add_related_link_and_comment(issue, &target.url, &target.label, &comment)
                    .await?;
            }
        } else {
            for issue in &issues {
                debug!(issue = %issue, url = %target.url, "Adding merge link to issue");
                self.its
                    .add_related_link(issue, &target.url, &target.label)
                    .await?;
            }
        }

        Ok(())
    }

    async fn on_patch_set_created(
        &self,
        change: ChangeInfo,
        patch_set: PatchSetInfo,
    ) -> Result<()> {
        if !self
            .settings
            .flag(self.its.name(), "set_topic_from_ticket", true)
        {
            return Ok(());
        }

        let message = self
            .commits
            .commit_message(&change.project, &patch_set.revision)?;
        let issues = self.extractor.extract(&message);

        if issues.len() == 1 {
            let issue = &issues[0];
            info!(change = change.number, topic = %issue, "Setting change topic from issue");
            if let Err(err) = self.topics.set_topic(change.number, issue).await {
                error!(
                    issue = %issue,
                    change = change.number,
                    error = %err,
                    "Failed to update topic"
                );
            }
        } else {
            info!(
                change = change.number,
                count = issues.len(),
                "No issues or too many; topic unchanged"
            );
        }

        Ok(())
    }
}

/// Strip a trailing `Change-Id:` marker from a commit message.
///
/// Everything from the first occurrence of the marker onward is dropped;
/// either way a newline is prepended so the text reads as a block when
/// posted below a comment header.
pub fn strip_change_id(message: &str) -> String {
    match message.find("Change-Id:") {
        Some(index) => format!("\n{}", &message[..index]),
        None => format!("\n{}", message),
    }
}
