//! Review host event schema
//!
//! The host emits a JSON stream of review events, tagged by a `type` field.
//! Only three kinds drive hook actions; every other kind deserializes to
//! [`Event::Unhandled`] so a stream consumer can feed the full firehose to
//! the router without pre-filtering.
//!
//! Payload field names follow the host's wire format (camelCase), so these
//! types deserialize stream lines as-is.

use serde::Deserialize;

/// A review event, tagged by kind.
///
/// Events are immutable once received; the router takes ownership for the
/// duration of one dispatch.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A ref moved (push, merge, tag). Carries the updated ref with old and
    /// new revisions.
    #[serde(rename = "ref-updated")]
    RefUpdated {
        #[serde(default)]
        submitter: Option<Account>,
        #[serde(rename = "refUpdate")]
        ref_update: RefUpdate,
    },

    /// A change was submitted and merged into its destination branch.
    #[serde(rename = "change-merged")]
    ChangeMerged {
        change: ChangeInfo,
        #[serde(rename = "patchSet")]
        patch_set: PatchSetInfo,
        #[serde(default)]
        submitter: Option<Account>,
    },

    /// A new patch set was uploaded to a change.
    #[serde(rename = "patchset-created")]
    PatchSetCreated {
        change: ChangeInfo,
        #[serde(rename = "patchSet")]
        patch_set: PatchSetInfo,
        #[serde(default)]
        uploader: Option<Account>,
    },

    /// Any event kind the hooks take no action on (comment-added,
    /// reviewer-added, ...). Dispatching one is a no-op.
    #[serde(other)]
    Unhandled,
}

impl Event {
    /// Parse one event from its JSON wire form.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// The ref transition carried by a ref-updated event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdate {
    /// Project the ref belongs to
    pub project: String,

    /// Full ref name (e.g. "refs/heads/main")
    pub ref_name: String,

    /// Revision the ref pointed at before the update
    pub old_rev: String,

    /// Revision the ref points at now
    pub new_rev: String,
}

/// Change metadata shared by merged and patch-set events.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    /// Project the change targets
    pub project: String,

    /// Destination branch
    pub branch: String,

    /// The change's Change-Id
    pub id: String,

    /// The change's numeric identifier
    pub number: u32,

    /// One-line subject
    #[serde(default)]
    pub subject: Option<String>,

    /// Current topic, if any
    #[serde(default)]
    pub topic: Option<String>,

    /// Canonical URL of the change page
    #[serde(default)]
    pub url: Option<String>,
}

/// One patch set of a change.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchSetInfo {
    /// Patch set number within the change
    pub number: u32,

    /// Commit the patch set points at
    pub revision: String,

    /// The magic ref holding the patch set (e.g. "refs/changes/45/12345/2")
    #[serde(rename = "ref")]
    pub ref_name: String,
}

/// An account attached to an event (submitter, uploader).
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref_updated() {
        let json = r#"{
            "type": "ref-updated",
            "submitter": {"name": "Dev One", "email": "dev@example.com"},
            "refUpdate": {
                "oldRev": "0000000000000000000000000000000000000000",
                "newRev": "59b92b946a9637ab4cda1f361d3725fd7958dbe9",
                "refName": "refs/heads/main",
                "project": "tools/widget"
            }
        }"#;

        let event = Event::from_json(json).unwrap();
        match event {
            Event::RefUpdated {
                ref_update,
                submitter,
            } => {
                assert_eq!(ref_update.project, "tools/widget");
                assert_eq!(ref_update.ref_name, "refs/heads/main");
                assert_eq!(ref_update.new_rev, "59b92b946a9637ab4cda1f361d3725fd7958dbe9");
                assert_eq!(submitter.unwrap().name.as_deref(), Some("Dev One"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_parse_change_merged() {
        let json = r#"{
            "type": "change-merged",
            "change": {
                "project": "tools/widget",
                "branch": "main",
                "id": "I8f2c9a1d",
                "number": 12345,
                "subject": "Fix the widget",
                "url": "https://review.example/12345"
            },
            "patchSet": {
                "number": 2,
                "revision": "59b92b946a9637ab4cda1f361d3725fd7958dbe9",
                "ref": "refs/changes/45/12345/2"
            },
            "submitter": {"username": "dev1"}
        }"#;

        let event = Event::from_json(json).unwrap();
        match event {
            Event::ChangeMerged {
                change, patch_set, ..
            } => {
                assert_eq!(change.number, 12345);
                assert_eq!(change.branch, "main");
                assert_eq!(patch_set.ref_name, "refs/changes/45/12345/2");
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_parse_patchset_created() {
        let json = r#"{
            "type": "patchset-created",
            "change": {
                "project": "tools/widget",
                "branch": "main",
                "id": "I8f2c9a1d",
                "number": 777
            },
            "patchSet": {
                "number": 1,
                "revision": "aaaa1111",
                "ref": "refs/changes/77/777/1"
            },
            "uploader": {"name": "Dev Two"}
        }"#;

        let event = Event::from_json(json).unwrap();
        match event {
            Event::PatchSetCreated { change, uploader, .. } => {
                assert_eq!(change.number, 777);
                assert!(change.subject.is_none());
                assert_eq!(uploader.unwrap().name.as_deref(), Some("Dev Two"));
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_unhandled() {
        let json = r#"{"type": "comment-added", "comment": "looks good"}"#;
        let event = Event::from_json(json).unwrap();
        assert!(matches!(event, Event::Unhandled));
    }

    #[test]
    fn test_missing_required_field_is_an_error() {
        // refUpdate without a project cannot drive a hook
        let json = r#"{
            "type": "ref-updated",
            "refUpdate": {"oldRev": "a", "newRev": "b", "refName": "refs/heads/main"}
        }"#;
        assert!(Event::from_json(json).is_err());
    }
}
