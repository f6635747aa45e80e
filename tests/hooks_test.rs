//! Integration tests for TrackLink
//!
//! These tests run the full pipeline: event JSON from the host stream,
//! settings from a YAML file, commit messages from real on-disk git
//! repositories, and actions recorded by the in-memory gateway.

use git2::Repository;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tracklink::extract::IssueExtractor;
use tracklink::git::GitCommitReader;
use tracklink::gitweb::GitwebConfig;
use tracklink::its::{ItsOperation, RecordingIts};
use tracklink::settings::{FileSettings, Settings};
use tracklink::topics::RecordingTopics;
use tracklink::{Event, HookRouter};

const BASE_CONFIG: &str = r#"
host:
  canonical_web_url: https://review.example/
gitweb:
  url: gitweb
  path_separator: "-"
tracker:
  issue_pattern: "[A-Z][A-Z0-9]+-[0-9]+"
"#;

/// Helper to create a project repository under `<base>/git/<project>`
fn init_project(base: &Path, project: &str) -> Repository {
    let dir = base.join("git").join(project);
    std::fs::create_dir_all(&dir).unwrap();
    Repository::init(&dir).unwrap()
}

/// Helper to commit an empty tree with the given message, returning the id
fn commit(repo: &Repository, message: &str) -> String {
    let signature = git2::Signature::now("Review Host", "host@example.com").unwrap();
    let tree_id = {
        let mut index = repo.index().unwrap();
        index.write_tree().unwrap()
    };
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.as_ref().map(|c| vec![c]).unwrap_or_default();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap()
        .to_string()
}

struct Harness {
    its: RecordingIts,
    topics: RecordingTopics,
    router: HookRouter,
}

fn harness(base: &Path, config_yaml: &str) -> Harness {
    let config_path = base.join("config.yaml");
    std::fs::write(&config_path, config_yaml).unwrap();

    let settings: Arc<dyn Settings> = Arc::new(FileSettings::load(&config_path).unwrap());
    let browser = Arc::new(GitwebConfig::from_settings(settings.as_ref()));
    let extractor = IssueExtractor::from_settings(settings.as_ref(), "tracker").unwrap();
    let its = RecordingIts::new();
    let topics = RecordingTopics::new();

    let router = HookRouter::new(
        settings,
        browser,
        Arc::new(GitCommitReader::new(base.join("git"))),
        Arc::new(its.clone()),
        Arc::new(topics.clone()),
        extractor,
    );

    Harness {
        its,
        topics,
        router,
    }
}

mod ref_updated_tests {
    use super::*;

    #[tokio::test]
    async fn test_ref_updated_end_to_end() {
        let temp = TempDir::new().unwrap();
        let repo = init_project(temp.path(), "tools/widget");
        let sha = commit(
            &repo,
            "Add gadget\n\nFixes GAD-7 and GAD-9; GAD-7 needed it badly.\nChange-Id: I4e5f6a7b\n",
        );
        let h = harness(temp.path(), BASE_CONFIG);

        let json = format!(
            r#"{{
                "type": "ref-updated",
                "submitter": {{"username": "dev1"}},
                "refUpdate": {{
                    "oldRev": "0000000000000000000000000000000000000000",
                    "newRev": "{sha}",
                    "refName": "refs/heads/main",
                    "project": "tools/widget"
                }}
            }}"#
        );

        h.router
            .dispatch(Event::from_json(&json).unwrap())
            .await
            .unwrap();

        let expected_url =
            format!("https://review.example/gitweb?p=tools-widget;a=commit;h={sha}");
        let ops = h.its.operations();
        assert_eq!(ops.len(), 3);
        for (op, issue) in ops.iter().zip(["GAD-7", "GAD-9", "GAD-7"]) {
            assert_eq!(
                *op,
                ItsOperation::RelatedLink {
                    issue: issue.to_string(),
                    url: expected_url.clone(),
                    label: format!("Git: {sha}"),
                }
            );
        }
        assert!(h.topics.topics().is_empty());
    }

    #[tokio::test]
    async fn test_ref_updated_disabled_by_config_file() {
        let temp = TempDir::new().unwrap();
        let repo = init_project(temp.path(), "tools/widget");
        let sha = commit(&repo, "Fix GAD-1\n");
        let config = format!("{BASE_CONFIG}  comment_on_ref_update: false\n");
        let h = harness(temp.path(), &config);

        let json = format!(
            r#"{{"type":"ref-updated","refUpdate":{{"oldRev":"0","newRev":"{sha}","refName":"refs/heads/main","project":"tools/widget"}}}}"#
        );

        h.router
            .dispatch(Event::from_json(&json).unwrap())
            .await
            .unwrap();

        assert!(h.its.operations().is_empty());
    }
}

mod change_merged_tests {
    use super::*;

    #[tokio::test]
    async fn test_change_merged_end_to_end() {
        let temp = TempDir::new().unwrap();
        let repo = init_project(temp.path(), "tools/widget");
        let sha = commit(&repo, "Fix the gadget\n\nCloses GAD-42.\nChange-Id: I1a2b3c4d\n");
        let h = harness(temp.path(), BASE_CONFIG);

        let json = format!(
            r#"{{
                "type": "change-merged",
                "change": {{
                    "project": "tools/widget",
                    "branch": "main",
                    "id": "I1a2b3c4d",
                    "number": 12345
                }},
                "patchSet": {{
                    "number": 2,
                    "revision": "{sha}",
                    "ref": "refs/changes/45/12345/2"
                }}
            }}"#
        );

        h.router
            .dispatch(Event::from_json(&json).unwrap())
            .await
            .unwrap();

        let ops = h.its.operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(
            ops[0],
            ItsOperation::RelatedLinkAndComment {
                issue: "GAD-42".to_string(),
                url: "https://review.example/gitweb?p=tools-widget;a=commit;h=refs/changes/45/12345/2"
                    .to_string(),
                label: "GitWeb:refs/changes/45/12345/2".to_string(),
                comment: "\nFix the gadget\n\nCloses GAD-42.\n".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_change_merged_without_browser_config() {
        let temp = TempDir::new().unwrap();
        // Canonical URL only; no gitweb section at all
        let config = r#"
host:
  canonical_web_url: https://review.example/
tracker:
  issue_pattern: "[A-Z][A-Z0-9]+-[0-9]+"
"#;
        let h = harness(temp.path(), config);

        let json = r#"{
            "type": "change-merged",
            "change": {"project": "tools/widget", "branch": "main", "id": "I1", "number": 1},
            "patchSet": {"number": 1, "revision": "aaaa", "ref": "refs/changes/01/1/1"}
        }"#;

        // No repository exists either; the skip must come first
        h.router
            .dispatch(Event::from_json(json).unwrap())
            .await
            .unwrap();

        assert!(h.its.operations().is_empty());
    }
}

mod topic_tests {
    use super::*;

    #[tokio::test]
    async fn test_patchset_created_sets_topic_from_single_issue() {
        let temp = TempDir::new().unwrap();
        let repo = init_project(temp.path(), "tools/widget");
        let sha = commit(&repo, "Rework the flux capacitor\n\nRefs GAD-7.\n");
        let h = harness(temp.path(), BASE_CONFIG);

        let json = format!(
            r#"{{
                "type": "patchset-created",
                "change": {{"project": "tools/widget", "branch": "main", "id": "I9", "number": 777}},
                "patchSet": {{"number": 1, "revision": "{sha}", "ref": "refs/changes/77/777/1"}}
            }}"#
        );

        h.router
            .dispatch(Event::from_json(&json).unwrap())
            .await
            .unwrap();

        assert_eq!(h.topics.topics(), vec![(777, "GAD-7".to_string())]);
        assert!(h.its.operations().is_empty());
    }

    #[tokio::test]
    async fn test_patchset_created_with_two_issues_leaves_topic() {
        let temp = TempDir::new().unwrap();
        let repo = init_project(temp.path(), "tools/widget");
        let sha = commit(&repo, "Touches GAD-7 and GAD-8\n");
        let h = harness(temp.path(), BASE_CONFIG);

        let json = format!(
            r#"{{
                "type": "patchset-created",
                "change": {{"project": "tools/widget", "branch": "main", "id": "I9", "number": 778}},
                "patchSet": {{"number": 1, "revision": "{sha}", "ref": "refs/changes/78/778/1"}}
            }}"#
        );

        h.router
            .dispatch(Event::from_json(&json).unwrap())
            .await
            .unwrap();

        assert!(h.topics.topics().is_empty());
    }
}

mod stream_tests {
    use super::*;

    #[tokio::test]
    async fn test_mixed_stream_only_acts_on_known_kinds() {
        let temp = TempDir::new().unwrap();
        let repo = init_project(temp.path(), "tools/widget");
        let sha = commit(&repo, "Fix GAD-1\n");
        let h = harness(temp.path(), BASE_CONFIG);

        let lines = [
            r#"{"type": "comment-added", "comment": "nice"}"#.to_string(),
            format!(
                r#"{{"type":"ref-updated","refUpdate":{{"oldRev":"0","newRev":"{sha}","refName":"refs/heads/main","project":"tools/widget"}}}}"#
            ),
            r#"{"type": "reviewer-added"}"#.to_string(),
        ];

        for line in &lines {
            h.router
                .dispatch(Event::from_json(line).unwrap())
                .await
                .unwrap();
        }

        assert_eq!(h.its.operations().len(), 1);
    }
}
