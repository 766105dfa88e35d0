use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ISSUE_COMMENT_EVENT_NAME: &str = "issue_comment";

#[derive(Debug, Clone, Deserialize, Serialize)]
/// Public struct `GithubUser` used across codex-bridge components.
pub struct GithubUser {
    pub login: String,
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct GithubComment {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    body: Option<String>,
    user: GithubUser,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct GithubIssueRef {
    number: u64,
    #[serde(default)]
    pull_request: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct GithubRepositoryOwner {
    login: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct GithubRepository {
    name: String,
    #[serde(default)]
    full_name: Option<String>,
    owner: GithubRepositoryOwner,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct IssueCommentPayload {
    action: String,
    comment: GithubComment,
    issue: GithubIssueRef,
    repository: GithubRepository,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `CommentAction` values.
pub enum CommentAction {
    Created,
    Other(String),
}

impl CommentAction {
    pub fn from_payload_action(raw: &str) -> Self {
        if raw.trim() == "created" {
            Self::Created
        } else {
            Self::Other(raw.trim().to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "created",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Identifies the issue or pull-request conversation a reply is posted to.
pub struct ThreadRef {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub is_pull_request: bool,
}

impl ThreadRef {
    pub fn display_name(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.issue_number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Comment event consumed by the resolution engine.
pub struct CommentEvent {
    pub action: CommentAction,
    pub body: String,
    pub author: String,
    pub author_is_bot: bool,
    pub comment_id: Option<u64>,
    pub thread: ThreadRef,
}

impl CommentEvent {
    pub fn created(body: impl Into<String>, author: impl Into<String>, thread: ThreadRef) -> Self {
        Self {
            action: CommentAction::Created,
            body: body.into(),
            author: author.into(),
            author_is_bot: false,
            comment_id: None,
            thread,
        }
    }
}

/// Parses a webhook payload delivered for `event_name`.
///
/// Returns `Ok(None)` for event names other than `issue_comment`; those are
/// never actionable. Malformed `issue_comment` payloads are errors.
pub fn parse_comment_event(event_name: &str, raw_payload: &str) -> Result<Option<CommentEvent>> {
    if event_name.trim() != ISSUE_COMMENT_EVENT_NAME {
        return Ok(None);
    }
    if raw_payload.trim().is_empty() {
        bail!("issue_comment payload is empty");
    }
    let payload: IssueCommentPayload =
        serde_json::from_str(raw_payload).context("failed to decode issue_comment payload")?;

    let owner = payload.repository.owner.login.trim().to_string();
    let repo = payload.repository.name.trim().to_string();
    if owner.is_empty() || repo.is_empty() {
        bail!(
            "issue_comment payload has an incomplete repository reference '{}'",
            payload.repository.full_name.as_deref().unwrap_or_default()
        );
    }

    let author_is_bot = payload
        .comment
        .user
        .user_type
        .as_deref()
        .is_some_and(|kind| kind.eq_ignore_ascii_case("bot"));

    Ok(Some(CommentEvent {
        action: CommentAction::from_payload_action(&payload.action),
        body: payload.comment.body.unwrap_or_default(),
        author: payload.comment.user.login,
        author_is_bot,
        comment_id: payload.comment.id,
        thread: ThreadRef {
            owner,
            repo,
            issue_number: payload.issue.number,
            is_pull_request: payload.issue.pull_request.is_some(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload(action: &str, body: &str) -> String {
        json!({
            "action": action,
            "comment": {
                "id": 991,
                "body": body,
                "user": {"login": "alice", "type": "User"}
            },
            "issue": {"number": 42},
            "repository": {
                "name": "widgets",
                "full_name": "acme/widgets",
                "owner": {"login": "acme"}
            }
        })
        .to_string()
    }

    #[test]
    fn unit_parse_comment_event_ignores_other_event_names() {
        let parsed = parse_comment_event("pull_request", &sample_payload("created", "/codex hi"))
            .expect("parse");
        assert!(parsed.is_none());
    }

    #[test]
    fn functional_parse_comment_event_extracts_thread_and_author() {
        let event = parse_comment_event("issue_comment", &sample_payload("created", "/codex hi"))
            .expect("parse")
            .expect("event");
        assert_eq!(event.action, CommentAction::Created);
        assert_eq!(event.body, "/codex hi");
        assert_eq!(event.author, "alice");
        assert!(!event.author_is_bot);
        assert_eq!(event.comment_id, Some(991));
        assert_eq!(event.thread.owner, "acme");
        assert_eq!(event.thread.repo, "widgets");
        assert_eq!(event.thread.issue_number, 42);
        assert!(!event.thread.is_pull_request);
        assert_eq!(event.thread.display_name(), "acme/widgets#42");
    }

    #[test]
    fn integration_parse_comment_event_marks_pull_requests_and_bots() {
        let raw = json!({
            "action": "edited",
            "comment": {
                "body": null,
                "user": {"login": "github-actions[bot]", "type": "Bot"}
            },
            "issue": {"number": 7, "pull_request": {"url": "https://example.invalid"}},
            "repository": {"name": "widgets", "owner": {"login": "acme"}}
        })
        .to_string();
        let event = parse_comment_event("issue_comment", &raw)
            .expect("parse")
            .expect("event");
        assert_eq!(event.action, CommentAction::Other("edited".to_string()));
        assert_eq!(event.action.as_str(), "edited");
        assert_eq!(event.body, "");
        assert!(event.author_is_bot);
        assert!(event.thread.is_pull_request);
    }

    #[test]
    fn regression_parse_comment_event_reports_malformed_payloads() {
        let error = parse_comment_event("issue_comment", "{\"action\":\"created\"}")
            .expect_err("missing fields should fail");
        assert!(error.to_string().contains("failed to decode issue_comment payload"));

        let error = parse_comment_event("issue_comment", "   ").expect_err("empty should fail");
        assert!(error.to_string().contains("payload is empty"));
    }
}
