//! GitHub-facing helpers for the codex comment bridge.
//!
//! Turns `issue_comment` webhook payloads into [`CommentEvent`] values,
//! classifies them against the configured trigger prefix, renders reply
//! bodies, and exposes the retry helpers used by the reply poster.

pub mod comment_event;
pub mod github_transport_helpers;
pub mod reply_render;
pub mod trigger_classifier;

pub use comment_event::{
    parse_comment_event, CommentAction, CommentEvent, ThreadRef, ISSUE_COMMENT_EVENT_NAME,
};
pub use reply_render::{
    clamp_comment_body, render_generation_failure, render_reply, GITHUB_COMMENT_MAX_CHARS,
};
pub use trigger_classifier::{classify_comment_event, Classification, SkipReason};
