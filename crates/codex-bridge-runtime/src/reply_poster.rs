use std::io::Write;

use anyhow::{Context, Result};
use async_trait::async_trait;
use codex_bridge_core::ReplyText;
use codex_bridge_github::ThreadRef;

use crate::github_api_client::GithubApiClient;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Where a reply ended up, when the poster knows.
pub struct PostedReply {
    pub comment_id: Option<u64>,
    pub html_url: Option<String>,
}

#[async_trait]
/// Delivers a formatted reply to the originating thread. Errors are fatal
/// for the run.
pub trait ReplyPoster: Send + Sync {
    async fn post_reply(&self, thread: &ThreadRef, reply: &ReplyText) -> Result<PostedReply>;
}

#[async_trait]
impl ReplyPoster for GithubApiClient {
    async fn post_reply(&self, thread: &ThreadRef, reply: &ReplyText) -> Result<PostedReply> {
        let created = self
            .create_issue_comment(thread, &reply.body)
            .await
            .with_context(|| format!("failed to post reply to {}", thread.display_name()))?;
        tracing::info!(
            thread = %thread.display_name(),
            comment_id = created.id,
            "reply posted"
        );
        Ok(PostedReply {
            comment_id: Some(created.id),
            html_url: created.html_url,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Writes the reply body to stdout instead of posting it.
pub struct DryRunReplyPoster;

#[async_trait]
impl ReplyPoster for DryRunReplyPoster {
    async fn post_reply(&self, thread: &ThreadRef, reply: &ReplyText) -> Result<PostedReply> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", reply.body)
            .and_then(|()| stdout.flush())
            .context("failed to write dry-run reply to stdout")?;
        tracing::info!(thread = %thread.display_name(), "dry run: reply not posted");
        Ok(PostedReply::default())
    }
}
