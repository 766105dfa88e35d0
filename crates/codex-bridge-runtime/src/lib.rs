//! Resolution engine and reply delivery for the comment-triggered bridge.

mod bridge_runtime;
mod github_api_client;
mod posting_config;
mod reply_poster;
mod resolution_engine;

pub use bridge_runtime::{BridgeRunOutcome, BridgeRuntime};
pub use github_api_client::{GithubApiClient, GithubCommentCreateResponse};
pub use posting_config::{
    GithubPostingConfig, RepoRef, DEFAULT_GITHUB_API_BASE, DEFAULT_GITHUB_REQUEST_TIMEOUT_MS,
    DEFAULT_GITHUB_RETRY_BASE_DELAY_MS, DEFAULT_GITHUB_RETRY_MAX_ATTEMPTS,
};
pub use reply_poster::{DryRunReplyPoster, PostedReply, ReplyPoster};
pub use resolution_engine::{
    resolve, NoOpReason, PromptRunner, ReplySource, Resolution, TextGenerator,
};
