use std::sync::Arc;

use anyhow::Result;
use codex_bridge_ai::TieredApiClient;
use codex_bridge_core::BridgeConfig;
use codex_bridge_github::CommentEvent;
use codex_bridge_provider::CommandInvoker;

use crate::github_api_client::GithubApiClient;
use crate::posting_config::GithubPostingConfig;
use crate::reply_poster::{DryRunReplyPoster, PostedReply, ReplyPoster};
use crate::resolution_engine::{
    resolve, NoOpReason, PromptRunner, ReplySource, Resolution, TextGenerator,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of handling one delivered event.
pub enum BridgeRunOutcome {
    NoOp(NoOpReason),
    Posted {
        source: ReplySource,
        posted: PostedReply,
    },
}

/// Wires the generation steps and the poster for one process run.
pub struct BridgeRuntime {
    config: BridgeConfig,
    posting: GithubPostingConfig,
    runner: Arc<dyn PromptRunner>,
    generator: Arc<dyn TextGenerator>,
    poster: Arc<dyn ReplyPoster>,
}

impl BridgeRuntime {
    /// Builds the production components. Posting needs a GitHub token
    /// unless `posting.dry_run` is set.
    pub fn new(config: BridgeConfig, posting: GithubPostingConfig) -> Result<Self> {
        let poster: Arc<dyn ReplyPoster> = if posting.dry_run {
            Arc::new(DryRunReplyPoster)
        } else {
            Arc::new(GithubApiClient::from_posting_config(&posting)?)
        };
        let runner = Arc::new(CommandInvoker::from_config(&config));
        let generator = Arc::new(TieredApiClient::from_config(&config));
        Ok(Self::with_components(
            config, posting, runner, generator, poster,
        ))
    }

    pub fn with_components(
        config: BridgeConfig,
        posting: GithubPostingConfig,
        runner: Arc<dyn PromptRunner>,
        generator: Arc<dyn TextGenerator>,
        poster: Arc<dyn ReplyPoster>,
    ) -> Self {
        Self {
            config,
            posting,
            runner,
            generator,
            poster,
        }
    }

    /// `event` is `None` when the delivered event was not an issue comment.
    pub async fn handle_event(&self, event: Option<&CommentEvent>) -> Result<BridgeRunOutcome> {
        let Some(event) = event else {
            tracing::info!("event is not an issue comment; nothing to do");
            return Ok(BridgeRunOutcome::NoOp(NoOpReason::NotIssueComment));
        };

        let resolution = resolve(
            event,
            &self.config,
            self.runner.as_ref(),
            self.generator.as_ref(),
        )
        .await;
        let (reply, source) = match resolution {
            Resolution::NoOp(reason) => return Ok(BridgeRunOutcome::NoOp(reason)),
            Resolution::Replied { reply, source } => (reply, source),
        };

        let target = self.posting.post_target(&event.thread);
        let posted = self.poster.post_reply(&target, &reply).await?;
        Ok(BridgeRunOutcome::Posted { source, posted })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use codex_bridge_ai::{ApiFailure, ApiGeneration};
    use codex_bridge_core::{Instruction, ReplyText};
    use codex_bridge_github::ThreadRef;
    use codex_bridge_provider::CommandFailure;

    use super::*;
    use crate::posting_config::RepoRef;

    struct EchoRunner;

    #[async_trait]
    impl PromptRunner for EchoRunner {
        async fn run_prompt(&self, instruction: &Instruction) -> Result<String, CommandFailure> {
            Ok(format!("echo: {}", instruction.prompt))
        }
    }

    struct UnreachableGenerator;

    #[async_trait]
    impl TextGenerator for UnreachableGenerator {
        async fn generate_text(
            &self,
            _instruction: &Instruction,
        ) -> Result<ApiGeneration, ApiFailure> {
            Err(ApiFailure::MissingCredential)
        }
    }

    #[derive(Default)]
    struct RecordingPoster {
        posts: Mutex<Vec<(ThreadRef, ReplyText)>>,
        fail: bool,
    }

    #[async_trait]
    impl ReplyPoster for RecordingPoster {
        async fn post_reply(&self, thread: &ThreadRef, reply: &ReplyText) -> Result<PostedReply> {
            if self.fail {
                anyhow::bail!("github api create issue comment failed with status 401");
            }
            self.posts
                .lock()
                .expect("posts lock")
                .push((thread.clone(), reply.clone()));
            Ok(PostedReply {
                comment_id: Some(99),
                html_url: None,
            })
        }
    }

    fn runtime_with(poster: Arc<RecordingPoster>, posting: GithubPostingConfig) -> BridgeRuntime {
        BridgeRuntime::with_components(
            BridgeConfig::default(),
            posting,
            Arc::new(EchoRunner),
            Arc::new(UnreachableGenerator),
            poster,
        )
    }

    fn event(body: &str) -> CommentEvent {
        CommentEvent::created(
            body,
            "alice",
            ThreadRef {
                owner: "acme".to_string(),
                repo: "widgets".to_string(),
                issue_number: 3,
                is_pull_request: false,
            },
        )
    }

    #[tokio::test]
    async fn functional_handle_event_posts_reply_to_thread() {
        let poster = Arc::new(RecordingPoster::default());
        let runtime = runtime_with(poster.clone(), GithubPostingConfig::default());

        let outcome = runtime
            .handle_event(Some(&event("/codex list files")))
            .await
            .expect("outcome");

        assert_eq!(
            outcome,
            BridgeRunOutcome::Posted {
                source: ReplySource::Cli,
                posted: PostedReply {
                    comment_id: Some(99),
                    html_url: None,
                },
            }
        );
        let posts = poster.posts.lock().expect("posts lock");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].0.display_name(), "acme/widgets#3");
        assert_eq!(posts[0].1.body, "@alice\n\necho: list files");
    }

    #[tokio::test]
    async fn unit_handle_event_without_comment_is_noop() {
        let poster = Arc::new(RecordingPoster::default());
        let runtime = runtime_with(poster.clone(), GithubPostingConfig::default());

        let outcome = runtime.handle_event(None).await.expect("outcome");
        assert_eq!(outcome, BridgeRunOutcome::NoOp(NoOpReason::NotIssueComment));

        let outcome = runtime
            .handle_event(Some(&event("thanks!")))
            .await
            .expect("outcome");
        assert!(matches!(outcome, BridgeRunOutcome::NoOp(_)));
        assert!(poster.posts.lock().expect("posts lock").is_empty());
    }

    #[tokio::test]
    async fn regression_posting_failure_is_returned_as_error() {
        let poster = Arc::new(RecordingPoster {
            fail: true,
            ..RecordingPoster::default()
        });
        let runtime = runtime_with(poster, GithubPostingConfig::default());

        let error = runtime
            .handle_event(Some(&event("/codex list files")))
            .await
            .expect_err("posting failure");
        assert!(error.to_string().contains("status 401"));
    }

    #[tokio::test]
    async fn regression_configured_repository_does_not_redirect_reply() {
        let poster = Arc::new(RecordingPoster::default());
        let posting = GithubPostingConfig {
            repository: Some(RepoRef::parse("acme/mirror").expect("repo")),
            ..GithubPostingConfig::default()
        };
        let runtime = runtime_with(poster.clone(), posting);

        runtime
            .handle_event(Some(&event("/codex list files")))
            .await
            .expect("outcome");

        let posts = poster.posts.lock().expect("posts lock");
        assert_eq!(posts[0].0.display_name(), "acme/widgets#3");
    }

    #[test]
    fn regression_new_requires_token_unless_dry_run() {
        assert!(
            BridgeRuntime::new(BridgeConfig::default(), GithubPostingConfig::default()).is_err()
        );
        let dry_run = GithubPostingConfig {
            dry_run: true,
            ..GithubPostingConfig::default()
        };
        assert!(BridgeRuntime::new(BridgeConfig::default(), dry_run).is_ok());
    }
}
