use async_trait::async_trait;
use codex_bridge_ai::{ApiFailure, ApiGeneration, ApiTier, TieredApiClient};
use codex_bridge_core::{BridgeConfig, Instruction, ReplyText};
use codex_bridge_github::{
    classify_comment_event, render_generation_failure, render_reply, Classification, CommentEvent,
    SkipReason,
};
use codex_bridge_provider::{CommandFailure, CommandInvoker};

#[async_trait]
/// Local generation step: runs the instruction through the CLI tool.
pub trait PromptRunner: Send + Sync {
    async fn run_prompt(&self, instruction: &Instruction) -> Result<String, CommandFailure>;
}

#[async_trait]
/// Remote generation step used when the CLI tool produced nothing.
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, instruction: &Instruction) -> Result<ApiGeneration, ApiFailure>;
}

#[async_trait]
impl PromptRunner for CommandInvoker {
    async fn run_prompt(&self, instruction: &Instruction) -> Result<String, CommandFailure> {
        self.invoke(instruction).await
    }
}

#[async_trait]
impl TextGenerator for TieredApiClient {
    async fn generate_text(&self, instruction: &Instruction) -> Result<ApiGeneration, ApiFailure> {
        self.generate(instruction).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which path produced the posted reply.
pub enum ReplySource {
    Cli,
    ApiPrimary,
    ApiSecondary,
    Diagnostic,
    DryRun,
}

impl ReplySource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::ApiPrimary => "api_primary",
            Self::ApiSecondary => "api_secondary",
            Self::Diagnostic => "diagnostic",
            Self::DryRun => "dry_run",
        }
    }
}

impl From<ApiTier> for ReplySource {
    fn from(tier: ApiTier) -> Self {
        match tier {
            ApiTier::Primary => Self::ApiPrimary,
            ApiTier::Secondary => Self::ApiSecondary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why an event produced no reply.
pub enum NoOpReason {
    NoEventPayload,
    NotIssueComment,
    BotAuthor,
    Skipped(SkipReason),
}

impl NoOpReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoEventPayload => "no_event_payload",
            Self::NotIssueComment => "not_issue_comment",
            Self::BotAuthor => "bot_author",
            Self::Skipped(reason) => reason.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Terminal state of one event.
pub enum Resolution {
    NoOp(NoOpReason),
    Replied {
        reply: ReplyText,
        source: ReplySource,
    },
}

/// Drives Classify → TryCommand → TryAPI → Format for a single event.
///
/// Generation failures never escape: when both steps fail the reply carries
/// a diagnostic body instead.
pub async fn resolve(
    event: &CommentEvent,
    config: &BridgeConfig,
    runner: &dyn PromptRunner,
    generator: &dyn TextGenerator,
) -> Resolution {
    if event.author_is_bot {
        tracing::info!(
            author = %event.author,
            thread = %event.thread.display_name(),
            "ignoring comment from bot account"
        );
        return Resolution::NoOp(NoOpReason::BotAuthor);
    }

    let instruction = match classify_comment_event(event, config) {
        Classification::Actionable(instruction) => instruction,
        Classification::NotActionable(reason) => {
            tracing::info!(
                reason = reason.as_str(),
                thread = %event.thread.display_name(),
                "comment is not actionable"
            );
            return Resolution::NoOp(NoOpReason::Skipped(reason));
        }
    };
    tracing::info!(
        thread = %event.thread.display_name(),
        author = %instruction.author,
        prompt_chars = instruction.prompt.chars().count(),
        "actionable instruction received"
    );

    let (content, source) = if config.dry_run {
        tracing::info!("dry run: skipping cli and remote api");
        (
            format!(
                "(dry-run) prompt: {} | model: {}",
                instruction.prompt, config.model
            ),
            ReplySource::DryRun,
        )
    } else {
        generate_content(&instruction, runner, generator).await
    };

    let reply = render_reply(&instruction.author, &content, config.mention_author);
    tracing::info!(
        source = source.as_str(),
        body_chars = reply.body.chars().count(),
        "reply formatted"
    );
    Resolution::Replied { reply, source }
}

async fn generate_content(
    instruction: &Instruction,
    runner: &dyn PromptRunner,
    generator: &dyn TextGenerator,
) -> (String, ReplySource) {
    match runner.run_prompt(instruction).await {
        Ok(text) => (text, ReplySource::Cli),
        Err(cli_failure) => {
            tracing::warn!(error = %cli_failure, "cli generation failed; trying remote api");
            match generator.generate_text(instruction).await {
                Ok(generation) => (generation.text, ReplySource::from(generation.tier)),
                Err(api_failure) => {
                    tracing::warn!(
                        cli_error = %cli_failure,
                        api_error = %api_failure,
                        "all generation paths failed; posting diagnostic"
                    );
                    (
                        render_generation_failure(&format!("{api_failure} | {cli_failure}")),
                        ReplySource::Diagnostic,
                    )
                }
            }
        }
    }
}
