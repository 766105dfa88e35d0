use std::time::Duration;

use codex_bridge_core::{truncate_for_error, BridgeConfig, Instruction};
use thiserror::Error;

use crate::cli_executable::is_executable_available;
use crate::cli_template::{default_cli_templates, CliTemplate};
use crate::process_runner::{run_rendered_command, ProcessRunError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `AttemptFailureKind` values.
pub enum AttemptFailureKind {
    InvalidTemplate,
    NotFound,
    SpawnFailed,
    TimedOut,
    NonZeroExit,
    EmptyOutput,
}

impl AttemptFailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTemplate => "invalid_template",
            Self::NotFound => "not_found",
            Self::SpawnFailed => "spawn_failed",
            Self::TimedOut => "timed_out",
            Self::NonZeroExit => "non_zero_exit",
            Self::EmptyOutput => "empty_output",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Outcome of one failed template try, kept for diagnostics only.
pub struct InvocationAttempt {
    pub template: String,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub failure: AttemptFailureKind,
    pub detail: String,
}

impl InvocationAttempt {
    fn failed(template: &str, failure: AttemptFailureKind, detail: impl Into<String>) -> Self {
        Self {
            template: template.to_string(),
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            failure,
            detail: detail.into(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "template '{}' {}: {}",
            self.template,
            self.failure.as_str(),
            truncate_for_error(&self.detail, 240)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates supported `CommandFailure` values.
pub enum CommandFailure {
    #[error("cli-disabled")]
    Disabled,
    #[error("cli-exhausted: {}", last_attempt_summary(.attempts))]
    Exhausted { attempts: Vec<InvocationAttempt> },
}

impl CommandFailure {
    pub fn attempts(&self) -> &[InvocationAttempt] {
        match self {
            Self::Disabled => &[],
            Self::Exhausted { attempts } => attempts,
        }
    }
}

fn last_attempt_summary(attempts: &[InvocationAttempt]) -> String {
    attempts
        .last()
        .map(InvocationAttempt::summary)
        .unwrap_or_else(|| "no templates configured".to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Runs the ordered CLI template chain; the first template that exits 0 with
/// non-empty stdout wins.
pub struct CommandInvoker {
    templates: Vec<String>,
    model: String,
    timeout: Duration,
}

impl CommandInvoker {
    pub fn from_config(config: &BridgeConfig) -> Self {
        let templates = if config.cli_disabled {
            Vec::new()
        } else if let Some(template) = config
            .cli_template
            .as_deref()
            .map(str::trim)
            .filter(|template| !template.is_empty())
        {
            vec![template.to_string()]
        } else {
            default_cli_templates(&config.cli_executable)
        };

        Self {
            templates,
            model: config.model.clone(),
            timeout: Duration::from_millis(config.cli_timeout_ms.max(1)),
        }
    }

    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    pub async fn invoke(&self, instruction: &Instruction) -> Result<String, CommandFailure> {
        if self.templates.is_empty() {
            tracing::info!("cli invocation disabled; skipping local templates");
            return Err(CommandFailure::Disabled);
        }

        let mut attempts = Vec::with_capacity(self.templates.len());
        for (index, source) in self.templates.iter().enumerate() {
            match self.try_template(source, instruction).await {
                Ok(text) => {
                    tracing::info!(
                        template_index = index,
                        output_chars = text.chars().count(),
                        "cli template produced output"
                    );
                    return Ok(text);
                }
                Err(attempt) => {
                    tracing::warn!(
                        template_index = index,
                        template = %attempt.template,
                        failure = attempt.failure.as_str(),
                        exit_code = ?attempt.exit_code,
                        detail = %truncate_for_error(&attempt.detail, 240),
                        "cli template failed"
                    );
                    attempts.push(attempt);
                }
            }
        }

        Err(CommandFailure::Exhausted { attempts })
    }

    async fn try_template(
        &self,
        source: &str,
        instruction: &Instruction,
    ) -> Result<String, InvocationAttempt> {
        let template = CliTemplate::parse(source).map_err(|error| {
            InvocationAttempt::failed(source, AttemptFailureKind::InvalidTemplate, error.to_string())
        })?;
        if !is_executable_available(template.program()) {
            return Err(InvocationAttempt::failed(
                source,
                AttemptFailureKind::NotFound,
                format!("executable '{}' was not found", template.program()),
            ));
        }

        let rendered = template.render(&instruction.prompt, &self.model);
        tracing::debug!(
            program = %rendered.program,
            argc = rendered.args.len(),
            prompt_via_stdin = rendered.stdin.is_some(),
            timeout_ms = self.timeout.as_millis() as u64,
            "spawning cli template"
        );

        let output = run_rendered_command(&rendered, self.timeout)
            .await
            .map_err(|error| match error {
                ProcessRunError::Spawn(error) => InvocationAttempt::failed(
                    source,
                    AttemptFailureKind::SpawnFailed,
                    format!("failed to spawn '{}': {error}", rendered.program),
                ),
                ProcessRunError::Io(error) => InvocationAttempt::failed(
                    source,
                    AttemptFailureKind::SpawnFailed,
                    format!("process i/o failed: {error}"),
                ),
                ProcessRunError::TimedOut => InvocationAttempt::failed(
                    source,
                    AttemptFailureKind::TimedOut,
                    format!("timed out after {}ms", self.timeout.as_millis()),
                ),
            })?;

        let text = output.stdout.trim();
        let failure = if !output.success {
            Some(AttemptFailureKind::NonZeroExit)
        } else if text.is_empty() {
            Some(AttemptFailureKind::EmptyOutput)
        } else {
            None
        };
        let Some(failure) = failure else {
            return Ok(text.to_string());
        };

        let status = output
            .exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let detail = format!(
            "status {status}: {}",
            summarize_process_failure(&output.stderr, &output.stdout)
        );
        Err(InvocationAttempt {
            template: source.to_string(),
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            failure,
            detail,
        })
    }
}

fn summarize_process_failure(stderr: &str, stdout: &str) -> String {
    [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .map(|text| truncate_for_error(text, 240))
        .unwrap_or_else(|| "no error output".to_string())
}
