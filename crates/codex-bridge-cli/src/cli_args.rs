use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use codex_bridge_core::{
    DEFAULT_API_BASE, DEFAULT_API_TIMEOUT_MS, DEFAULT_CHAT_FALLBACK_MODEL, DEFAULT_CLI_EXECUTABLE,
    DEFAULT_CLI_TIMEOUT_MS, DEFAULT_MODEL, DEFAULT_TRIGGER_PREFIX,
};

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "codex-bridge",
    about = "Answer '/codex' issue and pull-request comments with a Codex-generated reply",
    version
)]
/// Command-line and environment surface of the bridge binary.
pub struct Cli {
    #[arg(
        long = "event-path",
        env = "GITHUB_EVENT_PATH",
        help = "Path to the webhook payload JSON; a missing path or file means there is nothing to do"
    )]
    pub event_path: Option<PathBuf>,

    #[arg(
        long = "event-name",
        env = "GITHUB_EVENT_NAME",
        default_value = "issue_comment",
        help = "Webhook event name; anything other than issue_comment is ignored"
    )]
    pub event_name: String,

    #[arg(
        long = "trigger-prefix",
        env = "INPUT_TRIGGER_PREFIX",
        default_value = DEFAULT_TRIGGER_PREFIX,
        help = "Case-sensitive prefix a comment must start with to be answered"
    )]
    pub trigger_prefix: String,

    #[arg(
        long,
        env = "INPUT_MODEL",
        default_value = DEFAULT_MODEL,
        help = "Model requested from the remote API"
    )]
    pub model: String,

    #[arg(
        long = "mention-author",
        env = "INPUT_MENTION_AUTHOR",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Start the reply with an @-mention of the comment author"
    )]
    pub mention_author: bool,

    #[arg(
        long = "cli-template",
        env = "CODEX_CLI_TEMPLATE",
        help = "Single command template replacing the built-in list; supports {prompt} and {model}"
    )]
    pub cli_template: Option<String>,

    #[arg(
        long = "cli-disable",
        env = "CODEX_CLI_DISABLE",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Skip the local CLI tool and go straight to the remote API"
    )]
    pub cli_disable: bool,

    #[arg(
        long = "cli",
        env = "CODEX_CLI",
        default_value = DEFAULT_CLI_EXECUTABLE,
        help = "Executable used as the program of the built-in command templates"
    )]
    pub cli_executable: String,

    #[arg(
        long = "cli-timeout-ms",
        env = "CODEX_CLI_TIMEOUT_MS",
        default_value_t = DEFAULT_CLI_TIMEOUT_MS,
        value_parser = parse_positive_u64,
        help = "Per-template timeout in milliseconds; the process is killed when it elapses"
    )]
    pub cli_timeout_ms: u64,

    #[arg(
        long = "chat-fallback-model",
        env = "CODEX_CHAT_FALLBACK_MODEL",
        default_value = DEFAULT_CHAT_FALLBACK_MODEL,
        help = "Chat-completions model substituted when --model is a reasoning-family model"
    )]
    pub chat_fallback_model: String,

    #[arg(
        long = "disable-chat-fallback",
        env = "CODEX_DISABLE_CHAT_FALLBACK",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Do not call chat completions when the responses endpoint fails"
    )]
    pub disable_chat_fallback: bool,

    #[arg(
        long = "api-base",
        env = "OPENAI_BASE_URL",
        default_value = DEFAULT_API_BASE,
        help = "Base URL for the OpenAI-compatible API"
    )]
    pub api_base: String,

    #[arg(
        long = "api-key",
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        help = "API key for the remote API"
    )]
    pub api_key: Option<String>,

    #[arg(
        long = "api-timeout-ms",
        env = "CODEX_API_TIMEOUT_MS",
        default_value_t = DEFAULT_API_TIMEOUT_MS,
        value_parser = parse_positive_u64,
        help = "Per-request timeout in milliseconds for the remote API"
    )]
    pub api_timeout_ms: u64,

    #[arg(
        long = "github-token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub token used to post the reply"
    )]
    pub github_token: Option<String>,

    #[arg(
        long = "github-api-base",
        env = "GITHUB_API_URL",
        default_value = "https://api.github.com",
        help = "GitHub API base URL"
    )]
    pub github_api_base: String,

    #[arg(
        long = "github-repo",
        env = "GITHUB_REPOSITORY",
        help = "Expected repository in owner/repo format; a mismatch with the event is logged, replies always go to the event's thread"
    )]
    pub github_repo: Option<String>,

    #[arg(
        long = "github-request-timeout-ms",
        env = "CODEX_BRIDGE_GITHUB_REQUEST_TIMEOUT_MS",
        default_value_t = 30_000,
        value_parser = parse_positive_u64,
        help = "Per-request timeout in milliseconds for GitHub API calls"
    )]
    pub github_request_timeout_ms: u64,

    #[arg(
        long = "github-retry-max-attempts",
        env = "CODEX_BRIDGE_GITHUB_RETRY_MAX_ATTEMPTS",
        default_value_t = 3,
        value_parser = parse_positive_usize,
        help = "Maximum attempts for retryable GitHub API failures (408/429/5xx/transport)"
    )]
    pub github_retry_max_attempts: usize,

    #[arg(
        long = "github-retry-base-delay-ms",
        env = "CODEX_BRIDGE_GITHUB_RETRY_BASE_DELAY_MS",
        default_value_t = 500,
        value_parser = parse_positive_u64,
        help = "Base backoff delay in milliseconds for GitHub API retries"
    )]
    pub github_retry_base_delay_ms: u64,

    #[arg(
        long = "dry-run",
        env = "CODEX_DRY_RUN",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        help = "Skip generation and posting; print a reply echoing the prompt and model to stdout"
    )]
    pub dry_run: bool,
}
