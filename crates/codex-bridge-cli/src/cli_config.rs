use anyhow::{bail, Result};
use codex_bridge_core::BridgeConfig;
use codex_bridge_runtime::{GithubPostingConfig, RepoRef};

use crate::Cli;

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub fn validate_cli(cli: &Cli) -> Result<()> {
    if cli.trigger_prefix.trim().is_empty() {
        bail!("--trigger-prefix cannot be empty");
    }
    if cli.model.trim().is_empty() {
        bail!("--model cannot be empty");
    }
    if cli.chat_fallback_model.trim().is_empty() {
        bail!("--chat-fallback-model cannot be empty");
    }
    if !cli.cli_disable && cli.cli_template.is_none() && cli.cli_executable.trim().is_empty() {
        bail!("--cli cannot be empty unless --cli-disable or --cli-template is set");
    }
    if cli.api_base.trim().is_empty() {
        bail!("--api-base cannot be empty");
    }
    if cli.github_api_base.trim().is_empty() {
        bail!("--github-api-base cannot be empty");
    }
    Ok(())
}

/// Runtime view of the generation settings. Blank optional values count as
/// unset.
pub fn bridge_config_from_cli(cli: &Cli) -> BridgeConfig {
    BridgeConfig {
        trigger_prefix: cli.trigger_prefix.trim().to_string(),
        model: cli.model.trim().to_string(),
        mention_author: cli.mention_author,
        cli_template: non_blank(cli.cli_template.as_deref()),
        cli_disabled: cli.cli_disable,
        cli_executable: cli.cli_executable.trim().to_string(),
        cli_timeout_ms: cli.cli_timeout_ms,
        chat_fallback_model: cli.chat_fallback_model.trim().to_string(),
        disable_chat_fallback: cli.disable_chat_fallback,
        api_base: cli.api_base.trim().to_string(),
        api_key: non_blank(cli.api_key.as_deref()),
        api_timeout_ms: cli.api_timeout_ms,
        dry_run: cli.dry_run,
    }
}

pub fn posting_config_from_cli(cli: &Cli) -> Result<GithubPostingConfig> {
    let repository = non_blank(cli.github_repo.as_deref())
        .map(|raw| RepoRef::parse(&raw))
        .transpose()?;
    Ok(GithubPostingConfig {
        api_base: cli.github_api_base.trim().to_string(),
        token: non_blank(cli.github_token.as_deref()),
        repository,
        request_timeout_ms: cli.github_request_timeout_ms,
        retry_max_attempts: cli.github_retry_max_attempts,
        retry_base_delay_ms: cli.github_retry_base_delay_ms,
        dry_run: cli.dry_run,
    })
}
