use serde::Serialize;

pub const DEFAULT_TRIGGER_PREFIX: &str = "/codex";
pub const DEFAULT_MODEL: &str = "o4-mini";
pub const DEFAULT_CHAT_FALLBACK_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_CLI_EXECUTABLE: &str = "codex";
pub const DEFAULT_CLI_TIMEOUT_MS: u64 = 300_000;
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_API_TIMEOUT_MS: u64 = 120_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Process-wide configuration snapshot. Built once at startup and passed by
/// reference to every component; nothing downstream reads the environment.
pub struct BridgeConfig {
    pub trigger_prefix: String,
    pub model: String,
    pub mention_author: bool,
    pub cli_template: Option<String>,
    pub cli_disabled: bool,
    pub cli_executable: String,
    pub cli_timeout_ms: u64,
    pub chat_fallback_model: String,
    pub disable_chat_fallback: bool,
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_timeout_ms: u64,
    /// Skip both generation paths and echo the instruction back.
    pub dry_run: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            trigger_prefix: DEFAULT_TRIGGER_PREFIX.to_string(),
            model: DEFAULT_MODEL.to_string(),
            mention_author: true,
            cli_template: None,
            cli_disabled: false,
            cli_executable: DEFAULT_CLI_EXECUTABLE.to_string(),
            cli_timeout_ms: DEFAULT_CLI_TIMEOUT_MS,
            chat_fallback_model: DEFAULT_CHAT_FALLBACK_MODEL.to_string(),
            disable_chat_fallback: false,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            api_timeout_ms: DEFAULT_API_TIMEOUT_MS,
            dry_run: false,
        }
    }
}

impl BridgeConfig {
    /// Model used for the chat-completions tier.
    pub fn chat_fallback_model_for_primary(&self) -> &str {
        if is_reasoning_model_family(&self.model) {
            return &self.chat_fallback_model;
        }
        &self.model
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Heuristic for the `o<digit>` reasoning model family (`o1`, `o3-mini`,
/// `o4-mini`, ...), which the chat-completions endpoint rejects. New families
/// need to be added here.
pub fn is_reasoning_model_family(model: &str) -> bool {
    let normalized = model.trim().to_ascii_lowercase();
    let normalized = normalized
        .rsplit_once('/')
        .map(|(_, name)| name.to_string())
        .unwrap_or(normalized);
    let mut chars = normalized.chars();
    matches!(chars.next(), Some('o')) && chars.next().is_some_and(|ch| ch.is_ascii_digit())
}
