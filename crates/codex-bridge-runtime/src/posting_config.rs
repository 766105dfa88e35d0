use anyhow::{anyhow, bail, Result};
use codex_bridge_github::ThreadRef;

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_GITHUB_REQUEST_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_GITHUB_RETRY_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_GITHUB_RETRY_BASE_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
/// `owner/name` repository slug.
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| anyhow!("invalid repository '{raw}', expected owner/repo"))?;
        let owner = owner.trim();
        let name = name.trim();
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("invalid repository '{raw}', expected owner/repo");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn as_slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Settings for delivering the reply back to GitHub.
pub struct GithubPostingConfig {
    pub api_base: String,
    pub token: Option<String>,
    pub repository: Option<RepoRef>,
    pub request_timeout_ms: u64,
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
    pub dry_run: bool,
}

impl Default for GithubPostingConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_GITHUB_API_BASE.to_string(),
            token: None,
            repository: None,
            request_timeout_ms: DEFAULT_GITHUB_REQUEST_TIMEOUT_MS,
            retry_max_attempts: DEFAULT_GITHUB_RETRY_MAX_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_GITHUB_RETRY_BASE_DELAY_MS,
            dry_run: false,
        }
    }
}

impl GithubPostingConfig {
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Thread the reply is posted to: always the thread named by the event.
    /// A configured repository that disagrees with the payload only produces
    /// a warning.
    pub fn post_target(&self, thread: &ThreadRef) -> ThreadRef {
        if let Some(repository) = &self.repository {
            if repository.owner != thread.owner || repository.name != thread.repo {
                tracing::warn!(
                    configured = %repository.as_slug(),
                    payload = %format!("{}/{}", thread.owner, thread.repo),
                    "configured repository differs from event payload; posting to the event's thread"
                );
            }
        }
        thread.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> ThreadRef {
        ThreadRef {
            owner: "acme".to_string(),
            repo: "widgets".to_string(),
            issue_number: 42,
            is_pull_request: false,
        }
    }

    #[test]
    fn unit_repo_ref_parse_accepts_owner_slash_name() {
        let repo = RepoRef::parse(" acme/widgets ").expect("repo");
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.as_slug(), "acme/widgets");
    }

    #[test]
    fn regression_repo_ref_parse_rejects_malformed_slugs() {
        for raw in ["", "acme", "/widgets", "acme/", "acme/widgets/extra"] {
            assert!(RepoRef::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn regression_post_target_keeps_event_thread_when_repository_differs() {
        let config = GithubPostingConfig {
            repository: Some(RepoRef::parse("acme/mirror").expect("repo")),
            ..GithubPostingConfig::default()
        };
        let target = config.post_target(&thread());
        assert_eq!(target.display_name(), "acme/widgets#42");

        let target = GithubPostingConfig::default().post_target(&thread());
        assert_eq!(target, thread());
    }

    #[test]
    fn unit_token_ignores_blank_values() {
        let config = GithubPostingConfig {
            token: Some("   ".to_string()),
            ..GithubPostingConfig::default()
        };
        assert_eq!(config.token(), None);
    }
}
