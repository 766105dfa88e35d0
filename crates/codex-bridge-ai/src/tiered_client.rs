use codex_bridge_core::{BridgeConfig, Instruction};

use crate::openai::{OpenAiClient, OpenAiConfig};
use crate::response_extractors::{extract_response_text, PRIMARY_EXTRACTORS, SECONDARY_EXTRACTORS};
use crate::{ApiError, ApiFailure, ApiTier};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text produced by the remote endpoints and where it came from.
pub struct ApiGeneration {
    pub text: String,
    pub tier: ApiTier,
    pub model: String,
}

#[derive(Debug)]
enum ClientState {
    Ready(OpenAiClient),
    MissingCredential,
    Unavailable(String),
}

#[derive(Debug)]
/// Two-tier remote generation: Responses endpoint with the configured model,
/// then chat completions with a family-compatible model. Each tier is called
/// at most once per `generate`.
pub struct TieredApiClient {
    state: ClientState,
    model: String,
    fallback_model: String,
    disable_chat_fallback: bool,
}

impl TieredApiClient {
    pub fn from_config(config: &BridgeConfig) -> Self {
        let state = match config.api_key() {
            None => ClientState::MissingCredential,
            Some(api_key) => match OpenAiClient::new(OpenAiConfig {
                api_base: config.api_base.clone(),
                api_key: api_key.to_string(),
                request_timeout_ms: config.api_timeout_ms,
            }) {
                Ok(client) => ClientState::Ready(client),
                Err(ApiError::MissingApiKey) => ClientState::MissingCredential,
                Err(error) => ClientState::Unavailable(error.to_string()),
            },
        };

        Self {
            state,
            model: config.model.clone(),
            fallback_model: config.chat_fallback_model_for_primary().to_string(),
            disable_chat_fallback: config.disable_chat_fallback,
        }
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    pub async fn generate(&self, instruction: &Instruction) -> Result<ApiGeneration, ApiFailure> {
        let client = match &self.state {
            ClientState::Ready(client) => client,
            ClientState::MissingCredential => return Err(ApiFailure::MissingCredential),
            ClientState::Unavailable(reason) => {
                return Err(ApiFailure::ClientUnavailable(ApiError::InvalidConfig(
                    reason.clone(),
                )))
            }
        };

        let primary = match client
            .create_response(&self.model, &instruction.prompt)
            .await
            .and_then(|response| extract_response_text(PRIMARY_EXTRACTORS, &response))
        {
            Ok(text) => {
                tracing::info!(
                    model = %self.model,
                    tier = ApiTier::Primary.as_str(),
                    "remote generation succeeded"
                );
                return Ok(ApiGeneration {
                    text,
                    tier: ApiTier::Primary,
                    model: self.model.clone(),
                });
            }
            Err(error) => error,
        };

        if self.disable_chat_fallback {
            tracing::warn!(
                error = %primary,
                "primary endpoint failed and chat fallback is disabled"
            );
            return Err(ApiFailure::PrimaryFailedFallbackDisabled { primary });
        }

        tracing::warn!(
            error = %primary,
            model = %self.model,
            fallback_model = %self.fallback_model,
            "primary endpoint failed; falling back to chat completions"
        );
        match client
            .create_chat_completion(&self.fallback_model, &instruction.prompt)
            .await
            .and_then(|response| extract_response_text(SECONDARY_EXTRACTORS, &response))
        {
            Ok(text) => {
                tracing::info!(
                    model = %self.fallback_model,
                    tier = ApiTier::Secondary.as_str(),
                    "remote generation succeeded"
                );
                Ok(ApiGeneration {
                    text,
                    tier: ApiTier::Secondary,
                    model: self.fallback_model.clone(),
                })
            }
            Err(secondary) => {
                tracing::warn!(error = %secondary, "chat completions fallback failed");
                Err(ApiFailure::SecondaryFailed {
                    primary,
                    secondary,
                    model: self.fallback_model.clone(),
                })
            }
        }
    }
}
