//! Remote text-generation backend for the codex comment bridge.
//!
//! Calls the OpenAI Responses endpoint first and, when no text can be
//! extracted, the chat-completions endpoint with a compatible model.

mod openai;
mod request_id;
mod response_extractors;
mod tiered_client;
mod types;

pub use openai::{OpenAiClient, OpenAiConfig};
pub use response_extractors::{
    extract_response_text, ChatMessageContent, LegacyCompletionChoices, OutputMessageItems,
    OutputTextField, ResponseTextExtractor, PRIMARY_EXTRACTORS, SECONDARY_EXTRACTORS,
};
pub use tiered_client::{ApiGeneration, TieredApiClient};
pub use types::{ApiError, ApiFailure, ApiTier};
