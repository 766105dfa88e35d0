use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `ApiTier` values.
pub enum ApiTier {
    Primary,
    Secondary,
}

impl ApiTier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "api_primary",
            Self::Secondary => "api_secondary",
        }
    }
}

#[derive(Debug, Error)]
/// Failure of a single endpoint call, including extraction.
pub enum ApiError {
    #[error("missing API key")]
    MissingApiKey,
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned non-success status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("response was not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("endpoint reported an error: {0}")]
    ErrorPayload(String),
    #[error("no text found in response (tried {tried})")]
    NoText { tried: String },
}

#[derive(Debug, Error)]
/// Terminal failure of the remote generation step. Display strings start
/// with a stable signal so the posted diagnostic is greppable.
pub enum ApiFailure {
    #[error("api-credential-missing: no API key configured for the remote endpoint")]
    MissingCredential,
    #[error("api-client-unavailable: {0}")]
    ClientUnavailable(ApiError),
    #[error("api-primary-failed, fallback-disabled: {primary}")]
    PrimaryFailedFallbackDisabled { primary: ApiError },
    #[error("api-secondary-failed: {secondary} (model {model}; primary: {primary})")]
    SecondaryFailed {
        primary: ApiError,
        secondary: ApiError,
        model: String,
    },
}

impl ApiFailure {
    pub fn signal(&self) -> &'static str {
        match self {
            Self::MissingCredential => "api-credential-missing",
            Self::ClientUnavailable(_) => "api-client-unavailable",
            Self::PrimaryFailedFallbackDisabled { .. } => "api-primary-failed, fallback-disabled",
            Self::SecondaryFailed { .. } => "api-secondary-failed",
        }
    }
}
