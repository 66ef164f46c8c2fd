use thiserror::Error;

/// Failures of the text-generation collaborator. All variants are fatal to
/// the run — malformed model output is NOT an error here, the normalizer
/// handles it.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected by provider: {0}")]
    Auth(String),

    #[error("provider quota or rate limit exhausted: {0}")]
    Quota(String),

    #[error("provider API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned no completion choices")]
    EmptyResponse,
}
