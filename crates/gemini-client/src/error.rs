use serde_json::Value;

/// Failures surfaced by [`crate::GeminiClient`].
#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("Gemini API key is not configured (expected environment variable {0})")]
    MissingApiKey(String),
    #[error("Failed to list models: {status} {status_text}")]
    Listing {
        status: u16,
        status_text: String,
        body: Option<Value>,
    },
    #[error("Gemini API error: {status} {status_text}")]
    Generation { status: u16, status_text: String },
    #[error("Gemini request failed: {0}")]
    Http(#[source] reqwest::Error),
}

impl GeminiError {
    /// Wraps a transport error, dropping the request URL so the key never reaches logs.
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
