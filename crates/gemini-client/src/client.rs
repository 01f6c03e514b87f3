//! The Gemini REST client and its model discovery cache.

use crate::{
    error::GeminiError,
    types::{GenerateContentRequest, GenerateContentResponse, ListModelsResponse, ModelDescriptor},
};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// API revisions in lookup order, newest first.
pub const API_REVISIONS: [&str; 2] = ["v1beta", "v1"];

/// Where the API key comes from.
#[derive(Clone, Debug)]
pub enum ApiKey {
    /// Read from the named environment variable on every request.
    Env(String),
    /// A fixed key.
    Static(String),
}

impl ApiKey {
    fn resolve(&self) -> Result<String, GeminiError> {
        match self {
            ApiKey::Env(var) => std::env::var(var)
                .ok()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| GeminiError::MissingApiKey(var.clone())),
            ApiKey::Static(key) if key.is_empty() => {
                Err(GeminiError::MissingApiKey("<static>".to_string()))
            }
            ApiKey::Static(key) => Ok(key.clone()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: ApiKey,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_key: ApiKey::Env("GEMINI_API_KEY".to_string()),
        }
    }
}

/// A client for single-turn text generation.
///
/// The model to use is discovered on first use and kept for the lifetime of
/// the client. Concurrent first calls share a single model lookup; a failed lookup
/// leaves the cache empty so the next call looks up again.
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
    model: OnceCell<ModelDescriptor>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            model: OnceCell::new(),
        }
    }

    /// The cached descriptor, if a model lookup has already succeeded.
    pub fn cached_model(&self) -> Option<&ModelDescriptor> {
        self.model.get()
    }

    /// Resolves the model descriptor, probing the provider on first use.
    pub async fn model_descriptor(&self) -> Result<ModelDescriptor, GeminiError> {
        let key = self.config.api_key.resolve()?;
        self.resolve_model(&key).await.cloned()
    }

    /// Sends `text` as the sole input content and returns the first
    /// candidate's first text part, or `None` if the response carries none.
    #[instrument(skip_all)]
    pub async fn generate_content(&self, text: &str) -> Result<Option<String>, GeminiError> {
        let key = self.config.api_key.resolve()?;
        let model = self.resolve_model(&key).await?;

        let url = format!(
            "{}/{}/models/{}:generateContent",
            self.base_url(),
            model.api_version,
            model.name
        );
        debug!(model = %model.name, api_version = %model.api_version, "Requesting content generation");

        let response = self
            .http
            .post(&url)
            .query(&[("key", key.as_str())])
            .json(&GenerateContentRequest::from_text(text))
            .send()
            .await
            .map_err(GeminiError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::Generation {
                status: status.as_u16(),
                status_text: status_text(status),
            });
        }

        let body: GenerateContentResponse =
            response.json().await.map_err(GeminiError::transport)?;
        Ok(body.first_text())
    }

    async fn resolve_model(&self, key: &str) -> Result<&ModelDescriptor, GeminiError> {
        self.model.get_or_try_init(|| self.discover_model(key)).await
    }

    /// Lists models on the newest revision, falling back to the previous one
    /// when the newest answers with a non-success status.
    async fn discover_model(&self, key: &str) -> Result<ModelDescriptor, GeminiError> {
        let [newest, previous] = API_REVISIONS;
        let (revision, listing) = match self.list_models(newest, key).await {
            Ok(listing) => (newest, listing),
            Err(GeminiError::Listing { status, .. }) => {
                warn!(revision = newest, status, "Model listing failed, trying previous revision");
                (previous, self.list_models(previous, key).await?)
            }
            Err(e) => return Err(e),
        };

        let descriptor = listing
            .models
            .iter()
            .find(|m| m.can_generate_content())
            .map(|m| ModelDescriptor {
                name: m.short_name().to_string(),
                api_version: revision.to_string(),
            })
            .unwrap_or_else(|| {
                warn!(revision, "No model supports generateContent, using fallback");
                ModelDescriptor::fallback()
            });

        info!(model = %descriptor.name, api_version = %descriptor.api_version, "Gemini model resolved");
        Ok(descriptor)
    }

    async fn list_models(
        &self,
        revision: &str,
        key: &str,
    ) -> Result<ListModelsResponse, GeminiError> {
        let url = format!("{}/{}/models", self.base_url(), revision);
        let response = self
            .http
            .get(&url)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(GeminiError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeminiError::Listing {
                status: status.as_u16(),
                status_text: status_text(status),
                body: error_body(response).await,
            });
        }

        response.json().await.map_err(GeminiError::transport)
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

async fn error_body(response: Response) -> Option<Value> {
    response.json::<Value>().await.ok()
}
