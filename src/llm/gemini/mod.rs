//! Generative-language client for the Gemini `generateContent` API, with
//! structured (schema-constrained) output. API key comes from config or the
//! `GEMINI_API_KEY` / `GOOGLE_API_KEY` env vars.

use super::http_client::build_provider_client;
use super::traits::GenerativeService;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

pub mod types;
use types::{GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_API_ERROR_CHARS: usize = 200;

/// Keep provider error bodies loggable: hard-truncate so a misbehaving
/// endpoint cannot flood the diagnostics stream.
fn sanitize_api_error(error_text: &str) -> String {
    let mut out: String = error_text.chars().take(MAX_API_ERROR_CHARS).collect();
    if error_text.chars().count() > MAX_API_ERROR_CHARS {
        out.push('…');
    }
    out
}

pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<&str>, model: &str) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Point the client at a non-default endpoint (self-hosted proxy, mock
    /// server in tests).
    pub fn with_base_url(api_key: Option<&str>, model: &str, base_url: &str) -> Self {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from);
        Self {
            api_key,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_provider_client(),
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Options:\n\
                 1. Set GEMINI_API_KEY env var\n\
                 2. Set api_key in ~/.feedpilot/config.toml\n\
                 3. Get an API key from https://aistudio.google.com/app/apikey"
            )
        })
    }

    fn request_url(&self) -> anyhow::Result<String> {
        let api_key = self.api_key()?;
        let model_name = Self::model_name(&self.model);
        Ok(format!(
            "{}/{model_name}:generateContent?key={api_key}",
            self.base_url
        ))
    }

    async fn ensure_success_status(
        response: reqwest::Response,
    ) -> anyhow::Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let sanitized_error = sanitize_api_error(&error_text);
            anyhow::bail!("Gemini API error ({status}): {sanitized_error}");
        }

        Ok(response)
    }

    async fn call_api(
        &self,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<GenerateContentResponse> {
        let url = self.request_url()?;

        let response = self.client.post(url).json(request).send().await?;
        let response = Self::ensure_success_status(response).await?;

        let result: GenerateContentResponse = response.json().await?;

        if let Some(err) = result.error.as_ref() {
            anyhow::bail!("Gemini API error: {}", sanitize_api_error(&err.message));
        }

        if let Some(usage) = result.usage_metadata.as_ref() {
            tracing::debug!(
                prompt_tokens = usage.prompt_token_count,
                candidate_tokens = usage.candidates_token_count,
                "generation usage"
            );
        }

        Ok(result)
    }
}

impl GenerativeService for GeminiClient {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GenerateContentResponse>> + Send + 'a>> {
        Box::pin(async move { self.call_api(request).await })
    }
}
