//! The generation pipeline: unstructured request in, schema-validated typed
//! result out, despite an unreliable remote call.

pub mod prompt;
pub mod schema;
pub mod types;
pub mod validate;

pub use types::{FailureKind, GenerationRequest, GenerationResult, RequestKind};

use crate::config::Config;
use crate::error::GenerateError;
use crate::llm::gemini::types::GenerateContentRequest;
use crate::llm::{GenerativeService, RetryPolicy, retry};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Tunables the pipeline reads per call.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub temperature: f64,
    pub max_post_chars: u32,
    pub min_input_chars: u32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_post_chars: 300,
            min_input_chars: 5,
        }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            temperature: config.temperature,
            max_post_chars: config.drafting.max_post_chars,
            min_input_chars: config.drafting.min_input_chars,
        }
    }
}

pub struct Pipeline {
    service: Arc<dyn GenerativeService>,
    policy: RetryPolicy,
    options: PipelineOptions,
    // Per-kind in-flight flags. Holding one across the remote call keeps at
    // most one generation of that kind in flight; the two kinds share no
    // lock and may overlap.
    comment_busy: Mutex<()>,
    post_busy: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        service: Arc<dyn GenerativeService>,
        policy: RetryPolicy,
        options: PipelineOptions,
    ) -> Self {
        Self {
            service,
            policy,
            options,
            comment_busy: Mutex::new(()),
            post_busy: Mutex::new(()),
        }
    }

    pub fn from_config(service: Arc<dyn GenerativeService>, config: &Config) -> Self {
        Self::new(
            service,
            RetryPolicy::new(
                config.reliability.max_attempts,
                config.reliability.initial_delay(),
            ),
            PipelineOptions::from(config),
        )
    }

    fn busy_flag(&self, kind: RequestKind) -> &Mutex<()> {
        match kind {
            RequestKind::Comment => &self.comment_busy,
            RequestKind::Post => &self.post_busy,
        }
    }

    /// Run one generation call to completion. Failures come back as the
    /// `Failure` variant, classified and logged; this never panics the host.
    pub async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        match self.run(request).await {
            Ok(result) => result,
            Err(err) => {
                log_failure(&err);
                GenerationResult::from_error(&err)
            }
        }
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerateError> {
        self.check_input(request)?;

        // Acquired before the call, released on every exit path below —
        // including early `?` returns — when the guard drops.
        let _busy = self.busy_flag(request.kind).lock().await;

        let parts = prompt::build_prompt(request, self.options.max_post_chars);
        let response_schema = schema::response_schema(request.kind, self.options.max_post_chars);
        let wire = GenerateContentRequest::structured(
            &parts.system_instruction,
            &parts.user_query,
            response_schema,
            self.options.temperature,
        );

        let reply = retry::call(self.policy, || self.service.generate(&wire))
            .await
            .map_err(|last_error| GenerateError::Transport {
                attempts: self.policy.max_attempts.max(1),
                last_error,
            })?;

        let raw_text = reply.first_text().ok_or_else(|| {
            GenerateError::Parse("reply envelope carried no text payload".into())
        })?;

        validate::decode_reply(request.kind, &raw_text, self.options.max_post_chars)
    }

    fn check_input(&self, request: &GenerationRequest) -> Result<(), GenerateError> {
        let trimmed = request.input.trim();
        if trimmed.is_empty() {
            return Err(GenerateError::Input("input is empty".into()));
        }

        let length = u32::try_from(trimmed.chars().count()).unwrap_or(u32::MAX);
        if length < self.options.min_input_chars {
            return Err(GenerateError::Input(format!(
                "input is shorter than {} characters",
                self.options.min_input_chars
            )));
        }

        if request.kind == RequestKind::Post && length > self.options.max_post_chars {
            return Err(GenerateError::Input(format!(
                "topic exceeds {} characters",
                self.options.max_post_chars
            )));
        }

        Ok(())
    }
}

/// One distinct log line per failure kind; the rendered outcome is the same
/// generic panel for all of them.
fn log_failure(err: &GenerateError) {
    match err {
        GenerateError::Transport {
            attempts,
            last_error,
        } => {
            tracing::warn!(attempts, error = %last_error, "generation failed: retries exhausted");
        }
        GenerateError::Parse(detail) => {
            tracing::warn!(%detail, "generation failed: reply envelope unusable");
        }
        GenerateError::Validation(detail) => {
            tracing::warn!(%detail, "generation failed: reply shape mismatch");
        }
        GenerateError::Input(detail) => {
            tracing::warn!(%detail, "generation rejected before submission");
        }
    }
}

#[cfg(test)]
mod tests;
