use super::gemini::types::{GenerateContentRequest, GenerateContentResponse};
use std::future::Future;
use std::pin::Pin;

/// One request/response exchange with the generative-language service.
///
/// The seam between the generation pipeline and the wire: production code
/// uses [`super::GeminiClient`], tests substitute scripted doubles. A call
/// resolves to the full reply envelope; extracting and decoding the text
/// payload is the caller's concern.
pub trait GenerativeService: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateContentRequest,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<GenerateContentResponse>> + Send + 'a>>;
}
