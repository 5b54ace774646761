// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod http_client;
pub mod retry;
pub mod traits;

// ── Provider implementation ─────────────────────────────────────────────────
pub mod gemini;

// ── Re-exports ──────────────────────────────────────────────────────────────
pub use gemini::GeminiClient;
pub use http_client::build_provider_client;
pub use retry::RetryPolicy;
pub use traits::GenerativeService;
