use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for feedpilot.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PilotError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generation pipeline ──────────────────────────────────────────────
    #[error("generate: {0}")]
    Generate(#[from] GenerateError),

    // ── Shared state store ───────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Feed watcher ─────────────────────────────────────────────────────
    #[error("watch: {0}")]
    Watch(#[from] WatchError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generation pipeline errors ─────────────────────────────────────────────

/// Failure taxonomy of one generation call.
///
/// `Transport` is the only variant subject to automatic recovery (retry with
/// backoff before it is surfaced); the rest surface on first occurrence.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("remote call failed after {attempts} attempt(s): {last_error}")]
    Transport {
        attempts: u32,
        last_error: anyhow::Error,
    },

    #[error("reply envelope unusable: {0}")]
    Parse(String),

    #[error("reply shape mismatch: {0}")]
    Validation(String),

    #[error("input rejected: {0}")]
    Input(String),
}

// ─── Shared state store errors ──────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to persist state: {0}")]
    Persist(String),

    #[error("stored state unreadable: {0}")]
    Corrupt(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Feed watcher errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("selector `{selector}` is not valid CSS: {message}")]
    Selector { selector: String, message: String },

    #[error("container {0:?} is not present in the page")]
    UnknownContainer(crate::watcher::ContainerId),

    #[error("container {0:?} has no trigger attached")]
    NotInjected(crate::watcher::ContainerId),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PilotError>;
