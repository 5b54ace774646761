#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod ui;
pub mod watcher;

pub use config::Config;
pub use error::{ConfigError, GenerateError, PilotError, Result, StoreError, WatchError};
pub use pipeline::{FailureKind, GenerationRequest, GenerationResult, Pipeline, RequestKind};
pub use store::{JsonFileStore, MemoryStore, SharedState, StateKey, StateStore};
pub use watcher::{ContainerId, FeedWatcher, HostPage, HtmlPage, PageEvent};
