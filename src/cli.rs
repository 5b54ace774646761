use crate::config::Config;
use crate::llm::GeminiClient;
use crate::pipeline::{GenerationRequest, Pipeline};
use crate::render;
use crate::store::{JsonFileStore, StateStore};
use crate::ui::style;
use crate::watcher::{FeedWatcher, HtmlPage};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "feedpilot",
    version,
    about = "AI engagement copilot for social feeds"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Suggest comments for the post text stored by the feed watcher
    Comment {
        /// Tone override for this run (not persisted)
        #[arg(long)]
        tone: Option<String>,
    },
    /// Draft a post on a topic
    Post {
        topic: String,
        /// Tone override for this run (not persisted)
        #[arg(long)]
        tone: Option<String>,
    },
    /// Scan a feed snapshot and inject trigger controls
    Watch {
        /// HTML file holding a feed snapshot
        file: PathBuf,
        /// Activate the trigger of the Nth injected post (1-based), storing
        /// its extracted text for a later `comment` run
        #[arg(long)]
        activate: Option<usize>,
    },
    /// Persist the preferred tone
    Tone { value: String },
    /// Show the shared hand-off state
    Status,
}

fn resolve_tone(flag: Option<String>, stored: Option<String>, config: &Config) -> String {
    flag.or(stored)
        .unwrap_or_else(|| config.drafting.default_tone.clone())
}

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let store = Arc::new(JsonFileStore::open(&config.state_path)?);

    match cli.command {
        Command::Comment { tone } => {
            let state = store.snapshot()?;
            let input = state.active_post_text.context(
                "no stored post text — run `feedpilot watch <snapshot.html> --activate N` first",
            )?;
            let tone = resolve_tone(tone, state.user_tone, &config);
            generate_and_print(&config, GenerationRequest::comment(input, tone)).await
        }
        Command::Post { topic, tone } => {
            let state = store.snapshot()?;
            let tone = resolve_tone(tone, state.user_tone, &config);
            generate_and_print(&config, GenerationRequest::post(topic, tone)).await
        }
        Command::Watch { file, activate } => watch(&config, store, &file, activate),
        Command::Tone { value } => {
            store.set_tone(&value)?;
            println!("{} tone set to {}", style::success("✓"), style::value(&value));
            Ok(())
        }
        Command::Status => {
            let state = store.snapshot()?;
            println!("{}", style::header("Shared state"));
            let text = state
                .active_post_text
                .map_or_else(|| style::dim("unset"), |t| preview(&t));
            println!("  post text:    {text}");
            let tone = state
                .user_tone
                .map_or_else(|| style::dim("unset"), style::value);
            println!("  tone:         {tone}");
            let at = state
                .requested_at
                .map_or_else(|| style::dim("never"), |t| style::value(t.to_rfc3339()));
            println!("  extracted at: {at}");
            Ok(())
        }
    }
}

async fn generate_and_print(config: &Config, request: GenerationRequest) -> Result<()> {
    let api_key = config.resolved_api_key();
    let client = GeminiClient::with_base_url(api_key.as_deref(), &config.model, &config.base_url);
    let pipeline = Pipeline::from_config(Arc::new(client), config);

    let result = pipeline.generate(&request).await;
    println!("{}", render::render(&result).to_terminal());
    Ok(())
}

fn watch(
    config: &Config,
    store: Arc<JsonFileStore>,
    file: &Path,
    activate: Option<usize>,
) -> Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut page = HtmlPage::parse(&html, &config.selectors)?;

    let mut watcher = FeedWatcher::new(store);
    let attached = watcher.start(&mut page);
    println!("{} injected {attached} trigger(s)", style::success("✓"));

    if let Some(n) = activate {
        let slot = n.checked_sub(1).context("--activate is 1-based")?;
        let id = *page
            .injected()
            .get(slot)
            .with_context(|| format!("no injected post #{n}"))?;
        let text = watcher.activate(&page, id)?;
        println!(
            "{} stored post text: {}",
            style::success("✓"),
            preview(&text)
        );
    }

    Ok(())
}

fn preview(text: &str) -> String {
    const MAX_PREVIEW_CHARS: usize = 60;
    let mut shortened: String = text.chars().take(MAX_PREVIEW_CHARS).collect();
    if text.chars().count() > MAX_PREVIEW_CHARS {
        shortened.push('…');
    }
    style::dim(shortened)
}
