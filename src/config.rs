use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// Path to the shared state file - computed from home, not serialized
    #[serde(skip)]
    pub state_path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generative-language endpoint. Overridable for
    /// self-hosted proxies and tests.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub drafting: DraftingConfig,

    #[serde(default)]
    pub selectors: SelectorConfig,
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_temperature() -> f64 {
    0.7
}

// ── Reliability ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    /// Total call attempts per generation, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles on each further retry.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

impl ReliabilityConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

// ── Drafting ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftingConfig {
    /// Hard cap asked of the service for post drafts, and the advisory
    /// threshold applied to what it returns.
    #[serde(default = "default_max_post_chars")]
    pub max_post_chars: u32,
    /// Inputs shorter than this are rejected before any remote call.
    #[serde(default = "default_min_input_chars")]
    pub min_input_chars: u32,
    #[serde(default = "default_tone")]
    pub default_tone: String,
}

fn default_max_post_chars() -> u32 {
    300
}

fn default_min_input_chars() -> u32 {
    5
}

fn default_tone() -> String {
    "professional".into()
}

impl Default for DraftingConfig {
    fn default() -> Self {
        Self {
            max_post_chars: default_max_post_chars(),
            min_input_chars: default_min_input_chars(),
            default_tone: default_tone(),
        }
    }
}

// ── Feed selectors ───────────────────────────────────────────────

/// CSS selectors locating feed structure in the host page. When these drift
/// out of sync with the live page nothing matches and nothing is injected;
/// the watcher cannot tell "no posts yet" from "selectors stale".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    #[serde(default = "default_post_container")]
    pub post_container: String,
    #[serde(default = "default_interaction_bar")]
    pub interaction_bar: String,
    #[serde(default = "default_text_blocks")]
    pub text_blocks: String,
}

fn default_post_container() -> String {
    "div.feed-shared-update-v2".into()
}

fn default_interaction_bar() -> String {
    "div.feed-shared-social-action-bar".into()
}

fn default_text_blocks() -> String {
    "span.break-words".into()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            post_container: default_post_container(),
            interaction_bar: default_interaction_bar(),
            text_blocks: default_text_blocks(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let pilot_dir = Self::pilot_dir().unwrap_or_else(|_| PathBuf::from(".feedpilot"));
        Self {
            config_path: pilot_dir.join("config.toml"),
            state_path: pilot_dir.join("state.json"),
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            temperature: default_temperature(),
            reliability: ReliabilityConfig::default(),
            drafting: DraftingConfig::default(),
            selectors: SelectorConfig::default(),
        }
    }
}

impl Config {
    fn pilot_dir() -> Result<PathBuf> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        Ok(home.join(".feedpilot"))
    }

    /// Load `~/.feedpilot/config.toml`, writing a default one on first run.
    pub fn load_or_init() -> Result<Self> {
        let pilot_dir = Self::pilot_dir()?;
        if !pilot_dir.exists() {
            fs::create_dir_all(&pilot_dir).context("Failed to create .feedpilot directory")?;
        }

        let config_path = pilot_dir.join("config.toml");
        if config_path.exists() {
            let contents =
                fs::read_to_string(&config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path;
            config.state_path = pilot_dir.join("state.json");
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, contents).context("Failed to write config file")?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.reliability.max_attempts == 0 {
            anyhow::bail!("reliability.max_attempts must be at least 1");
        }
        if self.drafting.max_post_chars == 0 {
            anyhow::bail!("drafting.max_post_chars must be at least 1");
        }
        Ok(())
    }

    /// Resolve the API key: explicit config value first, then the
    /// `GEMINI_API_KEY` / `GOOGLE_API_KEY` environment variables.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()))
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}
