use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the optimizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Scoring weights and cost model
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Generation backend selection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Prompt-grid catalog construction
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Round-loop settings
    #[serde(default)]
    pub run: RunConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scoring weights: `score = w_acc*acc + w_coh*coh - w_cost*cost`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfig {
    #[serde(default = "default_accuracy_weight")]
    pub accuracy_weight: f64,

    #[serde(default = "default_coherence_weight")]
    pub coherence_weight: f64,

    #[serde(default = "default_cost_weight")]
    pub cost_weight: f64,

    /// Tokens per unit of cost (cost = total tokens / this)
    #[serde(default = "default_tokens_per_cost_unit")]
    pub tokens_per_cost_unit: u32,
}

const fn default_accuracy_weight() -> f64 {
    0.9
}

const fn default_coherence_weight() -> f64 {
    0.1
}

const fn default_cost_weight() -> f64 {
    0.01
}

const fn default_tokens_per_cost_unit() -> u32 {
    1000
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            accuracy_weight: default_accuracy_weight(),
            coherence_weight: default_coherence_weight(),
            cost_weight: default_cost_weight(),
            tokens_per_cost_unit: default_tokens_per_cost_unit(),
        }
    }
}

/// Which generation backend to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Offline simulator (no network, seeded)
    #[default]
    Simulated,
    /// OpenAI-compatible chat completions API
    #[serde(rename = "openai")]
    OpenAi,
}

/// Generation backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,

    /// Model name sent to the API
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (falls back to `OPENAI_API_KEY`)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// System message sent ahead of every prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Per-call timeout; expiry abandons the round
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Simulator seed
    #[serde(default)]
    pub simulated_seed: u64,

    /// Simulated per-call latency in milliseconds
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_system_prompt() -> String {
    "You are a careful, precise assistant.".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_simulated_latency_ms() -> u64 {
    20
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            system_prompt: default_system_prompt(),
            timeout_secs: default_timeout_secs(),
            simulated_seed: 0,
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

impl BackendConfig {
    /// Get API key from config or environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }
}

/// Prompt-grid catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CatalogConfig {
    /// Temperature grid crossed with every phrasing
    #[serde(default = "default_temperatures")]
    pub temperatures: Vec<f64>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    /// Optional YAML arm list replacing the generated grid
    #[serde(default)]
    pub arms_file: Option<PathBuf>,
}

fn default_temperatures() -> Vec<f64> {
    vec![0.0, 0.2, 0.4, 0.7]
}

const fn default_max_tokens() -> u32 {
    256
}

const fn default_top_p() -> f64 {
    1.0
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            temperatures: default_temperatures(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            arms_file: None,
        }
    }
}

/// Round-loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunConfig {
    /// Passes over the dataset
    #[serde(default = "default_epochs")]
    pub epochs: u32,

    /// Seed for epoch shuffling (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Shuffle examples at the start of each epoch
    #[serde(default = "default_true")]
    pub shuffle: bool,

    /// Arms reported per input in the leaderboard
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Dataset file (YAML or JSON); demo set when absent
    #[serde(default)]
    pub dataset: Option<PathBuf>,
}

const fn default_epochs() -> u32 {
    5
}

const fn default_true() -> bool {
    true
}

const fn default_top_k() -> usize {
    3
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            epochs: default_epochs(),
            seed: None,
            shuffle: true,
            top_k: default_top_k(),
            dataset: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
