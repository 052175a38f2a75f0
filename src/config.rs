use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable consulted when no vision API key is configured
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable consulted when no recipe API key is configured
pub const SPOONACULAR_API_KEY_ENV: &str = "SPOONACULAR_API_KEY";

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AdvisorConfig {
    /// Vision model used for ingredient detection
    #[serde(default)]
    pub vision: VisionConfig,
    /// Live recipe search API
    #[serde(default)]
    pub recipes: RecipeApiConfig,
    /// Demo recipe table used as a cache in front of the live API
    #[serde(default)]
    pub demo: DemoConfig,
    /// Request timeout in seconds, 0 disables it
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            vision: VisionConfig::default(),
            recipes: RecipeApiConfig::default(),
            demo: DemoConfig::default(),
            timeout: default_timeout(),
        }
    }
}

/// Configuration for the Gemini vision endpoint
#[derive(Debug, Deserialize, Clone)]
pub struct VisionConfig {
    /// API key, passed as the `key` query parameter
    pub api_key: Option<String>,
    /// Model identifier (e.g., "gemini-1.5-flash")
    #[serde(default = "default_vision_model")]
    pub model: String,
    /// Base URL of the generative language API
    #[serde(default = "default_vision_base_url")]
    pub base_url: String,
    /// Sampling temperature, kept low so replies stay terse
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    /// Top-k sampling cutoff
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_vision_model(),
            base_url: default_vision_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            top_p: default_top_p(),
            top_k: default_top_k(),
        }
    }
}

/// Configuration for the Spoonacular recipe API
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeApiConfig {
    /// API key, passed as the `apiKey` query parameter
    pub api_key: Option<String>,
    #[serde(default = "default_recipes_base_url")]
    pub base_url: String,
    /// Number of candidates requested from the search endpoint
    #[serde(default = "default_search_results")]
    pub search_results: u32,
    /// Number of top candidates whose details are fetched
    #[serde(default = "default_detail_results")]
    pub detail_results: usize,
}

impl Default for RecipeApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_recipes_base_url(),
            search_results: default_search_results(),
            detail_results: default_detail_results(),
        }
    }
}

/// Configuration for the demo recipe table
#[derive(Debug, Deserialize, Clone)]
pub struct DemoConfig {
    /// Whether demo data is used at all, both before the live API and as
    /// the fallback when it fails
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Return the first demo bundle when the live API fails.
    /// When false, or when `enabled` is false, an empty list is returned instead.
    #[serde(default = "default_true")]
    pub fallback_on_error: bool,
    /// Optional JSON file replacing the built-in table
    pub table_path: Option<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fallback_on_error: true,
            table_path: None,
        }
    }
}

// Default value functions
fn default_vision_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_vision_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_output_tokens() -> u32 {
    200
}

fn default_top_p() -> f32 {
    1.0
}

fn default_top_k() -> u32 {
    32
}

fn default_recipes_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_search_results() -> u32 {
    6
}

fn default_detail_results() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl AdvisorConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with BITE__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: BITE__VISION__API_KEY.
    /// Missing credentials also fall back to GEMINI_API_KEY and SPOONACULAR_API_KEY.
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    /// Fill missing credentials from the plain environment variables
    pub fn with_env_credentials(mut self) -> Self {
        if self.vision.api_key.is_none() {
            self.vision.api_key = non_empty_env(GEMINI_API_KEY_ENV);
        }
        if self.recipes.api_key.is_none() {
            self.recipes.api_key = non_empty_env(SPOONACULAR_API_KEY_ENV);
        }
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load configuration from file and environment variables
///
/// See [`AdvisorConfig::load`] for the precedence rules.
pub fn load_config() -> Result<AdvisorConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: BITE__RECIPES__API_KEY
        .add_source(
            Environment::with_prefix("BITE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AdvisorConfig = settings.try_deserialize()?;
    Ok(config.with_env_credentials())
}
