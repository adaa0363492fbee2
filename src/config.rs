use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "SPOONACULAR_API_KEY";

const FAVORITES_FILE_NAME: &str = ".recipe_finder_favorites.json";

/// Settings for talking to the recipe API and storing favorites
#[derive(Debug, Deserialize, Clone)]
pub struct FinderConfig {
    /// Spoonacular API key (can also be set via SPOONACULAR_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the recipe API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Maximum number of recipes returned per search
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// 1 maximizes used ingredients, 2 minimizes missing ones
    #[serde(default = "default_ranking")]
    pub ranking: u8,
    /// Ignore typical pantry items such as water, salt and flour
    #[serde(default = "default_ignore_pantry")]
    pub ignore_pantry: bool,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Request timeout in milliseconds; takes precedence over `timeout`
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Where favorites are persisted; defaults to a file in the home directory
    #[serde(default)]
    pub favorites_path: Option<PathBuf>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            limit: default_limit(),
            ranking: default_ranking(),
            ignore_pantry: default_ignore_pantry(),
            timeout: default_timeout(),
            timeout_ms: None,
            favorites_path: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_limit() -> u32 {
    5
}

fn default_ranking() -> u8 {
    2
}

fn default_ignore_pantry() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FINDER__ prefix
    /// 2. recipe_finder.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FINDER__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        build(File::with_name("recipe_finder").required(false))
    }

    /// Load configuration from an explicit file, still honoring environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        build(File::from(path).required(true))
    }

    /// The configured API key, falling back to SPOONACULAR_API_KEY
    pub fn resolve_api_key(&self) -> Option<String> {
        let usable = |key: &String| !key.trim().is_empty();
        self.api_key
            .clone()
            .filter(usable)
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(usable))
    }

    /// Location of the favorites file
    pub fn resolve_favorites_path(&self) -> Option<PathBuf> {
        self.favorites_path
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(FAVORITES_FILE_NAME)))
    }

    pub fn timeout(&self) -> Duration {
        match self.timeout_ms {
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_secs(self.timeout),
        }
    }
}

fn build<S>(file: S) -> Result<FinderConfig, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = Config::builder()
        .add_source(file)
        // Use double underscore as separator: RECIPE_FINDER__BASE_URL
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
