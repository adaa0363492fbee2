use thiserror::Error;

/// Errors that can occur while searching recipes or managing favorites
#[derive(Error, Debug)]
pub enum FinderError {
    /// No ingredients were supplied
    #[error("Please enter some ingredients")]
    EmptyQuery,

    /// The recipe API could not be reached
    #[error("Failed to reach the recipe API: {0}")]
    Network(#[from] reqwest::Error),

    /// The recipe API answered with a non-success status
    #[error("Recipe API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The search produced zero recipes
    #[error("No recipes found")]
    NotFound,

    /// The API response could not be decoded
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// Reading or writing the favorites file failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Favorites could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

impl FinderError {
    /// Whether this error means the API was unreachable or refused the request
    pub fn is_network(&self) -> bool {
        matches!(self, FinderError::Network(_) | FinderError::Api { .. })
    }
}
