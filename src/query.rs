//! Turns free-text ingredient input into a request against the recipe API.

use std::fmt;

use crate::config::FinderConfig;
use crate::error::FinderError;

/// Path of the search-by-ingredients endpoint
pub const FIND_BY_INGREDIENTS_PATH: &str = "/recipes/findByIngredients";

/// Normalized ingredient list for a single search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: Vec<String>,
}

impl SearchQuery {
    /// Parse a comma separated ingredient list
    ///
    /// Tokens are trimmed and empty ones dropped. Repeated ingredients are
    /// compared case-insensitively and only the first spelling is kept.
    ///
    /// # Errors
    /// Returns `FinderError::EmptyQuery` when no ingredient remains.
    pub fn parse(input: &str) -> Result<Self, FinderError> {
        let mut tokens: Vec<String> = Vec::new();
        for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let key = token.to_lowercase();
            if !tokens.iter().any(|t| t.to_lowercase() == key) {
                tokens.push(token.to_string());
            }
        }

        if tokens.is_empty() {
            return Err(FinderError::EmptyQuery);
        }
        Ok(SearchQuery { tokens })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether the query mentions an ingredient, ignoring case
    pub fn contains(&self, ingredient: &str) -> bool {
        let needle = ingredient.trim().to_lowercase();
        self.tokens.iter().any(|t| t.to_lowercase() == needle)
    }

    /// Value of the `ingredients` query parameter
    pub fn to_param(&self) -> String {
        self.tokens.join(",")
    }

    /// Build the search request, including the API credential
    pub fn to_request(&self, config: &FinderConfig, api_key: &str) -> SearchRequest {
        SearchRequest {
            url: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                FIND_BY_INGREDIENTS_PATH
            ),
            ingredients: self.to_param(),
            number: config.limit,
            ranking: config.ranking,
            ignore_pantry: config.ignore_pantry,
            api_key: api_key.to_string(),
        }
    }
}

/// A ready-to-send `findByIngredients` request
#[derive(Clone, PartialEq, Eq)]
pub struct SearchRequest {
    url: String,
    ingredients: String,
    number: u32,
    ranking: u8,
    ignore_pantry: bool,
    api_key: String,
}

impl SearchRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ingredients(&self) -> &str {
        &self.ingredients
    }

    /// Query parameters in the order they are sent
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ingredients", self.ingredients.clone()),
            ("number", self.number.to_string()),
            ("ranking", self.ranking.to_string()),
            ("ignorePantry", self.ignore_pantry.to_string()),
            ("apiKey", self.api_key.clone()),
        ]
    }
}

// Keeps the API key out of debug logs
impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("url", &self.url)
            .field("ingredients", &self.ingredients)
            .field("number", &self.number)
            .field("ranking", &self.ranking)
            .field("ignore_pantry", &self.ignore_pantry)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
