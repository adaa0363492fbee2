use std::path::PathBuf;
use std::time::Duration;

use crate::api::{RecipeApi, SpoonacularClient};
use crate::favorites::{FavoritesStorage, FavoritesStore, JsonFileStorage};
use crate::presenter::{load_recipe, present_search, SearchOutcome};
use crate::query::SearchQuery;
use crate::{FinderConfig, FinderError, Recipe, RecipeSummary};

/// Builder for configuring a recipe finder session
#[derive(Debug, Default)]
pub struct RecipeFinderBuilder {
    config: Option<FinderConfig>,
    api_key: Option<String>,
    base_url: Option<String>,
    limit: Option<u32>,
    timeout: Option<Duration>,
    favorites_path: Option<PathBuf>,
}

impl RecipeFinderBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// Values set directly on the builder still take precedence.
    pub fn config(mut self, config: FinderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the Spoonacular API key
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder().api_key("your-api-key");
    /// ```
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the session at a different API host
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Maximum number of recipes per search
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set a timeout for HTTP requests, with millisecond precision
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeFinder::builder().timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// File where favorites are kept
    pub fn favorites_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.favorites_path = Some(path.into());
        self
    }

    fn resolve(self) -> Result<(FinderConfig, String), FinderError> {
        let mut config = self.config.unwrap_or_default();
        if let Some(url) = self.base_url {
            config.base_url = url;
        }
        if let Some(limit) = self.limit {
            config.limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        }
        if let Some(path) = self.favorites_path {
            config.favorites_path = Some(path);
        }
        if let Some(key) = self.api_key {
            config.api_key = Some(key);
        }

        let api_key = config.resolve_api_key().ok_or_else(|| {
            FinderError::Builder(
                "No API key. Use .api_key(), set api_key in recipe_finder.toml or SPOONACULAR_API_KEY"
                    .to_string(),
            )
        })?;
        Ok((config, api_key))
    }

    /// Create the session, loading favorites from the configured file
    ///
    /// # Errors
    /// Returns `FinderError::Builder` when no API key can be found or the
    /// favorites location cannot be determined.
    pub fn build(self) -> Result<RecipeFinder<SpoonacularClient, JsonFileStorage>, FinderError> {
        let (config, api_key) = self.resolve()?;
        let path = config.resolve_favorites_path().ok_or_else(|| {
            FinderError::Builder("Cannot determine where to store favorites".to_string())
        })?;
        let client = SpoonacularClient::new(&config, api_key.clone())?;
        RecipeFinder::with_parts(config, api_key, client, JsonFileStorage::new(path))
    }

    /// Create the session with a custom favorites storage
    pub fn build_with_storage<S: FavoritesStorage>(
        self,
        storage: S,
    ) -> Result<RecipeFinder<SpoonacularClient, S>, FinderError> {
        let (config, api_key) = self.resolve()?;
        let client = SpoonacularClient::new(&config, api_key.clone())?;
        RecipeFinder::with_parts(config, api_key, client, storage)
    }
}

/// A search session: the API client plus the user's favorites
pub struct RecipeFinder<A: RecipeApi, S: FavoritesStorage> {
    config: FinderConfig,
    api_key: String,
    api: A,
    favorites: FavoritesStore<S>,
}

impl RecipeFinder<SpoonacularClient, JsonFileStorage> {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use recipe_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder();
    /// ```
    pub fn builder() -> RecipeFinderBuilder {
        RecipeFinderBuilder::default()
    }
}

impl<A: RecipeApi, S: FavoritesStorage> RecipeFinder<A, S> {
    /// Assemble a session from explicit collaborators
    pub fn with_parts(
        config: FinderConfig,
        api_key: String,
        api: A,
        storage: S,
    ) -> Result<Self, FinderError> {
        Ok(RecipeFinder {
            config,
            api_key,
            api,
            favorites: FavoritesStore::open(storage)?,
        })
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Search recipes for a comma separated ingredient list
    ///
    /// Empty input fails with `FinderError::EmptyQuery` before any request is made.
    pub async fn search(&self, ingredients: &str) -> Result<SearchOutcome, FinderError> {
        let query = SearchQuery::parse(ingredients)?;
        let request = query.to_request(&self.config, &self.api_key);
        present_search(&self.api, &request).await
    }

    /// Load the detail view of a recipe
    pub async fn details(&self, id: u64) -> Result<Recipe, FinderError> {
        load_recipe(&self.api, id).await
    }

    pub fn favorites(&self) -> &[RecipeSummary] {
        self.favorites.list()
    }

    pub fn is_favorite(&self, id: u64) -> bool {
        self.favorites.contains(id)
    }

    pub fn add_favorite(&mut self, recipe: RecipeSummary) -> Result<bool, FinderError> {
        self.favorites.add(recipe)
    }

    pub fn remove_favorite(&mut self, id: u64) -> Result<bool, FinderError> {
        self.favorites.remove(id)
    }

    pub fn toggle_favorite(&mut self, recipe: RecipeSummary) -> Result<bool, FinderError> {
        self.favorites.toggle(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::MemoryStorage;

    #[test]
    fn test_builder_values_override_config() {
        let config = FinderConfig {
            api_key: Some("from-config".to_string()),
            limit: 3,
            ..Default::default()
        };
        let (config, api_key) = RecipeFinder::builder()
            .config(config)
            .api_key("from-builder")
            .limit(8)
            .timeout(Duration::from_millis(1500))
            .resolve()
            .unwrap();

        assert_eq!(api_key, "from-builder");
        assert_eq!(config.limit, 8);
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn test_build_with_storage() {
        let finder = RecipeFinder::builder()
            .api_key("key")
            .base_url("http://127.0.0.1:1")
            .build_with_storage(MemoryStorage::new())
            .unwrap();
        assert!(finder.favorites().is_empty());
        assert_eq!(finder.config().base_url, "http://127.0.0.1:1");
    }

    #[test]
    fn test_build_uses_favorites_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favs.json");
        let finder = RecipeFinder::builder()
            .api_key("key")
            .favorites_path(&path)
            .build()
            .unwrap();
        assert_eq!(
            finder.config().resolve_favorites_path(),
            Some(path.clone())
        );
    }
}
