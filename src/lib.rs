pub mod api;
pub mod builder;
pub mod config;
pub mod error;
pub mod favorites;
pub mod model;
pub mod presenter;
pub mod query;

pub use api::{RecipeApi, SpoonacularClient};
pub use builder::{RecipeFinder, RecipeFinderBuilder};
pub use crate::config::FinderConfig;
pub use error::FinderError;
pub use favorites::{FavoritesStorage, FavoritesStore, JsonFileStorage, MemoryStorage};
pub use model::{Recipe, RecipeSummary};
pub use presenter::SearchOutcome;
pub use query::{SearchQuery, SearchRequest};

use log::debug;

/// Search recipes using configuration from `recipe_finder.toml` and the environment
///
/// # Errors
/// `FinderError::EmptyQuery` for blank input, `FinderError::NotFound` when
/// nothing matches, and network errors when the API cannot be reached.
pub async fn find_recipes(ingredients: &str) -> Result<Vec<RecipeSummary>, FinderError> {
    let config = FinderConfig::load()?;
    let query = SearchQuery::parse(ingredients)?;
    let api_key = config
        .resolve_api_key()
        .ok_or_else(|| FinderError::Builder("No API key configured".to_string()))?;

    let client = SpoonacularClient::new(&config, api_key.clone())?;
    let request = query.to_request(&config, &api_key);
    debug!("{:?}", request);

    presenter::present_search(&client, &request)
        .await?
        .into_recipes()
}

/// Load one recipe's ingredients and instructions
pub async fn recipe_details(id: u64) -> Result<Recipe, FinderError> {
    let config = FinderConfig::load()?;
    let api_key = config
        .resolve_api_key()
        .ok_or_else(|| FinderError::Builder("No API key configured".to_string()))?;

    let client = SpoonacularClient::new(&config, api_key)?;
    presenter::load_recipe(&client, id).await
}
