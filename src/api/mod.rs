mod spoonacular;

pub use spoonacular::SpoonacularClient;

use async_trait::async_trait;

use crate::error::FinderError;
use crate::model::{InstructionBlock, RecipeInformation, RecipeSummary};
use crate::query::SearchRequest;

/// HTTP collaborator for the recipe API
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Run an ingredient search
    async fn find_by_ingredients(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<RecipeSummary>, FinderError>;

    /// Fetch title, timings, servings and ingredients of one recipe
    async fn recipe_information(&self, id: u64) -> Result<RecipeInformation, FinderError>;

    /// Fetch the step-by-step instructions of one recipe
    async fn analyzed_instructions(&self, id: u64) -> Result<Vec<InstructionBlock>, FinderError>;
}
