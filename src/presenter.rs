//! Turns API responses into browsable search results and detail views.

use html_escape::decode_html_entities;
use log::{debug, info, warn};
use scraper::{Html, Selector};

use crate::api::RecipeApi;
use crate::error::FinderError;
use crate::model::{InstructionBlock, Recipe, RecipeInformation, RecipeSummary};
use crate::query::SearchRequest;

/// Result of a search that reached the API
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// At least one recipe matched
    Found(Vec<RecipeSummary>),
    /// The API answered, but nothing matched
    NoResults,
}

impl SearchOutcome {
    /// Recipes of the outcome, with "no results" reported as `FinderError::NotFound`
    pub fn into_recipes(self) -> Result<Vec<RecipeSummary>, FinderError> {
        match self {
            SearchOutcome::Found(recipes) => Ok(recipes),
            SearchOutcome::NoResults => Err(FinderError::NotFound),
        }
    }
}

/// Send a search request and classify the response
pub async fn present_search(
    api: &dyn RecipeApi,
    request: &SearchRequest,
) -> Result<SearchOutcome, FinderError> {
    let recipes = api.find_by_ingredients(request).await?;
    info!(
        "Search for '{}' returned {} recipes",
        request.ingredients(),
        recipes.len()
    );

    if recipes.is_empty() {
        Ok(SearchOutcome::NoResults)
    } else {
        Ok(SearchOutcome::Found(recipes))
    }
}

/// Fetch everything the detail view shows for one recipe
pub async fn load_recipe(api: &dyn RecipeApi, id: u64) -> Result<Recipe, FinderError> {
    let information = api.recipe_information(id).await?;
    let blocks = api.analyzed_instructions(id).await?;
    Ok(assemble_recipe(information, &blocks))
}

/// Combine the information and instructions payloads
///
/// Steps come from the first analyzed block. Recipes without analyzed
/// instructions fall back to the free-form `instructions` field.
pub fn assemble_recipe(information: RecipeInformation, blocks: &[InstructionBlock]) -> Recipe {
    let mut instructions: Vec<String> = blocks
        .first()
        .map(|block| {
            block
                .steps
                .iter()
                .map(|s| decode_html_entities(s.step.trim()).into_owned())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if instructions.is_empty() {
        if let Some(html) = information.instructions.as_deref() {
            debug!("Recipe {} has no analyzed instructions", information.id);
            instructions = html_to_steps(html);
        }
    }

    Recipe {
        id: information.id,
        title: information.title,
        image: information.image.filter(|url| !url.is_empty()),
        ingredients: information
            .extended_ingredients
            .into_iter()
            .map(|i| {
                if i.original.trim().is_empty() {
                    i.name
                } else {
                    decode_html_entities(i.original.trim()).into_owned()
                }
            })
            .filter(|i| !i.is_empty())
            .collect(),
        instructions,
        ready_in_minutes: information.ready_in_minutes,
        servings: information.servings,
        source_url: information.source_url,
    }
}

/// Split HTML or plain text instructions into steps
fn html_to_steps(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);

    match Selector::parse("li") {
        Ok(selector) => {
            let items: Vec<String> = fragment
                .select(&selector)
                .map(|li| collapse_whitespace(&li.text().collect::<String>()))
                .filter(|s| !s.is_empty())
                .collect();
            if !items.is_empty() {
                return items;
            }
        }
        Err(e) => warn!("Invalid list selector: {:?}", e),
    }

    // No list markup: one step per non-empty line or paragraph
    let text = fragment
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join("\n");
    text.lines()
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render search results as numbered cards
pub fn render_list<F>(recipes: &[RecipeSummary], is_favorite: F) -> String
where
    F: Fn(u64) -> bool,
{
    let mut output = String::new();
    for (idx, recipe) in recipes.iter().enumerate() {
        let star = if is_favorite(recipe.id) { "★" } else { "☆" };
        output.push_str(&format!("{}. {} {}\n", idx + 1, star, recipe.title));

        if !recipe.used_ingredients.is_empty() {
            output.push_str(&format!(
                "   ✓ Available: {}\n",
                recipe.used_ingredients.join(", ")
            ));
        }
        if !recipe.missed_ingredients.is_empty() {
            output.push_str(&format!(
                "   ✗ Missing: {}\n",
                recipe.missed_ingredients.join(", ")
            ));
        }
        output.push_str(&format!("   {}\n", recipe.spoonacular_url()));
    }
    output
}

/// Render the full recipe
pub fn render_detail(recipe: &Recipe) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", recipe.title));
    output.push_str(&format!("{}\n\n", "=".repeat(recipe.title.chars().count())));

    let time = recipe
        .ready_in_minutes
        .map(|m| m.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let servings = recipe
        .servings
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    output.push_str(&format!("🕒 {} minutes   👥 Serves {}\n\n", time, servings));

    output.push_str("Ingredients\n");
    if recipe.ingredients.is_empty() {
        output.push_str("  (none listed)\n");
    }
    for ingredient in &recipe.ingredients {
        output.push_str(&format!("  • {}\n", ingredient));
    }

    output.push_str("\nInstructions\n");
    if recipe.instructions.is_empty() {
        output.push_str("  (no instructions available)\n");
    }
    for (idx, step) in recipe.instructions.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", idx + 1, step));
    }

    if let Some(source) = &recipe.source_url {
        output.push_str(&format!("\nSource: {}\n", source));
    }
    output
}

/// Render the saved favorites
pub fn render_favorites(favorites: &[RecipeSummary]) -> String {
    if favorites.is_empty() {
        return "No favorites saved yet.\n".to_string();
    }
    let mut output = String::from("Favorites\n");
    for (idx, recipe) in favorites.iter().enumerate() {
        output.push_str(&format!(
            "{}. ★ {} ({})\n",
            idx + 1,
            recipe.title,
            recipe.spoonacular_url()
        ));
    }
    output
}

/// Readable message for any error reaching the user
pub fn render_error(error: &FinderError) -> String {
    match error {
        FinderError::NotFound => "No recipes found.".to_string(),
        FinderError::EmptyQuery => "Please enter some ingredients!".to_string(),
        e if e.is_network() => format!("Failed to fetch recipes: {}", e),
        e => format!("Error: {}", e),
    }
}
