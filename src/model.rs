use serde::{Deserialize, Serialize};

/// A recipe as listed in search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Searched ingredients the recipe uses
    #[serde(default)]
    pub used_ingredients: Vec<String>,
    /// Ingredients the recipe needs that were not searched for
    #[serde(default)]
    pub missed_ingredients: Vec<String>,
}

impl RecipeSummary {
    /// Public page of the recipe on spoonacular.com
    pub fn spoonacular_url(&self) -> String {
        recipe_page_url(self.id, &self.title)
    }
}

/// A fully loaded recipe, as shown in the detail view
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recipe {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
}

impl Recipe {
    pub fn spoonacular_url(&self) -> String {
        recipe_page_url(self.id, &self.title)
    }

    /// Instructions as a single block of text, one step per line
    pub fn instructions_text(&self) -> String {
        self.instructions.join("\n")
    }
}

fn recipe_page_url(id: u64, title: &str) -> String {
    format!(
        "https://spoonacular.com/recipes/{}-{}",
        title.replace(' ', "-").to_lowercase(),
        id
    )
}

fn default_title() -> String {
    "No Title".to_string()
}

#[derive(Debug, Deserialize)]
struct NamedIngredient {
    #[serde(default)]
    name: String,
}

/// One element of the `findByIngredients` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    id: u64,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    used_ingredients: Vec<NamedIngredient>,
    #[serde(default)]
    missed_ingredients: Vec<NamedIngredient>,
}

impl From<SearchHit> for RecipeSummary {
    fn from(hit: SearchHit) -> Self {
        RecipeSummary {
            id: hit.id,
            title: hit.title,
            image: hit.image.filter(|url| !url.is_empty()),
            used_ingredients: hit.used_ingredients.into_iter().map(|i| i.name).collect(),
            missed_ingredients: hit
                .missed_ingredients
                .into_iter()
                .map(|i| i.name)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedIngredient {
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub name: String,
}

/// Response of `/recipes/{id}/information`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInformation {
    #[serde(default)]
    pub id: u64,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub source_url: Option<String>,
    /// HTML or plain text instructions; often null
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstructionStep {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub step: String,
}

/// One element of `/recipes/{id}/analyzedInstructions`
#[derive(Debug, Clone, Deserialize)]
pub struct InstructionBlock {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hit_conversion() {
        let json = r#"{
            "id": 73420,
            "title": "Apple Or Peach Strudel",
            "image": "https://img.spoonacular.com/recipes/73420-312x231.jpg",
            "usedIngredientCount": 1,
            "missedIngredientCount": 2,
            "usedIngredients": [{"id": 9003, "name": "apples", "amount": 6.0}],
            "missedIngredients": [
                {"id": 18371, "name": "baking powder"},
                {"id": 2010, "name": "cinnamon"}
            ]
        }"#;

        let hit: SearchHit = serde_json::from_str(json).unwrap();
        let summary = RecipeSummary::from(hit);
        assert_eq!(summary.id, 73420);
        assert_eq!(summary.used_ingredients, vec!["apples"]);
        assert_eq!(summary.missed_ingredients, vec!["baking powder", "cinnamon"]);
    }

    #[test]
    fn test_search_hit_defaults() {
        let hit: SearchHit = serde_json::from_str("{}").unwrap();
        let summary = RecipeSummary::from(hit);
        assert_eq!(summary.id, 0);
        assert_eq!(summary.title, "No Title");
        assert!(summary.image.is_none());
        assert!(summary.used_ingredients.is_empty());
    }

    #[test]
    fn test_spoonacular_url() {
        let summary = RecipeSummary {
            id: 42,
            title: "Chicken Fried Rice".to_string(),
            image: None,
            used_ingredients: vec![],
            missed_ingredients: vec![],
        };
        assert_eq!(
            summary.spoonacular_url(),
            "https://spoonacular.com/recipes/chicken-fried-rice-42"
        );
    }

    #[test]
    fn test_information_with_null_instructions() {
        let json = r#"{
            "id": 1,
            "title": "Toast",
            "readyInMinutes": 5,
            "servings": 1,
            "instructions": null,
            "extendedIngredients": [{"original": "2 slices bread", "name": "bread"}]
        }"#;
        let info: RecipeInformation = serde_json::from_str(json).unwrap();
        assert_eq!(info.ready_in_minutes, Some(5));
        assert!(info.instructions.is_none());
        assert_eq!(info.extended_ingredients[0].original, "2 slices bread");
    }
}
