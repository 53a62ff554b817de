use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GenerationError;
use crate::generator::RecipeGenerator;
use crate::recipe::{Difficulty, Nutrition, Recipe};
use crate::synthesis::resolve_timing;

const CONNECT_TIMEOUT_SECS: u64 = 5;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(concat!("kitchen-chef/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    ingredients: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRecipeDraft {
    pub title: String,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RemoteRecipeDraft {
    /// The backend never gets to change the ingredient list.
    pub fn into_recipe(self, ingredients: &[String]) -> Result<Recipe, GenerationError> {
        let mut recipe = Recipe::new(self.title, ingredients.to_vec())?
            .with_timing(ingredients.iter().map(|i| resolve_timing(i)).collect())
            .with_instructions(self.instructions)
            .with_tags(self.tags);
        if let Some(cook_time) = self.cook_time {
            recipe = recipe.with_cook_time(cook_time);
        }
        if let Some(difficulty) = self.difficulty {
            recipe = recipe.with_difficulty(difficulty);
        }
        if let Some(servings) = self.servings {
            recipe = recipe.with_servings(servings)?;
        }
        if let Some(nutrition) = self.nutrition {
            recipe = recipe.with_nutrition(nutrition);
        }
        recipe.description = self.description;
        Ok(recipe)
    }
}

#[derive(Debug, Clone)]
pub struct RemoteGenerator {
    endpoint: Option<String>,
    timeout: Duration,
}

impl RemoteGenerator {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Self {
        Self { endpoint, timeout }
    }
}

#[async_trait]
impl RecipeGenerator for RemoteGenerator {
    fn name(&self) -> &str {
        "remote"
    }

    async fn generate(&self, ingredients: &[String]) -> Result<Recipe, GenerationError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            return Err(GenerationError::Unavailable(
                "remote (no endpoint configured)".to_string(),
            ));
        };
        info!(endpoint, count = ingredients.len(), "requesting remote recipe");
        let draft: RemoteRecipeDraft = HTTP_CLIENT
            .post(endpoint)
            .timeout(self.timeout)
            .json(&GenerateRequest { ingredients })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(title = %draft.title, "remote draft received");
        draft.into_recipe(ingredients)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_endpoint_is_unavailable() {
        let generator = RemoteGenerator::new(None, Duration::from_secs(1));
        let result = generator.generate(&["rice".to_string()]).await;
        assert!(matches!(result, Err(GenerationError::Unavailable(_))));
    }

    #[test]
    fn draft_cannot_replace_ingredients() {
        let draft: RemoteRecipeDraft = serde_json::from_str(
            r#"{
                "title": "Chef's Rice",
                "difficulty": "Hard",
                "servings": 6,
                "instructions": ["Cook the rice"]
            }"#,
        )
        .expect("draft parses");
        let input = vec!["rice".to_string(), "peas".to_string()];
        let recipe = draft.into_recipe(&input).expect("recipe");
        assert_eq!(recipe.ingredients, input);
        assert_eq!(recipe.difficulty, Difficulty::Hard);
        assert_eq!(recipe.servings, 6);
        assert_eq!(recipe.cook_time, "30 minutes");
        assert_eq!(recipe.ingredients_with_timing[0].cooking_time, "18-20 minutes");
    }

    #[test]
    fn draft_with_zero_servings_is_rejected() {
        let draft: RemoteRecipeDraft =
            serde_json::from_str(r#"{"title": "Nothing", "servings": 0}"#).expect("parses");
        assert!(draft.into_recipe(&["salt".to_string()]).is_err());
    }
}
