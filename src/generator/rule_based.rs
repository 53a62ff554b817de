use async_trait::async_trait;

use crate::error::GenerationError;
use crate::generator::RecipeGenerator;
use crate::recipe::Recipe;
use crate::synthesis::synthesize;

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedGenerator;

#[async_trait]
impl RecipeGenerator for RuleBasedGenerator {
    fn name(&self) -> &str {
        "rule-based"
    }

    async fn generate(&self, ingredients: &[String]) -> Result<Recipe, GenerationError> {
        Ok(synthesize(ingredients)?)
    }
}
