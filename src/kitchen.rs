use std::fmt::{Display, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::KitchenError;
use crate::generator::RecipeGenerator;
use crate::recipe::{
    improve_recipe, parse_ingredient_list, scale_servings, Recipe, ScaledServings, SearchMode,
};
use crate::storage::{
    KeyValueStore, KitchenState, KitchenStats, FEEDBACK_DOWN_KEY, FEEDBACK_UP_KEY,
    TOTAL_GENERATED_KEY,
};
use crate::synthesis::resolve_dish;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Display for Vote {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

pub struct Kitchen<S> {
    state: KitchenState<S>,
    generator: Arc<dyn RecipeGenerator>,
}

impl<S: KeyValueStore> Kitchen<S> {
    pub fn new(state: KitchenState<S>, generator: Arc<dyn RecipeGenerator>) -> Self {
        Self { state, generator }
    }

    pub fn state(&self) -> &KitchenState<S> {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut KitchenState<S> {
        &mut self.state
    }

    pub async fn generate(&mut self, mode: SearchMode, input: &str) -> Result<Recipe, KitchenError> {
        if input.trim().is_empty() {
            return Err(KitchenError::MissingInput(mode));
        }
        let ingredients = match mode {
            SearchMode::Ingredients => {
                let parsed = parse_ingredient_list(input);
                if parsed.is_empty() {
                    return Err(KitchenError::MissingInput(mode));
                }
                parsed
            }
            SearchMode::Dish => resolve_dish(input),
        };
        self.state.record_history(mode, input)?;

        let recipe = self.generator.generate(&ingredients).await?;
        let total = self.state.increment(TOTAL_GENERATED_KEY)?;
        info!(
            %mode,
            generator = self.generator.name(),
            title = %recipe.title,
            total,
            "recipe generated"
        );
        Ok(recipe)
    }

    pub fn save_favorite(&mut self, recipe: Recipe) -> Result<(), KitchenError> {
        recipe.validate()?;
        self.state.add_favorite(recipe)?;
        Ok(())
    }

    pub fn favorite(&self, id: &str) -> Result<Recipe, KitchenError> {
        self.state
            .favorite(id)?
            .ok_or_else(|| KitchenError::FavoriteNotFound(id.to_string()))
    }

    pub fn remove_favorite(&mut self, id: &str) -> Result<Recipe, KitchenError> {
        self.state
            .remove_favorite(id)?
            .ok_or_else(|| KitchenError::FavoriteNotFound(id.to_string()))
    }

    pub fn improve_favorite(
        &mut self,
        id: &str,
        feedback: &str,
        save: bool,
    ) -> Result<Recipe, KitchenError> {
        let original = self.favorite(id)?;
        let improved = improve_recipe(&original, feedback)?;
        if save {
            self.save_favorite(improved.clone())?;
        }
        Ok(improved)
    }

    pub fn scale_favorite(
        &self,
        id: &str,
        servings: u32,
    ) -> Result<(Recipe, ScaledServings), KitchenError> {
        let recipe = self.favorite(id)?;
        let scaled = scale_servings(recipe.servings, servings)?;
        Ok((recipe, scaled))
    }

    pub fn history(&self, mode: SearchMode) -> Result<Vec<String>, KitchenError> {
        Ok(self.state.history(mode)?)
    }

    pub fn remove_history(&mut self, mode: SearchMode, index: usize) -> Result<String, KitchenError> {
        let len = self.state.history(mode)?.len();
        self.state
            .remove_history(mode, index)?
            .ok_or(KitchenError::HistoryIndex { index, len })
    }

    pub fn clear_history(&mut self, mode: SearchMode) -> Result<(), KitchenError> {
        self.state.clear_history(mode)?;
        Ok(())
    }

    pub fn feedback(&mut self, vote: Vote) -> Result<u64, KitchenError> {
        let key = match vote {
            Vote::Up => FEEDBACK_UP_KEY,
            Vote::Down => FEEDBACK_DOWN_KEY,
        };
        Ok(self.state.increment(key)?)
    }

    pub fn stats(&self) -> Result<KitchenStats, KitchenError> {
        Ok(self.state.stats()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeError;
    use crate::generator::RuleBasedGenerator;
    use crate::storage::MemoryStore;
    use crate::synthesis::GENERIC_DISH_INGREDIENTS;

    fn kitchen() -> Kitchen<MemoryStore> {
        Kitchen::new(
            KitchenState::new(MemoryStore::new()),
            Arc::new(RuleBasedGenerator),
        )
    }

    #[tokio::test]
    async fn ingredient_mode_records_history_and_counts() {
        let mut kitchen = kitchen();
        let recipe = kitchen
            .generate(SearchMode::Ingredients, "chicken, rice , broccoli")
            .await
            .expect("recipe");
        assert_eq!(recipe.ingredients, vec!["chicken", "rice", "broccoli"]);
        assert_eq!(
            kitchen.history(SearchMode::Ingredients).unwrap(),
            vec!["chicken, rice , broccoli"]
        );
        assert_eq!(kitchen.stats().unwrap().recipes_generated, 1);
    }

    #[tokio::test]
    async fn dish_mode_uses_resolver() {
        let mut kitchen = kitchen();
        let recipe = kitchen
            .generate(SearchMode::Dish, "Unknown Stew")
            .await
            .expect("recipe");
        assert_eq!(recipe.ingredients, GENERIC_DISH_INGREDIENTS.to_vec());
        assert_eq!(
            kitchen.history(SearchMode::Dish).unwrap(),
            vec!["Unknown Stew"]
        );
        assert!(kitchen.history(SearchMode::Ingredients).unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_side_effects() {
        let mut kitchen = kitchen();
        let err = kitchen
            .generate(SearchMode::Ingredients, " , ,")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            KitchenError::MissingInput(SearchMode::Ingredients)
        ));
        let err = kitchen.generate(SearchMode::Dish, "   ").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing dish name: please enter dish name to generate a recipe"
        );
        assert_eq!(kitchen.stats().unwrap().recipes_generated, 0);
        assert!(kitchen.history(SearchMode::Ingredients).unwrap().is_empty());
    }

    #[tokio::test]
    async fn improve_and_scale_favorites() {
        let mut kitchen = kitchen();
        let recipe = kitchen
            .generate(SearchMode::Ingredients, "beef, potato")
            .await
            .expect("recipe");
        let id = recipe.id.clone();
        kitchen.save_favorite(recipe).unwrap();

        let improved = kitchen
            .improve_favorite(&id, "Add more spices", false)
            .expect("improved");
        assert!(improved.title.ends_with(" (Improved)"));
        assert_eq!(kitchen.state().favorites().unwrap().len(), 1);

        let (_, scaled) = kitchen.scale_favorite(&id, 4).expect("scaled");
        assert_eq!(scaled.original_servings, 2);
        assert_eq!(scaled.label.as_deref(), Some("2x larger"));

        assert!(matches!(
            kitchen.scale_favorite(&id, 13),
            Err(KitchenError::Recipe(RecipeError::ServingsOutOfRange { .. }))
        ));
        assert!(matches!(
            kitchen.improve_favorite(&id, "  ", true),
            Err(KitchenError::Recipe(RecipeError::EmptyFeedback))
        ));
    }

    #[test]
    fn invalid_recipes_are_not_saved() {
        let mut kitchen = kitchen();
        let mut blank = Recipe::new("Toast", vec!["bread".to_string()]).expect("recipe");
        blank.title = " ".to_string();
        let mut empty_plate = Recipe::new("Toast", vec!["bread".to_string()]).expect("recipe");
        empty_plate.servings = 0;

        assert!(matches!(
            kitchen.save_favorite(blank),
            Err(KitchenError::Recipe(RecipeError::EmptyTitle))
        ));
        assert!(matches!(
            kitchen.save_favorite(empty_plate),
            Err(KitchenError::Recipe(RecipeError::InvalidServings))
        ));
        assert!(kitchen.state().favorites().unwrap().is_empty());
    }

    #[test]
    fn missing_favorite_and_history_index() {
        let mut kitchen = kitchen();
        assert!(matches!(
            kitchen.remove_favorite("nope"),
            Err(KitchenError::FavoriteNotFound(_))
        ));
        assert!(matches!(
            kitchen.remove_history(SearchMode::Dish, 0),
            Err(KitchenError::HistoryIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn feedback_feeds_stats() {
        let mut kitchen = kitchen();
        kitchen.feedback(Vote::Up).unwrap();
        kitchen.feedback(Vote::Up).unwrap();
        kitchen.feedback(Vote::Down).unwrap();
        let stats = kitchen.stats().unwrap();
        assert_eq!(stats.thumbs_up, 2);
        assert_eq!(stats.success_rate, Some(67));
    }
}
