use crate::error::RecipeError;
use crate::recipe::Recipe;

pub const IMPROVEMENT_SUGGESTIONS: [&str; 8] = [
    "Make it vegetarian",
    "Add more spices",
    "Make it healthier",
    "Double the recipe",
    "Make it vegan",
    "Reduce cooking time",
    "Add more protein",
    "Make it gluten-free",
];

pub fn improve_recipe(recipe: &Recipe, feedback: &str) -> Result<Recipe, RecipeError> {
    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Err(RecipeError::EmptyFeedback);
    }
    let mut improved = recipe.clone().restamped();
    improved.title = format!("{} (Improved)", recipe.title);
    improved
        .instructions
        .push(format!("Modified based on feedback: {feedback}"));
    Ok(improved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Recipe {
        Recipe::new("Simple eggs Dish", vec!["eggs".to_string()])
            .expect("valid recipe")
            .with_instructions(vec!["Whisk".to_string()])
    }

    #[test]
    fn appends_feedback_and_renames() {
        let original = base();
        let improved = improve_recipe(&original, "  Add more spices ").expect("improved");
        assert_eq!(improved.title, "Simple eggs Dish (Improved)");
        assert_eq!(
            improved.instructions.last().map(String::as_str),
            Some("Modified based on feedback: Add more spices")
        );
        assert_eq!(improved.ingredients, original.ingredients);
        assert_eq!(original.instructions.len(), 1);
    }

    #[test]
    fn blank_feedback_is_rejected() {
        assert_eq!(
            improve_recipe(&base(), "   ").unwrap_err(),
            RecipeError::EmptyFeedback
        );
    }
}
