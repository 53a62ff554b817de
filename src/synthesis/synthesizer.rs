use tracing::debug;

use crate::error::RecipeError;
use crate::recipe::{Difficulty, Nutrition, Recipe};
use crate::synthesis::classifier::CompositionFlags;
use crate::synthesis::timing::resolve_timing;

pub const SYNTHESIZED_COOK_TIME: &str = "20-25 minutes";

const CARB_STEP_KEYWORDS: [&str; 3] = ["rice", "pasta", "potato"];
const MINIMAL_INGREDIENT_LIMIT: usize = 4;

/// Builds a complete recipe from an ingredient list. The returned
/// `ingredients` are exactly the input, in the same order; everything else
/// is derived from keyword classification.
pub fn synthesize(ingredients: &[String]) -> Result<Recipe, RecipeError> {
    if ingredients.is_empty() {
        return Err(RecipeError::NoIngredients);
    }
    let flags = CompositionFlags::from_ingredients(ingredients);
    debug!(?flags, count = ingredients.len(), "synthesizing recipe");

    let difficulty = if flags.is_balanced() {
        Difficulty::Medium
    } else {
        Difficulty::Easy
    };
    let timing = ingredients.iter().map(|i| resolve_timing(i)).collect();

    let recipe = Recipe::new(build_title(ingredients, &flags), ingredients.to_vec())?
        .with_cook_time(SYNTHESIZED_COOK_TIME)
        .with_difficulty(difficulty)
        .with_servings(estimate_servings(ingredients.len()))?
        .with_instructions(build_instructions(ingredients, &flags))
        .with_timing(timing)
        .with_nutrition(estimate_nutrition(ingredients.len(), &flags))
        .with_tags(build_tags(ingredients.len(), difficulty, &flags));
    Ok(recipe)
}

pub fn build_title(ingredients: &[String], flags: &CompositionFlags) -> String {
    if flags.has_protein && flags.has_carbs {
        let rest = ingredients
            .iter()
            .skip(1)
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" and ");
        format!("{} Bowl with {rest}", ingredients[0])
    } else {
        let leading = ingredients
            .iter()
            .take(2)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" and ");
        format!("Simple {leading} Dish")
    }
}

pub fn build_instructions(ingredients: &[String], flags: &CompositionFlags) -> Vec<String> {
    let carb_step = if flags.has_carbs {
        let staple = ingredients
            .iter()
            .find(|ingredient| {
                let lowered = ingredient.to_lowercase();
                CARB_STEP_KEYWORDS.iter().any(|k| lowered.contains(k))
            })
            .map(String::as_str)
            .unwrap_or("grains");
        format!("Cook {staple} according to timing above")
    } else {
        "Begin by preparing your main ingredients".to_string()
    };
    let protein_step = if flags.has_protein {
        "Cook protein ingredients as specified in timing - ensure fully cooked and safe to eat"
    } else {
        "Heat your main ingredients in a pan"
    };
    let vegetable_step = if flags.has_vegetables {
        "Add vegetables according to their cooking times, starting with harder vegetables first"
    } else {
        "Add remaining ingredients"
    };

    vec![
        "Gather and prepare all ingredients according to their specific timing requirements"
            .to_string(),
        "Start with the longest cooking items first (grains, starches, proteins)".to_string(),
        carb_step,
        protein_step.to_string(),
        vegetable_step.to_string(),
        "Combine all cooked ingredients in a serving dish, maintaining their textures".to_string(),
        "Season with salt and pepper to taste, adjust flavors as needed".to_string(),
        "Serve hot and enjoy your custom recipe with perfectly timed ingredients!".to_string(),
    ]
}

pub fn estimate_servings(ingredient_count: usize) -> u32 {
    let half = ingredient_count.div_ceil(2);
    half.clamp(2, 4) as u32
}

pub fn estimate_nutrition(ingredient_count: usize, flags: &CompositionFlags) -> Nutrition {
    let mut calories = 80 * ingredient_count as u32;
    if flags.has_protein {
        calories += 150;
    }
    if flags.has_carbs {
        calories += 100;
    }
    Nutrition {
        calories,
        protein: if flags.has_protein { "25-30g" } else { "8-12g" }.to_string(),
        carbs: if flags.has_carbs { "35-45g" } else { "15-25g" }.to_string(),
        fat: "10-15g".to_string(),
    }
}

pub fn build_tags(
    ingredient_count: usize,
    difficulty: Difficulty,
    flags: &CompositionFlags,
) -> Vec<String> {
    vec![
        difficulty.as_str().to_lowercase(),
        if flags.has_protein { "protein-rich" } else { "vegetarian" }.to_string(),
        if flags.has_vegetables { "nutritious" } else { "simple" }.to_string(),
        "homemade".to_string(),
        if ingredient_count <= MINIMAL_INGREDIENT_LIMIT {
            "minimal-ingredients"
        } else {
            "diverse"
        }
        .to_string(),
    ]
}
