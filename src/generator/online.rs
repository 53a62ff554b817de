use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::RecipeError;
use crate::recipe::{Difficulty, IngredientWithTiming, Nutrition, Recipe};

pub const DEFAULT_ONLINE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OnlineRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

struct CannedRecipe {
    dish: &'static str,
    title: &'static str,
    ingredients: &'static [&'static str],
    instructions: &'static [&'static str],
    cook_time: &'static str,
    servings: u32,
    source: &'static str,
    url: &'static str,
}

const CANNED: [CannedRecipe; 3] = [
    CannedRecipe {
        dish: "chicken tikka masala",
        title: "Authentic Chicken Tikka Masala",
        ingredients: &[
            "chicken breast",
            "yogurt",
            "garam masala",
            "tomatoes",
            "cream",
            "onions",
            "garlic",
            "ginger",
            "cumin",
            "paprika",
        ],
        instructions: &[
            "Marinate chicken in yogurt and spices for 2 hours",
            "Grill chicken until charred and cooked through",
            "Make sauce with tomatoes, cream, and spices",
            "Combine chicken with sauce and simmer",
            "Serve with basmati rice and naan bread",
        ],
        cook_time: "45 minutes",
        servings: 4,
        source: "IndianCooking.com",
        url: "https://example.com/chicken-tikka-masala",
    },
    CannedRecipe {
        dish: "chicken tikka masala",
        title: "Easy Chicken Tikka Masala",
        ingredients: &[
            "chicken thighs",
            "coconut milk",
            "curry powder",
            "canned tomatoes",
            "onion",
            "garlic",
            "ginger",
        ],
        instructions: &[
            "Season and cook chicken thighs",
            "Sauté onion, garlic, and ginger",
            "Add curry powder and cook 1 minute",
            "Add tomatoes and coconut milk",
            "Add chicken back and simmer 15 minutes",
            "Serve over rice",
        ],
        cook_time: "30 minutes",
        servings: 4,
        source: "QuickMeals.com",
        url: "https://example.com/easy-tikka-masala",
    },
    CannedRecipe {
        dish: "beef wellington",
        title: "Classic Beef Wellington",
        ingredients: &[
            "beef tenderloin",
            "puff pastry",
            "mushrooms",
            "prosciutto",
            "pâté",
            "egg wash",
            "shallots",
            "herbs",
        ],
        instructions: &[
            "Sear beef tenderloin on all sides",
            "Make mushroom duxelles",
            "Wrap beef in prosciutto and pâté",
            "Encase in puff pastry",
            "Brush with egg wash",
            "Bake until pastry is golden and beef is medium-rare",
            "Rest before slicing",
        ],
        cook_time: "1 hour 30 minutes",
        servings: 6,
        source: "FineDining.com",
        url: "https://example.com/beef-wellington",
    },
];

const GENERIC_INGREDIENTS: [&str; 5] = [
    "main protein or base ingredient",
    "vegetables",
    "seasonings and spices",
    "cooking liquid or sauce",
    "herbs for garnish",
];

const GENERIC_INSTRUCTIONS: [&str; 6] = [
    "Prepare all ingredients according to recipe requirements",
    "Cook main ingredient using appropriate method",
    "Add vegetables and seasonings",
    "Combine with sauce or liquid",
    "Cook until tender and flavors are well combined",
    "Garnish and serve hot",
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl From<&CannedRecipe> for OnlineRecipe {
    fn from(canned: &CannedRecipe) -> Self {
        Self {
            title: canned.title.to_string(),
            ingredients: owned(canned.ingredients),
            instructions: owned(canned.instructions),
            cook_time: Some(canned.cook_time.to_string()),
            servings: Some(canned.servings),
            source: Some(canned.source.to_string()),
            url: Some(canned.url.to_string()),
        }
    }
}

pub async fn search_online(dish: &str, delay: Duration) -> Vec<OnlineRecipe> {
    tokio::time::sleep(delay).await;
    let results = lookup(dish);
    info!(dish, results = results.len(), "online recipe search finished");
    results
}

pub fn lookup(dish: &str) -> Vec<OnlineRecipe> {
    let query = dish.trim().to_lowercase();
    let canned: Vec<OnlineRecipe> = CANNED
        .iter()
        .filter(|entry| entry.dish == query)
        .map(OnlineRecipe::from)
        .collect();
    if !canned.is_empty() {
        return canned;
    }
    vec![OnlineRecipe {
        title: format!("{dish} Recipe"),
        ingredients: owned(&GENERIC_INGREDIENTS),
        instructions: owned(&GENERIC_INSTRUCTIONS),
        cook_time: Some("30 minutes".to_string()),
        servings: Some(4),
        source: Some("RecipeDatabase.com".to_string()),
        url: Some(format!("https://example.com/{}", slug(dish))),
    }]
}

fn slug(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

impl OnlineRecipe {
    pub fn into_recipe(self, dish: &str) -> Result<Recipe, RecipeError> {
        let timing = self
            .ingredients
            .iter()
            .map(|name| IngredientWithTiming {
                name: name.clone(),
                cooking_time: "5-10 minutes".to_string(),
                cooking_method: "prepare as needed".to_string(),
            })
            .collect();
        let mut tags = vec!["online recipe".to_string(), "imported".to_string()];
        if let Some(first_word) = dish.split_whitespace().next() {
            tags.push(first_word.to_string());
        }
        let recipe = Recipe::new(self.title, self.ingredients)?
            .with_cook_time(self.cook_time.unwrap_or_else(|| "30 minutes".to_string()))
            .with_difficulty(Difficulty::Medium)
            .with_servings(self.servings.unwrap_or(4))?
            .with_instructions(self.instructions)
            .with_timing(timing)
            .with_nutrition(Nutrition {
                calories: 400,
                protein: "25g".to_string(),
                carbs: "30g".to_string(),
                fat: "15g".to_string(),
            })
            .with_tags(tags)
            .with_source(self.source, self.url);
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_dishes_return_canned_results() {
        let tikka = lookup("Chicken Tikka Masala");
        assert_eq!(tikka.len(), 2);
        assert_eq!(tikka[1].title, "Easy Chicken Tikka Masala");

        let wellington = lookup("beef wellington");
        assert_eq!(wellington.len(), 1);
        assert_eq!(wellington[0].servings, Some(6));
    }

    #[test]
    fn unknown_dish_gets_generic_result() {
        let results = lookup("Shepherd's  Pie");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Shepherd's  Pie Recipe");
        assert_eq!(
            results[0].url.as_deref(),
            Some("https://example.com/shepherd's-pie")
        );
        assert_eq!(results[0].ingredients.len(), 5);
    }

    #[test]
    fn conversion_marks_recipe_as_imported() {
        let hit = lookup("beef wellington").remove(0);
        let recipe = hit.into_recipe("beef wellington").expect("recipe");
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.cook_time, "1 hour 30 minutes");
        assert_eq!(recipe.nutrition.calories, 400);
        assert_eq!(recipe.tags, vec!["online recipe", "imported", "beef"]);
        assert_eq!(recipe.source.as_deref(), Some("FineDining.com"));
        assert!(recipe
            .ingredients_with_timing
            .iter()
            .all(|t| t.cooking_method == "prepare as needed"));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let hit = OnlineRecipe {
            title: "Plain".to_string(),
            ingredients: vec!["flour".to_string()],
            instructions: Vec::new(),
            cook_time: None,
            servings: None,
            source: None,
            url: None,
        };
        let recipe = hit.into_recipe("plain bread").expect("recipe");
        assert_eq!(recipe.cook_time, "30 minutes");
        assert_eq!(recipe.servings, 4);
    }

    #[tokio::test]
    async fn search_waits_for_delay() {
        let results = search_online("ramen", Duration::from_millis(5)).await;
        assert_eq!(results[0].title, "ramen Recipe");
    }
}
