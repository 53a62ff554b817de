pub mod improve;
pub mod scaling;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::RecipeError;

pub use improve::{improve_recipe, IMPROVEMENT_SUGGESTIONS};
pub use scaling::{scale_servings, ScaledServings, MAX_SERVINGS, MIN_SERVINGS};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown difficulty: {0}")]
pub struct DifficultyParseError(pub String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(DifficultyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Ingredients,
    Dish,
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingredients => write!(f, "ingredients"),
            Self::Dish => write!(f, "dish name"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientWithTiming {
    pub name: String,
    pub cooking_time: String,
    pub cooking_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Nutrition {
    pub calories: u32,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub cook_time: String,
    pub difficulty: Difficulty,
    pub servings: u32,
    pub instructions: Vec<String>,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub ingredients_with_timing: Vec<IngredientWithTiming>,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Recipe {
    pub fn new(title: impl Into<String>, ingredients: Vec<String>) -> Result<Self, RecipeError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(RecipeError::EmptyTitle);
        }
        if ingredients.is_empty() {
            return Err(RecipeError::NoIngredients);
        }
        let created_at = Utc::now();
        Ok(Self {
            id: timestamp_id(created_at),
            title,
            cook_time: "30 minutes".to_string(),
            difficulty: Difficulty::Easy,
            servings: 4,
            instructions: Vec::new(),
            ingredients,
            ingredients_with_timing: Vec::new(),
            nutrition: Nutrition::default(),
            tags: Vec::new(),
            created_at,
            description: None,
            source: None,
            source_url: None,
        })
    }

    pub fn with_cook_time(mut self, cook_time: impl Into<String>) -> Self {
        self.cook_time = cook_time.into();
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_servings(mut self, servings: u32) -> Result<Self, RecipeError> {
        if servings == 0 {
            return Err(RecipeError::InvalidServings);
        }
        self.servings = servings;
        Ok(self)
    }

    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    pub fn with_timing(mut self, timing: Vec<IngredientWithTiming>) -> Self {
        self.ingredients_with_timing = timing;
        self
    }

    pub fn with_nutrition(mut self, nutrition: Nutrition) -> Self {
        self.nutrition = nutrition;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_source(mut self, source: Option<String>, source_url: Option<String>) -> Self {
        self.source = source;
        self.source_url = source_url;
        self
    }

    /// Checks the invariants `new` and `with_servings` enforce.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.title.trim().is_empty() {
            return Err(RecipeError::EmptyTitle);
        }
        if self.ingredients.is_empty() {
            return Err(RecipeError::NoIngredients);
        }
        if self.servings == 0 {
            return Err(RecipeError::InvalidServings);
        }
        Ok(())
    }

    pub fn restamped(mut self) -> Self {
        self.created_at = Utc::now();
        self.id = timestamp_id(self.created_at);
        self
    }
}

pub fn timestamp_id(at: DateTime<Utc>) -> String {
    at.timestamp_millis().to_string()
}

pub fn parse_ingredient_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_ingredients_and_title() {
        assert_eq!(
            Recipe::new("Soup", Vec::new()).unwrap_err(),
            RecipeError::NoIngredients
        );
        assert_eq!(
            Recipe::new("  ", vec!["leek".to_string()]).unwrap_err(),
            RecipeError::EmptyTitle
        );
    }

    #[test]
    fn id_matches_creation_millis() {
        let recipe = Recipe::new("Toast", vec!["bread".to_string()]).expect("valid recipe");
        assert_eq!(recipe.id, recipe.created_at.timestamp_millis().to_string());
    }

    #[test]
    fn zero_servings_is_rejected() {
        let recipe = Recipe::new("Toast", vec!["bread".to_string()]).expect("valid recipe");
        assert_eq!(
            recipe.with_servings(0).unwrap_err(),
            RecipeError::InvalidServings
        );
    }

    #[test]
    fn parses_ingredient_text() {
        let parsed = parse_ingredient_list(" chicken , rice,,  broccoli ,");
        assert_eq!(parsed, vec!["chicken", "rice", "broccoli"]);
        assert!(parse_ingredient_list(" , ,").is_empty());
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("MEDIUM".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn created_at_survives_json_round_trip_as_timestamp() {
        let recipe = Recipe::new("Toast", vec!["bread".to_string()]).expect("valid recipe");
        let json = serde_json::to_string(&recipe).expect("serialize");
        let back: Recipe = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, recipe);
        assert_eq!(back.created_at, recipe.created_at);
    }
}
