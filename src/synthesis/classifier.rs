use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub const PROTEIN_KEYWORDS: [&str; 7] = ["chicken", "beef", "pork", "fish", "salmon", "turkey", "egg"];
pub const CARBOHYDRATE_KEYWORDS: [&str; 5] = ["rice", "pasta", "bread", "potato", "noodle"];
pub const VEGETABLE_KEYWORDS: [&str; 7] = [
    "tomato", "onion", "pepper", "carrot", "broccoli", "spinach", "mushroom",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Protein,
    Carbohydrate,
    Vegetable,
    Other,
}

impl Display for IngredientCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Protein => "protein",
            Self::Carbohydrate => "carbohydrate",
            Self::Vegetable => "vegetable",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

/// Keyword tables in the order they are consulted. Protein wins over
/// carbohydrate, which wins over vegetable; difficulty and tags depend on
/// this order.
const CATEGORY_PRIORITY: [(IngredientCategory, &[&str]); 3] = [
    (IngredientCategory::Protein, &PROTEIN_KEYWORDS),
    (IngredientCategory::Carbohydrate, &CARBOHYDRATE_KEYWORDS),
    (IngredientCategory::Vegetable, &VEGETABLE_KEYWORDS),
];

pub fn classify(ingredient: &str) -> IngredientCategory {
    let lowered = ingredient.to_lowercase();
    CATEGORY_PRIORITY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(IngredientCategory::Other)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CompositionFlags {
    pub has_protein: bool,
    pub has_carbs: bool,
    pub has_vegetables: bool,
}

impl CompositionFlags {
    pub fn from_ingredients<S: AsRef<str>>(ingredients: &[S]) -> Self {
        let mut flags = Self::default();
        for ingredient in ingredients {
            match classify(ingredient.as_ref()) {
                IngredientCategory::Protein => flags.has_protein = true,
                IngredientCategory::Carbohydrate => flags.has_carbs = true,
                IngredientCategory::Vegetable => flags.has_vegetables = true,
                IngredientCategory::Other => {}
            }
        }
        flags
    }

    pub fn is_balanced(&self) -> bool {
        self.has_protein && self.has_carbs && self.has_vegetables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protein_is_checked_before_carbohydrate() {
        assert_eq!(classify("chicken rice"), IngredientCategory::Protein);
        assert_eq!(classify("chicken noodle"), IngredientCategory::Protein);
        assert_eq!(classify("rice with onion"), IngredientCategory::Carbohydrate);
    }

    #[test]
    fn classification_is_case_insensitive_substring() {
        assert_eq!(classify("Smoked SALMON"), IngredientCategory::Protein);
        assert_eq!(classify("Baby Spinach"), IngredientCategory::Vegetable);
        assert_eq!(classify("sourdough bread"), IngredientCategory::Carbohydrate);
        // "eggplant" contains "egg"
        assert_eq!(classify("eggplant"), IngredientCategory::Protein);
    }

    #[test]
    fn unknown_ingredients_are_other() {
        assert_eq!(classify("olive oil"), IngredientCategory::Other);
        assert_eq!(classify(""), IngredientCategory::Other);
    }

    #[test]
    fn flags_follow_single_category_per_ingredient() {
        let flags = CompositionFlags::from_ingredients(&["chicken rice", "basil"]);
        assert!(flags.has_protein);
        assert!(!flags.has_carbs);
        assert!(!flags.has_vegetables);

        let flags = CompositionFlags::from_ingredients(&["chicken", "rice", "broccoli"]);
        assert!(flags.is_balanced());
    }
}
