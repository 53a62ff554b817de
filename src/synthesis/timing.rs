use crate::recipe::IngredientWithTiming;

struct TimingRule {
    keywords: &'static [&'static str],
    cooking_time: &'static str,
    cooking_method: &'static str,
}

// First matching rule wins.
const TIMING_RULES: [TimingRule; 8] = [
    TimingRule {
        keywords: &["chicken", "beef", "pork"],
        cooking_time: "12-15 minutes",
        cooking_method: "pan-fry until golden",
    },
    TimingRule {
        keywords: &["fish", "salmon"],
        cooking_time: "8-10 minutes",
        cooking_method: "pan-sear or bake",
    },
    TimingRule {
        keywords: &["egg"],
        cooking_time: "3-5 minutes",
        cooking_method: "scramble or fry",
    },
    TimingRule {
        keywords: &["rice"],
        cooking_time: "18-20 minutes",
        cooking_method: "simmer covered",
    },
    TimingRule {
        keywords: &["pasta", "noodle"],
        cooking_time: "8-12 minutes",
        cooking_method: "boil in salted water",
    },
    TimingRule {
        keywords: &["potato"],
        cooking_time: "15-20 minutes",
        cooking_method: "roast or boil",
    },
    TimingRule {
        keywords: &["onion"],
        cooking_time: "5-7 minutes",
        cooking_method: "sauté until translucent",
    },
    TimingRule {
        keywords: &["tomato"],
        cooking_time: "3-5 minutes",
        cooking_method: "sauté until softened",
    },
];

const DEFAULT_COOKING_TIME: &str = "5-8 minutes";
const DEFAULT_COOKING_METHOD: &str = "sauté or steam";

pub fn resolve_timing(ingredient: &str) -> IngredientWithTiming {
    let lowered = ingredient.to_lowercase();
    let (cooking_time, cooking_method) = TIMING_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|rule| (rule.cooking_time, rule.cooking_method))
        .unwrap_or((DEFAULT_COOKING_TIME, DEFAULT_COOKING_METHOD));
    IngredientWithTiming {
        name: ingredient.to_string(),
        cooking_time: cooking_time.to_string(),
        cooking_method: cooking_method.to_string(),
    }
}
