use tracing::debug;

pub const COMMON_DISHES: [(&str, &[&str]); 15] = [
    (
        "spaghetti carbonara",
        &["spaghetti", "eggs", "bacon", "parmesan cheese", "black pepper"],
    ),
    (
        "chicken fried rice",
        &["chicken", "rice", "eggs", "soy sauce", "vegetables"],
    ),
    (
        "margherita pizza",
        &["pizza dough", "tomato sauce", "mozzarella cheese", "basil"],
    ),
    (
        "beef stir fry",
        &["beef", "vegetables", "soy sauce", "garlic", "ginger"],
    ),
    (
        "chocolate chip cookies",
        &["flour", "butter", "sugar", "eggs", "chocolate chips"],
    ),
    (
        "chicken tacos",
        &["chicken", "tortillas", "lettuce", "tomatoes", "cheese"],
    ),
    (
        "pad thai",
        &["rice noodles", "shrimp", "eggs", "peanuts", "bean sprouts"],
    ),
    (
        "caesar salad",
        &["lettuce", "parmesan cheese", "croutons", "caesar dressing"],
    ),
    ("grilled cheese", &["bread", "cheese", "butter"]),
    (
        "pancakes",
        &["flour", "eggs", "milk", "sugar", "baking powder"],
    ),
    (
        "chicken parmesan",
        &["chicken", "breadcrumbs", "parmesan cheese", "tomato sauce"],
    ),
    (
        "butter chicken",
        &["chicken", "tomatoes", "cream", "butter", "spices"],
    ),
    ("fish and chips", &["fish", "potatoes", "flour", "oil"]),
    (
        "lasagna",
        &["lasagna noodles", "ground beef", "cheese", "tomato sauce"],
    ),
    (
        "ramen",
        &["ramen noodles", "broth", "eggs", "vegetables", "meat"],
    ),
];

pub const GENERIC_DISH_INGREDIENTS: [&str; 4] =
    ["main protein", "vegetables", "seasonings", "cooking oil"];

/// Maps a free-text dish name to an ingredient list: exact key, then the
/// first key that contains or is contained in the query, then a generic
/// placeholder list. No ranking among partial matches.
pub fn resolve_dish(dish_name: &str) -> Vec<String> {
    let query = dish_name.trim().to_lowercase();
    let ingredients = if query.is_empty() {
        None
    } else {
        COMMON_DISHES
            .iter()
            .find(|(key, _)| *key == query)
            .or_else(|| {
                COMMON_DISHES
                    .iter()
                    .find(|(key, _)| key.contains(query.as_str()) || query.contains(key))
            })
            .map(|(key, ingredients)| {
                debug!(query = %query, matched = %key, "resolved dish");
                *ingredients
            })
    };
    ingredients
        .unwrap_or_else(|| {
            debug!(query = %query, "no dish match, using generic ingredients");
            &GENERIC_DISH_INGREDIENTS[..]
        })
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(
            resolve_dish("Chicken Parmesan"),
            resolve_dish("chicken parmesan")
        );
        assert_eq!(
            resolve_dish("chicken parmesan"),
            vec!["chicken", "breadcrumbs", "parmesan cheese", "tomato sauce"]
        );
    }

    #[test]
    fn partial_matches_take_first_key_in_order() {
        // "chicken" is contained in chicken fried rice, chicken tacos, ...
        assert_eq!(resolve_dish("chicken")[3], "soy sauce");
        // query containing a key
        assert_eq!(
            resolve_dish("Grandma's lasagna"),
            vec!["lasagna noodles", "ground beef", "cheese", "tomato sauce"]
        );
    }

    #[test]
    fn unknown_and_blank_dishes_fall_back() {
        assert_eq!(resolve_dish("zzz unknown"), GENERIC_DISH_INGREDIENTS.to_vec());
        assert_eq!(resolve_dish("   "), GENERIC_DISH_INGREDIENTS.to_vec());
    }
}
