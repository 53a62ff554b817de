use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::recipe::Difficulty;

pub const MAX_SEARCH_RESULTS: usize = 10;

const EMBEDDED_LIBRARY: &str = include_str!("../../data/dishes.toml");

static LIBRARY: Lazy<DishLibrary> = Lazy::new(|| {
    DishLibrary::from_toml(EMBEDDED_LIBRARY).expect("embedded dish library is valid TOML")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishRecord {
    pub key: String,
    pub name: String,
    pub cuisine: String,
    pub difficulty: Difficulty,
    pub cook_time: String,
    pub servings: u32,
    #[serde(default)]
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    dish: Vec<DishRecord>,
}

#[derive(Debug, Clone)]
pub struct DishLibrary {
    dishes: Vec<DishRecord>,
}

impl DishLibrary {
    pub fn builtin() -> &'static DishLibrary {
        &LIBRARY
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        let file: LibraryFile = toml::from_str(raw)?;
        Ok(Self::from_records(file.dish))
    }

    pub fn from_records(dishes: Vec<DishRecord>) -> Self {
        Self { dishes }
    }

    pub fn dishes(&self) -> &[DishRecord] {
        &self.dishes
    }

    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    pub fn get(&self, key_or_name: &str) -> Option<&DishRecord> {
        let query = key_or_name.trim().to_lowercase();
        self.dishes
            .iter()
            .find(|dish| dish.key == query || dish.name.to_lowercase() == query)
    }

    /// Ranked search: exact key/name hits, then key/name substrings, then
    /// cuisine substrings. Each dish appears once, at its best rank.
    pub fn search(&self, query: &str) -> Vec<&DishRecord> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut results: Vec<&DishRecord> = Vec::new();
        let mut collect = |matches: &dyn Fn(&DishRecord) -> bool| {
            for dish in &self.dishes {
                if matches(dish) && !results.iter().any(|r| r.name == dish.name) {
                    results.push(dish);
                }
            }
        };

        collect(&|dish| dish.key == query || dish.name.to_lowercase() == query);
        collect(&|dish| dish.key.contains(&query) || dish.name.to_lowercase().contains(&query));
        collect(&|dish| dish.cuisine.to_lowercase().contains(&query));

        results.truncate(MAX_SEARCH_RESULTS);
        results
    }

    pub fn suggestions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.dishes.iter().map(|d| d.name.clone()).collect();
        names.sort();
        names
    }

    pub fn by_cuisine(&self) -> BTreeMap<String, Vec<String>> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for dish in &self.dishes {
            grouped
                .entry(dish.cuisine.clone())
                .or_default()
                .push(dish.name.clone());
        }
        grouped
    }
}

pub fn search_dishes(query: &str) -> Vec<&'static DishRecord> {
    DishLibrary::builtin().search(query)
}

pub fn dish_suggestions() -> Vec<String> {
    DishLibrary::builtin().suggestions()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str, name: &str, cuisine: &str) -> DishRecord {
        DishRecord {
            key: key.to_string(),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            difficulty: Difficulty::Easy,
            cook_time: "10 minutes".to_string(),
            servings: 2,
            description: None,
            ingredients: vec!["water".to_string()],
            instructions: vec!["Boil".to_string()],
            tags: Vec::new(),
        }
    }

    #[test]
    fn builtin_library_loads() {
        let library = DishLibrary::builtin();
        assert_eq!(library.len(), 20);
        let risotto = library.get("Risotto").expect("risotto present");
        assert_eq!(risotto.name, "Classic Risotto");
        assert_eq!(risotto.difficulty, Difficulty::Hard);
        assert!(library.get("classic risotto").is_some());
    }

    #[test]
    fn exact_match_ranks_before_partial_and_cuisine() {
        let library = DishLibrary::from_records(vec![
            record("beef stew pie", "Beef Stew Pie", "British"),
            record("irish stew", "Irish Stew", "Beef Stew Country"),
            record("beef stew", "Beef Stew", "Irish"),
        ]);
        let names: Vec<_> = library
            .search("Beef Stew")
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Beef Stew", "Beef Stew Pie", "Irish Stew"]);
    }

    #[test]
    fn search_is_capped_and_deduplicated() {
        let results = search_dishes("e");
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
        let mut names: Vec<_> = results.iter().map(|d| d.name.clone()).collect();
        names.dedup();
        assert_eq!(names.len(), results.len());
    }

    #[test]
    fn cuisine_matches_come_last() {
        let results = search_dishes("italian");
        assert!(!results.is_empty());
        assert!(results.iter().all(|d| d.cuisine.to_lowercase().contains("italian")));

        let chicken = search_dishes("chicken");
        assert!(chicken.iter().all(|d| d.name.to_lowercase().contains("chicken")));
        assert_eq!(chicken.len(), 4);
    }

    #[test]
    fn blank_query_returns_nothing() {
        assert!(search_dishes("   ").is_empty());
    }

    #[test]
    fn suggestions_are_sorted() {
        let names = dish_suggestions();
        assert_eq!(names.len(), 20);
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn groups_by_cuisine() {
        let grouped = DishLibrary::builtin().by_cuisine();
        assert_eq!(grouped.get("Mexican").map(Vec::len), Some(2));
    }
}
