use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AdminError, StorageError};
use crate::recipe::Difficulty;
use crate::storage::{KeyValueStore, KitchenState, ADMIN_DISHES_KEY};

pub const CONTINENTS: [&str; 6] = [
    "Africa",
    "Asia",
    "Europe",
    "North America",
    "South America",
    "Oceania",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminDish {
    pub id: u32,
    pub name: String,
    pub continent: String,
    pub country: String,
    #[serde(default)]
    pub description: String,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub is_featured: bool,
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishDraft {
    pub name: String,
    pub continent: String,
    pub country: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl DishDraft {
    fn validate(&self) -> Result<(), AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::Invalid("dish name is required".to_string()));
        }
        if self.country.trim().is_empty() {
            return Err(AdminError::Invalid("country is required".to_string()));
        }
        if !CONTINENTS.contains(&self.continent.as_str()) {
            return Err(AdminError::Invalid(format!(
                "unknown continent: {}",
                self.continent
            )));
        }
        if self.servings == 0 {
            return Err(AdminError::Invalid(
                "servings must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(self, dish: &mut AdminDish) {
        dish.name = self.name.trim().to_string();
        dish.continent = self.continent;
        dish.country = self.country.trim().to_string();
        dish.description = self.description;
        dish.prep_time_minutes = self.prep_time_minutes;
        dish.cook_time_minutes = self.cook_time_minutes;
        dish.servings = self.servings;
        dish.difficulty = self.difficulty;
        dish.is_featured = self.is_featured;
        dish.is_active = self.is_active;
        dish.tags = self.tags;
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl DishFilter {
    fn matches(&self, dish: &AdminDish) -> bool {
        let search_ok = self.search.as_deref().map_or(true, |term| {
            let term = term.trim().to_lowercase();
            dish.name.to_lowercase().contains(&term) || dish.country.to_lowercase().contains(&term)
        });
        let continent_ok = self
            .continent
            .as_deref()
            .map_or(true, |c| c.eq_ignore_ascii_case("all") || dish.continent == c);
        let difficulty_ok = self.difficulty.map_or(true, |d| dish.difficulty == d);
        search_ok && continent_ok && difficulty_ok
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DishStats {
    pub total: usize,
    pub active: usize,
    pub featured: usize,
    pub continents: usize,
}

fn day(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn seed_dishes() -> Vec<AdminDish> {
    vec![
        AdminDish {
            id: 1,
            name: "Pasta Carbonara".to_string(),
            continent: "Europe".to_string(),
            country: "Italy".to_string(),
            description: "Classic Italian pasta dish with eggs, cheese, and pancetta".to_string(),
            prep_time_minutes: 15,
            cook_time_minutes: 20,
            servings: 4,
            difficulty: Difficulty::Medium,
            is_featured: true,
            is_active: true,
            tags: tags(&["Italian", "Pasta", "Traditional"]),
            created_at: day(1, 1, 10),
        },
        AdminDish {
            id: 2,
            name: "Pad Thai".to_string(),
            continent: "Asia".to_string(),
            country: "Thailand".to_string(),
            description: "Popular Thai stir-fried noodle dish".to_string(),
            prep_time_minutes: 20,
            cook_time_minutes: 15,
            servings: 4,
            difficulty: Difficulty::Medium,
            is_featured: true,
            is_active: true,
            tags: tags(&["Thai", "Stir-fry", "Spicy"]),
            created_at: day(1, 2, 11),
        },
        AdminDish {
            id: 3,
            name: "Beef Tacos".to_string(),
            continent: "North America".to_string(),
            country: "Mexico".to_string(),
            description: "Traditional Mexican tacos with seasoned beef".to_string(),
            prep_time_minutes: 10,
            cook_time_minutes: 15,
            servings: 6,
            difficulty: Difficulty::Easy,
            is_featured: false,
            is_active: true,
            tags: tags(&["Mexican", "Beef", "Quick"]),
            created_at: day(1, 3, 12),
        },
        AdminDish {
            id: 4,
            name: "Coq au Vin".to_string(),
            continent: "Europe".to_string(),
            country: "France".to_string(),
            description: "French braised chicken dish cooked with wine".to_string(),
            prep_time_minutes: 30,
            cook_time_minutes: 90,
            servings: 6,
            difficulty: Difficulty::Hard,
            is_featured: false,
            is_active: false,
            tags: tags(&["French", "Chicken", "Wine"]),
            created_at: day(1, 4, 13),
        },
    ]
}

#[derive(Debug, Clone)]
pub struct DishCatalog {
    dishes: Vec<AdminDish>,
}

impl DishCatalog {
    pub fn new(dishes: Vec<AdminDish>) -> Self {
        Self { dishes }
    }

    pub fn load<S: KeyValueStore>(state: &KitchenState<S>) -> Result<Self, StorageError> {
        let dishes = state.read_json(ADMIN_DISHES_KEY)?.unwrap_or_else(seed_dishes);
        Ok(Self::new(dishes))
    }

    pub fn save<S: KeyValueStore>(&self, state: &mut KitchenState<S>) -> Result<(), StorageError> {
        state.write_json(ADMIN_DISHES_KEY, &self.dishes)
    }

    pub fn dishes(&self) -> &[AdminDish] {
        &self.dishes
    }

    pub fn get(&self, id: u32) -> Option<&AdminDish> {
        self.dishes.iter().find(|dish| dish.id == id)
    }

    pub fn filter(&self, filter: &DishFilter) -> Vec<&AdminDish> {
        self.dishes.iter().filter(|dish| filter.matches(dish)).collect()
    }

    pub fn create(&mut self, draft: DishDraft) -> Result<AdminDish, AdminError> {
        draft.validate()?;
        let id = self.dishes.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        let mut dish = AdminDish {
            id,
            name: String::new(),
            continent: String::new(),
            country: String::new(),
            description: String::new(),
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            servings: 1,
            difficulty: Difficulty::Easy,
            is_featured: false,
            is_active: true,
            tags: Vec::new(),
            created_at: Utc::now(),
        };
        draft.apply(&mut dish);
        info!(id, name = %dish.name, "admin created dish");
        self.dishes.insert(0, dish.clone());
        Ok(dish)
    }

    pub fn update(&mut self, id: u32, draft: DishDraft) -> Result<AdminDish, AdminError> {
        draft.validate()?;
        let dish = self.find_mut(id)?;
        draft.apply(dish);
        Ok(dish.clone())
    }

    pub fn delete(&mut self, id: u32) -> Result<AdminDish, AdminError> {
        let position = self
            .dishes
            .iter()
            .position(|dish| dish.id == id)
            .ok_or(AdminError::NotFound { entity: "dish", id })?;
        Ok(self.dishes.remove(position))
    }

    pub fn toggle_active(&mut self, id: u32) -> Result<AdminDish, AdminError> {
        let dish = self.find_mut(id)?;
        dish.is_active = !dish.is_active;
        Ok(dish.clone())
    }

    pub fn toggle_featured(&mut self, id: u32) -> Result<AdminDish, AdminError> {
        let dish = self.find_mut(id)?;
        dish.is_featured = !dish.is_featured;
        Ok(dish.clone())
    }

    pub fn stats(&self) -> DishStats {
        let continents: BTreeSet<&str> = self.dishes.iter().map(|d| d.continent.as_str()).collect();
        DishStats {
            total: self.dishes.len(),
            active: self.dishes.iter().filter(|d| d.is_active).count(),
            featured: self.dishes.iter().filter(|d| d.is_featured).count(),
            continents: continents.len(),
        }
    }

    fn find_mut(&mut self, id: u32) -> Result<&mut AdminDish, AdminError> {
        self.dishes
            .iter_mut()
            .find(|dish| dish.id == id)
            .ok_or(AdminError::NotFound { entity: "dish", id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn draft(name: &str) -> DishDraft {
        DishDraft {
            name: name.to_string(),
            continent: "Africa".to_string(),
            country: "Nigeria".to_string(),
            description: String::new(),
            prep_time_minutes: 15,
            cook_time_minutes: 45,
            servings: 6,
            difficulty: Difficulty::Medium,
            is_featured: false,
            is_active: true,
            tags: vec!["Rice".to_string()],
        }
    }

    #[test]
    fn filters_combine() {
        let catalog = DishCatalog::new(seed_dishes());
        let europe = DishFilter {
            continent: Some("Europe".to_string()),
            ..DishFilter::default()
        };
        assert_eq!(catalog.filter(&europe).len(), 2);

        let hard_europe = DishFilter {
            difficulty: Some(Difficulty::Hard),
            ..europe
        };
        assert_eq!(catalog.filter(&hard_europe)[0].name, "Coq au Vin");

        let by_country = DishFilter {
            search: Some("thai".to_string()),
            continent: Some("All".to_string()),
            difficulty: None,
        };
        assert_eq!(catalog.filter(&by_country)[0].id, 2);
    }

    #[test]
    fn seeded_stats() {
        let catalog = DishCatalog::new(seed_dishes());
        assert_eq!(
            catalog.stats(),
            DishStats {
                total: 4,
                active: 3,
                featured: 2,
                continents: 3
            }
        );
    }

    #[test]
    fn create_validates_and_prepends() {
        let mut catalog = DishCatalog::new(seed_dishes());
        let jollof = catalog.create(draft("Jollof Rice")).expect("created");
        assert_eq!(jollof.id, 5);
        assert_eq!(catalog.dishes()[0].name, "Jollof Rice");

        let mut zero = draft("Empty");
        zero.servings = 0;
        assert!(matches!(catalog.create(zero), Err(AdminError::Invalid(_))));

        let mut nowhere = draft("Mystery");
        nowhere.continent = "Atlantis".to_string();
        assert!(catalog.create(nowhere).is_err());
        assert!(catalog.create(draft("  ")).is_err());
    }

    #[test]
    fn toggles_and_delete() {
        let mut catalog = DishCatalog::new(seed_dishes());
        assert!(catalog.toggle_active(4).expect("toggled").is_active);
        assert!(!catalog.toggle_featured(1).expect("toggled").is_featured);
        let updated = catalog.update(3, draft("Suya")).expect("updated");
        assert_eq!(updated.created_at, seed_dishes()[2].created_at);
        catalog.delete(3).expect("deleted");
        assert!(catalog.get(3).is_none());
        assert!(matches!(
            catalog.toggle_featured(3),
            Err(AdminError::NotFound { entity: "dish", .. })
        ));
    }

    #[test]
    fn persists_through_state() {
        let mut state = KitchenState::new(MemoryStore::new());
        let mut catalog = DishCatalog::load(&state).expect("seeded");
        catalog.delete(1).expect("deleted");
        catalog.save(&mut state).expect("saved");
        assert_eq!(DishCatalog::load(&state).expect("reloaded").dishes().len(), 3);
    }
}
