pub mod dishes;
pub mod users;

use serde::{Deserialize, Serialize};

use crate::auth::{require_admin, User};
use crate::dishes::DishLibrary;
use crate::error::AdminError;
use crate::storage::{KeyValueStore, KitchenState, TOTAL_GENERATED_KEY};

pub use dishes::{AdminDish, DishCatalog, DishDraft, DishFilter, DishStats, CONTINENTS};
pub use users::{AdminUser, UserCatalog, UserDraft, UserStats};

const POPULAR_CUISINE_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CuisineCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminOverview {
    pub total_users: usize,
    pub active_users: usize,
    pub total_dishes: usize,
    pub active_dishes: usize,
    pub featured_dishes: usize,
    pub recipes_generated: u64,
    pub library_dishes: usize,
    pub popular_cuisines: Vec<CuisineCount>,
}

pub fn user_catalog<S: KeyValueStore>(
    state: &KitchenState<S>,
) -> Result<(User, UserCatalog), AdminError> {
    let admin = require_admin(state)?;
    Ok((admin, UserCatalog::load(state)?))
}

pub fn dish_catalog<S: KeyValueStore>(
    state: &KitchenState<S>,
) -> Result<(User, DishCatalog), AdminError> {
    let admin = require_admin(state)?;
    Ok((admin, DishCatalog::load(state)?))
}

pub fn popular_cuisines(library: &DishLibrary, limit: usize) -> Vec<CuisineCount> {
    let mut counts: Vec<CuisineCount> = library
        .by_cuisine()
        .into_iter()
        .map(|(name, dishes)| CuisineCount {
            name,
            count: dishes.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    counts.truncate(limit);
    counts
}

pub fn overview<S: KeyValueStore>(state: &KitchenState<S>) -> Result<AdminOverview, AdminError> {
    require_admin(state)?;
    let users = UserCatalog::load(state)?.stats();
    let dishes = DishCatalog::load(state)?.stats();
    let library = DishLibrary::builtin();
    Ok(AdminOverview {
        total_users: users.total,
        active_users: users.active,
        total_dishes: dishes.total,
        active_dishes: dishes.active,
        featured_dishes: dishes.featured,
        recipes_generated: state.counter(TOTAL_GENERATED_KEY)?,
        library_dishes: library.len(),
        popular_cuisines: popular_cuisines(library, POPULAR_CUISINE_LIMIT),
    })
}
