pub mod memory;
pub mod migrations;
pub mod sqlite;
pub mod state;

use crate::error::StorageError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use state::{CookieConsent, KitchenState, KitchenStats, Trend};

pub const INGREDIENT_HISTORY_KEY: &str = "kitchenchef-ingredient-history";
pub const DISH_HISTORY_KEY: &str = "kitchenchef-dish-history";
pub const FAVORITES_KEY: &str = "kitchenchef-favorites";
pub const TOTAL_GENERATED_KEY: &str = "kitchenchef-total-generated";
pub const FEEDBACK_UP_KEY: &str = "kitchenchef-feedback-up";
pub const FEEDBACK_DOWN_KEY: &str = "kitchenchef-feedback-down";
pub const COOKIE_CONSENT_KEY: &str = "cookie-consent";
pub const SESSION_KEY: &str = "aichef_user";
pub const ADMIN_USERS_KEY: &str = "admin-users";
pub const ADMIN_DISHES_KEY: &str = "admin-dishes";

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
