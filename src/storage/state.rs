use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;
use crate::recipe::{Recipe, SearchMode};
use crate::storage::{
    KeyValueStore, COOKIE_CONSENT_KEY, DISH_HISTORY_KEY, FAVORITES_KEY, FEEDBACK_DOWN_KEY,
    FEEDBACK_UP_KEY, INGREDIENT_HISTORY_KEY, TOTAL_GENERATED_KEY,
};

pub const DEFAULT_HISTORY_LIMIT: usize = 10;
const INGREDIENTS_PER_SEARCH: usize = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CookieConsent {
    Accepted,
    Declined,
}

impl CookieConsent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl Display for CookieConsent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CookieConsent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            other => Err(format!("unknown consent value: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Trend {
    pub value: i64,
    pub is_positive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KitchenStats {
    pub recipes_generated: u64,
    pub favorites: usize,
    pub ingredients_used: usize,
    pub thumbs_up: u64,
    pub thumbs_down: u64,
    /// Percentage of positive votes; `None` until someone has voted.
    pub success_rate: Option<u32>,
    pub trend: Trend,
}

impl KitchenStats {
    pub fn compute(
        recipes_generated: u64,
        favorites: usize,
        ingredient_searches: usize,
        thumbs_up: u64,
        thumbs_down: u64,
    ) -> Self {
        let votes = thumbs_up + thumbs_down;
        let success_rate = if votes > 0 {
            Some((thumbs_up as f64 / votes as f64 * 100.0).round() as u32)
        } else {
            None
        };
        let trend_value = if votes > 0 {
            ((thumbs_up as f64 - thumbs_down as f64) / votes.max(1) as f64 * 100.0).round() as i64
        } else {
            0
        };
        Self {
            recipes_generated,
            favorites,
            ingredients_used: ingredient_searches * INGREDIENTS_PER_SEARCH,
            thumbs_up,
            thumbs_down,
            success_rate,
            trend: Trend {
                value: trend_value,
                is_positive: thumbs_up >= thumbs_down,
            },
        }
    }
}

pub struct KitchenState<S> {
    store: S,
    history_limit: usize,
}

impl<S: KeyValueStore> KitchenState<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    pub fn write_json<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &raw)
    }

    fn history_key(mode: SearchMode) -> &'static str {
        match mode {
            SearchMode::Ingredients => INGREDIENT_HISTORY_KEY,
            SearchMode::Dish => DISH_HISTORY_KEY,
        }
    }

    pub fn history(&self, mode: SearchMode) -> Result<Vec<String>, StorageError> {
        Ok(self
            .read_json(Self::history_key(mode))?
            .unwrap_or_default())
    }

    pub fn record_history(
        &mut self,
        mode: SearchMode,
        entry: &str,
    ) -> Result<Vec<String>, StorageError> {
        let mut history = self.history(mode)?;
        history.retain(|item| item != entry);
        history.insert(0, entry.to_string());
        history.truncate(self.history_limit);
        self.write_json(Self::history_key(mode), &history)?;
        Ok(history)
    }

    pub fn remove_history(
        &mut self,
        mode: SearchMode,
        index: usize,
    ) -> Result<Option<String>, StorageError> {
        let mut history = self.history(mode)?;
        if index >= history.len() {
            return Ok(None);
        }
        let removed = history.remove(index);
        self.write_json(Self::history_key(mode), &history)?;
        Ok(Some(removed))
    }

    pub fn clear_history(&mut self, mode: SearchMode) -> Result<(), StorageError> {
        self.store.remove(Self::history_key(mode))
    }

    pub fn favorites(&self) -> Result<Vec<Recipe>, StorageError> {
        Ok(self.read_json(FAVORITES_KEY)?.unwrap_or_default())
    }

    pub fn favorite(&self, id: &str) -> Result<Option<Recipe>, StorageError> {
        Ok(self.favorites()?.into_iter().find(|recipe| recipe.id == id))
    }

    pub fn is_favorited(&self, title: &str) -> Result<bool, StorageError> {
        Ok(self.favorites()?.iter().any(|recipe| recipe.title == title))
    }

    pub fn add_favorite(&mut self, recipe: Recipe) -> Result<(), StorageError> {
        let mut favorites = self.favorites()?;
        debug!(id = %recipe.id, title = %recipe.title, "adding favorite");
        favorites.insert(0, recipe);
        self.write_json(FAVORITES_KEY, &favorites)
    }

    pub fn remove_favorite(&mut self, id: &str) -> Result<Option<Recipe>, StorageError> {
        let mut favorites = self.favorites()?;
        let Some(position) = favorites.iter().position(|recipe| recipe.id == id) else {
            return Ok(None);
        };
        let removed = favorites.remove(position);
        self.write_json(FAVORITES_KEY, &favorites)?;
        Ok(Some(removed))
    }

    pub fn counter(&self, key: &str) -> Result<u64, StorageError> {
        match self.store.get(key)? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| StorageError::BadCounter {
                    key: key.to_string(),
                    value: raw,
                }),
        }
    }

    pub fn increment(&mut self, key: &str) -> Result<u64, StorageError> {
        let next = self.counter(key)? + 1;
        self.store.set(key, &next.to_string())?;
        Ok(next)
    }

    pub fn consent(&self) -> Result<Option<CookieConsent>, StorageError> {
        self.store
            .get(COOKIE_CONSENT_KEY)?
            .map(|raw| {
                raw.parse().map_err(|_| StorageError::Unrecognized {
                    key: COOKIE_CONSENT_KEY.to_string(),
                    value: raw.clone(),
                })
            })
            .transpose()
    }

    pub fn set_consent(&mut self, consent: CookieConsent) -> Result<(), StorageError> {
        self.store.set(COOKIE_CONSENT_KEY, consent.as_str())
    }

    pub fn stats(&self) -> Result<KitchenStats, StorageError> {
        Ok(KitchenStats::compute(
            self.counter(TOTAL_GENERATED_KEY)?,
            self.favorites()?.len(),
            self.history(SearchMode::Ingredients)?.len(),
            self.counter(FEEDBACK_UP_KEY)?,
            self.counter(FEEDBACK_DOWN_KEY)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn state() -> KitchenState<MemoryStore> {
        KitchenState::new(MemoryStore::new())
    }

    fn recipe(title: &str) -> Recipe {
        Recipe::new(title, vec!["salt".to_string()]).expect("recipe")
    }

    #[test]
    fn history_dedupes_and_caps() {
        let mut state = state().with_history_limit(3);
        for entry in ["a", "b", "c", "a", "d"] {
            state.record_history(SearchMode::Ingredients, entry).unwrap();
        }
        assert_eq!(
            state.history(SearchMode::Ingredients).unwrap(),
            vec!["d", "a", "c"]
        );
        assert!(state.history(SearchMode::Dish).unwrap().is_empty());
    }

    #[test]
    fn history_removal_by_index() {
        let mut state = state();
        state.record_history(SearchMode::Dish, "ramen").unwrap();
        state.record_history(SearchMode::Dish, "paella").unwrap();
        assert_eq!(
            state.remove_history(SearchMode::Dish, 1).unwrap().as_deref(),
            Some("ramen")
        );
        assert_eq!(state.remove_history(SearchMode::Dish, 5).unwrap(), None);
        assert_eq!(state.history(SearchMode::Dish).unwrap(), vec!["paella"]);
    }

    #[test]
    fn favorites_prepend_and_remove() {
        let mut state = state();
        let mut first = recipe("First");
        first.id = "1".to_string();
        let mut second = recipe("Second");
        second.id = "2".to_string();
        state.add_favorite(first).unwrap();
        state.add_favorite(second).unwrap();

        let titles: Vec<_> = state
            .favorites()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert!(state.is_favorited("First").unwrap());

        assert!(state.remove_favorite("1").unwrap().is_some());
        assert!(state.remove_favorite("1").unwrap().is_none());
        assert_eq!(state.favorites().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_json_is_reported() {
        let mut state = state();
        state.store_mut().set(FAVORITES_KEY, "{not json").unwrap();
        match state.favorites() {
            Err(StorageError::Corrupt { key, .. }) => assert_eq!(key, FAVORITES_KEY),
            other => panic!("expected corrupt error, got {other:?}"),
        }
    }

    #[test]
    fn counters_increment_and_reject_garbage() {
        let mut state = state();
        assert_eq!(state.counter(TOTAL_GENERATED_KEY).unwrap(), 0);
        state.increment(TOTAL_GENERATED_KEY).unwrap();
        assert_eq!(state.increment(TOTAL_GENERATED_KEY).unwrap(), 2);
        state.store_mut().set(FEEDBACK_UP_KEY, "lots").unwrap();
        assert!(matches!(
            state.counter(FEEDBACK_UP_KEY),
            Err(StorageError::BadCounter { .. })
        ));
    }

    #[test]
    fn consent_round_trip() {
        let mut state = state();
        assert_eq!(state.consent().unwrap(), None);
        state.set_consent(CookieConsent::Declined).unwrap();
        assert_eq!(state.consent().unwrap(), Some(CookieConsent::Declined));
        assert_eq!(
            state.store().get(COOKIE_CONSENT_KEY).unwrap().as_deref(),
            Some("declined")
        );
    }

    #[test]
    fn unknown_consent_value_is_an_error() {
        let mut state = state();
        state.store_mut().set(COOKIE_CONSENT_KEY, "maybe").unwrap();
        assert!(matches!(
            state.consent(),
            Err(StorageError::Unrecognized { ref value, .. }) if value == "maybe"
        ));
    }

    #[test]
    fn stats_without_votes() {
        let stats = KitchenStats::compute(3, 1, 2, 0, 0);
        assert_eq!(stats.ingredients_used, 8);
        assert_eq!(stats.success_rate, None);
        assert_eq!(stats.trend, Trend { value: 0, is_positive: true });
    }

    #[test]
    fn stats_with_votes() {
        let stats = KitchenStats::compute(10, 0, 0, 2, 1);
        assert_eq!(stats.success_rate, Some(67));
        assert_eq!(stats.trend.value, 33);
        assert!(stats.trend.is_positive);

        let negative = KitchenStats::compute(10, 0, 0, 1, 3);
        assert_eq!(negative.success_rate, Some(25));
        assert_eq!(negative.trend.value, -50);
        assert!(!negative.trend.is_positive);
    }
}
