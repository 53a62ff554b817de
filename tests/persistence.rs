use std::sync::Arc;

use kitchen_chef::generator::RuleBasedGenerator;
use kitchen_chef::kitchen::{Kitchen, Vote};
use kitchen_chef::recipe::SearchMode;
use kitchen_chef::storage::{KitchenState, SqliteStore};
use kitchen_chef::synthesis::synthesize;

fn ingredients(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn favorites_survive_reopening_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("nested").join("kitchen.db");
    let recipe = synthesize(&ingredients(&["chicken", "rice", "broccoli"])).expect("recipe");

    {
        let store = SqliteStore::open(&db_path).expect("open");
        let mut state = KitchenState::new(store);
        state.add_favorite(recipe.clone()).expect("saved");
    }

    let store = SqliteStore::open(&db_path).expect("reopen");
    let state = KitchenState::new(store);
    let favorites = state.favorites().expect("favorites");
    assert_eq!(favorites.len(), 1);
    let restored = &favorites[0];
    assert_eq!(restored, &recipe);
    assert_eq!(restored.created_at, recipe.created_at);
    assert_eq!(restored.ingredients_with_timing, recipe.ingredients_with_timing);
    assert!(state.is_favorited(&recipe.title).expect("lookup"));
}

#[tokio::test]
async fn kitchen_session_persists_history_and_counters() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("kitchen.db");

    {
        let store = SqliteStore::open(&db_path).expect("open");
        let mut kitchen = Kitchen::new(KitchenState::new(store), Arc::new(RuleBasedGenerator));
        let recipe = kitchen
            .generate(SearchMode::Dish, "Chicken Parmesan")
            .await
            .expect("generated");
        assert!(!recipe.ingredients.is_empty());
        kitchen
            .generate(SearchMode::Ingredients, "eggs, spinach")
            .await
            .expect("generated");
        kitchen.save_favorite(recipe).expect("saved");
        kitchen.feedback(Vote::Up).expect("voted");
    }

    let store = SqliteStore::open(&db_path).expect("reopen");
    let kitchen = Kitchen::new(KitchenState::new(store), Arc::new(RuleBasedGenerator));
    assert_eq!(
        kitchen.history(SearchMode::Dish).expect("history"),
        vec!["Chicken Parmesan".to_string()]
    );
    assert_eq!(
        kitchen.history(SearchMode::Ingredients).expect("history"),
        vec!["eggs, spinach".to_string()]
    );
    let stats = kitchen.stats().expect("stats");
    assert_eq!(stats.recipes_generated, 2);
    assert_eq!(stats.favorites, 1);
    assert_eq!(stats.success_rate, Some(100));
}
