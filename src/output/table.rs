use std::collections::BTreeMap;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::admin::{AdminDish, AdminOverview, AdminUser};
use crate::dishes::DishRecord;
use crate::generator::OnlineRecipe;
use crate::recipe::{Difficulty, Recipe, ScaledServings};
use crate::storage::KitchenStats;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn difficulty_cell(difficulty: Difficulty) -> Cell {
    let color = match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    };
    Cell::new(difficulty.as_str()).fg(color)
}

fn flag_cell(value: bool) -> Cell {
    if value {
        Cell::new("YES").fg(Color::Green)
    } else {
        Cell::new("NO").fg(Color::Red)
    }
}

pub fn render_recipe(recipe: &Recipe) -> String {
    let mut summary = new_table();
    summary.set_header(vec!["Recipe", "Cook Time", "Difficulty", "Servings", "Calories"]);
    summary.add_row(Row::from(vec![
        Cell::new(&recipe.title),
        Cell::new(&recipe.cook_time),
        difficulty_cell(recipe.difficulty),
        Cell::new(recipe.servings),
        Cell::new(recipe.nutrition.calories),
    ]));

    let mut ingredients = new_table();
    ingredients.set_header(vec!["Ingredient", "Time", "Method"]);
    if recipe.ingredients_with_timing.is_empty() {
        for name in &recipe.ingredients {
            ingredients.add_row(vec![name.as_str(), "-", "-"]);
        }
    } else {
        for timing in &recipe.ingredients_with_timing {
            ingredients.add_row(vec![
                timing.name.as_str(),
                timing.cooking_time.as_str(),
                timing.cooking_method.as_str(),
            ]);
        }
    }

    let mut steps = new_table();
    steps.set_header(vec!["Step", "Instruction"]);
    for (idx, step) in recipe.instructions.iter().enumerate() {
        steps.add_row(vec![(idx + 1).to_string(), step.clone()]);
    }

    let mut out = format!("{summary}\n{ingredients}\n{steps}\n");
    out.push_str(&format!(
        "Nutrition: protein {}, carbs {}, fat {}\n",
        recipe.nutrition.protein, recipe.nutrition.carbs, recipe.nutrition.fat
    ));
    if !recipe.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", recipe.tags.join(", ")));
    }
    if let Some(source) = &recipe.source {
        let url = recipe.source_url.as_deref().unwrap_or("-");
        out.push_str(&format!("Source: {source} ({url})\n"));
    }
    out.push_str(&format!("Id: {}", recipe.id));
    out
}

pub fn render_favorites_table(favorites: &[Recipe]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Id", "Title", "Difficulty", "Cook Time", "Servings", "Saved"]);
    for recipe in favorites {
        table.add_row(Row::from(vec![
            Cell::new(&recipe.id),
            Cell::new(&recipe.title),
            difficulty_cell(recipe.difficulty),
            Cell::new(&recipe.cook_time),
            Cell::new(recipe.servings),
            Cell::new(recipe.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }
    table.to_string()
}

pub fn render_history_table(label: &str, entries: &[String]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#".to_string(), label.to_string()]);
    for (idx, entry) in entries.iter().enumerate() {
        table.add_row(vec![idx.to_string(), entry.clone()]);
    }
    table.to_string()
}

pub fn render_dishes_table(dishes: &[&DishRecord]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Dish", "Cuisine", "Difficulty", "Cook Time", "Servings"]);
    for dish in dishes {
        table.add_row(Row::from(vec![
            Cell::new(&dish.name),
            Cell::new(&dish.cuisine),
            difficulty_cell(dish.difficulty),
            Cell::new(&dish.cook_time),
            Cell::new(dish.servings),
        ]));
    }
    table.to_string()
}

pub fn render_dish_detail(dish: &DishRecord) -> String {
    let mut table = new_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Name".to_string(), dish.name.clone()]);
    table.add_row(vec!["Cuisine".to_string(), dish.cuisine.clone()]);
    table.add_row(vec!["Difficulty".to_string(), dish.difficulty.to_string()]);
    table.add_row(vec!["Cook Time".to_string(), dish.cook_time.clone()]);
    table.add_row(vec!["Servings".to_string(), dish.servings.to_string()]);
    if let Some(description) = &dish.description {
        table.add_row(vec!["Description".to_string(), description.clone()]);
    }
    table.add_row(vec!["Ingredients".to_string(), dish.ingredients.join(", ")]);
    for (idx, step) in dish.instructions.iter().enumerate() {
        table.add_row(vec![format!("Step {}", idx + 1), step.clone()]);
    }
    if !dish.tags.is_empty() {
        table.add_row(vec!["Tags".to_string(), dish.tags.join(", ")]);
    }
    table.to_string()
}

pub fn render_cuisines_table(grouped: &BTreeMap<String, Vec<String>>) -> String {
    let mut table = new_table();
    table.set_header(vec!["Cuisine", "Count", "Dishes"]);
    for (cuisine, dishes) in grouped {
        table.add_row(vec![
            cuisine.clone(),
            dishes.len().to_string(),
            dishes.join(", "),
        ]);
    }
    table.to_string()
}

pub fn render_online_table(results: &[OnlineRecipe]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Title", "Cook Time", "Servings", "Source"]);
    for (idx, result) in results.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            result.title.clone(),
            result.cook_time.clone().unwrap_or_else(|| "-".to_string()),
            result
                .servings
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
            result.source.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_scaled(recipe: &Recipe, scaled: &ScaledServings) -> String {
    let mut table = new_table();
    table.set_header(vec!["Recipe", "Original", "Servings", "Factor", "Change"]);
    table.add_row(vec![
        recipe.title.clone(),
        scaled.original_servings.to_string(),
        scaled.servings.to_string(),
        format!("{:.2}", scaled.factor),
        scaled.label.clone().unwrap_or_else(|| "unchanged".to_string()),
    ]);
    table.to_string()
}

pub fn render_stats_table(stats: &KitchenStats) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Recipes Generated".to_string(),
        stats.recipes_generated.to_string(),
    ]);
    table.add_row(vec!["Favorites".to_string(), stats.favorites.to_string()]);
    table.add_row(vec![
        "Ingredients Used".to_string(),
        stats.ingredients_used.to_string(),
    ]);
    table.add_row(vec![
        "Success Rate".to_string(),
        stats
            .success_rate
            .map(|rate| format!("{rate}%"))
            .unwrap_or_else(|| "—".to_string()),
    ]);
    let trend = format!(
        "{}{}%",
        if stats.trend.is_positive && stats.trend.value >= 0 { "+" } else { "" },
        stats.trend.value
    );
    let trend_cell = if stats.trend.is_positive {
        Cell::new(trend).fg(Color::Green)
    } else {
        Cell::new(trend).fg(Color::Red)
    };
    table.add_row(Row::from(vec![Cell::new("Trend"), trend_cell]));
    table.to_string()
}

pub fn render_admin_users_table(users: &[&AdminUser]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Id", "Name", "Email", "Role", "Active", "Verified", "Recipes", "Joined",
    ]);
    for user in users {
        table.add_row(Row::from(vec![
            Cell::new(user.id),
            Cell::new(user.full_name()),
            Cell::new(&user.email),
            Cell::new(user.role.to_string()),
            flag_cell(user.is_active),
            flag_cell(user.email_verified),
            Cell::new(user.recipes_count),
            Cell::new(user.created_at.format("%Y-%m-%d").to_string()),
        ]));
    }
    table.to_string()
}

pub fn render_admin_dishes_table(dishes: &[&AdminDish]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Id", "Name", "Continent", "Country", "Difficulty", "Prep/Cook", "Servings", "Featured",
        "Active",
    ]);
    for dish in dishes {
        table.add_row(Row::from(vec![
            Cell::new(dish.id),
            Cell::new(&dish.name),
            Cell::new(&dish.continent),
            Cell::new(&dish.country),
            difficulty_cell(dish.difficulty),
            Cell::new(format!(
                "{}m / {}m",
                dish.prep_time_minutes, dish.cook_time_minutes
            )),
            Cell::new(dish.servings),
            flag_cell(dish.is_featured),
            flag_cell(dish.is_active),
        ]));
    }
    table.to_string()
}

pub fn render_overview_table(overview: &AdminOverview) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total Users".to_string(), overview.total_users.to_string()]);
    table.add_row(vec!["Active Users".to_string(), overview.active_users.to_string()]);
    table.add_row(vec![
        "Generated Recipes".to_string(),
        overview.recipes_generated.to_string(),
    ]);
    table.add_row(vec![
        "Catalog Dishes".to_string(),
        format!(
            "{} ({} active, {} featured)",
            overview.total_dishes, overview.active_dishes, overview.featured_dishes
        ),
    ]);
    table.add_row(vec![
        "Library Dishes".to_string(),
        overview.library_dishes.to_string(),
    ]);
    let cuisines = overview
        .popular_cuisines
        .iter()
        .map(|c| format!("{} ({})", c.name, c.count))
        .collect::<Vec<_>>()
        .join(", ");
    table.add_row(vec!["Popular Cuisines".to_string(), cuisines]);
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dishes::DishLibrary;
    use crate::synthesis::synthesize;

    #[test]
    fn recipe_card_lists_every_step() {
        let recipe = synthesize(&["chicken".to_string(), "rice".to_string()]).expect("recipe");
        let rendered = render_recipe(&recipe);
        assert!(rendered.contains("chicken Bowl with rice"));
        assert!(rendered.contains("simmer covered"));
        assert!(rendered.contains("Tags: medium") || rendered.contains("Tags: easy"));
        assert!(rendered.contains(&recipe.id));
    }

    #[test]
    fn stats_without_votes_show_dash() {
        let stats = KitchenStats::compute(0, 0, 0, 0, 0);
        let rendered = render_stats_table(&stats);
        assert!(rendered.contains("—"));
        assert!(rendered.contains("+0%"));
    }

    #[test]
    fn dish_tables_render_library_rows() {
        let library = DishLibrary::builtin();
        let hits = library.search("pad thai");
        assert!(render_dishes_table(&hits).contains("Pad Thai"));
        assert!(render_cuisines_table(&library.by_cuisine()).contains("West African"));
    }
}
