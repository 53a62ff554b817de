use anyhow::Result;

use crate::admin::{AdminDish, AdminUser};
use crate::dishes::DishRecord;
use crate::recipe::Recipe;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn recipes_to_csv(recipes: &[Recipe]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "title",
        "difficulty",
        "cook_time",
        "servings",
        "calories",
        "ingredients",
        "tags",
        "created_at",
        "source",
    ])?;
    for recipe in recipes {
        writer.write_record([
            recipe.id.clone(),
            recipe.title.clone(),
            recipe.difficulty.to_string(),
            recipe.cook_time.clone(),
            recipe.servings.to_string(),
            recipe.nutrition.calories.to_string(),
            recipe.ingredients.join("; "),
            recipe.tags.join("; "),
            recipe.created_at.to_rfc3339(),
            recipe.source.clone().unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

pub fn dishes_to_csv(dishes: &[&DishRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "key",
        "name",
        "cuisine",
        "difficulty",
        "cook_time",
        "servings",
        "ingredients",
    ])?;
    for dish in dishes {
        writer.write_record([
            dish.key.clone(),
            dish.name.clone(),
            dish.cuisine.clone(),
            dish.difficulty.to_string(),
            dish.cook_time.clone(),
            dish.servings.to_string(),
            dish.ingredients.join("; "),
        ])?;
    }
    finish(writer)
}

pub fn history_to_csv(entries: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["index", "entry"])?;
    for (idx, entry) in entries.iter().enumerate() {
        writer.write_record([idx.to_string(), entry.clone()])?;
    }
    finish(writer)
}

pub fn admin_users_to_csv(users: &[&AdminUser]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "email",
        "first_name",
        "last_name",
        "role",
        "is_active",
        "email_verified",
        "recipes_count",
        "created_at",
    ])?;
    for user in users {
        writer.write_record([
            user.id.to_string(),
            user.email.clone(),
            user.first_name.clone(),
            user.last_name.clone(),
            user.role.to_string(),
            user.is_active.to_string(),
            user.email_verified.to_string(),
            user.recipes_count.to_string(),
            user.created_at.to_rfc3339(),
        ])?;
    }
    finish(writer)
}

pub fn admin_dishes_to_csv(dishes: &[&AdminDish]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "name",
        "continent",
        "country",
        "difficulty",
        "prep_time_minutes",
        "cook_time_minutes",
        "servings",
        "is_featured",
        "is_active",
        "tags",
    ])?;
    for dish in dishes {
        writer.write_record([
            dish.id.to_string(),
            dish.name.clone(),
            dish.continent.clone(),
            dish.country.clone(),
            dish.difficulty.to_string(),
            dish.prep_time_minutes.to_string(),
            dish.cook_time_minutes.to_string(),
            dish.servings.to_string(),
            dish.is_featured.to_string(),
            dish.is_active.to_string(),
            dish.tags.join("; "),
        ])?;
    }
    finish(writer)
}
