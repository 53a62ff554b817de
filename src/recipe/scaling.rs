use serde::Serialize;

use crate::error::RecipeError;

pub const MIN_SERVINGS: u32 = 1;
pub const MAX_SERVINGS: u32 = 12;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScaledServings {
    pub original_servings: u32,
    pub servings: u32,
    pub factor: f64,
    pub label: Option<String>,
}

pub fn scale_servings(original_servings: u32, servings: u32) -> Result<ScaledServings, RecipeError> {
    if original_servings == 0 {
        return Err(RecipeError::InvalidServings);
    }
    if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&servings) {
        return Err(RecipeError::ServingsOutOfRange {
            requested: servings,
            min: MIN_SERVINGS,
            max: MAX_SERVINGS,
        });
    }
    let factor = f64::from(servings) / f64::from(original_servings);
    let label = if servings == original_servings {
        None
    } else if factor > 1.0 {
        Some(format!("{factor}x larger"))
    } else {
        Some(format!("{:.1}x smaller", 1.0 / factor))
    };
    Ok(ScaledServings {
        original_servings,
        servings,
        factor,
        label,
    })
}
