pub mod classifier;
pub mod dish_resolver;
pub mod synthesizer;
pub mod timing;

pub use classifier::{classify, CompositionFlags, IngredientCategory};
pub use dish_resolver::{resolve_dish, GENERIC_DISH_INGREDIENTS};
pub use synthesizer::synthesize;
pub use timing::resolve_timing;
