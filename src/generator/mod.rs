pub mod online;
pub mod remote;
pub mod rule_based;
pub mod simulated;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::config::{GeneratorBackend, GeneratorConfig};
use crate::error::GenerationError;
use crate::recipe::Recipe;

pub use online::{search_online, OnlineRecipe};
pub use remote::RemoteGenerator;
pub use rule_based::RuleBasedGenerator;
pub use simulated::SimulatedAiGenerator;

#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, ingredients: &[String]) -> Result<Recipe, GenerationError>;
}

/// Runs the primary generator and, when it fails for any reason, answers
/// with the rule-based recipe instead.
#[derive(Clone)]
pub struct FallbackGenerator {
    primary: Arc<dyn RecipeGenerator>,
    fallback: RuleBasedGenerator,
}

impl FallbackGenerator {
    pub fn new(primary: Arc<dyn RecipeGenerator>) -> Self {
        Self {
            primary,
            fallback: RuleBasedGenerator,
        }
    }

    pub fn primary(&self) -> &str {
        self.primary.name()
    }
}

#[async_trait]
impl RecipeGenerator for FallbackGenerator {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate(&self, ingredients: &[String]) -> Result<Recipe, GenerationError> {
        match self.primary.generate(ingredients).await {
            Ok(recipe) => Ok(recipe),
            Err(err) => {
                warn!(
                    generator = self.primary.name(),
                    error = %err,
                    "generation failed, using rule-based recipe"
                );
                self.fallback.generate(ingredients).await
            }
        }
    }
}

pub fn build_generator(config: &GeneratorConfig) -> Arc<dyn RecipeGenerator> {
    let primary: Arc<dyn RecipeGenerator> = match config.backend {
        GeneratorBackend::RuleBased => return Arc::new(RuleBasedGenerator),
        GeneratorBackend::Simulated => Arc::new(SimulatedAiGenerator::new(Duration::from_millis(
            config.simulated_delay_ms,
        ))),
        GeneratorBackend::Remote => Arc::new(RemoteGenerator::new(
            non_empty(&config.remote_endpoint),
            Duration::from_secs(config.remote_timeout_secs),
        )),
    };
    Arc::new(FallbackGenerator::new(primary))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl RecipeGenerator for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn generate(&self, _ingredients: &[String]) -> Result<Recipe, GenerationError> {
            Err(GenerationError::Unavailable("broken".to_string()))
        }
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn fallback_recovers_from_primary_failure() {
        let generator = FallbackGenerator::new(Arc::new(Broken));
        let input = list(&["salmon", "rice"]);
        let recipe = generator.generate(&input).await.expect("fallback recipe");
        assert_eq!(recipe.ingredients, input);
        assert_eq!(generator.primary(), "broken");
    }

    #[tokio::test]
    async fn remote_without_endpoint_degrades() {
        let config = GeneratorConfig {
            backend: GeneratorBackend::Remote,
            ..GeneratorConfig::default()
        };
        let generator = build_generator(&config);
        assert_eq!(generator.name(), "fallback");
        let recipe = generator
            .generate(&list(&["chicken", "pasta"]))
            .await
            .expect("recipe");
        assert_eq!(recipe.title, "chicken Bowl with pasta");
    }

    #[test]
    fn rule_based_backend_is_not_wrapped() {
        let config = GeneratorConfig {
            backend: GeneratorBackend::RuleBased,
            ..GeneratorConfig::default()
        };
        assert_eq!(build_generator(&config).name(), "rule-based");
    }

    #[test]
    fn fallback_still_rejects_empty_input() {
        let generator = FallbackGenerator::new(Arc::new(Broken));
        let result = tokio_test::block_on(generator.generate(&[]));
        assert!(matches!(result, Err(GenerationError::Recipe(_))));
    }
}
