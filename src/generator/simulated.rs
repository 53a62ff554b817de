use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::{RecipeGenerator, RuleBasedGenerator};
use crate::recipe::Recipe;

pub const DEFAULT_SIMULATED_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct SimulatedAiGenerator {
    delay: Duration,
    inner: RuleBasedGenerator,
}

impl SimulatedAiGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: RuleBasedGenerator,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedAiGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_DELAY)
    }
}

#[async_trait]
impl RecipeGenerator for SimulatedAiGenerator {
    fn name(&self) -> &str {
        "simulated-ai"
    }

    async fn generate(&self, ingredients: &[String]) -> Result<Recipe, GenerationError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "simulating model latency");
        tokio::time::sleep(self.delay).await;
        self.inner.generate(ingredients).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delay_is_two_seconds() {
        assert_eq!(
            SimulatedAiGenerator::default().delay(),
            Duration::from_millis(2000)
        );
    }

    #[tokio::test]
    async fn waits_then_synthesizes() {
        let generator = SimulatedAiGenerator::new(Duration::from_millis(20));
        let started = tokio::time::Instant::now();
        let recipe = generator
            .generate(&["tofu".to_string()])
            .await
            .expect("recipe");
        assert!(started.elapsed() >= Duration::from_millis(20));
        assert_eq!(recipe.title, "Simple tofu Dish");
    }
}
