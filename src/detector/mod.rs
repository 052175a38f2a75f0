mod gemini;
mod parser;
mod prompt;

pub use gemini::GeminiDetector;
pub use parser::parse_ingredients;
pub use prompt::INGREDIENT_DETECTION_PROMPT;

use async_trait::async_trait;

use crate::image::RawImage;
use crate::model::Ingredient;
use crate::AdvisorError;

/// Anything that can list the food ingredients visible in an image
#[async_trait]
pub trait IngredientDetector: Send + Sync {
    /// Get the detector name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Detect ingredients in detection order.
    ///
    /// An empty list is a valid answer; deciding what to do with it is up to the caller.
    async fn detect(&self, image: &RawImage) -> Result<Vec<Ingredient>, AdvisorError>;
}
