//! Photograph your ingredients, get recipes.
//!
//! A photo is sent to a Gemini vision model to list the visible food
//! ingredients, then recipes are looked up for those ingredients: first in a
//! local demo table, then through the Spoonacular API.
//!
//! # Quick Start
//!
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bite_advisor::BiteAdvisor;
//!
//! let result = BiteAdvisor::builder()
//!     .image_path("fridge.jpg")
//!     .build()
//!     .await?;
//!
//! for recipe in &result.recipes {
//!     println!("{} ({} min)", recipe.title, recipe.ready_in_minutes);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod detector;
pub mod error;
mod http;
pub mod image;
pub mod model;
pub mod pipeline;
pub mod recipes;
pub mod uniffi_bindings;

// Re-export main types
pub use builder::{BiteAdvisor, BiteAdvisorBuilder};
pub use config::AdvisorConfig;
pub use error::AdvisorError;
pub use image::{ImageSource, RawImage};
pub use model::{Ingredient, Nutrition, PipelineResult, Recipe};
pub use pipeline::{PipelineSession, RecipePipeline, SessionOutcome};

/// Detect ingredients in an image and find matching recipes
///
/// Configuration comes from `config.toml` and the environment, see
/// [`AdvisorConfig::load`].
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bite_advisor::{process_image, RawImage};
///
/// let result = process_image(&RawImage::from_path("fridge.jpg")).await?;
/// println!("{:?}", result.ingredients);
/// # Ok(())
/// # }
/// ```
pub async fn process_image(image: &RawImage) -> Result<PipelineResult, AdvisorError> {
    let config = AdvisorConfig::load().map_err(|e| AdvisorError::from(e).into_pipeline())?;
    let pipeline = RecipePipeline::from_config(&config).map_err(AdvisorError::into_pipeline)?;
    pipeline.process(image).await
}

/// Convenience wrapper around [`process_image`] for a file on disk
pub async fn process_image_file(path: &str) -> Result<PipelineResult, AdvisorError> {
    process_image(&RawImage::from_path(path)).await
}
