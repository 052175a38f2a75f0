//! UniFFI bindings for bite-advisor
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::{AdvisorError, BiteAdvisor, Nutrition, PipelineResult, Recipe};

// Re-export UniFFI macro
#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible nutrition summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiNutrition {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl From<Nutrition> for FfiNutrition {
    fn from(n: Nutrition) -> Self {
        FfiNutrition {
            calories: n.calories,
            protein: n.protein,
            carbs: n.carbs,
            fat: n.fat,
        }
    }
}

/// FFI-compatible recipe structure
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiRecipe {
    pub id: i64,
    pub title: String,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub image: String,
    pub matched_ingredients: u32,
    pub missed_ingredients: u32,
    pub source_url: Option<String>,
    pub summary: String,
    pub nutrition: FfiNutrition,
    /// Instruction entries; plain strings as-is, structured entries as JSON
    pub instructions: Vec<String>,
}

impl From<Recipe> for FfiRecipe {
    fn from(recipe: Recipe) -> Self {
        FfiRecipe {
            id: recipe.id,
            title: recipe.title,
            ready_in_minutes: recipe.ready_in_minutes,
            servings: recipe.servings,
            image: recipe.image,
            matched_ingredients: recipe.matched_ingredients,
            missed_ingredients: recipe.missed_ingredients,
            source_url: recipe.source_url,
            summary: recipe.summary,
            nutrition: recipe.nutrition.into(),
            instructions: recipe
                .instructions
                .into_iter()
                .map(|entry| match entry {
                    Value::String(text) => text,
                    other => other.to_string(),
                })
                .collect(),
        }
    }
}

/// FFI-compatible pipeline result
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiPipelineResult {
    pub ingredients: Vec<String>,
    pub recipes: Vec<FfiRecipe>,
}

impl From<PipelineResult> for FfiPipelineResult {
    fn from(result: PipelineResult) -> Self {
        FfiPipelineResult {
            ingredients: result.ingredients,
            recipes: result.recipes.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-compatible error type.
///
/// Front-ends show `message` as-is; the variant only helps with styling.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiAdvisorError {
    /// The pipeline ran and failed
    ProcessingFailed { message: String },
    /// A credential or setting is missing or invalid
    ConfigError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiAdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiAdvisorError::ProcessingFailed { message } => write!(f, "{}", message),
            FfiAdvisorError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiAdvisorError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiAdvisorError {}

impl From<AdvisorError> for FfiAdvisorError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::ConfigError(e) => FfiAdvisorError::ConfigError {
                message: e.to_string(),
            },
            AdvisorError::DemoTableError(msg) | AdvisorError::BuilderError(msg) => {
                FfiAdvisorError::ConfigError { message: msg }
            }
            other => FfiAdvisorError::ProcessingFailed {
                message: other.to_string(),
            },
        }
    }
}

/// Configuration overrides for FFI calls
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiAdvisorConfig {
    /// Optional Gemini API key (uses environment variable if not specified)
    pub vision_api_key: Option<String>,
    /// Optional Spoonacular API key (uses environment variable if not specified)
    pub recipe_api_key: Option<String>,
    /// Optional Gemini model name
    pub model: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiAdvisorError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiAdvisorError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

fn apply_config(
    mut builder: crate::BiteAdvisorBuilder,
    config: Option<FfiAdvisorConfig>,
) -> crate::BiteAdvisorBuilder {
    let config = config.unwrap_or_default();

    if let Some(key) = config.vision_api_key {
        builder = builder.vision_api_key(key);
    }
    if let Some(key) = config.recipe_api_key {
        builder = builder.recipe_api_key(key);
    }
    if let Some(model) = config.model {
        builder = builder.model(model);
    }
    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }
    builder
}

/// Detect ingredients in an image file and find recipes
///
/// # Arguments
/// * `image_path` - Path to the image file
/// * `config` - Optional configuration overrides
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn process_image_file(
    image_path: String,
    config: Option<FfiAdvisorConfig>,
) -> Result<FfiPipelineResult, FfiAdvisorError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let builder = apply_config(BiteAdvisor::builder().image_path(image_path), config);
        let result = builder.build().await?;
        Ok::<_, FfiAdvisorError>(result.into())
    })
}

/// Detect ingredients in in-memory image data and find recipes
///
/// # Arguments
/// * `data` - Raw image bytes
/// * `mime_type` - Declared MIME type, e.g. "image/jpeg"
/// * `config` - Optional configuration overrides
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn process_image_data(
    data: Vec<u8>,
    mime_type: String,
    config: Option<FfiAdvisorConfig>,
) -> Result<FfiPipelineResult, FfiAdvisorError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let builder = apply_config(BiteAdvisor::builder().image_bytes(data, mime_type), config);
        let result = builder.build().await?;
        Ok::<_, FfiAdvisorError>(result.into())
    })
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check if a vision API key is configured
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn is_detector_available() -> bool {
    crate::AdvisorConfig::load()
        .map(|c| c.vision.api_key.is_some())
        .unwrap_or(false)
}

/// Check if a recipe API key is configured.
///
/// Without one, only demo recipes are returned.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn is_recipe_api_available() -> bool {
    crate::AdvisorConfig::load()
        .map(|c| c.recipes.api_key.is_some())
        .unwrap_or(false)
}
