use log::{debug, error, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::AdvisorConfig;
use crate::detector::{GeminiDetector, IngredientDetector};
use crate::image::RawImage;
use crate::model::PipelineResult;
use crate::recipes::{default_table, DemoTable, RecipeMatcher, SpoonacularClient};
use crate::AdvisorError;

/// Photo → ingredients → recipes
///
/// This pipeline:
/// 1. Detects ingredients in the image
/// 2. Rejects the run if nothing was detected
/// 3. Finds matching recipes (demo table, then live API)
///
/// Any failure is reported as a single [`AdvisorError::Pipeline`] error.
pub struct RecipePipeline {
    detector: Box<dyn IngredientDetector>,
    matcher: RecipeMatcher,
}

impl RecipePipeline {
    pub fn new(detector: Box<dyn IngredientDetector>, matcher: RecipeMatcher) -> Self {
        RecipePipeline { detector, matcher }
    }

    /// Wire up Gemini, Spoonacular and the demo table from configuration
    pub fn from_config(config: &AdvisorConfig) -> Result<Self, AdvisorError> {
        let table = match &config.demo.table_path {
            Some(path) => Arc::new(DemoTable::from_json_file(path)?),
            None => default_table(),
        };
        Self::from_config_with_table(config, table)
    }

    pub fn from_config_with_table(
        config: &AdvisorConfig,
        table: Arc<DemoTable>,
    ) -> Result<Self, AdvisorError> {
        let timeout = config.request_timeout();
        let detector = GeminiDetector::new(&config.vision, timeout)?;
        let lookup = SpoonacularClient::new(&config.recipes, timeout)?;
        let matcher = RecipeMatcher::new(table, Box::new(lookup)).with_settings(&config.demo);

        Ok(Self::new(Box::new(detector), matcher))
    }

    /// Process an image and return the detected ingredients with matching recipes
    ///
    /// # Errors
    /// Every failure is wrapped as `AdvisorError::Pipeline`, whose message is
    /// "Recipe processing failed: " followed by the original message.
    pub async fn process(&self, image: &RawImage) -> Result<PipelineResult, AdvisorError> {
        self.run(image).await.map_err(|e| {
            error!("Image processing pipeline failed: {}", e);
            e.into_pipeline()
        })
    }

    async fn run(&self, image: &RawImage) -> Result<PipelineResult, AdvisorError> {
        info!("Detecting ingredients with {}", self.detector.name());
        let ingredients = self.detector.detect(image).await?;

        if ingredients.is_empty() {
            return Err(AdvisorError::NoIngredientsDetected);
        }
        info!("Detected ingredients: {:?}", ingredients);

        let recipes = self.matcher.find_recipes(&ingredients).await;
        info!("Found {} matching recipes", recipes.len());

        Ok(PipelineResult {
            ingredients,
            recipes,
        })
    }
}

/// Outcome of a run submitted through a [`PipelineSession`]
#[derive(Debug)]
pub enum SessionOutcome {
    /// This was the most recent upload; show its result
    Completed(Result<PipelineResult, AdvisorError>),
    /// A newer upload started while this one was running; ignore it
    Superseded,
}

/// One UI session's view of the pipeline.
///
/// Each upload takes a ticket. When a run finishes after a newer upload was
/// submitted, its outcome is [`SessionOutcome::Superseded`].
pub struct PipelineSession {
    pipeline: Arc<RecipePipeline>,
    latest: AtomicU64,
}

impl PipelineSession {
    pub fn new(pipeline: Arc<RecipePipeline>) -> Self {
        PipelineSession {
            pipeline,
            latest: AtomicU64::new(0),
        }
    }

    pub async fn submit(&self, image: &RawImage) -> SessionOutcome {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.pipeline.process(image).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            debug!("Discarding stale pipeline result for upload {}", ticket);
            return SessionOutcome::Superseded;
        }
        SessionOutcome::Completed(result)
    }
}
