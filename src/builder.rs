use std::sync::Arc;
use std::time::Duration;

use crate::config::AdvisorConfig;
use crate::image::RawImage;
use crate::recipes::DemoTable;
use crate::{AdvisorError, PipelineResult, RecipePipeline};

/// Builder for configuring and running the photo → recipes pipeline
#[derive(Debug, Default)]
pub struct BiteAdvisorBuilder {
    image: Option<RawImage>,
    config: Option<AdvisorConfig>,
    vision_api_key: Option<String>,
    recipe_api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    demo_table: Option<DemoTable>,
}

impl BiteAdvisorBuilder {
    /// Set the input to an image file
    ///
    /// # Example
    /// ```
    /// use bite_advisor::BiteAdvisor;
    ///
    /// let builder = BiteAdvisor::builder()
    ///     .image_path("/path/to/fridge.jpg");
    /// ```
    pub fn image_path(mut self, path: impl Into<String>) -> Self {
        self.image = Some(RawImage::from_path(path));
        self
    }

    /// Set the input to raw image bytes with their MIME type
    ///
    /// # Example
    /// ```
    /// use bite_advisor::BiteAdvisor;
    ///
    /// let bytes = vec![0xff, 0xd8, 0xff];
    /// let builder = BiteAdvisor::builder()
    ///     .image_bytes(bytes, "image/jpeg");
    /// ```
    pub fn image_bytes(mut self, data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        self.image = Some(RawImage::from_bytes(data, mime_type));
        self
    }

    /// Set the input to a `data:` URL, as produced by browser file readers
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.image = Some(RawImage::from_data_url(url));
        self
    }

    /// Start from an explicit configuration instead of `config.toml` and the environment
    pub fn config(mut self, config: AdvisorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the Gemini API key
    ///
    /// # Example
    /// ```
    /// use bite_advisor::BiteAdvisor;
    ///
    /// let builder = BiteAdvisor::builder()
    ///     .image_path("/path/to/fridge.jpg")
    ///     .vision_api_key("your-gemini-key");
    /// ```
    pub fn vision_api_key(mut self, key: impl Into<String>) -> Self {
        self.vision_api_key = Some(key.into());
        self
    }

    /// Set the Spoonacular API key
    pub fn recipe_api_key(mut self, key: impl Into<String>) -> Self {
        self.recipe_api_key = Some(key.into());
        self
    }

    /// Set the Gemini model name
    ///
    /// # Example
    /// ```
    /// use bite_advisor::BiteAdvisor;
    ///
    /// let builder = BiteAdvisor::builder()
    ///     .model("gemini-2.0-flash");
    /// ```
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set a timeout for every HTTP request
    ///
    /// # Example
    /// ```
    /// use bite_advisor::BiteAdvisor;
    /// use std::time::Duration;
    ///
    /// let builder = BiteAdvisor::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Replace the demo recipe table
    pub fn demo_table(mut self, table: DemoTable) -> Self {
        self.demo_table = Some(table);
        self
    }

    fn resolved_config(&mut self) -> Result<AdvisorConfig, AdvisorError> {
        let mut config = match self.config.take() {
            Some(config) => config,
            None => AdvisorConfig::load()?,
        };

        if let Some(key) = self.vision_api_key.take() {
            config.vision.api_key = Some(key);
        }
        if let Some(key) = self.recipe_api_key.take() {
            config.recipes.api_key = Some(key);
        }
        if let Some(model) = self.model.take() {
            config.vision.model = model;
        }
        if let Some(timeout) = self.timeout {
            // sub-second timeouts round up so they never disable the timeout
            config.timeout = timeout.as_secs().max(1);
        }
        Ok(config)
    }

    /// Build a reusable pipeline without running it
    pub fn into_pipeline(mut self) -> Result<RecipePipeline, AdvisorError> {
        let config = self.resolved_config()?;
        match self.demo_table.take() {
            Some(table) => RecipePipeline::from_config_with_table(&config, Arc::new(table)),
            None => RecipePipeline::from_config(&config),
        }
    }

    /// Build the pipeline and run it on the configured image
    ///
    /// # Errors
    /// Returns `BuilderError` if no image was set, otherwise any error from
    /// [`RecipePipeline::process`]
    ///
    /// # Example
    /// ```no_run
    /// # use bite_advisor::BiteAdvisor;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let result = BiteAdvisor::builder()
    ///     .image_path("/path/to/fridge.jpg")
    ///     .build()
    ///     .await?;
    /// println!("{:?}", result.ingredients);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(mut self) -> Result<PipelineResult, AdvisorError> {
        let image = self.image.take().ok_or_else(|| {
            AdvisorError::BuilderError(
                "No image specified. Use .image_path(), .image_bytes() or .data_url()".to_string(),
            )
        })?;

        let pipeline = self.into_pipeline()?;
        pipeline.process(&image).await
    }
}

/// Main entry point for the builder API
pub struct BiteAdvisor;

impl BiteAdvisor {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use bite_advisor::BiteAdvisor;
    ///
    /// let builder = BiteAdvisor::builder();
    /// ```
    pub fn builder() -> BiteAdvisorBuilder {
        BiteAdvisorBuilder::default()
    }
}
