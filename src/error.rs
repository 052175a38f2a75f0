use thiserror::Error;

/// Errors that can occur while turning a photo into recipes
#[derive(Error, Debug)]
pub enum AdvisorError {
    /// A required credential or setting is missing
    #[error("{0}")]
    ConfigurationError(String),

    /// The image could not be read or encoded
    #[error("Failed to encode image: {0}")]
    EncodingError(String),

    /// The vision endpoint answered with a non-2xx status
    #[error("{}", detection_message(.status, .reason))]
    DetectionError { status: u16, reason: String },

    /// The recipe search endpoint answered with a non-2xx status
    #[error("Recipe search error: {status} - {reason}")]
    SearchError { status: u16, reason: String },

    /// The recipe detail endpoint answered with a non-2xx status
    #[error("Recipe details error: {status} - {reason}")]
    DetailFetchError { status: u16, reason: String },

    /// A 2xx response did not have the expected shape
    #[error("Invalid response structure: {0}")]
    InvalidResponseError(String),

    /// Transport-level HTTP failure
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The detector ran but found nothing usable
    #[error("No ingredients detected in the image. Please try a clearer image with visible ingredients.")]
    NoIngredientsDetected,

    /// Uniform wrapper produced by the pipeline for any stage failure
    #[error("Recipe processing failed: {source}")]
    Pipeline {
        #[source]
        source: Box<AdvisorError>,
    },

    /// The demo recipe table could not be loaded
    #[error("Demo table error: {0}")]
    DemoTableError(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration file or environment could not be parsed
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl AdvisorError {
    /// Wrap this error into the single user-facing pipeline error.
    ///
    /// Already-wrapped errors are returned unchanged.
    pub fn into_pipeline(self) -> Self {
        match self {
            AdvisorError::Pipeline { .. } => self,
            other => AdvisorError::Pipeline {
                source: Box::new(other),
            },
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AdvisorError::DetectionError { status, .. }
            | AdvisorError::SearchError { status, .. }
            | AdvisorError::DetailFetchError { status, .. } => Some(*status),
            AdvisorError::RequestError(e) => e.status().map(|s| s.as_u16()),
            AdvisorError::Pipeline { source } => source.status(),
            _ => None,
        }
    }
}

// 404, 403 and 400 each point the user at a different fix.
fn detection_message(status: &u16, reason: &str) -> String {
    match *status {
        404 => format!(
            "Vision API endpoint not found ({} - {}). Please check your API configuration.",
            status, reason
        ),
        403 => format!(
            "Vision API access denied ({} - {}). Please check your API key permissions.",
            status, reason
        ),
        400 => format!(
            "Invalid request to vision API ({} - {}). Please check the image format.",
            status, reason
        ),
        _ => format!(
            "Failed to detect ingredients from image ({} - {}). Please try again.",
            status, reason
        ),
    }
}
