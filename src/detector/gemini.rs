use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde_json::{json, Value};

use super::{parse_ingredients, IngredientDetector, INGREDIENT_DETECTION_PROMPT};
use crate::config::{VisionConfig, GEMINI_API_KEY_ENV};
use crate::http::build_client;
use crate::image::{self, RawImage};
use crate::model::Ingredient;
use crate::AdvisorError;

/// Ingredient detector backed by Google Gemini `generateContent`
pub struct GeminiDetector {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

impl GeminiDetector {
    /// Create a new Gemini detector from configuration.
    ///
    /// A missing API key is not an error here; it is reported on the first
    /// call to [`IngredientDetector::detect`].
    pub fn new(
        config: &VisionConfig,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, AdvisorError> {
        Ok(GeminiDetector {
            client: build_client(timeout)?,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            top_p: config.top_p,
            top_k: config.top_k,
        })
    }

    fn request_body(&self, mime_type: &str, data: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": INGREDIENT_DETECTION_PROMPT },
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": data
                        }
                    }
                ]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens,
                "topP": self.top_p,
                "topK": self.top_k
            }
        })
    }
}

#[async_trait]
impl IngredientDetector for GeminiDetector {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn detect(&self, image: &RawImage) -> Result<Vec<Ingredient>, AdvisorError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AdvisorError::ConfigurationError(format!(
                "Gemini API key not found. Set BITE__VISION__API_KEY or {}",
                GEMINI_API_KEY_ENV
            ))
        })?;

        let data = image::encode(image).await?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        debug!("Sending {} image to Gemini model {}", image.mime_type, self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&self.request_body(&image.mime_type, &data))
            .send()
            .await?;

        // Check for HTTP errors
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error ({}): {}", status, error_text);
            return Err(AdvisorError::DetectionError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let response_body: Value = response.json().await.map_err(|e| {
            AdvisorError::InvalidResponseError(format!("Gemini response is not JSON: {}", e))
        })?;
        debug!("Gemini response: {:?}", response_body);

        if let Some(error) = response_body.get("error") {
            let error_message = error["message"].as_str().unwrap_or("Unknown error");
            return Err(AdvisorError::InvalidResponseError(format!(
                "Gemini returned an error body: {}",
                error_message
            )));
        }

        let text = response_body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AdvisorError::InvalidResponseError(
                    "expected candidates[0].content.parts[0].text in Gemini response".to_string(),
                )
            })?;

        debug!("Raw ingredients text: {}", text.trim());

        let ingredients = parse_ingredients(text);
        debug!("Parsed ingredients: {:?}", ingredients);

        Ok(ingredients)
    }
}
