use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::format::{format_recipe, rank_recipes, RecipeDetail, SearchHit};
use super::RecipeLookup;
use crate::config::{RecipeApiConfig, SPOONACULAR_API_KEY_ENV};
use crate::http::build_client;
use crate::model::Recipe;
use crate::AdvisorError;

/// Live recipe lookup against the Spoonacular API
pub struct SpoonacularClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    search_results: u32,
    detail_results: usize,
}

impl SpoonacularClient {
    /// Create a new client from configuration.
    ///
    /// A missing API key is reported on the first lookup, not here.
    pub fn new(config: &RecipeApiConfig, timeout: Option<Duration>) -> Result<Self, AdvisorError> {
        Ok(SpoonacularClient {
            client: build_client(timeout)?,
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_results: config.search_results,
            detail_results: config.detail_results,
        })
    }

    async fn search(
        &self,
        ingredients: &[String],
        api_key: &str,
    ) -> Result<Vec<SearchHit>, AdvisorError> {
        let url = format!("{}/recipes/findByIngredients", self.base_url);
        let number = self.search_results.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ingredients", ingredients.join(",").as_str()),
                ("number", number.as_str()),
                ("ranking", "1"),
                ("ignorePantry", "true"),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Spoonacular search failed with {}", status);
            return Err(AdvisorError::SearchError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        read_json(response, "search").await
    }

    async fn details(&self, ids: &[i64], api_key: &str) -> Result<Vec<RecipeDetail>, AdvisorError> {
        let url = format!("{}/recipes/informationBulk", self.base_url);
        let ids = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", ids.as_str()),
                ("includeNutrition", "true"),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            warn!("Spoonacular detail fetch failed with {}", status);
            return Err(AdvisorError::DetailFetchError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        read_json(response, "detail").await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, AdvisorError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        AdvisorError::InvalidResponseError(format!("Spoonacular {} response: {}", what, e))
    })
}

/// Find the search hit for a detail record: by id first, then by position
fn hit_for<'a>(hits: &'a [SearchHit], id: i64, index: usize) -> Option<&'a SearchHit> {
    hits.iter().find(|h| h.id == id).or_else(|| {
        let positional = hits.get(index);
        if positional.is_some() {
            debug!("No search hit with id {}, using position {}", id, index);
        }
        positional
    })
}

#[async_trait]
impl RecipeLookup for SpoonacularClient {
    fn name(&self) -> &str {
        "spoonacular"
    }

    async fn lookup(&self, ingredients: &[String]) -> Result<Vec<Recipe>, AdvisorError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AdvisorError::ConfigurationError(format!(
                "Spoonacular API key not found. Set BITE__RECIPES__API_KEY or {}",
                SPOONACULAR_API_KEY_ENV
            ))
        })?;

        info!("Searching Spoonacular for recipes with {:?}", ingredients);
        let hits = self.search(ingredients, api_key).await?;

        if hits.is_empty() {
            info!("No recipes found on Spoonacular");
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = hits
            .iter()
            .take(self.detail_results)
            .map(|h| h.id)
            .collect();
        debug!("Fetching details for recipes {:?}", ids);
        let details = self.details(&ids, api_key).await?;

        let mut recipes: Vec<Recipe> = details
            .into_iter()
            .enumerate()
            .map(|(index, detail)| {
                let hit = hit_for(&hits, detail.id, index);
                format_recipe(detail, hit)
            })
            .collect();

        rank_recipes(&mut recipes);
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: i64, used: u32) -> SearchHit {
        SearchHit {
            id,
            title: None,
            used_ingredient_count: used,
            missed_ingredient_count: 0,
        }
    }

    #[test]
    fn test_lookup_name() {
        let client = SpoonacularClient::new(&RecipeApiConfig::default(), None).unwrap();
        assert_eq!(client.name(), "spoonacular");
    }

    #[test]
    fn test_hit_for_prefers_id() {
        let hits = vec![hit(10, 1), hit(20, 2), hit(30, 3)];
        assert_eq!(hit_for(&hits, 30, 0).unwrap().used_ingredient_count, 3);
        assert_eq!(hit_for(&hits, 99, 1).unwrap().used_ingredient_count, 2);
        assert!(hit_for(&hits, 99, 7).is_none());
    }
}
