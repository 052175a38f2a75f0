use bite_advisor::config::{AdvisorConfig, DemoConfig, RecipeApiConfig, VisionConfig};
use bite_advisor::recipes::DemoTable;
use bite_advisor::{AdvisorError, BiteAdvisor, Nutrition, RawImage, Recipe, RecipePipeline};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn config(server: &ServerGuard) -> AdvisorConfig {
    AdvisorConfig {
        vision: VisionConfig {
            api_key: Some("gemini-key".to_string()),
            base_url: server.url(),
            ..Default::default()
        },
        recipes: RecipeApiConfig {
            api_key: Some("spoon-key".to_string()),
            base_url: server.url(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn recipe(id: i64, title: &str) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        ready_in_minutes: 20,
        servings: 2,
        image: "https://example.com/dish.jpg".to_string(),
        matched_ingredients: 3,
        missed_ingredients: 0,
        source_url: None,
        summary: "Simple and quick.".to_string(),
        nutrition: Nutrition {
            calories: 300,
            protein: 10,
            carbs: 20,
            fat: 15,
        },
        instructions: Vec::new(),
    }
}

fn tomato_table() -> DemoTable {
    DemoTable::new().with_entry(
        &["tomato", "onion", "garlic"],
        vec![recipe(1, "Tomato Soup"), recipe(2, "Salsa")],
    )
}

fn image() -> RawImage {
    RawImage::from_bytes(b"fake jpeg bytes".to_vec(), "image/jpeg")
}

async fn mock_gemini(server: &mut ServerGuard, text: &str) -> mockito::Mock {
    let body = json!({
        "candidates": [{ "content": { "parts": [{ "text": text }], "role": "model" } }]
    });
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), "gemini-key".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_demo_hit_skips_recipe_api() {
    let mut server = Server::new_async().await;
    let gemini = mock_gemini(&mut server, "tomato, onion, garlic").await;
    let search = server
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let pipeline =
        RecipePipeline::from_config_with_table(&config(&server), Arc::new(tomato_table())).unwrap();
    let result = pipeline.process(&image()).await.unwrap();

    assert_eq!(result.ingredients, vec!["tomato", "onion", "garlic"]);
    assert_eq!(result.recipes, tomato_table().get("garlic,onion,tomato").unwrap());

    gemini.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn test_no_ingredients_reply_fails_pipeline() {
    let mut server = Server::new_async().await;
    let _gemini = mock_gemini(&mut server, "No ingredients found").await;
    let search = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let pipeline =
        RecipePipeline::from_config_with_table(&config(&server), Arc::new(tomato_table())).unwrap();
    let err = pipeline.process(&image()).await.unwrap_err();

    assert!(matches!(err, AdvisorError::Pipeline { .. }));
    assert!(err.to_string().starts_with("Recipe processing failed: "));
    assert!(err.to_string().contains("clearer image"));
    search.assert_async().await;
}

#[tokio::test]
async fn test_live_lookup_failure_falls_back_to_first_bundle() {
    let mut server = Server::new_async().await;
    let _gemini = mock_gemini(&mut server, "beef, potato").await;
    let search = server
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let pipeline =
        RecipePipeline::from_config_with_table(&config(&server), Arc::new(tomato_table())).unwrap();
    let result = pipeline.process(&image()).await.unwrap();

    assert_eq!(result.ingredients, vec!["beef", "potato"]);
    let titles: Vec<&str> = result.recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Tomato Soup", "Salsa"]);
    search.assert_async().await;
}

#[tokio::test]
async fn test_live_lookup_failure_without_fallback_is_empty() {
    let mut server = Server::new_async().await;
    let _gemini = mock_gemini(&mut server, "beef, potato").await;
    let _search = server
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let mut config = config(&server);
    config.demo = DemoConfig {
        fallback_on_error: false,
        ..Default::default()
    };
    let pipeline =
        RecipePipeline::from_config_with_table(&config, Arc::new(tomato_table())).unwrap();
    let result = pipeline.process(&image()).await.unwrap();

    assert_eq!(result.ingredients, vec!["beef", "potato"]);
    assert!(result.recipes.is_empty());
}

#[tokio::test]
async fn test_builder_runs_pipeline_with_explicit_config() {
    let mut server = Server::new_async().await;
    let gemini = mock_gemini(&mut server, "Garlic, Tomato, Onion").await;

    let result = BiteAdvisor::builder()
        .config(config(&server))
        .demo_table(tomato_table())
        .image_bytes(b"fake jpeg bytes".to_vec(), "image/jpeg")
        .build()
        .await
        .unwrap();

    assert_eq!(result.ingredients, vec!["garlic", "tomato", "onion"]);
    assert_eq!(result.recipes.len(), 2);
    gemini.assert_async().await;
}

#[tokio::test]
async fn test_builder_without_image_fails() {
    let server = Server::new_async().await;
    let result = BiteAdvisor::builder().config(config(&server)).build().await;

    assert!(matches!(result, Err(AdvisorError::BuilderError(_))));
}
