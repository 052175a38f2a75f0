//! Basic builder usage
//!
//! Shows explicit API keys, a custom demo table and a session that drops
//! results of superseded uploads.
//!
//! Usage: cargo run --example builder_basic -- path/to/fridge.jpg

use bite_advisor::recipes::DemoTable;
use bite_advisor::{BiteAdvisor, Nutrition, PipelineSession, RawImage, Recipe, SessionOutcome};
use std::sync::Arc;
use std::time::Duration;

fn breakfast_table() -> DemoTable {
    DemoTable::new().with_entry(
        &["egg", "bread", "butter"],
        vec![Recipe {
            id: 9001,
            title: "Buttered Egg Toast".to_string(),
            ready_in_minutes: 10,
            servings: 1,
            image: "https://example.com/egg-toast.jpg".to_string(),
            matched_ingredients: 3,
            missed_ingredients: 0,
            source_url: None,
            summary: "Crispy toast topped with a soft fried egg.".to_string(),
            nutrition: Nutrition {
                calories: 310,
                protein: 13,
                carbs: 28,
                fat: 16,
            },
            instructions: Vec::new(),
        }],
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fridge.jpg".to_string());
    let gemini_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

    // One-shot run
    println!("=== Builder ===");
    let result = BiteAdvisor::builder()
        .image_path(path.clone())
        .vision_api_key(gemini_key.clone())
        .timeout(Duration::from_secs(20))
        .demo_table(breakfast_table())
        .build()
        .await?;
    println!("Ingredients: {}", result.ingredients.join(", "));
    for recipe in &result.recipes {
        println!("- {} ({} min)", recipe.title, recipe.ready_in_minutes);
    }

    // Reusable pipeline behind a session
    println!("\n=== Session ===");
    let pipeline = BiteAdvisor::builder()
        .vision_api_key(gemini_key)
        .into_pipeline()?;
    let session = PipelineSession::new(Arc::new(pipeline));

    match session.submit(&RawImage::from_path(path)).await {
        SessionOutcome::Completed(Ok(result)) => {
            println!("Found {} recipes", result.recipes.len());
        }
        SessionOutcome::Completed(Err(e)) => println!("{}", e),
        SessionOutcome::Superseded => println!("A newer upload replaced this one"),
    }

    Ok(())
}
