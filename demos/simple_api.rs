//! Simple API usage with convenience functions
//!
//! This example reads configuration from `config.toml` and the environment
//! (GEMINI_API_KEY, SPOONACULAR_API_KEY) and runs one photo through the
//! pipeline.
//!
//! Usage: cargo run --example simple_api -- path/to/fridge.jpg

use bite_advisor::process_image_file;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "fridge.jpg".to_string());

    let result = process_image_file(&path).await?;

    println!("=== Detected Ingredients ===");
    for ingredient in &result.ingredients {
        println!("- {}", ingredient);
    }

    println!("\n=== Recipes ===");
    if result.recipes.is_empty() {
        println!("No recipes found.");
    }
    for recipe in &result.recipes {
        println!("{}", recipe.to_text());
    }

    Ok(())
}
