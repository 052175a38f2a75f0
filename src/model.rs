use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized ingredient token as produced by the detector
pub type Ingredient = String;

/// Per-serving nutrition summary. Unknown values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: u32,
    #[serde(default)]
    pub protein: u32,
    #[serde(default)]
    pub carbs: u32,
    #[serde(default)]
    pub fat: u32,
}

/// A recipe suggestion, either from the demo table or the live recipe API.
///
/// Serialized with camelCase keys (`readyInMinutes`, `matchedIngredients`, ...)
/// so front-ends can consume it unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub ready_in_minutes: u32,
    pub servings: u32,
    pub image: String,
    #[serde(default)]
    pub matched_ingredients: u32,
    #[serde(default)]
    pub missed_ingredients: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub summary: String,
    #[serde(default)]
    pub nutrition: Nutrition,
    /// Opaque instruction entries, passed through from the source
    #[serde(default)]
    pub instructions: Vec<Value>,
}

/// Successful output of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub ingredients: Vec<Ingredient>,
    pub recipes: Vec<Recipe>,
}

impl Recipe {
    /// Short human-readable listing used by the CLI
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("# {}\n", self.title));
        output.push_str(&format!(
            "ready in {} minutes, serves {}\n",
            self.ready_in_minutes, self.servings
        ));
        output.push_str(&format!(
            "uses {} of your ingredients, needs {} more\n",
            self.matched_ingredients, self.missed_ingredients
        ));
        output.push_str(&format!(
            "{} kcal, {}g protein, {}g carbs, {}g fat\n",
            self.nutrition.calories,
            self.nutrition.protein,
            self.nutrition.carbs,
            self.nutrition.fat
        ));
        if let Some(url) = &self.source_url {
            output.push_str(&format!("source: {}\n", url));
        }
        output.push('\n');
        output.push_str(&self.summary);
        output.push('\n');
        output
    }
}
