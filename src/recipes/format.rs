use html_escape::decode_html_entities;
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::model::{Nutrition, Recipe};

pub const DEFAULT_READY_IN_MINUTES: u32 = 30;
pub const DEFAULT_SERVINGS: u32 = 2;
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1546554137-f86b9593a222?w=300&h=200&fit=crop";
pub const NO_DESCRIPTION: &str = "No description available.";
const UNTITLED: &str = "Untitled recipe";

/// One entry of the search-by-ingredients response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub used_ingredient_count: u32,
    #[serde(default)]
    pub missed_ingredient_count: u32,
}

/// One entry of the bulk recipe information response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    pub id: i64,
    pub title: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub image: Option<String>,
    pub source_url: Option<String>,
    pub summary: Option<String>,
    pub nutrition: Option<NutritionInfo>,
    pub instructions: Option<Value>,
    pub analyzed_instructions: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NutritionInfo {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

/// Either field may be absent or null; an unknown amount counts as 0
#[derive(Debug, Clone, Deserialize)]
pub struct Nutrient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// Build a [`Recipe`] from a detail record and the search hit it came from.
///
/// Matched/missed counts come from `hit`; both are 0 when there is no hit.
pub fn format_recipe(detail: RecipeDetail, hit: Option<&SearchHit>) -> Recipe {
    let nutrition = Nutrition {
        calories: nutrient_amount(&detail, "Calories"),
        protein: nutrient_amount(&detail, "Protein"),
        carbs: nutrient_amount(&detail, "Carbohydrates"),
        fat: nutrient_amount(&detail, "Fat"),
    };

    let instructions = detail
        .instructions
        .as_ref()
        .and_then(instruction_entries)
        .or_else(|| {
            detail
                .analyzed_instructions
                .as_ref()
                .and_then(instruction_entries)
        })
        .unwrap_or_default();

    Recipe {
        id: detail.id,
        title: detail
            .title
            .filter(|t| !t.trim().is_empty())
            .map(|t| decode_html_entities(t.trim()).into_owned())
            .unwrap_or_else(|| UNTITLED.to_string()),
        ready_in_minutes: detail
            .ready_in_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_READY_IN_MINUTES),
        servings: detail
            .servings
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_SERVINGS),
        image: detail
            .image
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        matched_ingredients: hit.map(|h| h.used_ingredient_count).unwrap_or(0),
        missed_ingredients: hit.map(|h| h.missed_ingredient_count).unwrap_or(0),
        source_url: detail.source_url.filter(|u| !u.trim().is_empty()),
        summary: detail
            .summary
            .as_deref()
            .map(strip_html)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        nutrition,
        instructions,
    }
}

/// Sort best matches first. The sort is stable, so ties keep source order.
pub fn rank_recipes(recipes: &mut [Recipe]) {
    recipes.sort_by(|a, b| b.matched_ingredients.cmp(&a.matched_ingredients));
}

/// Remove markup and decode entities, leaving plain text
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.trim().to_string()
}

fn nutrient_amount(detail: &RecipeDetail, name: &str) -> u32 {
    detail
        .nutrition
        .as_ref()
        .and_then(|n| {
            n.nutrients
                .iter()
                .find(|nutrient| nutrient.name.as_deref() == Some(name))
        })
        .and_then(|nutrient| nutrient.amount)
        .filter(|amount| amount.is_finite() && *amount > 0.0)
        .map(|amount| amount.round() as u32)
        .unwrap_or(0)
}

/// Instructions may be a plain (possibly HTML) string or an array of steps
fn instruction_entries(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(vec![Value::String(text.clone())]),
        Value::Array(entries) => Some(entries.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hit(id: i64, used: u32, missed: u32) -> SearchHit {
        SearchHit {
            id,
            title: None,
            used_ingredient_count: used,
            missed_ingredient_count: missed,
        }
    }

    #[test]
    fn test_format_defaults_for_sparse_record() {
        let detail = RecipeDetail {
            id: 42,
            title: Some("Plain Rice".to_string()),
            ..Default::default()
        };

        let recipe = format_recipe(detail, None);
        assert_eq!(recipe.id, 42);
        assert_eq!(recipe.ready_in_minutes, 30);
        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.image, PLACEHOLDER_IMAGE);
        assert_eq!(recipe.summary, NO_DESCRIPTION);
        assert_eq!(recipe.nutrition, Nutrition::default());
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.matched_ingredients, 0);
        assert_eq!(recipe.missed_ingredients, 0);
        assert!(recipe.source_url.is_none());
    }

    #[test]
    fn test_format_full_record() {
        let detail: RecipeDetail = serde_json::from_value(json!({
            "id": 716429,
            "title": "Pasta with Garlic, Scallions &amp; Cauliflower",
            "readyInMinutes": 45,
            "servings": 2,
            "image": "https://img.spoonacular.com/recipes/716429-556x370.jpg",
            "sourceUrl": "https://fullbellysisters.blogspot.com/2012/06/pasta.html",
            "summary": "You can never have <b>too many</b> main course recipes.",
            "nutrition": {
                "nutrients": [
                    { "name": "Calories", "amount": 584.46, "unit": "kcal" },
                    { "name": "Fat", "amount": 19.83, "unit": "g" },
                    { "name": "Carbohydrates", "amount": 83.92, "unit": "g" },
                    { "name": "Protein", "amount": 19.2, "unit": "g" },
                    { "name": "Saturated Fat", "amount": 7.9, "unit": "g" }
                ]
            },
            "instructions": "",
            "analyzedInstructions": [{ "name": "", "steps": [{ "number": 1, "step": "Boil." }] }]
        }))
        .unwrap();

        let recipe = format_recipe(detail, Some(&hit(716429, 3, 1)));
        assert_eq!(recipe.title, "Pasta with Garlic, Scallions & Cauliflower");
        assert_eq!(recipe.ready_in_minutes, 45);
        assert_eq!(recipe.summary, "You can never have too many main course recipes.");
        assert_eq!(
            recipe.nutrition,
            Nutrition {
                calories: 584,
                protein: 19,
                carbs: 84,
                fat: 20,
            }
        );
        assert_eq!(recipe.matched_ingredients, 3);
        assert_eq!(recipe.missed_ingredients, 1);
        assert_eq!(recipe.instructions.len(), 1);
        assert_eq!(recipe.instructions[0]["steps"][0]["step"], "Boil.");
    }

    #[test]
    fn test_null_nutrient_amount_counts_as_zero() {
        let details: Vec<RecipeDetail> = serde_json::from_str(
            r#"[{
                "id": 1,
                "title": "X",
                "nutrition": {
                    "nutrients": [
                        { "name": "Calories", "amount": null },
                        { "amount": 12.0 },
                        { "name": "Protein", "amount": 9.6 }
                    ]
                }
            }]"#,
        )
        .unwrap();

        let recipe = format_recipe(details.into_iter().next().unwrap(), None);
        assert_eq!(recipe.nutrition.calories, 0);
        assert_eq!(recipe.nutrition.protein, 10);
        assert_eq!(recipe.nutrition.fat, 0);
    }

    #[test]
    fn test_raw_instructions_take_precedence() {
        let detail = RecipeDetail {
            id: 1,
            instructions: Some(json!("<ol><li>Chop.</li></ol>")),
            analyzed_instructions: Some(json!([{ "steps": [] }])),
            ..Default::default()
        };
        let recipe = format_recipe(detail, None);
        assert_eq!(recipe.instructions, vec![json!("<ol><li>Chop.</li></ol>")]);
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let detail = RecipeDetail {
            id: 1,
            ready_in_minutes: Some(0),
            servings: Some(0),
            image: Some(String::new()),
            summary: Some("<p></p>".to_string()),
            ..Default::default()
        };
        let recipe = format_recipe(detail, None);
        assert_eq!(recipe.ready_in_minutes, 30);
        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.image, PLACEHOLDER_IMAGE);
        assert_eq!(recipe.summary, NO_DESCRIPTION);
        assert_eq!(recipe.title, UNTITLED);
    }

    #[test]
    fn test_rank_recipes_descending_and_stable() {
        let mut recipes: Vec<Recipe> = [(1, 2), (2, 5), (3, 3), (4, 5)]
            .iter()
            .map(|(id, matched)| {
                format_recipe(
                    RecipeDetail {
                        id: *id,
                        ..Default::default()
                    },
                    Some(&hit(*id, *matched, 0)),
                )
            })
            .collect();

        rank_recipes(&mut recipes);
        let order: Vec<(i64, u32)> = recipes
            .iter()
            .map(|r| (r.id, r.matched_ingredients))
            .collect();
        assert_eq!(order, vec![(2, 5), (4, 5), (3, 3), (1, 2)]);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("plain text"), "plain text");
        assert_eq!(
            strip_html("A <a href=\"x\">link</a> &amp; <b>bold</b>"),
            "A link & bold"
        );
    }
}
