use log::info;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::canonical_key;
use crate::model::{Nutrition, Recipe};
use crate::AdvisorError;

/// Read-only table of precomputed recipe bundles keyed by ingredient set.
///
/// Keys are canonical (sorted, comma-joined). Entry order is preserved and
/// matters: the first entry doubles as the fallback bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoTable {
    entries: Vec<(String, Vec<Recipe>)>,
}

impl DemoTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle. The key is canonicalized, so ingredient order does not matter.
    pub fn with_entry<S: AsRef<str>>(mut self, ingredients: &[S], recipes: Vec<Recipe>) -> Self {
        let ingredients: Vec<String> = ingredients
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .collect();
        self.entries.push((canonical_key(&ingredients), recipes));
        self
    }

    /// Parse a table from a JSON object of `"ingredient,list": [recipe, ...]`.
    ///
    /// Keys are re-canonicalized; object order is kept.
    pub fn from_json(json: &str) -> Result<Self, AdvisorError> {
        let object: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| AdvisorError::DemoTableError(format!("invalid table JSON: {}", e)))?;

        let mut table = DemoTable::new();
        for (key, bundle) in object {
            let recipes: Vec<Recipe> = serde_json::from_value(bundle).map_err(|e| {
                AdvisorError::DemoTableError(format!("invalid recipes for '{}': {}", key, e))
            })?;
            let ingredients: Vec<&str> = key.split(',').collect();
            table = table.with_entry(&ingredients, recipes);
        }
        Ok(table)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AdvisorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AdvisorError::DemoTableError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let table = Self::from_json(&json)?;
        info!(
            "Loaded {} demo recipe bundles from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn get(&self, key: &str) -> Option<&[Recipe]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, recipes)| recipes.as_slice())
    }

    /// Iterate over `(key, bundle)` pairs in table order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[Recipe])> {
        self.entries
            .iter()
            .map(|(k, recipes)| (k.as_str(), recipes.as_slice()))
    }

    /// Bundle of the first entry, used when the live API fails
    pub fn first_bundle(&self) -> Option<&[Recipe]> {
        self.entries.first().map(|(_, recipes)| recipes.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide built-in table, constructed on first use
pub fn default_table() -> Arc<DemoTable> {
    static TABLE: OnceLock<Arc<DemoTable>> = OnceLock::new();
    TABLE.get_or_init(|| Arc::new(builtin_table())).clone()
}

#[allow(clippy::too_many_arguments)]
fn demo_recipe(
    id: i64,
    title: &str,
    ready_in_minutes: u32,
    servings: u32,
    image: &str,
    matched: u32,
    missed: u32,
    summary: &str,
    nutrition: [u32; 4],
) -> Recipe {
    let [calories, protein, carbs, fat] = nutrition;
    Recipe {
        id,
        title: title.to_string(),
        ready_in_minutes,
        servings,
        image: image.to_string(),
        matched_ingredients: matched,
        missed_ingredients: missed,
        source_url: None,
        summary: summary.to_string(),
        nutrition: Nutrition {
            calories,
            protein,
            carbs,
            fat,
        },
        instructions: Vec::new(),
    }
}

fn builtin_table() -> DemoTable {
    DemoTable::new()
        .with_entry(
            &["tomato", "onion", "garlic", "egg", "cheese"],
            vec![
                demo_recipe(
                    1001,
                    "Classic Tomato Omelette",
                    15,
                    2,
                    "https://images.unsplash.com/photo-1506084868230-bb9d95c24759?w=300&h=200&fit=crop",
                    5,
                    0,
                    "A delicious and fluffy omelette with fresh tomatoes, onions, and cheese.",
                    [320, 18, 8, 24],
                ),
                demo_recipe(
                    1002,
                    "Mediterranean Veggie Scramble",
                    12,
                    1,
                    "https://images.unsplash.com/photo-1482049016688-2d3e1b311543?w=300&h=200&fit=crop",
                    4,
                    1,
                    "Scrambled eggs with Mediterranean vegetables and herbs.",
                    [280, 16, 12, 18],
                ),
            ],
        )
        .with_entry(
            &["chicken", "rice", "vegetables", "soy sauce"],
            vec![
                demo_recipe(
                    2001,
                    "Asian Chicken Fried Rice",
                    20,
                    3,
                    "https://images.unsplash.com/photo-1603133872878-684f208fb84b?w=300&h=200&fit=crop",
                    4,
                    0,
                    "Classic fried rice with tender chicken and mixed vegetables.",
                    [380, 22, 45, 12],
                ),
                demo_recipe(
                    2002,
                    "Chicken Teriyaki Bowl",
                    25,
                    2,
                    "https://images.unsplash.com/photo-1546554137-f86b9593a222?w=300&h=200&fit=crop",
                    3,
                    1,
                    "Grilled chicken over rice with steamed vegetables and teriyaki sauce.",
                    [420, 28, 48, 14],
                ),
            ],
        )
        .with_entry(
            &["pasta", "cheese", "garlic", "olive oil", "basil"],
            vec![
                demo_recipe(
                    3001,
                    "Garlic Parmesan Pasta",
                    18,
                    4,
                    "https://images.unsplash.com/photo-1621996346565-e3dbc353d2e5?w=300&h=200&fit=crop",
                    5,
                    0,
                    "Creamy garlic parmesan pasta with fresh basil and extra virgin olive oil.",
                    [445, 16, 52, 18],
                ),
                demo_recipe(
                    3002,
                    "Italian Herb Pasta",
                    22,
                    3,
                    "https://images.unsplash.com/photo-1473093295043-cdd812d0e601?w=300&h=200&fit=crop",
                    4,
                    1,
                    "Traditional Italian pasta with aromatic herbs, garlic, and grated cheese.",
                    [385, 14, 48, 16],
                ),
                demo_recipe(
                    3003,
                    "Basil Pesto Linguine",
                    15,
                    2,
                    "https://images.unsplash.com/photo-1572441713132-51c75654db73?w=300&h=200&fit=crop",
                    4,
                    1,
                    "Fresh basil pesto linguine with garlic, olive oil, and parmesan cheese.",
                    [520, 18, 58, 24],
                ),
            ],
        )
}
