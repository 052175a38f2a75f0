mod demo;
mod format;
mod spoonacular;

pub use demo::{default_table, DemoTable};
pub use format::{
    format_recipe, rank_recipes, strip_html, RecipeDetail, SearchHit, DEFAULT_READY_IN_MINUTES,
    DEFAULT_SERVINGS, NO_DESCRIPTION, PLACEHOLDER_IMAGE,
};
pub use spoonacular::SpoonacularClient;

use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;

use crate::config::DemoConfig;
use crate::model::Recipe;
use crate::AdvisorError;

/// Minimum number of fuzzy ingredient matches for a demo table hit
pub const MIN_FUZZY_MATCHES: usize = 2;

/// A live source of recipes for an ingredient list
#[async_trait]
pub trait RecipeLookup: Send + Sync {
    /// Get the lookup name (e.g., "spoonacular")
    fn name(&self) -> &str;

    /// Return recipes ranked best match first. An empty list is not an error.
    async fn lookup(&self, ingredients: &[String]) -> Result<Vec<Recipe>, AdvisorError>;
}

/// Canonical table key for an ingredient set: sorted, comma-joined.
///
/// The input is not modified.
pub fn canonical_key<S: AsRef<str>>(ingredients: &[S]) -> String {
    let mut sorted: Vec<&str> = ingredients.iter().map(|s| s.as_ref()).collect();
    sorted.sort_unstable();
    sorted.join(",")
}

/// Count input ingredients that contain, or are contained in, some ingredient of `key`.
///
/// Comparison is case-sensitive.
pub fn count_fuzzy_matches<S: AsRef<str>>(ingredients: &[S], key: &str) -> usize {
    let key_ingredients: Vec<&str> = key.split(',').filter(|k| !k.is_empty()).collect();
    ingredients
        .iter()
        .map(|s| s.as_ref())
        .filter(|ingredient| {
            key_ingredients
                .iter()
                .any(|k| k.contains(ingredient) || ingredient.contains(k))
        })
        .count()
}

/// Finds recipes for detected ingredients, demo table first, live API second.
///
/// Never fails: live lookup errors are logged and replaced by demo data.
pub struct RecipeMatcher {
    table: Arc<DemoTable>,
    live: Box<dyn RecipeLookup>,
    use_table: bool,
    fallback_on_error: bool,
}

impl RecipeMatcher {
    pub fn new(table: Arc<DemoTable>, live: Box<dyn RecipeLookup>) -> Self {
        RecipeMatcher {
            table,
            live,
            use_table: true,
            fallback_on_error: true,
        }
    }

    /// Apply the `[demo]` settings
    pub fn with_settings(mut self, settings: &DemoConfig) -> Self {
        self.use_table = settings.enabled;
        self.fallback_on_error = settings.fallback_on_error;
        self
    }

    /// Look for a demo bundle matching the ingredients.
    ///
    /// The exact canonical key wins; otherwise the first key in table order
    /// with at least [`MIN_FUZZY_MATCHES`] fuzzy matches.
    pub fn match_demo(&self, ingredients: &[String]) -> Option<&[Recipe]> {
        let key = canonical_key(ingredients);
        debug!("Looking up demo recipes for key '{}'", key);

        if let Some(recipes) = self.table.get(&key) {
            if count_fuzzy_matches(ingredients, &key) >= MIN_FUZZY_MATCHES {
                return Some(recipes);
            }
        }

        self.table
            .entries()
            .find(|(key, _)| count_fuzzy_matches(ingredients, key) >= MIN_FUZZY_MATCHES)
            .map(|(_, recipes)| recipes)
    }

    pub async fn find_recipes(&self, ingredients: &[String]) -> Vec<Recipe> {
        if self.use_table {
            if let Some(recipes) = self.match_demo(ingredients) {
                info!("Using demo data for ingredients {:?}", ingredients);
                return recipes.to_vec();
            }
        }

        debug!("No demo data found, asking {}", self.live.name());
        match self.live.lookup(ingredients).await {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!("Live recipe lookup via {} failed: {}", self.live.name(), e);
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Vec<Recipe> {
        if !self.use_table || !self.fallback_on_error {
            return Vec::new();
        }
        let recipes = self.table.first_bundle().map(<[Recipe]>::to_vec).unwrap_or_default();
        info!("Using {} fallback demo recipes", recipes.len());
        recipes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLookup {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl RecipeLookup for CountingLookup {
        fn name(&self) -> &str {
            "counting"
        }

        async fn lookup(&self, _ingredients: &[String]) -> Result<Vec<Recipe>, AdvisorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(AdvisorError::SearchError {
                    status: 500,
                    reason: "Internal Server Error".to_string(),
                })
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn matcher(fail: bool) -> (RecipeMatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let lookup = CountingLookup {
            calls: calls.clone(),
            fail,
        };
        (RecipeMatcher::new(default_table(), Box::new(lookup)), calls)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_canonical_key_is_permutation_invariant() {
        let a = canonical_key(&["tomato", "onion", "garlic"]);
        let b = canonical_key(&["garlic", "tomato", "onion"]);
        let c = canonical_key(&["onion", "garlic", "tomato"]);
        assert_eq!(a, "garlic,onion,tomato");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_canonical_key_does_not_reorder_input() {
        let input = strings(&["tomato", "onion"]);
        let _ = canonical_key(&input);
        assert_eq!(input, strings(&["tomato", "onion"]));
    }

    #[test]
    fn test_fuzzy_matches_both_directions() {
        let key = "cheese,egg,garlic,onion,tomato";
        // "eggs" contains "egg", "tomato" is contained in "cherry tomato"
        assert_eq!(count_fuzzy_matches(&["eggs", "cherry tomato"], key), 2);
        assert_eq!(count_fuzzy_matches(&["beef", "potato"], key), 0);
        // case-sensitive
        assert_eq!(count_fuzzy_matches(&["Onion", "Garlic"], key), 0);
    }

    #[test]
    fn test_fuzzy_matches_ignore_empty_key_parts() {
        assert_eq!(count_fuzzy_matches(&["beef", "potato"], ""), 0);
        assert_eq!(count_fuzzy_matches(&["beef", "potato"], "beef,,"), 1);
    }

    #[tokio::test]
    async fn test_demo_hit_skips_live_lookup() {
        let (matcher, calls) = matcher(false);
        let recipes = matcher.find_recipes(&strings(&["rice", "chicken"])).await;

        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].title, "Asian Chicken Fried Rice");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_single_match_is_not_enough() {
        let (matcher, calls) = matcher(false);
        let recipes = matcher.find_recipes(&strings(&["rice", "beef"])).await;

        assert!(recipes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exact_key_beats_earlier_fuzzy_key() {
        let bundle = default_table().entries().nth(2).unwrap().1.to_vec();
        let table = DemoTable::new()
            .with_entry(&["garlic", "cheese", "bread"], Vec::new())
            .with_entry(&["garlic", "cheese"], bundle.clone());

        let (base, _) = matcher(false);
        let matcher = RecipeMatcher::new(Arc::new(table), base.live);

        let recipes = matcher.find_recipes(&strings(&["cheese", "garlic"])).await;
        assert_eq!(recipes, bundle);
    }

    #[tokio::test]
    async fn test_live_failure_falls_back_to_first_bundle() {
        let (matcher, calls) = matcher(true);
        let recipes = matcher.find_recipes(&strings(&["beef", "potato"])).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(recipes, default_table().first_bundle().unwrap().to_vec());
    }

    #[tokio::test]
    async fn test_live_failure_with_fallback_disabled() {
        let (matcher, _) = matcher(true);
        let matcher = matcher.with_settings(&DemoConfig {
            fallback_on_error: false,
            ..Default::default()
        });

        let recipes = matcher.find_recipes(&strings(&["beef", "potato"])).await;
        assert!(recipes.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_table_always_goes_live() {
        let (matcher, calls) = matcher(false);
        let matcher = matcher.with_settings(&DemoConfig {
            enabled: false,
            ..Default::default()
        });

        let recipes = matcher.find_recipes(&strings(&["rice", "chicken"])).await;
        assert!(recipes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_table_gives_no_fallback() {
        let (matcher, calls) = matcher(true);
        let matcher = matcher.with_settings(&DemoConfig {
            enabled: false,
            ..Default::default()
        });

        let recipes = matcher.find_recipes(&strings(&["beef", "potato"])).await;
        assert!(recipes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_table_fallback_is_empty() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lookup = CountingLookup {
            calls: calls.clone(),
            fail: true,
        };
        let matcher = RecipeMatcher::new(Arc::new(DemoTable::new()), Box::new(lookup));

        let recipes = matcher.find_recipes(&strings(&["rice", "chicken"])).await;
        assert!(recipes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
