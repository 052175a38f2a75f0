use crate::model::Ingredient;

/// Replies that mean the model saw nothing usable
const REJECTED_PHRASES: &[&str] = &["no ingredients", "cannot identify"];

/// Parse a model reply into normalized ingredient tokens.
///
/// The reply is split on commas and line breaks. Each segment is trimmed,
/// lowercased and stripped of surrounding list or quote punctuation. Empty
/// segments, `none`, and segments containing "no ingredients" or
/// "cannot identify" are dropped. Detection order is preserved.
pub fn parse_ingredients(reply: &str) -> Vec<Ingredient> {
    reply
        .split([',', '\n'])
        .map(normalize)
        .filter(|ingredient| {
            !ingredient.is_empty()
                && ingredient != "none"
                && !REJECTED_PHRASES
                    .iter()
                    .any(|phrase| ingredient.contains(phrase))
        })
        .collect()
}

fn normalize(segment: &str) -> String {
    segment
        .trim()
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '.' | '*' | '-' | '"' | '\'' | '`' | '•')
        })
        .to_lowercase()
}
