pub const INGREDIENT_DETECTION_PROMPT: &str = "Analyze this image and identify all visible food ingredients. \
Return ONLY a comma-separated list of ingredient names with no additional text. \
Be specific about what you can clearly see. For example: tomato, onion, garlic, cheese, eggs. \
Only list actual food ingredients, not dishes or cooking utensils.";
