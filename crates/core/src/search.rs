use crate::types::Recipe;

/// Filters `recipes` down to those whose title or summary contains `query`.
///
/// The query is trimmed first; an empty query keeps every recipe. Matching is
/// a case-insensitive substring test and the input order is preserved.
pub fn filter<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return recipes.iter().collect();
    }

    recipes
        .iter()
        .filter(|recipe| {
            recipe.title.to_lowercase().contains(&needle)
                || recipe.summary.to_lowercase().contains(&needle)
        })
        .collect()
}
