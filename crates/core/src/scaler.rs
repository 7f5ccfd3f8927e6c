//! Ingredient scaling for a requested serving count.

use crate::types::{Ingredient, Recipe};

/// Hard ceiling on the serving count used for scaling.
pub const MAX_SCALED_SERVINGS: i32 = 10;

/// Notice shown when the requested servings exceed [`MAX_SCALED_SERVINGS`].
pub const CAPPED_NOTICE: &str = "Amounts shown for 10 people (maximum scaling).";

/// Clamps a requested serving count into `1..=MAX_SCALED_SERVINGS`.
pub fn clamp_servings(requested: i32) -> i32 {
    requested.clamp(1, MAX_SCALED_SERVINGS)
}

/// Returns `true` when scaling will not follow the requested count.
pub fn is_capped(requested: i32) -> bool {
    requested > MAX_SCALED_SERVINGS
}

/// Renders an ingredient line scaled from `base_servings` to `requested_servings`.
///
/// Ingredients without a quantity render as their bare name. Otherwise the
/// result is `"<amount> [<unit> ]<name>"` with the amount rounded half-up to
/// two decimals and trailing zeros trimmed. The unit's surrounding whitespace
/// is trimmed and a blank unit is dropped, so words stay single-spaced.
pub fn scale(ingredient: &Ingredient, base_servings: i32, requested_servings: i32) -> String {
    let Some(quantity) = ingredient.quantity else {
        return ingredient.name.clone();
    };

    let base = f64::from(base_servings.max(1));
    let requested = f64::from(clamp_servings(requested_servings));
    let amount = format_quantity(requested / base * quantity);

    let line = match ingredient.unit.as_deref().map(str::trim) {
        Some(unit) if !unit.is_empty() => format!("{amount} {unit} {}", ingredient.name),
        _ => format!("{amount} {}", ingredient.name),
    };
    line.trim().to_string()
}

/// Scales every ingredient of `recipe`, preserving display order.
pub fn ingredient_lines(recipe: &Recipe, requested_servings: i32) -> Vec<String> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| scale(ingredient, recipe.base_servings, requested_servings))
        .collect()
}

/// Formats a quantity with at most two fractional digits, locale-independent.
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
