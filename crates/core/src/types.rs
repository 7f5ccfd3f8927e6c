use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stable identifier assigned to a recipe when the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecipeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for RecipeId {
    type Err = RecipeIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| RecipeIdError(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid recipe id: {0}")]
pub struct RecipeIdError(pub String);

/// How demanding a recipe is to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Returns the label shown next to a recipe.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single ingredient line as written for the recipe's base servings.
///
/// Ingredients without a quantity ("to taste", "a pinch") are never scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: None,
            quantity: None,
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// Immutable recipe record owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub summary: String,
    pub duration_minutes: u32,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    /// Serving count the ingredient quantities are written for.
    pub base_servings: i32,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
}

impl Recipe {
    /// Base servings floored at 1 so scaling never divides by zero or a negative.
    pub fn effective_base_servings(&self) -> i32 {
        self.base_servings.max(1)
    }

    /// Serving count a detail view starts from.
    pub fn default_servings(&self) -> i32 {
        self.effective_base_servings()
    }

    pub fn formatted_duration(&self) -> String {
        format!("{} min", self.duration_minutes)
    }

    /// Steps prefixed with their 1-based position.
    pub fn numbered_steps(&self) -> Vec<String> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| format!("{}. {step}", index + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(base_servings: i32) -> Recipe {
        Recipe {
            id: RecipeId::new(),
            title: "Toast".to_string(),
            summary: "Bread, but warmer.".to_string(),
            duration_minutes: 5,
            difficulty: Difficulty::Easy,
            image_name: None,
            base_servings,
            ingredients: vec![Ingredient::new("bread").unit("slice").quantity(2.0)],
            steps: vec!["Toast the bread.".to_string(), "Butter it.".to_string()],
        }
    }

    #[test]
    fn recipe_id_round_trips_through_display() {
        let id = RecipeId::new();
        let parsed: RecipeId = id.to_string().parse().expect("id should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn recipe_id_rejects_garbage() {
        let err = "not-a-uuid".parse::<RecipeId>().expect_err("should fail");
        assert_eq!(err, RecipeIdError("not-a-uuid".to_string()));
    }

    #[test]
    fn base_servings_are_floored_at_one() {
        assert_eq!(recipe(0).effective_base_servings(), 1);
        assert_eq!(recipe(-3).default_servings(), 1);
        assert_eq!(recipe(4).default_servings(), 4);
    }

    #[test]
    fn steps_are_numbered_in_order() {
        assert_eq!(
            recipe(1).numbered_steps(),
            vec!["1. Toast the bread.", "2. Butter it."]
        );
    }

    #[test]
    fn serializes_with_string_id_and_labels() {
        let recipe = recipe(2);
        let value = serde_json::to_value(&recipe).expect("serialize");
        assert_eq!(value["id"].as_str(), Some(recipe.id.to_string().as_str()));
        assert_eq!(value["difficulty"].as_str(), Some("Easy"));
        assert!(value.get("image_name").is_none());
        assert_eq!(value["ingredients"][0]["unit"].as_str(), Some("slice"));
    }
}
