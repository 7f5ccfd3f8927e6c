//! Recipe state and scaling engine.
//!
//! Holds the compiled-in recipe catalog, per-recipe ratings and the current
//! search query, and produces everything a front-end renders: the filtered
//! recipe list, scaled ingredient lines and the fault-injection flag.
pub mod catalog;
pub mod error;
pub mod fault;
pub mod ratings;
pub mod scaler;
pub mod search;
pub mod state;
pub mod types;

pub use catalog::{Catalog, CatalogError};
pub use error::{RecipeError, SIMULATED_FAULT_MESSAGE};
pub use ratings::{
    feedback_message, Rating, RatingChange, RatingError, RatingListener, RatingStore, UNRATED,
};
pub use scaler::{CAPPED_NOTICE, MAX_SCALED_SERVINGS};
pub use state::{RecipeDetail, RecipeState, RecipeSummary};
pub use types::{Difficulty, Ingredient, Recipe, RecipeId, RecipeIdError};
