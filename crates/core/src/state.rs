use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error};

use crate::catalog::Catalog;
use crate::error::RecipeError;
use crate::fault;
use crate::ratings::{RatingChange, RatingListener, RatingStore};
use crate::scaler::{self, CAPPED_NOTICE};
use crate::search;
use crate::types::{Difficulty, Recipe, RecipeId};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Observable recipe state consumed by front-ends.
///
/// Front-ends issue query changes and rating submissions; everything else is
/// derived on read from the immutable catalog.
pub struct RecipeState {
    catalog: Arc<Catalog>,
    query: RwLock<String>,
    ratings: RatingStore,
    listeners: RwLock<Vec<Arc<dyn RatingListener>>>,
    /// Held across a rating write and its fan-out so listeners observe writes in store order.
    publish: Mutex<()>,
    clock: Clock,
}

impl RecipeState {
    /// Creates state over the compiled-in sample catalog.
    pub fn new() -> Self {
        Self::with_catalog(Catalog::sample())
    }

    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            query: RwLock::new(String::new()),
            ratings: RatingStore::new(),
            listeners: RwLock::new(Vec::new()),
            publish: Mutex::new(()),
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn query(&self) -> String {
        self.query
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the stored query verbatim. Trimming happens when filtering.
    pub fn on_query_changed(&self, new_query: impl Into<String>) {
        let new_query = new_query.into();
        debug!(stage = "state", query = %new_query, "query changed");
        *self.query.write().unwrap_or_else(PoisonError::into_inner) = new_query;
    }

    /// Recipes matching the current query, in catalog order.
    pub fn filtered_recipes(&self) -> Vec<&Recipe> {
        let query = self.query();
        search::filter(self.catalog.recipes(), &query)
    }

    /// Resolves a `recipeSelected` navigation event.
    pub fn recipe(&self, id: RecipeId) -> Result<&Recipe, RecipeError> {
        self.catalog.get(id)
    }

    pub fn rating_for(&self, recipe: &Recipe) -> u8 {
        self.ratings.rating_for(recipe.id)
    }

    /// Records a rating and notifies listeners before the next write proceeds.
    ///
    /// Values outside `1..=5` are silently ignored and yield `None`.
    pub fn set_rating(&self, recipe: &Recipe, value: i64) -> Option<RatingChange> {
        let _publish = self.publish.lock().unwrap_or_else(PoisonError::into_inner);
        let change = self.ratings.set(recipe.id, value, (self.clock)())?;

        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener.on_rating_changed(&change);
        }
        Some(change)
    }

    /// Registers a listener for recorded (never ignored) ratings.
    pub fn subscribe(&self, listener: Arc<dyn RatingListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn should_fault(&self, recipe: &Recipe) -> bool {
        fault::is_fault_recipe(&self.catalog, recipe)
    }

    /// Ingredient lines for `recipe` scaled to `servings`.
    pub fn ingredient_lines(&self, recipe: &Recipe, servings: i32) -> Vec<String> {
        scaler::ingredient_lines(recipe, servings)
    }

    /// Applies `new_query` and lists its matches under a single write lock.
    pub fn search(&self, new_query: impl Into<String>) -> Vec<RecipeSummary> {
        let mut query = self.query.write().unwrap_or_else(PoisonError::into_inner);
        *query = new_query.into();
        debug!(stage = "state", query = %query.as_str(), "query changed");
        search::filter(self.catalog.recipes(), &query)
            .into_iter()
            .map(|recipe| RecipeSummary::new(recipe, self.rating_for(recipe)))
            .collect()
    }

    /// List rows for the recipes matching the current query.
    pub fn summaries(&self) -> Vec<RecipeSummary> {
        self.filtered_recipes()
            .into_iter()
            .map(|recipe| RecipeSummary::new(recipe, self.rating_for(recipe)))
            .collect()
    }

    /// Builds the detail view for `id` at `servings` (defaults to the recipe's base).
    ///
    /// Fails with [`RecipeError::SimulatedFault`] for the fault recipe; callers
    /// must treat that as unrecoverable.
    pub fn detail(&self, id: RecipeId, servings: Option<i32>) -> Result<RecipeDetail, RecipeError> {
        let recipe = self.recipe(id)?;
        if let Err(err) = fault::ensure_renderable(&self.catalog, recipe) {
            error!(stage = "state", recipe_id = %id, "fault recipe selected");
            return Err(err);
        }

        let requested = servings.unwrap_or_else(|| recipe.default_servings());
        let capped = scaler::is_capped(requested);
        Ok(RecipeDetail {
            id: recipe.id,
            title: recipe.title.clone(),
            summary: recipe.summary.clone(),
            duration: recipe.formatted_duration(),
            difficulty: recipe.difficulty,
            image_name: recipe.image_name.clone(),
            requested_servings: requested,
            effective_servings: scaler::clamp_servings(requested),
            capped,
            capped_notice: capped.then_some(CAPPED_NOTICE),
            rating: self.rating_for(recipe),
            ingredients: self.ingredient_lines(recipe, requested),
            steps: recipe.numbered_steps(),
        })
    }
}

impl Default for RecipeState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecipeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeState")
            .field("recipes", &self.catalog.len())
            .field("query", &self.query())
            .field("ratings", &self.ratings)
            .finish_non_exhaustive()
    }
}

/// Row shown in the recipe list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub summary: String,
    pub duration: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    pub ingredient_count: usize,
    pub rating: u8,
}

impl RecipeSummary {
    fn new(recipe: &Recipe, rating: u8) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            summary: recipe.summary.clone(),
            duration: recipe.formatted_duration(),
            difficulty: recipe.difficulty,
            image_name: recipe.image_name.clone(),
            ingredient_count: recipe.ingredients.len(),
            rating,
        }
    }
}

/// Everything a detail screen renders for one recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub title: String,
    pub summary: String,
    pub duration: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    pub requested_servings: i32,
    pub effective_servings: i32,
    pub capped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capped_notice: Option<&'static str>,
    pub rating: u8,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}
