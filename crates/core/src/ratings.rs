use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::RecipeId;

/// Value reported for a recipe nobody has rated.
pub const UNRATED: u8 = 0;

/// A validated star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, RatingError> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("rating must be between 1 and 5 (got {0})")]
    OutOfRange(i64),
}

/// A recorded rating, published to listeners after the store is updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingChange {
    pub recipe_id: RecipeId,
    pub rating: u8,
    pub previous: u8,
    pub at: DateTime<Utc>,
}

/// Receives rating updates from [`crate::RecipeState`].
pub trait RatingListener: Send + Sync {
    fn on_rating_changed(&self, change: &RatingChange);
}

/// One rating slot per recipe, last write wins.
///
/// Writes replace a single entry under the write lock, so readers see either
/// the old or the new value.
#[derive(Debug, Default)]
pub struct RatingStore {
    ratings: RwLock<HashMap<RecipeId, Rating>>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `value` for `recipe_id`.
    ///
    /// Values outside `1..=5` are ignored and `None` is returned.
    pub fn set(&self, recipe_id: RecipeId, value: i64, at: DateTime<Utc>) -> Option<RatingChange> {
        let rating = match Rating::new(value) {
            Ok(rating) => rating,
            Err(err) => {
                debug!(stage = "ratings", recipe_id = %recipe_id, error = %err, "ignoring rating");
                return None;
            }
        };

        let previous = self
            .ratings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(recipe_id, rating)
            .map(Rating::get)
            .unwrap_or(UNRATED);

        info!(stage = "ratings", recipe_id = %recipe_id, rating = rating.get(), previous, "rating recorded");
        Some(RatingChange {
            recipe_id,
            rating: rating.get(),
            previous,
            at,
        })
    }

    /// Returns the recorded rating, or [`UNRATED`] when there is none.
    pub fn rating_for(&self, recipe_id: RecipeId) -> u8 {
        self.ratings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&recipe_id)
            .map(|rating| rating.get())
            .unwrap_or(UNRATED)
    }
}

/// Thank-you copy shown after a rating is submitted.
pub fn feedback_message(rating: u8) -> Option<&'static str> {
    match rating {
        1 => Some("We'll keep improving this recipe."),
        2 => Some("Thanks for the honest feedback."),
        3 => Some("Glad it was okay!"),
        4 => Some("Happy you liked it!"),
        5 => Some("Amazing! Thanks for the love."),
        _ => None,
    }
}
