use thiserror::Error;

use crate::types::RecipeId;

/// Diagnostic carried by the simulated fault raised for the fault recipe.
pub const SIMULATED_FAULT_MESSAGE: &str =
    "Simulated data corruption: Unable to load this recipe's steps. Please report to QA.";

/// Errors surfaced by recipe lookups and detail rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    #[error("recipe not found: {0}")]
    RecipeNotFound(RecipeId),
    /// Deterministic QA failure for the designated fault recipe. Never retried.
    #[error("{}", SIMULATED_FAULT_MESSAGE)]
    SimulatedFault { recipe_id: RecipeId },
}

impl RecipeError {
    /// Stable machine-readable code for problem responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RecipeNotFound(_) => "recipe_not_found",
            Self::SimulatedFault { .. } => "simulated_fault",
        }
    }
}
