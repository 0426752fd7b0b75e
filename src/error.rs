use thiserror::Error;

use crate::lookup::LookupError;
use crate::models::RecipeId;
use crate::planner::constants::{DAYS_PER_WEEK, MAX_MEALS};
use crate::state::StorageError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("The weekly menu already holds the maximum of {max} meals", max = MAX_MEALS)]
    CapacityExceeded,

    #[error("Recipe {0} is already in the weekly menu")]
    DuplicateMeal(RecipeId),

    #[error("Day {0} is outside the week (0-{last})", last = DAYS_PER_WEEK - 1)]
    InvalidDay(usize),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("No recipes to choose from")]
    EmptyCatalog,

    #[error("Randomly picked recipe {0} is already in the weekly menu, try again")]
    AlreadyPresent(RecipeId),

    #[error("Only {available} recipes available, {required} are needed for a full week")]
    InsufficientCatalog { available: usize, required: usize },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Price lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlannerError {
    pub fn recipe_not_found(id: RecipeId) -> Self {
        PlannerError::NotFound {
            kind: "Recipe",
            id: id.to_string(),
        }
    }

    pub fn menu_not_found(id: &str) -> Self {
        PlannerError::NotFound {
            kind: "Saved menu",
            id: id.to_string(),
        }
    }

    /// Failures the planner recovers from locally: the operation was a no-op.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            PlannerError::Prompt(_) | PlannerError::Config(_) | PlannerError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
