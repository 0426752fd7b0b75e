pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlannerError, Result};
pub use models::{IngredientLine, Recipe};
pub use planner::{PlannerSession, WeeklyMenu};
