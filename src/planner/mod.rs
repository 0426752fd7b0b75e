pub mod budget;
pub mod constants;
pub mod randomizer;
pub mod session;
pub mod shopping;
pub mod week;

pub use budget::{BudgetLimits, BudgetSummary, delta, percent_of_budget, total_cost};
pub use constants::*;
pub use randomizer::{generate_full_week, pick_one_random};
pub use session::PlannerSession;
pub use shopping::{ShoppingList, ShoppingListItem, aggregate};
pub use week::WeeklyMenu;
