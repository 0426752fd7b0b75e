use crate::error::{PlannerError, Result};
use crate::planner::constants::*;
use crate::planner::week::WeeklyMenu;

/// Sum of the recipe totals over every planned day. Empty days count as 0.
pub fn total_cost(menu: &WeeklyMenu) -> f64 {
    menu.meals().map(|r| r.total_cost()).sum()
}

/// Share of the budget used, clamped to 100.
///
/// A non-positive budget reads as fully spent.
pub fn percent_of_budget(total: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        return FULL_PERCENT;
    }
    let percent = total / budget * 100.0;
    if percent.is_finite() {
        percent.min(FULL_PERCENT)
    } else {
        FULL_PERCENT
    }
}

/// Signed room left in the budget. Negative means over budget.
pub fn delta(total: f64, budget: f64) -> f64 {
    budget - total
}

/// Cost overview of a weekly menu against a budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    pub total: f64,
    pub budget: f64,
    pub percent: f64,
    pub delta: f64,
}

impl BudgetSummary {
    pub fn new(menu: &WeeklyMenu, budget: f64) -> Self {
        Self::from_total(total_cost(menu), budget)
    }

    pub fn from_total(total: f64, budget: f64) -> Self {
        Self {
            total,
            budget,
            percent: percent_of_budget(total, budget),
            delta: delta(total, budget),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.delta < 0.0
    }
}

/// Range the user may move the budget within.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self {
            min: MIN_BUDGET,
            max: MAX_BUDGET,
            step: BUDGET_STEP,
        }
    }
}

impl BudgetLimits {
    /// Check a requested budget against the range and step.
    pub fn validate(&self, amount: f64) -> Result<f64> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PlannerError::Validation(
                "budget must be a positive number".to_string(),
            ));
        }
        if amount < self.min || amount > self.max {
            return Err(PlannerError::Validation(format!(
                "budget must be between {:.0} and {:.0} kr",
                self.min, self.max
            )));
        }
        if self.step > 0.0 {
            let steps = (amount - self.min) / self.step;
            if (steps - steps.round()).abs() > 1e-9 {
                return Err(PlannerError::Validation(format!(
                    "budget moves in steps of {:.0} kr",
                    self.step
                )));
            }
        }
        Ok(amount)
    }

    /// Every selectable budget value, lowest first.
    pub fn choices(&self) -> Vec<f64> {
        if self.step <= 0.0 {
            return vec![self.min, self.max];
        }
        let count = ((self.max - self.min) / self.step).floor() as usize;
        (0..=count)
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}
