use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{Recipe, RecipeId};
use crate::planner::budget;
use crate::planner::constants::{DAYS_PER_WEEK, MAX_MEALS};

/// The day-indexed weekly menu.
///
/// Slots hold a recipe snapshot or nothing. The sequence never exceeds seven
/// slots, never ends in an empty slot, and never holds the same recipe id
/// twice. Empty slots therefore only exist between two planned days.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<Recipe>>", into = "Vec<Option<Recipe>>")]
pub struct WeeklyMenu {
    slots: Vec<Option<Recipe>>,
}

impl WeeklyMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a menu from stored slots, pruning trailing empties and
    /// rejecting anything that breaks the weekly invariants.
    pub fn from_slots(slots: Vec<Option<Recipe>>) -> Result<Self> {
        let mut menu = Self { slots };
        menu.prune_trailing();

        if menu.slots.len() > DAYS_PER_WEEK {
            return Err(PlannerError::Validation(format!(
                "a weekly menu spans at most {} days, got {}",
                DAYS_PER_WEEK,
                menu.slots.len()
            )));
        }

        let mut seen = Vec::with_capacity(menu.slots.len());
        for recipe in menu.meals() {
            if seen.contains(&recipe.id) {
                return Err(PlannerError::DuplicateMeal(recipe.id));
            }
            seen.push(recipe.id);
        }

        Ok(menu)
    }

    /// Build a menu from stored slots, dropping whatever breaks the weekly
    /// invariants instead of failing.
    ///
    /// Days past Sunday are cut off and a recipe planned twice keeps only its
    /// first day.
    pub fn repaired(mut slots: Vec<Option<Recipe>>) -> Self {
        slots.truncate(DAYS_PER_WEEK);

        let mut seen = Vec::with_capacity(slots.len());
        for slot in slots.iter_mut() {
            let Some(id) = slot.as_ref().map(|r| r.id) else {
                continue;
            };
            if seen.contains(&id) {
                *slot = None;
            } else {
                seen.push(id);
            }
        }

        let mut menu = Self { slots };
        menu.prune_trailing();
        menu
    }

    /// Build a fully planned week from meals in day order.
    pub(crate) fn from_meals(meals: Vec<Recipe>) -> Result<Self> {
        Self::from_slots(meals.into_iter().map(Some).collect())
    }

    /// Append a meal after the last planned day.
    ///
    /// When the sequence already spans the whole week the first empty day is
    /// used instead.
    pub fn add_meal(&mut self, recipe: Recipe) -> Result<()> {
        if self.meal_count() >= MAX_MEALS {
            return Err(PlannerError::CapacityExceeded);
        }
        if self.contains(recipe.id) {
            return Err(PlannerError::DuplicateMeal(recipe.id));
        }

        if self.slots.len() < DAYS_PER_WEEK {
            self.slots.push(Some(recipe));
        } else if let Some(slot) = self.slots.iter_mut().find(|s| s.is_none()) {
            *slot = Some(recipe);
        }
        Ok(())
    }

    /// Put a meal on a specific day, padding the week with empty days.
    ///
    /// The meal cap does not apply here, only recipe uniqueness.
    pub fn assign_to_day(&mut self, recipe: Recipe, day: usize) -> Result<()> {
        if day >= DAYS_PER_WEEK {
            return Err(PlannerError::InvalidDay(day));
        }
        let taken_elsewhere = self
            .slots
            .iter()
            .enumerate()
            .any(|(i, s)| i != day && s.as_ref().is_some_and(|r| r.id == recipe.id));
        if taken_elsewhere {
            return Err(PlannerError::DuplicateMeal(recipe.id));
        }

        if self.slots.len() <= day {
            self.slots.resize(day + 1, None);
        }
        self.slots[day] = Some(recipe);
        Ok(())
    }

    /// Empty a day. Returns the meal that was planned there.
    pub fn remove_from_day(&mut self, day: usize) -> Option<Recipe> {
        let removed = self.slots.get_mut(day).and_then(Option::take);
        self.prune_trailing();
        removed
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Refresh every slot holding `recipe.id` with the new version.
    pub fn replace_recipe(&mut self, recipe: &Recipe) -> usize {
        let mut replaced = 0;
        for slot in self.slots.iter_mut().flatten() {
            if slot.id == recipe.id {
                *slot = recipe.clone();
                replaced += 1;
            }
        }
        replaced
    }

    /// Empty every slot holding `id`. Returns how many days were cleared.
    pub fn forget_recipe(&mut self, id: RecipeId) -> usize {
        let mut cleared = 0;
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|r| r.id == id) {
                *slot = None;
                cleared += 1;
            }
        }
        self.prune_trailing();
        cleared
    }

    /// The stored slot sequence, Monday first.
    pub fn slots(&self) -> &[Option<Recipe>] {
        &self.slots
    }

    /// Meal planned on `day`, if any.
    pub fn day(&self, day: usize) -> Option<&Recipe> {
        self.slots.get(day).and_then(Option::as_ref)
    }

    /// Planned meals in day order, skipping empty days.
    pub fn meals(&self) -> impl Iterator<Item = &Recipe> {
        self.slots.iter().flatten()
    }

    pub fn recipe_ids(&self) -> Vec<RecipeId> {
        self.meals().map(|r| r.id).collect()
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.meals().any(|r| r.id == id)
    }

    pub fn meal_count(&self) -> usize {
        self.meals().count()
    }

    /// Length of the stored sequence, including empty days between meals.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.meal_count() >= MAX_MEALS
    }

    pub fn total_cost(&self) -> f64 {
        budget::total_cost(self)
    }

    fn prune_trailing(&mut self) {
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }
}

impl TryFrom<Vec<Option<Recipe>>> for WeeklyMenu {
    type Error = PlannerError;

    fn try_from(slots: Vec<Option<Recipe>>) -> Result<Self> {
        Self::from_slots(slots)
    }
}

impl From<WeeklyMenu> for Vec<Option<Recipe>> {
    fn from(menu: WeeklyMenu) -> Self {
        menu.slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeDraft;

    fn recipe(id: RecipeId) -> Recipe {
        RecipeDraft::new(format!("Rett {id}"))
            .ingredient("Løk", "1 stk", 5.0)
            .into_recipe(id)
    }

    #[test]
    fn test_add_meal_appends() {
        let mut menu = WeeklyMenu::new();
        menu.add_meal(recipe(1)).unwrap();
        menu.add_meal(recipe(2)).unwrap();
        assert_eq!(menu.recipe_ids(), vec![1, 2]);
        assert_eq!(menu.len(), 2);
    }

    #[test]
    fn test_add_meal_rejects_duplicate() {
        let mut menu = WeeklyMenu::new();
        menu.add_meal(recipe(1)).unwrap();
        let err = menu.add_meal(recipe(1)).unwrap_err();
        assert!(matches!(err, PlannerError::DuplicateMeal(1)));
        assert_eq!(menu.meal_count(), 1);
    }

    #[test]
    fn test_add_meal_capacity() {
        let mut menu = WeeklyMenu::new();
        for id in 1..=7 {
            menu.add_meal(recipe(id)).unwrap();
        }
        assert!(menu.is_full());
        let err = menu.add_meal(recipe(8)).unwrap_err();
        assert!(matches!(err, PlannerError::CapacityExceeded));
        assert_eq!(menu.meal_count(), 7);
    }

    #[test]
    fn test_add_meal_fills_gap_when_week_is_spanned() {
        let mut menu = WeeklyMenu::new();
        menu.assign_to_day(recipe(1), 0).unwrap();
        menu.assign_to_day(recipe(7), 6).unwrap();
        for id in 2..=5 {
            menu.add_meal(recipe(id)).unwrap();
        }
        assert_eq!(menu.meal_count(), 6);
        assert_eq!(menu.len(), 7);

        menu.add_meal(recipe(9)).unwrap();
        assert_eq!(menu.day(5).map(|r| r.id), Some(9));
        assert!(menu.is_full());
    }

    #[test]
    fn test_assign_to_day_pads_with_empty_days() {
        let mut menu = WeeklyMenu::new();
        menu.assign_to_day(recipe(3), 4).unwrap();
        assert_eq!(menu.len(), 5);
        assert!(menu.day(0).is_none());
        assert_eq!(menu.day(4).map(|r| r.id), Some(3));
    }

    #[test]
    fn test_assign_to_day_rejects_duplicate_elsewhere() {
        let mut menu = WeeklyMenu::new();
        menu.assign_to_day(recipe(3), 1).unwrap();
        let err = menu.assign_to_day(recipe(3), 2).unwrap_err();
        assert!(matches!(err, PlannerError::DuplicateMeal(3)));

        // Same recipe on the same day is a plain overwrite.
        menu.assign_to_day(recipe(3), 1).unwrap();
        assert_eq!(menu.meal_count(), 1);
    }

    #[test]
    fn test_assign_to_day_out_of_range() {
        let mut menu = WeeklyMenu::new();
        let err = menu.assign_to_day(recipe(1), 7).unwrap_err();
        assert!(matches!(err, PlannerError::InvalidDay(7)));
        assert!(menu.is_empty());
    }

    #[test]
    fn test_remove_prunes_trailing_empty_days() {
        let mut menu = WeeklyMenu::new();
        menu.assign_to_day(recipe(1), 0).unwrap();
        menu.assign_to_day(recipe(2), 2).unwrap();
        menu.assign_to_day(recipe(3), 4).unwrap();

        let removed = menu.remove_from_day(4);
        assert_eq!(removed.map(|r| r.id), Some(3));
        assert_eq!(menu.len(), 3);
        assert!(menu.day(1).is_none());
        assert!(menu.slots().last().unwrap().is_some());

        menu.remove_from_day(2);
        assert_eq!(menu.len(), 1);
    }

    #[test]
    fn test_remove_middle_day_keeps_structure() {
        let mut menu = WeeklyMenu::new();
        for id in 1..=3 {
            menu.add_meal(recipe(id)).unwrap();
        }
        menu.remove_from_day(1);
        assert_eq!(menu.len(), 3);
        assert_eq!(menu.recipe_ids(), vec![1, 3]);
    }

    #[test]
    fn test_remove_outside_sequence_is_noop() {
        let mut menu = WeeklyMenu::new();
        menu.add_meal(recipe(1)).unwrap();
        assert!(menu.remove_from_day(5).is_none());
        assert_eq!(menu.len(), 1);
    }

    #[test]
    fn test_forget_recipe_nulls_slots() {
        let mut menu = WeeklyMenu::new();
        for id in 1..=3 {
            menu.add_meal(recipe(id)).unwrap();
        }
        assert_eq!(menu.forget_recipe(2), 1);
        assert_eq!(menu.len(), 3);
        assert_eq!(menu.forget_recipe(3), 1);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu.forget_recipe(42), 0);
    }

    #[test]
    fn test_serializes_with_null_days() {
        let mut menu = WeeklyMenu::new();
        menu.assign_to_day(recipe(5), 1).unwrap();
        let json = serde_json::to_value(&menu).unwrap();
        assert!(json[0].is_null());
        assert_eq!(json[1]["id"], 5);
    }

    #[test]
    fn test_deserialize_enforces_invariants() {
        let dup = vec![Some(recipe(1)), None, Some(recipe(1))];
        let json = serde_json::to_string(&dup).unwrap();
        assert!(serde_json::from_str::<WeeklyMenu>(&json).is_err());

        let trailing = vec![Some(recipe(1)), None, None];
        let json = serde_json::to_string(&trailing).unwrap();
        let menu: WeeklyMenu = serde_json::from_str(&json).unwrap();
        assert_eq!(menu.len(), 1);

        let too_long: Vec<Option<Recipe>> = (1..=8).map(|id| Some(recipe(id))).collect();
        assert!(WeeklyMenu::from_slots(too_long).is_err());
    }

    #[test]
    fn test_repaired_drops_duplicates_and_overflow() {
        let slots = vec![Some(recipe(1)), None, Some(recipe(1)), Some(recipe(2))];
        let menu = WeeklyMenu::repaired(slots);
        assert_eq!(menu.len(), 4);
        assert!(menu.day(2).is_none());
        assert_eq!(menu.recipe_ids(), vec![1, 2]);

        let dup_tail = vec![Some(recipe(3)), Some(recipe(3)), None];
        assert_eq!(WeeklyMenu::repaired(dup_tail).len(), 1);

        let too_long: Vec<Option<Recipe>> = (1..=9).map(|id| Some(recipe(id))).collect();
        let menu = WeeklyMenu::repaired(too_long);
        assert_eq!(menu.len(), DAYS_PER_WEEK);
        assert!(!menu.contains(8));
    }
}
