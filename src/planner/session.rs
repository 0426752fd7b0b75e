use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::{PlannerError, Result};
use crate::models::{Recipe, RecipeDraft, RecipeId, RecipePatch};
use crate::planner::budget::{BudgetLimits, BudgetSummary};
use crate::planner::randomizer;
use crate::planner::shopping::{self, ShoppingList};
use crate::planner::week::WeeklyMenu;
use crate::state::{ArchiveSummary, KeyValueStore, MenuArchive, RecipeCatalog};

/// State of one planning session: the live week, its budget, the last error
/// and the catalog and archive it works against.
///
/// Each operation returns a typed result and also records its outcome in
/// the last-error slot: a failure overwrites it, a success clears it.
pub struct PlannerSession<S: KeyValueStore> {
    catalog: RecipeCatalog<S>,
    archive: MenuArchive<S>,
    menu: WeeklyMenu,
    budget: f64,
    limits: BudgetLimits,
    last_error: Option<String>,
}

impl<S: KeyValueStore + Clone> PlannerSession<S> {
    /// Open a session with catalog and archive sharing one store.
    pub fn open(store: S, limits: BudgetLimits, budget: f64) -> Result<Self> {
        let catalog = RecipeCatalog::open(store.clone())?;
        let archive = MenuArchive::new(store);
        Ok(Self::new(catalog, archive, limits, budget))
    }
}

impl<S: KeyValueStore> PlannerSession<S> {
    pub fn new(
        catalog: RecipeCatalog<S>,
        archive: MenuArchive<S>,
        limits: BudgetLimits,
        budget: f64,
    ) -> Self {
        let budget = limits.validate(budget).unwrap_or_else(|e| {
            warn!(requested = budget, fallback = limits.min, error = %e, "Starting budget rejected");
            limits.min
        });
        Self {
            catalog,
            archive,
            menu: WeeklyMenu::new(),
            budget,
            limits,
            last_error: None,
        }
    }

    pub fn menu(&self) -> &WeeklyMenu {
        &self.menu
    }

    pub fn catalog(&self) -> &RecipeCatalog<S> {
        &self.catalog
    }

    pub fn archive(&self) -> &MenuArchive<S> {
        &self.archive
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn limits(&self) -> BudgetLimits {
        self.limits
    }

    /// Message of the last failed operation, until dismissed or a later success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Weekly menu
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_meal(&mut self, id: RecipeId) -> Result<()> {
        let result = self
            .catalog
            .get(id)
            .cloned()
            .and_then(|recipe| self.menu.add_meal(recipe));
        self.track(result)
    }

    pub fn assign_to_day(&mut self, id: RecipeId, day: usize) -> Result<()> {
        let result = self
            .catalog
            .get(id)
            .cloned()
            .and_then(|recipe| self.menu.assign_to_day(recipe, day));
        self.track(result)
    }

    pub fn remove_from_day(&mut self, day: usize) -> Option<Recipe> {
        let removed = self.menu.remove_from_day(day);
        if let Some(recipe) = &removed {
            debug!(day, id = recipe.id, "Meal removed");
        }
        removed
    }

    pub fn clear_menu(&mut self) {
        self.menu.clear();
        self.last_error = None;
    }

    /// Append one random recipe from the catalog.
    pub fn pick_random_meal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Recipe> {
        let result = randomizer::pick_one_random(rng, self.catalog.list(), &self.menu)
            .cloned()
            .and_then(|recipe| {
                self.menu.add_meal(recipe.clone())?;
                Ok(recipe)
            });
        self.track(result)
    }

    /// Replace the week with seven random recipes, all at once.
    ///
    /// On failure the current week is left as it was.
    pub fn generate_week<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let result = randomizer::generate_full_week(rng, self.catalog.list()).map(|week| {
            self.menu = week;
            info!(ids = ?self.menu.recipe_ids(), "Generated weekly menu");
        });
        self.track(result)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Budget and shopping list
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_budget(&mut self, amount: f64) -> Result<()> {
        let result = self.limits.validate(amount).map(|amount| {
            self.budget = amount;
        });
        self.track(result)
    }

    pub fn total_cost(&self) -> f64 {
        self.menu.total_cost()
    }

    pub fn budget_summary(&self) -> BudgetSummary {
        BudgetSummary::new(&self.menu, self.budget)
    }

    pub fn shopping_list(&self) -> ShoppingList {
        shopping::aggregate(&self.menu)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_recipe(&mut self, draft: RecipeDraft) -> Result<Recipe> {
        let result = self.catalog.add(draft);
        self.track(result)
    }

    /// Update a recipe and refresh every day it is planned on.
    pub fn update_recipe(&mut self, id: RecipeId, patch: RecipePatch) -> Result<Recipe> {
        let result = self.catalog.update(id, patch).inspect(|recipe| {
            self.menu.replace_recipe(recipe);
        });
        self.track(result)
    }

    /// Delete a recipe and empty every day it was planned on.
    pub fn delete_recipe(&mut self, id: RecipeId) -> Result<Recipe> {
        let result = self.catalog.delete(id).inspect(|_| {
            let cleared = self.menu.forget_recipe(id);
            if cleared > 0 {
                debug!(id, cleared, "Deleted recipe removed from the week");
            }
        });
        self.track(result)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Archive
    // ─────────────────────────────────────────────────────────────────────

    pub fn save_menu(&mut self, name: &str, description: Option<&str>) -> Result<String> {
        let result = self.archive.save(name, description, &self.menu, self.budget);
        self.track(result)
    }

    /// Replace the live week and budget with an archived copy.
    pub fn load_menu(&mut self, archive_id: &str) -> Result<()> {
        let result = self.archive.load(archive_id).map(|(menu, budget)| {
            self.menu = menu;
            if budget > 0.0 {
                self.budget = budget;
            }
        });
        self.track(result)
    }

    pub fn saved_menus(&mut self) -> Result<Vec<ArchiveSummary>> {
        let result = self.archive.list();
        self.track(result)
    }

    pub fn delete_saved_menu(&mut self, archive_id: &str) -> Result<()> {
        let result = self.archive.delete(archive_id);
        self.track(result)
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                if matches!(e, PlannerError::Storage(_)) {
                    warn!(error = %e, "Persistence failed, continuing in memory");
                } else {
                    debug!(error = %e, "Planner operation rejected");
                }
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MemoryStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session() -> PlannerSession<MemoryStore> {
        PlannerSession::open(MemoryStore::new(), BudgetLimits::default(), 1000.0).unwrap()
    }

    #[test]
    fn test_error_slot_set_and_cleared() {
        let mut s = session();
        s.add_meal(1).unwrap();
        assert!(s.add_meal(1).is_err());
        assert!(s.last_error().is_some());

        s.add_meal(2).unwrap();
        assert!(s.last_error().is_none());

        assert!(s.add_meal(99).is_err());
        s.dismiss_error();
        assert!(s.last_error().is_none());
    }

    #[test]
    fn test_delete_recipe_clears_days() {
        let mut s = session();
        s.add_meal(1).unwrap();
        s.add_meal(2).unwrap();
        s.delete_recipe(2).unwrap();
        assert_eq!(s.menu().recipe_ids(), vec![1]);
        assert_eq!(s.menu().len(), 1);
    }

    #[test]
    fn test_update_recipe_refreshes_days() {
        let mut s = session();
        s.assign_to_day(3, 2).unwrap();
        s.update_recipe(
            3,
            RecipePatch {
                name: Some("Quinoabolle".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(s.menu().day(2).unwrap().name, "Quinoabolle");
    }

    #[test]
    fn test_generate_week_failure_keeps_menu() {
        let mut s = session();
        s.add_meal(1).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(matches!(
            s.generate_week(&mut rng),
            Err(PlannerError::InsufficientCatalog { .. })
        ));
        assert_eq!(s.menu().recipe_ids(), vec![1]);
        assert!(s.last_error().is_some());
    }

    #[test]
    fn test_set_budget_range() {
        let mut s = session();
        s.set_budget(1500.0).unwrap();
        assert_eq!(s.budget(), 1500.0);
        assert!(s.set_budget(100.0).is_err());
        assert_eq!(s.budget(), 1500.0);
    }

    #[test]
    fn test_save_and_load_menu() {
        let mut s = session();
        s.add_meal(2).unwrap();
        s.set_budget(800.0).unwrap();
        let id = s.save_menu("Uke 12", None).unwrap();

        s.clear_menu();
        s.set_budget(1200.0).unwrap();
        s.load_menu(&id).unwrap();
        assert_eq!(s.menu().recipe_ids(), vec![2]);
        assert_eq!(s.budget(), 800.0);
    }

    #[test]
    fn test_invalid_start_budget_falls_back_to_minimum() {
        let limits = BudgetLimits {
            min: 1500.0,
            max: 3000.0,
            step: 100.0,
        };
        let s = PlannerSession::open(MemoryStore::new(), limits, 1000.0).unwrap();
        assert_eq!(s.budget(), 1500.0);
        assert!(s.limits().validate(s.budget()).is_ok());
    }
}
