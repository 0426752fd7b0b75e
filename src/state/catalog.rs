use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::models::{Recipe, RecipeDraft, RecipeId, RecipePatch};
use crate::state::seed::default_recipes;
use crate::state::store::{KeyValueStore, load_json, save_json};

/// Storage key of the recipe collection.
pub const RECIPES_KEY: &str = "oppskrifter";

/// The pool of selectable recipes, persisted under [`RECIPES_KEY`].
///
/// Every mutation is written to the store before the in-memory list changes,
/// so a storage failure leaves the catalog as it was.
pub struct RecipeCatalog<S: KeyValueStore> {
    store: S,
    recipes: Vec<Recipe>,
}

impl<S: KeyValueStore> RecipeCatalog<S> {
    /// Load the catalog. A store without recipes starts from the defaults.
    pub fn open(store: S) -> Result<Self> {
        let recipes = match load_json::<Vec<Recipe>, _>(&store, RECIPES_KEY)? {
            Some(recipes) => recipes,
            None => {
                info!("No stored recipes, seeding defaults");
                default_recipes()
            }
        };
        debug!(count = recipes.len(), "Recipe catalog loaded");
        Ok(Self { store, recipes })
    }

    /// All recipes in catalog order.
    pub fn list(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, id: RecipeId) -> Result<&Recipe> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| PlannerError::recipe_not_found(id))
    }

    /// Recipes whose name contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<&Recipe> {
        let term = term.trim().to_lowercase();
        self.recipes
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&term))
            .collect()
    }

    /// Store a new recipe with the next free id.
    pub fn add(&mut self, draft: RecipeDraft) -> Result<Recipe> {
        draft.validate()?;

        let id = self.recipes.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let recipe = draft.into_recipe(id);

        let mut updated = self.recipes.clone();
        updated.push(recipe.clone());
        self.commit(updated)?;

        info!(id, name = %recipe.name, "Recipe added");
        Ok(recipe)
    }

    /// Apply a partial update and return the stored result.
    pub fn update(&mut self, id: RecipeId, patch: RecipePatch) -> Result<Recipe> {
        patch.validate()?;

        let mut updated = self.recipes.clone();
        let recipe = updated
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| PlannerError::recipe_not_found(id))?;
        recipe.apply(patch);
        let result = recipe.clone();

        self.commit(updated)?;
        debug!(id, "Recipe updated");
        Ok(result)
    }

    pub fn delete(&mut self, id: RecipeId) -> Result<Recipe> {
        let pos = self
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| PlannerError::recipe_not_found(id))?;

        let mut updated = self.recipes.clone();
        let removed = updated.remove(pos);
        self.commit(updated)?;

        info!(id, name = %removed.name, "Recipe deleted");
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn commit(&mut self, recipes: Vec<Recipe>) -> Result<()> {
        save_json(&self.store, RECIPES_KEY, &recipes)?;
        self.recipes = recipes;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::{MemoryStore, StorageError};

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> std::result::Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("quota exceeded")))
        }

        fn remove(&self, _key: &str) -> std::result::Result<(), StorageError> {
            Ok(())
        }
    }

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft::new(name)
            .ingredient("Egg", "2 stk", 8.0)
            .step("Stek.")
    }

    #[test]
    fn test_seeds_defaults() {
        let catalog = RecipeCatalog::open(MemoryStore::new()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get(1).is_ok());
    }

    #[test]
    fn test_add_assigns_next_id() {
        let mut catalog = RecipeCatalog::open(MemoryStore::new()).unwrap();
        let recipe = catalog.add(draft("Omelett")).unwrap();
        assert_eq!(recipe.id, 4);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_add_rejects_invalid_draft() {
        let mut catalog = RecipeCatalog::open(MemoryStore::new()).unwrap();
        let err = catalog.add(RecipeDraft::new("")).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_persists_across_reopen() {
        let store = MemoryStore::new();
        let mut catalog = RecipeCatalog::open(store.clone()).unwrap();
        catalog.add(draft("Omelett")).unwrap();
        catalog.delete(1).unwrap();

        let reopened = RecipeCatalog::open(store).unwrap();
        assert_eq!(reopened.len(), 3);
        assert!(reopened.get(1).is_err());
        assert_eq!(reopened.get(4).unwrap().name, "Omelett");
    }

    #[test]
    fn test_update_and_delete_missing() {
        let mut catalog = RecipeCatalog::open(MemoryStore::new()).unwrap();
        let err = catalog.update(99, RecipePatch::default()).unwrap_err();
        assert!(matches!(err, PlannerError::NotFound { .. }));
        assert!(matches!(
            catalog.delete(99),
            Err(PlannerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_update_patches_fields() {
        let mut catalog = RecipeCatalog::open(MemoryStore::new()).unwrap();
        let updated = catalog
            .update(
                2,
                RecipePatch {
                    name: Some("Søtpotet i ovn".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Søtpotet i ovn");
        assert_eq!(updated.ingredients.len(), 3);
    }

    #[test]
    fn test_search_ignores_case() {
        let catalog = RecipeCatalog::open(MemoryStore::new()).unwrap();
        let hits = catalog.search("QUINOA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);
    }

    #[test]
    fn test_failed_write_leaves_catalog_unchanged() {
        let mut catalog = RecipeCatalog::open(ReadOnlyStore).unwrap();
        let err = catalog.add(draft("Omelett")).unwrap_err();
        assert!(matches!(err, PlannerError::Storage(_)));
        assert_eq!(catalog.len(), 3);

        assert!(catalog.delete(1).is_err());
        assert!(catalog.get(1).is_ok());
    }

    #[test]
    fn test_corrupt_store_is_storage_error() {
        let store = MemoryStore::new();
        store.set(RECIPES_KEY, "[{").unwrap();
        assert!(matches!(
            RecipeCatalog::open(store),
            Err(PlannerError::Storage(StorageError::Json(_)))
        ));
    }
}
