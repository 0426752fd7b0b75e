use rand::Rng;

use crate::error::{PlannerError, Result};
use crate::models::Recipe;
use crate::planner::constants::{DAYS_PER_WEEK, MAX_MEALS};
use crate::planner::week::WeeklyMenu;

/// Pick one recipe uniformly at random for the caller to append.
///
/// No retry happens when the pick is already planned: a catalog fully used
/// by the menu would never terminate.
pub fn pick_one_random<'a, R: Rng + ?Sized>(
    rng: &mut R,
    catalog: &'a [Recipe],
    menu: &WeeklyMenu,
) -> Result<&'a Recipe> {
    if catalog.is_empty() {
        return Err(PlannerError::EmptyCatalog);
    }

    let chosen = &catalog[rng.gen_range(0..catalog.len())];

    if menu.contains(chosen.id) {
        return Err(PlannerError::AlreadyPresent(chosen.id));
    }
    if menu.meal_count() >= MAX_MEALS {
        return Err(PlannerError::CapacityExceeded);
    }

    Ok(chosen)
}

/// Draw a full week of distinct recipes, Monday first.
///
/// Each draw is uniform over the recipes not yet chosen.
pub fn generate_full_week<R: Rng + ?Sized>(rng: &mut R, catalog: &[Recipe]) -> Result<WeeklyMenu> {
    if catalog.len() < DAYS_PER_WEEK {
        return Err(PlannerError::InsufficientCatalog {
            available: catalog.len(),
            required: DAYS_PER_WEEK,
        });
    }

    let mut remaining: Vec<&Recipe> = catalog.iter().collect();
    let mut week = Vec::with_capacity(DAYS_PER_WEEK);

    for _ in 0..DAYS_PER_WEEK {
        let idx = rng.gen_range(0..remaining.len());
        week.push(remaining.remove(idx).clone());
    }

    WeeklyMenu::from_meals(week)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeDraft;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog(n: u64) -> Vec<Recipe> {
        (1..=n)
            .map(|id| RecipeDraft::new(format!("Rett {id}")).into_recipe(id))
            .collect()
    }

    #[test]
    fn test_pick_from_empty_catalog() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = pick_one_random(&mut rng, &[], &WeeklyMenu::new()).unwrap_err();
        assert!(matches!(err, PlannerError::EmptyCatalog));
    }

    #[test]
    fn test_pick_already_present() {
        let mut rng = StdRng::seed_from_u64(1);
        let recipes = catalog(1);
        let mut menu = WeeklyMenu::new();
        menu.add_meal(recipes[0].clone()).unwrap();
        let err = pick_one_random(&mut rng, &recipes, &menu).unwrap_err();
        assert!(matches!(err, PlannerError::AlreadyPresent(1)));
    }

    #[test]
    fn test_pick_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        let recipes = catalog(8);
        let mut menu = WeeklyMenu::new();
        for r in recipes.iter().take(7) {
            menu.add_meal(r.clone()).unwrap();
        }
        let fresh_only = &recipes[7..];
        let err = pick_one_random(&mut rng, fresh_only, &menu).unwrap_err();
        assert!(matches!(err, PlannerError::CapacityExceeded));
    }

    #[test]
    fn test_pick_success() {
        let mut rng = StdRng::seed_from_u64(7);
        let recipes = catalog(5);
        let picked = pick_one_random(&mut rng, &recipes, &WeeklyMenu::new()).unwrap();
        assert!(recipes.iter().any(|r| r.id == picked.id));
    }

    #[test]
    fn test_full_week_is_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        let recipes = catalog(12);
        let week = generate_full_week(&mut rng, &recipes).unwrap();
        let mut ids = week.recipe_ids();
        assert_eq!(ids.len(), 7);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 7);
    }

    #[test]
    fn test_full_week_needs_seven() {
        let mut rng = StdRng::seed_from_u64(42);
        let err = generate_full_week(&mut rng, &catalog(6)).unwrap_err();
        assert!(matches!(
            err,
            PlannerError::InsufficientCatalog {
                available: 6,
                required: 7
            }
        ));
    }
}
