use std::time::Instant;

use dialoguer::{Confirm, Input, Select};
use strsim::jaro_winkler;

use crate::error::{PlannerError, Result};
use crate::interface::render::{display_products, format_price};
use crate::lookup::{Product, ProductSearch, ProductSource, SearchState};
use crate::models::{Difficulty, IngredientLine, Recipe, RecipeDraft};
use crate::planner::BudgetLimits;
use crate::planner::constants::DAY_NAMES;

/// Minimum Jaro-Winkler similarity for a fuzzy recipe match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Ask for a recipe by name, with fuzzy matching.
///
/// Returns `None` when the user leaves the prompt empty or rejects the matches.
pub fn prompt_recipe<'a>(recipes: &'a [Recipe], prompt: &str) -> Result<Option<&'a Recipe>> {
    loop {
        let input: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }

        // Numeric input selects by id
        if let Ok(id) = input.parse::<u64>() {
            if let Some(recipe) = recipes.iter().find(|r| r.id == id) {
                return Ok(Some(recipe));
            }
        }

        let needle = input.to_lowercase();
        if let Some(recipe) = recipes.iter().find(|r| r.name.to_lowercase() == needle) {
            return Ok(Some(recipe));
        }

        let mut candidates: Vec<(&Recipe, f64)> = recipes
            .iter()
            .map(|r| (r, jaro_winkler(&r.name.to_lowercase(), &needle)))
            .filter(|(_, score)| *score > FUZZY_THRESHOLD)
            .collect();

        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        if candidates.is_empty() {
            println!("No recipe matching '{}'", input);
            continue;
        }

        if candidates.len() == 1 {
            let recipe = candidates[0].0;
            let confirm = Confirm::new()
                .with_prompt(format!("Did you mean '{}'?", recipe.name))
                .default(true)
                .interact()?;
            return Ok(confirm.then_some(recipe));
        }

        let options: Vec<&Recipe> = candidates.iter().take(5).map(|(r, _)| *r).collect();
        let mut labels: Vec<String> = options.iter().map(|r| r.name.clone()).collect();
        labels.push("None of these".to_string());

        let selection = Select::new()
            .with_prompt("Which did you mean?")
            .items(&labels)
            .default(0)
            .interact()?;

        return Ok(options.get(selection).copied());
    }
}

/// Ask for a day of the week.
pub fn prompt_day(prompt: &str) -> Result<usize> {
    Ok(Select::new()
        .with_prompt(prompt)
        .items(&DAY_NAMES)
        .default(0)
        .interact()?)
}

/// Ask for a new budget among the allowed values.
pub fn prompt_budget(limits: &BudgetLimits, current: f64) -> Result<f64> {
    let choices = limits.choices();
    let labels: Vec<String> = choices.iter().map(|c| format_price(*c)).collect();
    let default = choices
        .iter()
        .position(|c| (*c - current).abs() < f64::EPSILON)
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt("Weekly budget")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(choices[selection])
}

/// Ask for a name and optional description of a menu to save.
pub fn prompt_menu_details() -> Result<(String, Option<String>)> {
    let name: String = Input::new()
        .with_prompt("Menu name")
        .allow_empty(true)
        .interact_text()?;

    let description: String = Input::new()
        .with_prompt("Description (optional)")
        .allow_empty(true)
        .interact_text()?;

    let description = Some(description).filter(|d| !d.trim().is_empty());
    Ok((name, description))
}

/// Search the price catalog for `initial` and let the user pick a product.
pub fn prompt_product<S: ProductSource + ?Sized>(
    source: &S,
    search: &mut ProductSearch,
    initial: &str,
) -> Result<Option<Product>> {
    search.input(initial, Instant::now());
    let Some(ticket) = search.submit() else {
        println!("Type at least a few letters to search.");
        return Ok(None);
    };
    let result = source.search_products(&search.query_for(&ticket));
    search.resolve(&ticket, result);

    match search.state() {
        SearchState::Success(products) if !products.is_empty() => {
            let mut labels: Vec<String> = products
                .iter()
                .map(|p| {
                    format!(
                        "{} - {} ({})",
                        p.name,
                        format_price(p.current_price),
                        p.vendor.as_deref().unwrap_or("Unknown vendor")
                    )
                })
                .collect();
            labels.push("Enter manually".to_string());

            let selection = Select::new()
                .with_prompt("Pick a product")
                .items(&labels)
                .default(0)
                .interact()?;
            Ok(products.get(selection).cloned())
        }
        SearchState::Success(products) => {
            display_products(products);
            Ok(None)
        }
        SearchState::Error(message) => {
            println!("{}", message);
            Ok(None)
        }
        SearchState::Idle | SearchState::Pending { .. } => Ok(None),
    }
}

fn prompt_price(prompt: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default("0".to_string())
        .interact_text()?;

    input
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| PlannerError::Validation("Invalid price".to_string()))
}

/// Walk the user through a new recipe.
///
/// With a product source, each ingredient can be priced from the catalog.
pub fn prompt_recipe_draft(
    mut lookup: Option<(&dyn ProductSource, &mut ProductSearch)>,
) -> Result<RecipeDraft> {
    let name: String = Input::new().with_prompt("Recipe name").interact_text()?;
    let prep_time: String = Input::new()
        .with_prompt("Preparation time")
        .allow_empty(true)
        .interact_text()?;

    let difficulties: Vec<String> = Difficulty::ALL.iter().map(|d| d.to_string()).collect();
    let difficulty = Select::new()
        .with_prompt("Difficulty")
        .items(&difficulties)
        .default(0)
        .interact()?;

    let mut draft = RecipeDraft {
        name,
        prep_time,
        difficulty: Difficulty::ALL[difficulty],
        ..Default::default()
    };

    loop {
        let ingredient: String = Input::new()
            .with_prompt("Ingredient (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;
        let ingredient = ingredient.trim();
        if ingredient.is_empty() {
            break;
        }

        let quantity: String = Input::new()
            .with_prompt("Quantity")
            .allow_empty(true)
            .interact_text()?;

        let product = match lookup.as_mut() {
            Some((source, search)) if prompt_yes_no("Look up the price?", true)? => {
                prompt_product(*source, search, ingredient)?
            }
            _ => None,
        };

        let line = match product {
            Some(product) => IngredientLine::from_product(&product, quantity),
            None => IngredientLine::new(ingredient, quantity, prompt_price("Price (kr)")?),
        };
        println!("Added: {} ({})", line.name, format_price(line.price));
        draft.ingredients.push(line);
    }

    loop {
        let step: String = Input::new()
            .with_prompt(format!("Step {} (or press Enter to finish)", draft.steps.len() + 1))
            .allow_empty(true)
            .interact_text()?;
        if step.trim().is_empty() {
            break;
        }
        draft.steps.push(step.trim().to_string());
    }

    let allergens: String = Input::new()
        .with_prompt("Allergens, comma separated")
        .allow_empty(true)
        .interact_text()?;
    draft.allergens = allergens
        .split(',')
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    Ok(draft)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
