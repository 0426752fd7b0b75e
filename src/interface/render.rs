use crate::lookup::Product;
use crate::models::Recipe;
use crate::planner::constants::{DAY_NAMES, DAYS_PER_WEEK};
use crate::planner::{BudgetSummary, ShoppingList, WeeklyMenu};
use crate::state::ArchiveSummary;

/// Format an amount the way Norwegian price tags do: `24,90 kr`.
pub fn format_price(amount: f64) -> String {
    format!("{:.2} kr", amount).replace('.', ",")
}

/// Display the week day by day, including unplanned days.
pub fn display_week(menu: &WeeklyMenu) {
    println!();
    println!("=== Weekly Menu ({}/{} meals) ===", menu.meal_count(), DAYS_PER_WEEK);
    println!();

    let width = DAY_NAMES.iter().map(|d| d.len()).max().unwrap_or(9);

    for (i, day) in DAY_NAMES.iter().enumerate() {
        match menu.day(i) {
            Some(recipe) => println!(
                "  {:<width$}  {} ({}, {})",
                day,
                recipe.name,
                recipe.prep_time,
                format_price(recipe.total_cost()),
                width = width
            ),
            None => println!("  {:<width$}  -", day, width = width),
        }
    }
    println!();
}

/// Display cost against budget with a simple progress bar.
pub fn display_budget(summary: &BudgetSummary) {
    const BAR_WIDTH: usize = 30;
    let filled = ((summary.percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let bar = format!(
        "[{}{}]",
        "#".repeat(filled.min(BAR_WIDTH)),
        "-".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))
    );

    println!("--- Budget ---");
    println!("Total cost: {}", format_price(summary.total));
    println!("Budget:     {}", format_price(summary.budget));
    println!("{} {:.0}%", bar, summary.percent);

    if summary.is_over_budget() {
        println!("You are {} over budget", format_price(-summary.delta));
    } else if summary.total > 0.0 {
        println!("You are {} under budget", format_price(summary.delta));
    }
    println!();
}

/// Display the consolidated shopping list.
pub fn display_shopping_list(list: &ShoppingList) {
    if list.is_empty() {
        println!("Shopping list: (empty, plan some meals first)");
        return;
    }

    println!();
    println!("=== Shopping List ({} items) ===", list.len());
    println!();

    let width = list.items().iter().map(|i| i.name.chars().count()).max().unwrap_or(10);

    for item in list.items() {
        println!(
            "  {:<width$}  {:<20} {:>10}  [{}]",
            item.name,
            item.quantities.join(" + "),
            format_price(item.unit_price),
            item.recipes.join(", "),
            width = width
        );
    }
    println!();
}

/// Display a list of recipes with their cost.
pub fn display_recipe_list(recipes: &[&Recipe], title: &str) {
    if recipes.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} recipes) ===", title, recipes.len());
    println!();

    for recipe in recipes {
        println!(
            "  {:>3}. {} - {}, {}, {} ingredients, {}",
            recipe.id,
            recipe.name,
            recipe.prep_time,
            recipe.difficulty,
            recipe.ingredients.len(),
            format_price(recipe.total_cost())
        );
    }
    println!();
}

/// Display a full recipe.
pub fn display_recipe(recipe: &Recipe) {
    println!();
    println!("=== {} ===", recipe.name);
    println!(
        "Time: {} | Difficulty: {} | Cost: {}",
        recipe.prep_time,
        recipe.difficulty,
        format_price(recipe.total_cost())
    );
    if !recipe.allergens.is_empty() {
        println!("Allergens: {}", recipe.allergens.join(", "));
    }
    if let Some(image) = &recipe.image {
        println!("Image: {}", image);
    }

    println!();
    println!("Ingredients:");
    for ingredient in &recipe.ingredients {
        let source = match ingredient.product_info.as_ref().and_then(|p| p.vendor.as_deref()) {
            Some(vendor) => format!("  ({})", vendor),
            None => String::new(),
        };
        println!(
            "  - {} {} - {}{}",
            ingredient.quantity,
            ingredient.name,
            format_price(ingredient.price),
            source
        );
    }

    println!();
    println!("Steps:");
    for (i, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    println!();
}

/// Display saved menu summaries.
pub fn display_saved_menus(menus: &[ArchiveSummary]) {
    if menus.is_empty() {
        println!("No saved menus.");
        return;
    }

    println!();
    println!("=== Saved Menus ({}) ===", menus.len());
    println!();

    for menu in menus {
        println!(
            "  {}  {} - {} meals, {} ({})",
            menu.id,
            menu.name,
            menu.meal_count,
            format_price(menu.total_cost),
            menu.created_at.format("%Y-%m-%d %H:%M")
        );
        if !menu.description.is_empty() {
            println!("      {}", menu.description);
        }
    }
    println!();
}

/// Display price lookup results.
pub fn display_products(products: &[Product]) {
    if products.is_empty() {
        println!("No products found. Try another search term.");
        return;
    }

    for product in products {
        println!(
            "  {:<40} {:>10}  {}",
            product.name,
            format_price(product.current_price),
            product.vendor.as_deref().unwrap_or("Unknown vendor")
        );
    }
}

/// Display the outstanding error, if any.
pub fn display_error_banner(message: Option<&str>) {
    if let Some(message) = message {
        println!();
        println!("!! {}", message);
        println!();
    }
}
