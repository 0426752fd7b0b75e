use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::planner::week::WeeklyMenu;

/// One consolidated line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,

    /// One quantity per contributing recipe, first seen first.
    pub quantities: Vec<String>,

    /// Price of the first occurrence. Not summed across recipes.
    pub unit_price: f64,

    /// Names of the recipes needing this ingredient, first seen first.
    pub recipes: Vec<String>,
}

/// Ingredients of a weekly menu grouped by exact name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&ShoppingListItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of the displayed line prices.
    ///
    /// Differs from the menu total whenever recipes share an ingredient.
    pub fn listed_price(&self) -> f64 {
        self.items.iter().map(|i| i.unit_price).sum()
    }

    /// Write the list as CSV with a header row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Ingredient", "Quantities", "Unit price", "Recipes"])?;
        for item in &self.items {
            let quantities = item.quantities.join(" + ");
            let price = format!("{:.2}", item.unit_price);
            let recipes = item.recipes.join(", ");
            csv.write_record([
                item.name.as_str(),
                quantities.as_str(),
                price.as_str(),
                recipes.as_str(),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// Consolidate the ingredients of every planned day, Monday to Sunday.
///
/// Names are grouped exactly as stored: "Løk" and "løk" are two lines. A
/// recipe name only contributes once to a line.
pub fn aggregate(menu: &WeeklyMenu) -> ShoppingList {
    let mut items: Vec<ShoppingListItem> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for recipe in menu.meals() {
        for ingredient in &recipe.ingredients {
            match index.get(ingredient.name.as_str()) {
                Some(&pos) => {
                    let item = &mut items[pos];
                    if !item.recipes.contains(&recipe.name) {
                        item.quantities.push(ingredient.quantity.clone());
                        item.recipes.push(recipe.name.clone());
                    }
                }
                None => {
                    index.insert(ingredient.name.as_str(), items.len());
                    items.push(ShoppingListItem {
                        name: ingredient.name.clone(),
                        quantities: vec![ingredient.quantity.clone()],
                        unit_price: ingredient.price,
                        recipes: vec![recipe.name.clone()],
                    });
                }
            }
        }
    }

    ShoppingList { items }
}
