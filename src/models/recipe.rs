use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::lookup::Product;

/// Stable recipe identifier, assigned by the catalog.
pub type RecipeId = u64;

/// How demanding a recipe is to cook.
///
/// Stored with the Norwegian labels used by the browser planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Enkel")]
    Easy,

    #[serde(rename = "Middels")]
    Medium,

    #[serde(rename = "Avansert")]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Advanced];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// Product details copied from the price catalog when an ingredient was looked up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
}

/// A priced ingredient quantity belonging to a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(rename = "navn")]
    pub name: String,

    /// Free-text amount, e.g. "400g" or "1 boks".
    #[serde(rename = "mengde", default)]
    pub quantity: String,

    #[serde(rename = "pris", default)]
    pub price: f64,

    #[serde(rename = "productId", default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u64>,

    #[serde(rename = "productInfo", default, skip_serializing_if = "Option::is_none")]
    pub product_info: Option<ProductInfo>,
}

impl IngredientLine {
    pub fn new(name: impl Into<String>, quantity: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            price,
            product_id: None,
            product_info: None,
        }
    }

    /// Build a line from a looked-up product, keeping the external reference.
    pub fn from_product(product: &Product, quantity: impl Into<String>) -> Self {
        Self {
            name: product.name.clone(),
            quantity: quantity.into(),
            price: product.current_price,
            product_id: Some(product.external_id),
            product_info: Some(ProductInfo {
                vendor: product.vendor.clone(),
                brand: product.brand.clone(),
                ean: product.ean.clone(),
            }),
        }
    }

    pub fn has_product_reference(&self) -> bool {
        self.product_id.is_some()
    }
}

/// A named dish with ingredients, steps and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,

    #[serde(rename = "navn")]
    pub name: String,

    #[serde(rename = "tidsbruk", default)]
    pub prep_time: String,

    #[serde(rename = "vanskelighetsgrad", default)]
    pub difficulty: Difficulty,

    #[serde(rename = "ingredienser", default)]
    pub ingredients: Vec<IngredientLine>,

    #[serde(rename = "fremgangsmaate", default)]
    pub steps: Vec<String>,

    #[serde(rename = "bilde", default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "allergener", default)]
    pub allergens: Vec<String>,
}

impl Recipe {
    /// Sum of the ingredient prices.
    pub fn total_cost(&self) -> f64 {
        self.ingredients.iter().map(|i| i.price).sum()
    }

    pub fn has_allergen(&self, allergen: &str) -> bool {
        self.allergens
            .iter()
            .any(|a| a.eq_ignore_ascii_case(allergen))
    }

    pub(crate) fn apply(&mut self, patch: RecipePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(prep_time) = patch.prep_time {
            self.prep_time = prep_time;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(ingredients) = patch.ingredients {
            self.ingredients = ingredients;
        }
        if let Some(steps) = patch.steps {
            self.steps = steps;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(allergens) = patch.allergens {
            self.allergens = allergens;
        }
    }
}

/// A recipe that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub prep_time: String,
    pub difficulty: Difficulty,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<String>,
    pub image: Option<String>,
    pub allergens: Vec<String>,
}

impl RecipeDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn ingredient(mut self, name: &str, quantity: &str, price: f64) -> Self {
        self.ingredients.push(IngredientLine::new(name, quantity, price));
        self
    }

    pub fn step(mut self, step: &str) -> Self {
        self.steps.push(step.to_string());
        self
    }

    /// Reject drafts the catalog must never store.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlannerError::Validation(
                "recipe name must not be empty".to_string(),
            ));
        }
        validate_ingredients(&self.ingredients)?;
        validate_steps(&self.steps)
    }

    pub(crate) fn into_recipe(self, id: RecipeId) -> Recipe {
        Recipe {
            id,
            name: self.name.trim().to_string(),
            prep_time: self.prep_time,
            difficulty: self.difficulty,
            ingredients: self.ingredients,
            steps: self.steps,
            image: self.image,
            allergens: self.allergens,
        }
    }
}

/// Partial replacement of a stored recipe. Absent fields are kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub prep_time: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub ingredients: Option<Vec<IngredientLine>>,
    pub steps: Option<Vec<String>>,
    pub image: Option<Option<String>>,
    pub allergens: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PlannerError::Validation(
                    "recipe name must not be empty".to_string(),
                ));
            }
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        if let Some(steps) = &self.steps {
            validate_steps(steps)?;
        }
        Ok(())
    }
}

fn validate_ingredients(ingredients: &[IngredientLine]) -> Result<()> {
    for ingredient in ingredients {
        if ingredient.name.trim().is_empty() {
            return Err(PlannerError::Validation(
                "every ingredient needs a name".to_string(),
            ));
        }
        if !ingredient.price.is_finite() || ingredient.price < 0.0 {
            return Err(PlannerError::Validation(format!(
                "price of {} must be a non-negative number",
                ingredient.name
            )));
        }
    }
    Ok(())
}

fn validate_steps(steps: &[String]) -> Result<()> {
    if steps.iter().any(|s| s.trim().is_empty()) {
        return Err(PlannerError::Validation(
            "every step must be filled in".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        RecipeDraft::new("Quinoasalat med avokado")
            .ingredient("Quinoa", "1 dl", 18.0)
            .ingredient("Avokado", "1 stk", 20.0)
            .ingredient("Sitron", "1/2 stk", 5.0)
            .step("Kok quinoa.")
            .into_recipe(3)
    }

    #[test]
    fn test_total_cost() {
        let recipe = sample_recipe();
        assert!((recipe.total_cost() - 43.0).abs() < 1e-9);
    }

    #[test]
    fn test_difficulty_uses_stored_labels() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"Middels\"");
        let parsed: Difficulty = serde_json::from_str("\"Avansert\"").unwrap();
        assert_eq!(parsed, Difficulty::Advanced);
    }

    #[test]
    fn test_recipe_reads_browser_format() {
        let json = r#"{
            "id": 2,
            "navn": "Bakt søtpotet med kikerter",
            "tidsbruk": "45 minutter",
            "vanskelighetsgrad": "Middels",
            "ingredienser": [
                { "navn": "Søtpotet", "mengde": "2 stk", "pris": 25 },
                { "navn": "Tahini", "mengde": "2 ss", "pris": 10, "productId": 77,
                  "productInfo": { "vendor": "Rema", "brand": "Al Arz", "ean": "123" } }
            ],
            "fremgangsmaate": ["Forvarm ovnen til 200°C."],
            "allergener": ["sesam"]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, 2);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.ingredients.len(), 2);
        assert!(recipe.ingredients[1].has_product_reference());
        assert!(recipe.has_allergen("Sesam"));
        assert!(recipe.image.is_none());
    }

    #[test]
    fn test_draft_validation() {
        assert!(RecipeDraft::new("  ").validate().is_err());

        let blank_ingredient = RecipeDraft::new("Suppe").ingredient(" ", "1 stk", 5.0);
        assert!(matches!(
            blank_ingredient.validate(),
            Err(PlannerError::Validation(_))
        ));

        let negative = RecipeDraft::new("Suppe").ingredient("Løk", "1 stk", -1.0);
        assert!(negative.validate().is_err());

        let blank_step = RecipeDraft::new("Suppe").step("");
        assert!(blank_step.validate().is_err());

        let ok = RecipeDraft::new("Suppe")
            .ingredient("Løk", "1 stk", 5.0)
            .step("Kok.");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_apply_patch_keeps_absent_fields() {
        let mut recipe = sample_recipe();
        recipe.apply(RecipePatch {
            prep_time: Some("20 minutter".to_string()),
            ..Default::default()
        });
        assert_eq!(recipe.name, "Quinoasalat med avokado");
        assert_eq!(recipe.prep_time, "20 minutter");
        assert_eq!(recipe.ingredients.len(), 3);
    }
}
