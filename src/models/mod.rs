mod recipe;

pub use recipe::{
    Difficulty, IngredientLine, ProductInfo, Recipe, RecipeDraft, RecipeId, RecipePatch,
};
