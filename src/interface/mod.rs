pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_budget, prompt_day, prompt_menu_details, prompt_product, prompt_recipe,
    prompt_recipe_draft, prompt_yes_no,
};
pub use render::{
    display_budget, display_error_banner, display_products, display_recipe, display_recipe_list,
    display_saved_menus, display_shopping_list, display_week, format_price,
};
