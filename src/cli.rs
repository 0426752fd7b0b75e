use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Plan a gluten- and dairy-free week of dinners within a budget.
#[derive(Parser, Debug)]
#[command(name = "ukemeny")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding recipes and saved menus (overrides the config).
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Default)]
pub enum Command {
    /// Interactive weekly planning session.
    #[default]
    Plan,

    /// Browse and manage recipes.
    #[command(subcommand)]
    Recipes(RecipeCommand),

    /// Browse and manage saved menus.
    #[command(subcommand)]
    Menus(MenuCommand),

    /// Generate a random week and print it with its shopping list.
    Generate {
        /// Random seed for a reproducible week.
        #[arg(long)]
        seed: Option<u64>,

        /// Save the generated week under this name.
        #[arg(long)]
        save: Option<String>,

        /// Budget to plan against.
        #[arg(long)]
        budget: Option<f64>,
    },

    /// Print the shopping list of a saved menu.
    Shopping {
        /// Id of the saved menu.
        menu_id: String,

        /// Write the list as CSV to this file instead of printing it.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Look up grocery prices by name, catalog id or barcode.
    Search {
        /// Product name to search for.
        #[arg(required_unless_present_any = ["id", "ean"])]
        query: Option<String>,

        /// Fetch one product by its price catalog id.
        #[arg(long, conflicts_with_all = ["query", "ean"])]
        id: Option<u64>,

        /// Fetch every offer of a product by barcode.
        #[arg(long, conflicts_with = "query")]
        ean: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// List recipes, optionally filtered by name.
    List {
        #[arg(long)]
        search: Option<String>,
    },

    /// Show a recipe with ingredients and steps.
    Show { id: u64 },

    /// Add a recipe interactively.
    Add,

    /// Delete a recipe.
    Delete { id: u64 },
}

#[derive(Subcommand, Debug)]
pub enum MenuCommand {
    /// List saved menus.
    List {
        /// Only menus whose name contains this text.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a saved menu day by day.
    Show { id: String },

    /// Rename a saved menu.
    Rename {
        id: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a saved menu.
    Delete { id: String },
}
