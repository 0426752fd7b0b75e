use std::fs::File;
use std::time::Instant;

use clap::Parser;
use dialoguer::Select;
use rand::rngs::StdRng;
use rand::{SeedableRng, thread_rng};
use tracing::{debug, info, warn};

use ukemeny::cli::{Cli, Command, MenuCommand, RecipeCommand};
use ukemeny::config::{AppConfig, LookupConfig};
use ukemeny::error::Result;
use ukemeny::interface::{
    display_budget, display_error_banner, display_products, display_recipe, display_recipe_list,
    display_saved_menus, display_shopping_list, display_week, format_price, prompt_budget,
    prompt_day, prompt_menu_details, prompt_recipe, prompt_recipe_draft, prompt_yes_no,
};
use ukemeny::logging::init_tracing;
use ukemeny::lookup::{PriceLookupClient, ProductSearch, ProductSource, RETRY_MESSAGE, SearchState};
use ukemeny::planner::{BudgetSummary, PlannerSession, aggregate};
use ukemeny::state::{ArchiveQuery, JsonFileStore, MenuArchive, RecipeCatalog};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    init_tracing(&config.log_level);

    let store = JsonFileStore::open(&config.data_dir)?;
    debug!(dir = %config.data_dir.display(), "Opened data directory");

    match cli.command.unwrap_or_default() {
        Command::Plan => cmd_plan(&config, store),
        Command::Recipes(command) => cmd_recipes(&config, store, command),
        Command::Menus(command) => cmd_menus(store, command),
        Command::Generate { seed, save, budget } => cmd_generate(&config, store, seed, save, budget),
        Command::Shopping { menu_id, csv } => cmd_shopping(store, &menu_id, csv.as_deref()),
        Command::Search { query, id, ean } => {
            let client = PriceLookupClient::from_config(&config.lookup)?;
            match (id, ean, query) {
                (Some(id), _, _) => cmd_product(&client, id),
                (None, Some(ean), _) => cmd_barcode(&client, &ean),
                (None, None, Some(query)) => cmd_search(&client, &config.lookup, &query),
                (None, None, None) => Ok(()),
            }
        }
    }
}

const PLAN_ACTIONS: [&str; 12] = [
    "Show week",
    "Add meal",
    "Put meal on a day",
    "Remove meal from a day",
    "Add a random meal",
    "Generate a full week",
    "Clear week",
    "Set budget",
    "Shopping list",
    "Save menu",
    "Load saved menu",
    "Quit",
];

/// Interactive planning loop over one session.
fn cmd_plan(config: &AppConfig, store: JsonFileStore) -> Result<()> {
    let mut session = PlannerSession::open(store, config.budget.limits(), config.budget.default)?;
    let mut rng = thread_rng();

    println!("Loaded {} recipes", session.catalog().len());
    display_week(session.menu());
    display_budget(&session.budget_summary());

    loop {
        display_error_banner(session.last_error());

        let action = Select::new()
            .with_prompt("What next?")
            .items(&PLAN_ACTIONS)
            .default(0)
            .interact()?;

        let outcome = match action {
            0 => {
                display_week(session.menu());
                display_budget(&session.budget_summary());
                Ok(())
            }
            1 => match prompt_recipe(session.catalog().list(), "Recipe to add")?.map(|r| r.id) {
                Some(id) => session.add_meal(id),
                None => Ok(()),
            },
            2 => match prompt_recipe(session.catalog().list(), "Recipe to plan")?.map(|r| r.id) {
                Some(id) => {
                    let day = prompt_day("Which day?")?;
                    session.assign_to_day(id, day)
                }
                None => Ok(()),
            },
            3 => {
                let day = prompt_day("Clear which day?")?;
                if let Some(recipe) = session.remove_from_day(day) {
                    println!("Removed {}", recipe.name);
                }
                Ok(())
            }
            4 => session.pick_random_meal(&mut rng).map(|recipe| {
                println!("Added {}", recipe.name);
            }),
            5 => session.generate_week(&mut rng),
            6 => {
                if prompt_yes_no("Clear the whole week?", false)? {
                    session.clear_menu();
                }
                Ok(())
            }
            7 => {
                let amount = prompt_budget(&session.limits(), session.budget())?;
                session.set_budget(amount)
            }
            8 => {
                display_shopping_list(&session.shopping_list());
                Ok(())
            }
            9 => {
                let (name, description) = prompt_menu_details()?;
                session
                    .save_menu(&name, description.as_deref())
                    .map(|id| println!("Saved as {}", id))
            }
            10 => load_saved_menu(&mut session),
            _ => break,
        };

        match outcome {
            Ok(()) => {
                if (1..=7).contains(&action) || action == 10 {
                    display_week(session.menu());
                    display_budget(&session.budget_summary());
                }
            }
            Err(e) if e.is_recoverable() => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

fn load_saved_menu(session: &mut PlannerSession<JsonFileStore>) -> Result<()> {
    let menus = session.saved_menus()?;
    if menus.is_empty() {
        println!("No saved menus.");
        return Ok(());
    }

    let labels: Vec<String> = menus
        .iter()
        .map(|m| format!("{} ({} meals, {})", m.name, m.meal_count, format_price(m.total_cost)))
        .collect();
    let selection = Select::new()
        .with_prompt("Load which menu?")
        .items(&labels)
        .default(0)
        .interact()?;

    session.load_menu(&menus[selection].id)
}

fn lookup_client(config: &LookupConfig) -> Option<PriceLookupClient> {
    if !config.is_enabled() {
        return None;
    }
    match PriceLookupClient::from_config(config) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "Price lookup unavailable");
            None
        }
    }
}

fn cmd_recipes(config: &AppConfig, store: JsonFileStore, command: RecipeCommand) -> Result<()> {
    let mut catalog = RecipeCatalog::open(store)?;

    match command {
        RecipeCommand::List { search } => {
            let recipes = match &search {
                Some(term) => catalog.search(term),
                None => catalog.list().iter().collect(),
            };
            display_recipe_list(&recipes, "Recipes");
        }
        RecipeCommand::Show { id } => display_recipe(catalog.get(id)?),
        RecipeCommand::Add => {
            let client = lookup_client(&config.lookup);
            let mut search = ProductSearch::new(
                config.lookup.debounce(),
                config.lookup.min_query_len,
                config.lookup.page_size,
            );
            let search = &mut search;
            let lookup = client
                .as_ref()
                .map(move |c| (c as &dyn ProductSource, search));

            let draft = prompt_recipe_draft(lookup)?;
            let recipe = catalog.add(draft)?;
            info!(id = recipe.id, name = %recipe.name, "Recipe added");
            println!(
                "Added '{}' with id {} ({})",
                recipe.name,
                recipe.id,
                format_price(recipe.total_cost())
            );
        }
        RecipeCommand::Delete { id } => {
            let name = catalog.get(id)?.name.clone();
            if prompt_yes_no(&format!("Delete '{}'?", name), false)? {
                catalog.delete(id)?;
                println!("Deleted '{}'.", name);
            }
        }
    }

    Ok(())
}

fn cmd_menus(store: JsonFileStore, command: MenuCommand) -> Result<()> {
    let archive = MenuArchive::new(store);

    match command {
        MenuCommand::List { name } => {
            let menus = match name {
                Some(name) => archive.search(&ArchiveQuery {
                    name: Some(name),
                    ..Default::default()
                })?,
                None => archive.list()?,
            };
            display_saved_menus(&menus);
        }
        MenuCommand::Show { id } => {
            let menu = archive.get(&id)?;
            println!("{}", menu.name);
            if !menu.description.is_empty() {
                println!("{}", menu.description);
            }
            display_week(&menu.meals);
            display_budget(&BudgetSummary::from_total(menu.total_cost, menu.budget));
        }
        MenuCommand::Rename {
            id,
            name,
            description,
        } => {
            archive.update(&id, Some(&name), description.as_deref())?;
            println!("Menu {} renamed to '{}'.", id, name);
        }
        MenuCommand::Delete { id } => {
            archive.delete(&id)?;
            println!("Menu {} deleted.", id);
        }
    }

    Ok(())
}

/// Generate a random week non-interactively.
fn cmd_generate(
    config: &AppConfig,
    store: JsonFileStore,
    seed: Option<u64>,
    save: Option<String>,
    budget: Option<f64>,
) -> Result<()> {
    let mut session = PlannerSession::open(store, config.budget.limits(), config.budget.default)?;
    if let Some(amount) = budget {
        session.set_budget(amount)?;
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    session.generate_week(&mut rng)?;

    display_week(session.menu());
    display_budget(&session.budget_summary());
    display_shopping_list(&session.shopping_list());

    if let Some(name) = save {
        let id = session.save_menu(&name, None)?;
        println!("Saved as {}", id);
    }

    Ok(())
}

fn cmd_shopping(store: JsonFileStore, menu_id: &str, csv: Option<&std::path::Path>) -> Result<()> {
    let archive = MenuArchive::new(store);
    let (menu, _) = archive.load(menu_id)?;
    let list = aggregate(&menu);

    match csv {
        Some(path) => {
            list.write_csv(File::create(path)?)?;
            println!("Wrote {} items to {}", list.len(), path.display());
        }
        None => display_shopping_list(&list),
    }

    Ok(())
}

fn cmd_search(client: &PriceLookupClient, config: &LookupConfig, query: &str) -> Result<()> {
    let mut search = ProductSearch::new(config.debounce(), config.min_query_len, config.page_size);

    let typed_at = Instant::now();
    search.input(query, typed_at);

    // A one-shot query is due as soon as its debounce window has passed
    match search.run_due(client, typed_at + config.debounce()) {
        SearchState::Success(products) => display_products(products),
        SearchState::Error(_) => println!("{}", RETRY_MESSAGE),
        SearchState::Idle | SearchState::Pending { .. } => println!(
            "Search terms need at least {} characters.",
            config.min_query_len
        ),
    }

    Ok(())
}

fn cmd_product(client: &PriceLookupClient, id: u64) -> Result<()> {
    match client.product_by_id(id)? {
        Some(product) => display_products(&[product]),
        None => println!("No priced product with id {}.", id),
    }
    Ok(())
}

fn cmd_barcode(client: &PriceLookupClient, ean: &str) -> Result<()> {
    let offers = client.product_by_ean(ean)?;
    display_products(&offers);
    Ok(())
}
