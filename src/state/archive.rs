use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PlannerError, Result};
use crate::models::Recipe;
use crate::planner::WeeklyMenu;
use crate::state::store::{KeyValueStore, load_json, save_json};

/// Storage key of the archived menus.
pub const MENUS_KEY: &str = "ukemenyer";

/// A named snapshot of a weekly menu and its budget.
///
/// Meals are full recipe copies, so later catalog edits do not change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedMenu {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub budget: f64,
    #[serde(deserialize_with = "repaired_meals")]
    pub meals: WeeklyMenu,
    #[serde(rename = "totalPrice", default)]
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Older snapshots may plan a recipe on two days. Those are repaired on read
/// so one bad record cannot lock the whole archive.
fn repaired_meals<'de, D>(deserializer: D) -> std::result::Result<WeeklyMenu, D::Error>
where
    D: Deserializer<'de>,
{
    let slots = Vec::<Option<Recipe>>::deserialize(deserializer)?;
    let stored = slots.iter().flatten().count();
    let menu = WeeklyMenu::repaired(slots);
    if menu.meal_count() != stored {
        warn!(
            stored,
            kept = menu.meal_count(),
            "Archived menu broke the weekly rules, extra meals dropped"
        );
    }
    Ok(menu)
}

/// Listing entry for an archived menu.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub meal_count: usize,
    pub total_cost: f64,
}

impl From<&ArchivedMenu> for ArchiveSummary {
    fn from(menu: &ArchivedMenu) -> Self {
        Self {
            id: menu.id.clone(),
            name: menu.name.clone(),
            description: menu.description.clone(),
            created_at: menu.created_at,
            meal_count: menu.meals.meal_count(),
            total_cost: menu.total_cost,
        }
    }
}

/// Filter for [`MenuArchive::search`]. A menu matches if any given criterion does.
#[derive(Debug, Clone, Default)]
pub struct ArchiveQuery {
    /// Case-insensitive substring of the menu name.
    pub name: Option<String>,
    /// Prefix of the RFC 3339 creation timestamp, e.g. `2025-03` or `2025-03-14`.
    pub date: Option<String>,
    /// Menus planned with at most this budget.
    pub max_budget: Option<f64>,
}

impl ArchiveQuery {
    fn matches(&self, menu: &ArchivedMenu) -> bool {
        if let Some(name) = &self.name {
            if menu.name.to_lowercase().contains(&name.to_lowercase()) {
                return true;
            }
        }
        if let Some(date) = &self.date {
            if menu.created_at.to_rfc3339().starts_with(date.as_str()) {
                return true;
            }
        }
        if let Some(max_budget) = self.max_budget {
            if menu.budget <= max_budget {
                return true;
            }
        }
        false
    }
}

/// Saved weekly menus, persisted under [`MENUS_KEY`].
///
/// The store is re-read on every call: a menu deleted elsewhere shows up as
/// not found instead of lingering in a stale copy.
pub struct MenuArchive<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> MenuArchive<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Snapshot a menu. Returns the new archive id.
    pub fn save(
        &self,
        name: &str,
        description: Option<&str>,
        menu: &WeeklyMenu,
        budget: f64,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlannerError::Validation(
                "the menu needs a name".to_string(),
            ));
        }
        if menu.meal_count() == 0 {
            return Err(PlannerError::Validation(
                "the menu is empty, add some recipes first".to_string(),
            ));
        }

        let now = Utc::now();
        let record = ArchivedMenu {
            id: format!("menu-{}", Uuid::new_v4()),
            name: name.to_string(),
            description: description.unwrap_or_default().trim().to_string(),
            budget,
            meals: menu.clone(),
            total_cost: menu.total_cost(),
            created_at: now,
            last_updated: now,
        };

        let mut menus = self.read()?;
        menus.push(record.clone());
        save_json(&self.store, MENUS_KEY, &menus)?;

        info!(id = %record.id, name = %record.name, meals = record.meals.meal_count(), "Menu saved");
        Ok(record.id)
    }

    pub fn list(&self) -> Result<Vec<ArchiveSummary>> {
        Ok(self.read()?.iter().map(ArchiveSummary::from).collect())
    }

    /// Full stored record.
    pub fn get(&self, id: &str) -> Result<ArchivedMenu> {
        self.read()?
            .into_iter()
            .find(|m| m.id == id)
            .ok_or_else(|| PlannerError::menu_not_found(id))
    }

    /// Restore a menu and the budget it was planned with.
    pub fn load(&self, id: &str) -> Result<(WeeklyMenu, f64)> {
        let record = self.get(id)?;
        debug!(id, "Menu loaded");
        Ok((record.meals, record.budget))
    }

    /// Rename or re-describe a saved menu.
    pub fn update(&self, id: &str, name: Option<&str>, description: Option<&str>) -> Result<()> {
        let mut menus = self.read()?;
        let record = menus
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PlannerError::menu_not_found(id))?;

        if let Some(name) = name {
            let name = name.trim();
            if name.is_empty() {
                return Err(PlannerError::Validation(
                    "the menu needs a name".to_string(),
                ));
            }
            record.name = name.to_string();
        }
        if let Some(description) = description {
            record.description = description.trim().to_string();
        }
        record.last_updated = Utc::now();

        save_json(&self.store, MENUS_KEY, &menus)?;
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let menus = self.read()?;
        let before = menus.len();
        let remaining: Vec<ArchivedMenu> = menus.into_iter().filter(|m| m.id != id).collect();
        if remaining.len() == before {
            return Err(PlannerError::menu_not_found(id));
        }

        save_json(&self.store, MENUS_KEY, &remaining)?;
        info!(id, "Menu deleted");
        Ok(())
    }

    pub fn search(&self, query: &ArchiveQuery) -> Result<Vec<ArchiveSummary>> {
        Ok(self
            .read()?
            .iter()
            .filter(|m| query.matches(m))
            .map(ArchiveSummary::from)
            .collect())
    }

    fn read(&self) -> Result<Vec<ArchivedMenu>> {
        Ok(load_json(&self.store, MENUS_KEY)?.unwrap_or_default())
    }
}
