mod archive;
mod catalog;
mod seed;
mod store;

pub use archive::{ArchiveQuery, ArchiveSummary, ArchivedMenu, MENUS_KEY, MenuArchive};
pub use catalog::{RECIPES_KEY, RecipeCatalog};
pub use seed::default_recipes;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StorageError, load_json, save_json};
