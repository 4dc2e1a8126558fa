//! Persisted favorites: named item bundles.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::OrderError;
use crate::types::{DrinkSize, FavoriteOrder, OrderItem};

/// Key-value store of named item bundles, persisted as a JSON document.
/// Seeded with defaults on first run.
pub struct FavoriteStore {
    path: PathBuf,
    entries: RwLock<Vec<FavoriteOrder>>,
}

impl FavoriteStore {
    /// Load the store, seeding the default favorites when the file is
    /// absent. A malformed file is an error; silent resets would lose
    /// user-defined favorites.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, OrderError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let entries: Vec<FavoriteOrder> = serde_json::from_str(&raw)?;
                debug!("Loaded {} favorites from {}", entries.len(), path.display());
                entries
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let defaults = default_favorites();
                info!(
                    "No favorites file at {}; seeding {} defaults",
                    path.display(),
                    defaults.len()
                );
                write_entries(&path, &defaults)?;
                defaults
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// All favorites, in stored order.
    pub fn list(&self) -> Vec<FavoriteOrder> {
        self.entries.read().clone()
    }

    /// Look up a favorite by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<FavoriteOrder> {
        self.entries
            .read()
            .iter()
            .find(|favorite| favorite.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Add a favorite, replacing any entry with the same name, and persist.
    pub fn add(&self, name: String, items: Vec<OrderItem>) -> Result<FavoriteOrder, OrderError> {
        let favorite = FavoriteOrder { name, items };
        let snapshot = {
            let mut entries = self.entries.write();
            entries.retain(|existing| !existing.name.eq_ignore_ascii_case(&favorite.name));
            entries.push(favorite.clone());
            entries.clone()
        };
        write_entries(&self.path, &snapshot)?;
        debug!("Saved favorite \"{}\"", favorite.name);
        Ok(favorite)
    }
}

fn write_entries(path: &Path, entries: &[FavoriteOrder]) -> Result<(), OrderError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(entries)?)?;
    Ok(())
}

fn default_favorites() -> Vec<FavoriteOrder> {
    vec![
        FavoriteOrder {
            name: "Morning Ritual".to_string(),
            items: vec![
                OrderItem::Drink {
                    name: "Cold Brew".to_string(),
                    size: DrinkSize::Venti,
                },
                OrderItem::Food {
                    name: "Butter Croissant".to_string(),
                },
            ],
        },
        FavoriteOrder {
            name: "Classic Latte".to_string(),
            items: vec![OrderItem::Drink {
                name: "Caffè Latte".to_string(),
                size: DrinkSize::Grande,
            }],
        },
        FavoriteOrder {
            name: "Iced Duo".to_string(),
            items: vec![
                OrderItem::Drink {
                    name: "Iced Coffee".to_string(),
                    size: DrinkSize::Tall,
                },
                OrderItem::Drink {
                    name: "Iced Green Tea".to_string(),
                    size: DrinkSize::Grande,
                },
            ],
        },
        FavoriteOrder {
            name: "Snack Break".to_string(),
            items: vec![
                OrderItem::Drink {
                    name: "Hot Chocolate".to_string(),
                    size: DrinkSize::Tall,
                },
                OrderItem::Food {
                    name: "Chocolate Chip Cookie".to_string(),
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FavoriteStore {
        FavoriteStore::load(dir.path().join("favorites.json")).unwrap()
    }

    #[test]
    fn test_seeds_defaults_when_absent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.list().len(), 4);
        assert!(store.get("Morning Ritual").is_some());

        // The seed is persisted, not just in memory.
        let reloaded = store_in(&dir);
        assert_eq!(reloaded.list().len(), 4);
    }

    #[test]
    fn test_add_and_list_preserves_items_exactly() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let items = vec![OrderItem::Drink {
            name: "Cold Brew".to_string(),
            size: DrinkSize::Venti,
        }];
        store
            .add("Afternoon Pick-Me-Up".to_string(), items.clone())
            .unwrap();

        let listed = store
            .list()
            .into_iter()
            .find(|favorite| favorite.name == "Afternoon Pick-Me-Up")
            .expect("favorite should be listed");
        assert_eq!(listed.items, items);

        // Persisted across a reload too.
        let reloaded = store_in(&dir);
        assert_eq!(reloaded.get("Afternoon Pick-Me-Up").unwrap().items, items);
    }

    #[test]
    fn test_add_replaces_same_name() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store
            .add(
                "Morning Ritual".to_string(),
                vec![OrderItem::Food {
                    name: "Bagel".to_string(),
                }],
            )
            .unwrap();

        assert_eq!(store.list().len(), 4);
        let replaced = store.get("morning ritual").unwrap();
        assert_eq!(replaced.items.len(), 1);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.get("CLASSIC LATTE").is_some());
        assert!(store.get("no such favorite").is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "{broken").unwrap();
        assert!(FavoriteStore::load(path).is_err());
    }
}
