// SPDX-License-Identifier: AGPL-3.0
// Tagmint Core - Catalog persistence
//
// The full catalog is stored in a local JSON file and rewritten wholesale on
// every mutation, via a temp-then-rename swap.

use crate::types::{parse_price, AppError, Item, StoreConfig};
use std::fs;
use std::sync::RwLock;

#[derive(Debug)]
struct CatalogState {
    items: Vec<Item>,
    next_uid: u64,
}

/// File-backed catalog of items plus the monotonic uid counter
#[derive(Debug)]
pub struct CatalogStore {
    state: RwLock<CatalogState>,
    config: StoreConfig,
}

impl CatalogStore {
    /// Open the catalog, loading from disk if the backing file exists.
    ///
    /// The next uid is derived as max(existing uids) + 1, or the configured
    /// seed for an empty catalog. Malformed backing data is propagated, not
    /// papered over.
    pub fn open(config: StoreConfig) -> Result<Self, AppError> {
        let items = if config.data_file.exists() {
            tracing::info!("Loading catalog from {:?}", config.data_file);
            let content = fs::read_to_string(&config.data_file)
                .map_err(|e| AppError::FileIo(format!("Failed to read catalog: {}", e)))?;

            serde_json::from_str::<Vec<Item>>(&content)
                .map_err(|e| AppError::Serialization(format!("Failed to parse catalog: {}", e)))?
        } else {
            tracing::info!("No catalog file at {:?}, starting empty", config.data_file);
            Vec::new()
        };

        let next_uid = derive_next_uid(&items, config.uid_seed)?;

        Ok(Self {
            state: RwLock::new(CatalogState { items, next_uid }),
            config,
        })
    }

    /// Register a new item and persist the catalog.
    ///
    /// Validation failures leave the catalog untouched.
    pub fn create(&self, name: &str, price: &str) -> Result<Item, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::MissingField("name"));
        }
        let price = parse_price(price)?;

        let item = {
            let mut state = self.state.write().unwrap();
            let item = Item {
                uid: state.next_uid.to_string(),
                name: name.to_string(),
                price,
            };
            state.next_uid += 1;
            state.items.push(item.clone());
            item
        };

        self.persist()?;
        tracing::info!("Registered item {} ({})", item.uid, item.name);
        Ok(item)
    }

    /// Remove every record whose uid appears in `uids` and persist.
    ///
    /// Returns the number of records removed; unknown uids are a benign
    /// no-op, reported as zero affected.
    pub fn delete_many(&self, uids: &[&str]) -> Result<usize, AppError> {
        let removed = {
            let mut state = self.state.write().unwrap();
            let before = state.items.len();
            state.items.retain(|i| !uids.contains(&i.uid.as_str()));
            before - state.items.len()
        };

        if removed > 0 {
            self.persist()?;
            tracing::info!("Deleted {} item(s)", removed);
        }
        Ok(removed)
    }

    /// Remove a single record by uid. See [`delete_many`](Self::delete_many).
    pub fn delete(&self, uid: &str) -> Result<usize, AppError> {
        self.delete_many(&[uid])
    }

    /// Look up a record by uid
    pub fn find(&self, uid: &str) -> Option<Item> {
        self.state
            .read()
            .unwrap()
            .items
            .iter()
            .find(|i| i.uid == uid)
            .cloned()
    }

    /// Filter the catalog by a query string.
    ///
    /// Case-insensitive substring match on the name, substring match on the
    /// uid. An empty query returns the full catalog. Relative order is
    /// preserved.
    pub fn search(&self, query: &str) -> Vec<Item> {
        let query = query.trim().to_lowercase();
        let state = self.state.read().unwrap();

        if query.is_empty() {
            return state.items.clone();
        }

        state
            .items
            .iter()
            .filter(|i| i.name.to_lowercase().contains(&query) || i.uid.contains(&query))
            .cloned()
            .collect()
    }

    /// Full catalog in insertion order
    pub fn list(&self) -> Vec<Item> {
        self.state.read().unwrap().items.clone()
    }

    /// Full catalog most-recent-first, the order frontends display
    pub fn list_recent_first(&self) -> Vec<Item> {
        let mut items = self.list();
        items.reverse();
        items
    }

    /// Number of records in the catalog
    pub fn len(&self) -> usize {
        self.state.read().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The uid the next `create` will assign
    pub fn peek_next_uid(&self) -> u64 {
        self.state.read().unwrap().next_uid
    }

    /// Persist the full catalog to disk.
    ///
    /// The backing file is replaced wholesale; writing to a temp file and
    /// renaming keeps a crash mid-write from truncating the previous copy.
    fn persist(&self) -> Result<(), AppError> {
        let content = {
            let state = self.state.read().unwrap();
            serde_json::to_string_pretty(&state.items).map_err(|e| {
                AppError::Serialization(format!("Failed to serialize catalog: {}", e))
            })?
        };

        if let Some(parent) = self.config.data_file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::FileIo(format!("Failed to create data dir: {}", e)))?;
        }

        let tmp_path = self.config.data_file.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write catalog: {}", e)))?;
        fs::rename(&tmp_path, &self.config.data_file)
            .map_err(|e| AppError::FileIo(format!("Failed to replace catalog: {}", e)))?;

        Ok(())
    }
}

/// Next uid for a loaded catalog: max existing uid + 1, or the seed
fn derive_next_uid(items: &[Item], seed: u64) -> Result<u64, AppError> {
    let mut max_uid: Option<u64> = None;
    for item in items {
        let uid: u64 = item.uid.parse().map_err(|_| {
            AppError::Serialization(format!("Non-numeric uid in catalog: {:?}", item.uid))
        })?;
        max_uid = Some(max_uid.map_or(uid, |m| m.max(uid)));
    }
    Ok(max_uid.map_or(seed, |m| m + 1))
}
