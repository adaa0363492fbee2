//! User-curated favorites, loaded on start and saved on every change.

use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::FinderError;
use crate::model::RecipeSummary;

/// Where favorites live between runs
pub trait FavoritesStorage {
    fn load(&self) -> Result<Vec<RecipeSummary>, FinderError>;
    fn save(&self, favorites: &[RecipeSummary]) -> Result<(), FinderError>;
}

/// On-disk layouts accepted when loading favorites
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredFavorites {
    /// Insertion-ordered array, as written by `JsonFileStorage::save`
    List(Vec<RecipeSummary>),
    /// Object keyed by recipe id, as written by the original desktop app
    ById(BTreeMap<String, RecipeSummary>),
}

impl StoredFavorites {
    fn into_list(self) -> Vec<RecipeSummary> {
        match self {
            StoredFavorites::List(favorites) => favorites,
            StoredFavorites::ById(by_id) => by_id.into_values().collect(),
        }
    }
}

/// Favorites persisted as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<RecipeSummary>, FinderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<StoredFavorites>(&content) {
            Ok(stored) => Ok(stored.into_list()),
            Err(e) => {
                // An unreadable file starts a fresh list; it is overwritten on the next save
                warn!(
                    "Ignoring corrupt favorites file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, favorites: &[RecipeSummary]) -> Result<(), FinderError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(favorites)?;
        fs::write(&self.path, json)?;
        debug!(
            "Saved {} favorites to {}",
            favorites.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Storage that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Vec<RecipeSummary>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_favorites(favorites: Vec<RecipeSummary>) -> Self {
        MemoryStorage {
            saved: Mutex::new(favorites),
        }
    }
}

impl FavoritesStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<RecipeSummary>, FinderError> {
        let saved = self.saved.lock().map_err(|_| poisoned())?;
        Ok(saved.clone())
    }

    fn save(&self, favorites: &[RecipeSummary]) -> Result<(), FinderError> {
        let mut saved = self.saved.lock().map_err(|_| poisoned())?;
        *saved = favorites.to_vec();
        Ok(())
    }
}

fn poisoned() -> FinderError {
    FinderError::Storage(io::Error::new(
        ErrorKind::Other,
        "in-memory favorites lock poisoned",
    ))
}

/// Insertion-ordered favorites, unique by recipe id
pub struct FavoritesStore<S: FavoritesStorage> {
    storage: S,
    favorites: Vec<RecipeSummary>,
}

impl<S: FavoritesStorage> FavoritesStore<S> {
    /// Load saved favorites from `storage`
    pub fn open(storage: S) -> Result<Self, FinderError> {
        let mut favorites: Vec<RecipeSummary> = Vec::new();
        for recipe in storage.load()? {
            if favorites.iter().any(|f| f.id == recipe.id) {
                warn!("Dropping duplicate favorite {}", recipe.id);
                continue;
            }
            favorites.push(recipe);
        }
        debug!("Loaded {} favorites", favorites.len());
        Ok(FavoritesStore { storage, favorites })
    }

    /// Add a recipe unless its id is already saved
    ///
    /// Returns whether the list changed. When saving fails the list is left
    /// as it was.
    pub fn add(&mut self, recipe: RecipeSummary) -> Result<bool, FinderError> {
        if self.contains(recipe.id) {
            return Ok(false);
        }
        let mut updated = self.favorites.clone();
        updated.push(recipe);
        self.commit(updated)?;
        Ok(true)
    }

    /// Remove a recipe by id; absent ids are ignored
    ///
    /// Returns whether the list changed. When saving fails the list is left
    /// as it was.
    pub fn remove(&mut self, id: u64) -> Result<bool, FinderError> {
        if !self.contains(id) {
            return Ok(false);
        }
        let updated: Vec<RecipeSummary> = self
            .favorites
            .iter()
            .filter(|f| f.id != id)
            .cloned()
            .collect();
        self.commit(updated)?;
        Ok(true)
    }

    fn commit(&mut self, updated: Vec<RecipeSummary>) -> Result<(), FinderError> {
        self.storage.save(&updated)?;
        self.favorites = updated;
        Ok(())
    }

    /// Flip the favorite state of a recipe, returning the new state
    pub fn toggle(&mut self, recipe: RecipeSummary) -> Result<bool, FinderError> {
        if self.contains(recipe.id) {
            self.remove(recipe.id)?;
            Ok(false)
        } else {
            self.add(recipe)?;
            Ok(true)
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.favorites.iter().any(|f| f.id == id)
    }

    /// Saved recipes in the order they were added
    pub fn list(&self) -> &[RecipeSummary] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(id: u64, title: &str) -> RecipeSummary {
        RecipeSummary {
            id,
            title: title.to_string(),
            image: None,
            used_ingredients: vec![],
            missed_ingredients: vec![],
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        assert!(store.add(recipe(1, "Soup")).unwrap());
        assert!(!store.add(recipe(1, "Soup")).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_dedup_is_by_id_not_content() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(recipe(1, "Soup")).unwrap();
        store.add(recipe(1, "Renamed Soup")).unwrap();
        assert_eq!(store.list()[0].title, "Soup");
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(recipe(1, "Soup")).unwrap();
        assert!(!store.remove(99).unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(recipe(3, "C")).unwrap();
        store.add(recipe(1, "A")).unwrap();
        store.add(recipe(2, "B")).unwrap();
        store.remove(1).unwrap();

        let ids: Vec<u64> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_toggle() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        assert!(store.toggle(recipe(7, "Pie")).unwrap());
        assert!(store.contains(7));
        assert!(!store.toggle(recipe(7, "Pie")).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_changes_reach_storage() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(recipe(1, "Soup")).unwrap();
        store.add(recipe(2, "Salad")).unwrap();
        assert_eq!(store.storage().load().unwrap().len(), 2);

        store.remove(1).unwrap();
        assert_eq!(store.storage().load().unwrap(), vec![recipe(2, "Salad")]);
    }

    #[test]
    fn test_open_collapses_duplicates() {
        let storage = MemoryStorage::with_favorites(vec![
            recipe(1, "Soup"),
            recipe(1, "Soup again"),
            recipe(2, "Salad"),
        ]);
        let store = FavoritesStore::open(storage).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].title, "Soup");
    }

    #[test]
    fn test_json_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("favorites.json"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_file_corrupt_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStorage::new(&path).load().unwrap().is_empty());
    }

    struct FailingStorage;

    impl FavoritesStorage for FailingStorage {
        fn load(&self) -> Result<Vec<RecipeSummary>, FinderError> {
            Ok(vec![recipe(1, "Soup")])
        }

        fn save(&self, _favorites: &[RecipeSummary]) -> Result<(), FinderError> {
            Err(io::Error::new(ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_failed_save_leaves_list_unchanged() {
        let mut store = FavoritesStore::open(FailingStorage).unwrap();

        assert!(store.add(recipe(2, "Salad")).is_err());
        assert!(!store.contains(2));

        assert!(store.remove(1).is_err());
        assert!(store.contains(1));

        assert!(store.toggle(recipe(1, "Soup")).is_err());
        assert_eq!(store.list(), [recipe(1, "Soup")]);
    }

    #[test]
    fn test_poisoned_memory_storage_reports_error() {
        let storage = MemoryStorage::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = storage.saved.lock().unwrap();
            panic!("poison the lock");
        }));

        assert!(matches!(storage.load(), Err(FinderError::Storage(_))));
        assert!(matches!(
            storage.save(&[recipe(1, "Soup")]),
            Err(FinderError::Storage(_))
        ));
    }

    #[test]
    fn test_json_file_object_keyed_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(
            &path,
            r#"{"716429": {"id": 716429, "title": "Pasta with Garlic",
                "used_ingredients": ["garlic"], "missed_ingredients": ["pasta"]}}"#,
        )
        .unwrap();

        let loaded = JsonFileStorage::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 716429);
        assert_eq!(loaded[0].missed_ingredients, vec!["pasta"]);
    }

    #[test]
    fn test_json_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("favorites.json");
        let storage = JsonFileStorage::new(&path);
        storage.save(&[recipe(1, "Soup")]).unwrap();
        assert!(path.exists());
        assert_eq!(storage.load().unwrap(), vec![recipe(1, "Soup")]);
    }
}
