//! Snapshot persistence on top of a key-value store.
//!
//! The snapshot is the element sequence (never the selection) written as a
//! JSON array under a single key. Loading never fails: a missing or
//! malformed snapshot is replaced by a board holding one default rectangle.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{Board, BoardError, BoardResult, Element, ElementKind};

/// Errors that can occur in a key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store is not available (e.g. storage disabled).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// The backing store refused the write (e.g. quota exceeded).
    #[error("Write failed for key {key}: {reason}")]
    WriteFailed {
        /// Key that was being written.
        key: String,
        /// Reason reported by the store.
        reason: String,
    },
}

/// A synchronous string key-value store, such as browser `localStorage`.
pub trait KeyValueStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values.remove(key);
        Ok(())
    }
}

/// Serialize an element sequence as a compact JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_snapshot(elements: &[Element]) -> BoardResult<String> {
    serde_json::to_string(elements).map_err(BoardError::Serialization)
}

/// Serialize an element sequence as a pretty-printed JSON array, as offered
/// for download.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_export(elements: &[Element]) -> BoardResult<String> {
    serde_json::to_string_pretty(elements).map_err(BoardError::Serialization)
}

/// Parse a JSON array of elements.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or not an element array.
pub fn from_snapshot(json: &str) -> BoardResult<Vec<Element>> {
    serde_json::from_str(json).map_err(BoardError::Serialization)
}

/// Reads and writes the board snapshot under a fixed key.
#[derive(Debug)]
pub struct SnapshotStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    /// Create a snapshot store writing under `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Persist the board's elements. The selection is not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn save(&self, board: &Board) -> BoardResult<()> {
        let json = to_snapshot(board.elements())?;
        self.store.set(&self.key, &json)?;
        tracing::debug!(
            "Saved {} elements under {}",
            board.element_count(),
            self.key
        );
        Ok(())
    }

    /// Load the board from the snapshot.
    ///
    /// A missing snapshot, a store read failure, or a malformed snapshot
    /// (bad JSON, wrong shape, duplicate ids) all yield a board seeded with
    /// one default rectangle. Failures are logged, never returned.
    #[must_use]
    pub fn load(&self, width: f64, height: f64, min_size: f64) -> Board {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("No snapshot under {}, seeding default board", self.key);
                return seeded_board(width, height, min_size);
            }
            Err(e) => {
                tracing::warn!("Failed to read snapshot {}: {e}", self.key);
                return seeded_board(width, height, min_size);
            }
        };

        match from_snapshot(&raw)
            .and_then(|elements| Board::from_elements(elements, width, height, min_size))
        {
            Ok(board) => {
                tracing::info!(
                    "Loaded {} elements from {}",
                    board.element_count(),
                    self.key
                );
                board
            }
            Err(e) => {
                tracing::warn!("Failed to load snapshot {}: {e}", self.key);
                seeded_board(width, height, min_size)
            }
        }
    }

    /// Delete the snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn forget(&self) -> BoardResult<()> {
        self.store.remove(&self.key)?;
        Ok(())
    }
}

/// A board holding one default rectangle.
#[must_use]
pub fn seeded_board(width: f64, height: f64, min_size: f64) -> Board {
    let mut board = Board::new(width, height).with_min_size(min_size);
    let element = board.create_element(ElementKind::Rectangle);
    if let Err(e) = board.add_element(element) {
        tracing::warn!("Failed to seed default element: {e}");
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::MIN_SIZE;

    const KEY: &str = "canvasDesign";

    fn snapshot_store(store: MemoryStore) -> SnapshotStore<MemoryStore> {
        SnapshotStore::new(store, KEY)
    }

    fn assert_seeded(board: &Board) {
        assert_eq!(board.element_count(), 1);
        let el = &board.elements()[0];
        assert_eq!(el.kind, ElementKind::Rectangle);
        assert!((el.x - 50.0).abs() < f64::EPSILON);
        assert!((el.width - 100.0).abs() < f64::EPSILON);
        assert!(board.selected_id().is_none());
    }

    #[test]
    fn test_missing_snapshot_seeds_default() {
        let store = snapshot_store(MemoryStore::new());
        assert_seeded(&store.load(800.0, 600.0, MIN_SIZE));
    }

    #[test]
    fn test_corrupted_snapshot_seeds_default() {
        let store = snapshot_store(MemoryStore::with_value(KEY, "{bad json"));
        assert_seeded(&store.load(800.0, 600.0, MIN_SIZE));
    }

    #[test]
    fn test_wrong_shape_seeds_default() {
        let store = snapshot_store(MemoryStore::with_value(KEY, r#"{"elements": []}"#));
        assert_seeded(&store.load(800.0, 600.0, MIN_SIZE));
    }

    #[test]
    fn test_duplicate_ids_seed_default() {
        let el = Element::new(ElementKind::Circle);
        let json = to_snapshot(&[el.clone(), el]).expect("serialize");
        let store = snapshot_store(MemoryStore::with_value(KEY, &json));
        assert_seeded(&store.load(800.0, 600.0, MIN_SIZE));
    }

    #[test]
    fn test_empty_array_loads_empty_board() {
        let store = snapshot_store(MemoryStore::with_value(KEY, "[]"));
        assert!(store.load(800.0, 600.0, MIN_SIZE).is_empty());
    }

    #[test]
    fn test_null_fields_keep_the_design() {
        let raw = r##"[
            {"id":"1","type":"circle","x":20,"y":30,"width":80,"height":80,
             "backgroundColor":"#f00","text":"","rotation":null,"zIndex":1},
            {"id":"2","type":"text","x":null,"y":40,"width":null,"height":50,
             "backgroundColor":"#0f0","text":"Hello","rotation":5,"zIndex":2}
        ]"##;
        let board = snapshot_store(MemoryStore::with_value(KEY, raw)).load(800.0, 600.0, MIN_SIZE);

        let kinds: Vec<_> = board.elements().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [ElementKind::Circle, ElementKind::Text]);
        let text = &board.elements()[1];
        assert_eq!(text.text, "Hello");
        assert!(text.x.abs() < f64::EPSILON);
        assert!((text.width - MIN_SIZE).abs() < f64::EPSILON);
        assert!(board.elements()[0].rotation.abs() < f64::EPSILON);
    }

    #[test]
    fn test_save_then_load() {
        let store = snapshot_store(MemoryStore::new());
        let mut board = Board::new(800.0, 600.0);
        let text = board.create_element(ElementKind::Text);
        let id = board.add_element(text).expect("add");
        board.select(&id).expect("select");
        store.save(&board).expect("save");

        let loaded = store.load(800.0, 600.0, MIN_SIZE);
        assert_eq!(loaded.elements(), board.elements());
        assert!(loaded.selected_id().is_none(), "selection is not persisted");
    }

    #[test]
    fn test_save_writes_json_array() {
        let store = snapshot_store(MemoryStore::new());
        store
            .save(&seeded_board(800.0, 600.0, MIN_SIZE))
            .expect("save");
        let raw = store.inner().get(KEY).expect("get").expect("present");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert!(value.is_array());
        assert_eq!(value[0]["type"], "rectangle");
    }

    #[test]
    fn test_export_is_pretty() {
        let board = seeded_board(800.0, 600.0, MIN_SIZE);
        let json = to_export(board.elements()).expect("export");
        assert!(json.contains('\n'));
        assert_eq!(from_snapshot(&json).expect("parse"), board.elements());
    }

    #[test]
    fn test_forget_removes_snapshot() {
        let store = snapshot_store(MemoryStore::with_value(KEY, "[]"));
        store.forget().expect("forget");
        assert!(store.inner().get(KEY).expect("get").is_none());
    }
}
