//! In-memory storage implementation.

use super::{Drawing, Storage, StorageError, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory storage for testing and ephemeral use.
///
/// Drawings are kept in their serialized form, so a load yields fresh
/// shapes exactly as a file round trip would.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, drawing: &Drawing) -> StorageResult<()> {
        let json = drawing.to_json()?;
        self.documents.borrow_mut().insert(id.to_string(), json);
        Ok(())
    }

    fn load(&self, id: &str) -> StorageResult<Drawing> {
        let docs = self.documents.borrow();
        let json = docs
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        Drawing::from_json(json)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        self.documents.borrow_mut().remove(id);
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        Ok(self.documents.borrow().keys().cloned().collect())
    }

    fn exists(&self, id: &str) -> StorageResult<bool> {
        Ok(self.documents.borrow().contains_key(id))
    }
}
