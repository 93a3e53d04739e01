//! Storage abstraction for persistence.

mod file;
pub mod format;
mod memory;

pub use file::{FileStorage, load_from_path, save_to_path};
pub use format::{Drawing, FORMAT_VERSION};
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid drawing format: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for drawing storage backends.
///
/// Implementations can keep drawings on the filesystem or in memory.
pub trait Storage {
    /// Save a drawing.
    fn save(&self, id: &str, drawing: &Drawing) -> StorageResult<()>;

    /// Load a drawing.
    fn load(&self, id: &str) -> StorageResult<Drawing>;

    /// Delete a drawing.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all drawing IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a drawing exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
