use crate::error::Result;

/// Abstract interface for the persisted key-value namespace.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while the registry and preferences handle the "what".
pub trait StorageBackend {
    /// Read the raw value stored under `key`.
    /// Returns Ok(None) if the key was never written (or was removed).
    /// Returns Err only on actual I/O errors (permissions, disk failure).
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
