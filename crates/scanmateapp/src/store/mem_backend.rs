use super::backend::StorageBackend;
use crate::error::{Result, ScanmateError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct Shared {
    items: Mutex<HashMap<String, String>>,
    simulate_write_error: AtomicBool,
    simulate_read_error: AtomicBool,
}

/// In-memory storage backend for testing.
///
/// Clones share the same underlying map, so a test can keep one handle for
/// inspection while another is moved into a registry writer thread.
#[derive(Clone, Default)]
pub struct MemBackend {
    shared: Arc<Shared>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.shared
            .simulate_write_error
            .store(simulate, Ordering::SeqCst);
    }

    /// Enable read error simulation for testing fail-soft loading.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.shared
            .simulate_read_error
            .store(simulate, Ordering::SeqCst);
    }

    /// Test helper to plant a raw value, bypassing error simulation.
    pub fn put_raw(&self, key: &str, value: &str) {
        self.items().insert(key.to_string(), value.to_string());
    }

    /// Test helper to read a raw value, bypassing error simulation.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map for a test double.
        self.shared
            .items
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StorageBackend for MemBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        if self.shared.simulate_read_error.load(Ordering::SeqCst) {
            return Err(ScanmateError::Store("Simulated read error".to_string()));
        }
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.shared.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ScanmateError::Store("Simulated write error".to_string()));
        }
        self.items().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if self.shared.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ScanmateError::Store("Simulated write error".to_string()));
        }
        self.items().remove(key);
        Ok(())
    }
}
