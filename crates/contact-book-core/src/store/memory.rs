//! In-memory [`Store`] implementation for tests.
//!
//! Keeps the last saved collection behind `std::sync::RwLock`. Loads and
//! saves can be switched to fail to exercise the error paths of callers.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::collection::ContactCollection;

use super::Store;

/// In-memory store holding a single collection snapshot.
pub struct InMemoryStore {
    saved: RwLock<Option<ContactCollection>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            saved: RwLock::new(None),
            fail_loads: AtomicBool::new(false),
            fail_saves: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// A store whose first load returns `collection`.
    pub fn with_collection(collection: ContactCollection) -> Self {
        let store = Self::new();
        *store.saved.write().unwrap_or_else(|e| e.into_inner()) = Some(collection);
        store
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The last successfully saved collection, if any.
    pub fn saved(&self) -> Option<ContactCollection> {
        self.saved
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn load(&self, default_name: &str) -> Result<ContactCollection> {
        if self.fail_loads.load(Ordering::SeqCst) {
            bail!("in-memory store: load failure requested");
        }
        let saved = self
            .saved
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        Ok(saved
            .clone()
            .unwrap_or_else(|| ContactCollection::new(default_name)))
    }

    async fn save(&self, collection: &ContactCollection) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            bail!("in-memory store: save failure requested");
        }
        let mut saved = self
            .saved
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))?;
        *saved = Some(collection.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
