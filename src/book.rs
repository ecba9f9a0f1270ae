//! The contact book service: the single owner of the in-memory collection.
//!
//! All mutations take the write lock, change the collection, and save it
//! through the [`Store`] before releasing the lock, so the on-disk image
//! never lags behind a completed request and ids stay unique under
//! concurrent requests. Reads share the lock.
//!
//! Storage failures never fail an operation: the in-memory state stays
//! authoritative and the failure is reported in [`Saved::persistence`].

use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use contact_book_core::collection::ContactCollection;
use contact_book_core::models::{ContactDraft, ContactFilter, ContactRecord, Field};
use contact_book_core::store::Store;

/// What happened to the on-disk image after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// The collection changed and was written.
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The collection changed but writing it failed.
    Failed(String),
}

impl Persistence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Persistence::Saved => "saved",
            Persistence::Unchanged => "unchanged",
            Persistence::Failed(_) => "failed",
        }
    }
}

/// Result of a mutating operation.
#[derive(Debug, Clone)]
pub struct Saved<T> {
    pub value: T,
    pub persistence: Persistence,
    /// Fields whose supplied values failed validation and were ignored.
    pub rejected: Vec<Field>,
}

/// Shared handle over the collection and its store.
pub struct ContactBook {
    collection: RwLock<ContactCollection>,
    store: Arc<dyn Store>,
}

impl ContactBook {
    /// Loads the collection from `store`.
    ///
    /// If the stored image cannot be read the book starts empty; the next
    /// successful save replaces the unreadable image.
    pub async fn open(store: Arc<dyn Store>, default_name: &str) -> Self {
        let collection = match store.load(default_name).await {
            Ok(collection) => {
                info!(
                    "opened contact book '{}' with {} contact(s) from {}",
                    collection.name(),
                    collection.len(),
                    store.describe()
                );
                collection
            }
            Err(e) => {
                error!(
                    "failed to load contacts from {}: {:#}; starting with an empty book",
                    store.describe(),
                    e
                );
                ContactCollection::new(default_name)
            }
        };
        Self::with_collection(store, collection)
    }

    /// Wraps an already loaded collection.
    pub fn with_collection(store: Arc<dyn Store>, collection: ContactCollection) -> Self {
        Self {
            collection: RwLock::new(collection),
            store,
        }
    }

    /// Contacts matching `filter`, in collection order.
    pub async fn find(&self, filter: &ContactFilter) -> Vec<ContactRecord> {
        let collection = self.collection.read().await;
        collection.search(filter).into_iter().cloned().collect()
    }

    pub async fn get(&self, id: &str) -> Option<ContactRecord> {
        self.collection.read().await.find_by_id(id).cloned()
    }

    /// A copy of the whole collection.
    pub async fn snapshot(&self) -> ContactCollection {
        self.collection.read().await.clone()
    }

    /// Adds a contact under a new id and saves.
    pub async fn create(&self, draft: ContactDraft) -> Saved<ContactRecord> {
        let (record, rejected) = draft.into_record();
        log_rejected("new contact", &rejected);

        let mut collection = self.collection.write().await;
        let stored = collection.add(record).clone();
        let persistence = self.persist(&collection).await;

        Saved {
            value: stored,
            persistence,
            rejected,
        }
    }

    /// Overwrites the supplied fields of contact `id` and saves.
    ///
    /// `value` is `None` when no contact has that id; nothing is saved then.
    pub async fn update(&self, id: &str, draft: ContactDraft) -> Saved<Option<ContactRecord>> {
        let (patch, rejected) = draft.into_record();
        log_rejected(id, &rejected);

        let mut collection = self.collection.write().await;
        let updated = collection.update(id, &patch).cloned();
        let persistence = match updated {
            Some(_) => self.persist(&collection).await,
            None => Persistence::Unchanged,
        };

        Saved {
            value: updated,
            persistence,
            rejected,
        }
    }

    /// Removes every contact matching `filter` and saves if any were removed.
    pub async fn remove(&self, filter: &ContactFilter) -> Saved<Vec<ContactRecord>> {
        let mut collection = self.collection.write().await;
        let removed = collection.remove(filter);
        let persistence = if removed.is_empty() {
            Persistence::Unchanged
        } else {
            self.persist(&collection).await
        };

        Saved {
            value: removed,
            persistence,
            rejected: Vec::new(),
        }
    }

    async fn persist(&self, collection: &ContactCollection) -> Persistence {
        match self.store.save(collection).await {
            Ok(()) => Persistence::Saved,
            Err(e) => {
                error!(
                    "failed to save contacts to {}: {:#}",
                    self.store.describe(),
                    e
                );
                Persistence::Failed(format!("{:#}", e))
            }
        }
    }
}

fn log_rejected(subject: &str, rejected: &[Field]) {
    if !rejected.is_empty() {
        let names: Vec<&str> = rejected.iter().map(|f| f.as_str()).collect();
        warn!("{}: ignored invalid {}", subject, names.join(", "));
    }
}
