//! Storage abstraction for Contact Book.
//!
//! The [`Store`] trait is the load/save collaborator of the collection
//! owner. It persists the whole collection as one image; there are no
//! per-record operations.
//!
//! Implementations must be `Send + Sync` to be shared by HTTP handlers.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::collection::ContactCollection;

/// Whole-collection persistence backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`load`](Store::load) | Read the stored collection, or a new empty one |
/// | [`save`](Store::save) | Replace the stored image with `collection` |
/// | [`describe`](Store::describe) | Human-readable location for logs |
#[async_trait]
pub trait Store: Send + Sync {
    /// Loads the stored collection.
    ///
    /// Returns an empty collection named `default_name` when nothing has been
    /// stored yet. Returns an error when a stored image exists but cannot be
    /// read or parsed.
    async fn load(&self, default_name: &str) -> Result<ContactCollection>;

    /// Replaces the stored image with `collection`.
    async fn save(&self, collection: &ContactCollection) -> Result<()>;

    /// Where this store keeps its data, for log messages.
    fn describe(&self) -> String;
}
