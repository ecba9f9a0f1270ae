//! # Contact Book
//!
//! **A local-first personal contact book with an HTTP API.**
//!
//! Contacts live in memory as a single [`ContactCollection`] owned by a
//! [`book::ContactBook`], and the whole collection is rewritten to an XML file
//! after every change.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌──────────────┐   ┌────────────┐
//! │   HTTP   │──▶│ ContactBook │──▶│  Collection  │   │ XML file   │
//! │  (axum)  │   │ RwLock+save │──▶│ match/mutate │   │ (quick-xml)│
//! └──────────┘   └──────┬──────┘   └──────────────┘   └─────▲──────┘
//!      ┌──────────┐     │                                   │
//!      │   CLI    │─────┘           Store::save ────────────┘
//!      │(contacts)│
//!      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! contacts init                              # create an empty book file
//! contacts add --name Ana --phone 555-1234   # add a contact
//! contacts find --name Ana                   # search
//! contacts serve                             # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`storage`] | XML file store with atomic replace |
//! | [`book`] | Locked owner of the collection; saves after each mutation |
//! | [`server`] | HTTP API (Axum) with CORS |
//!
//! The model itself lives in `contact-book-core` and is re-exported here.

pub mod book;
pub mod config;
pub mod server;
pub mod storage;

pub use contact_book_core::{codec, collection, generate, models, store, validate};
pub use contact_book_core::collection::ContactCollection;
pub use contact_book_core::models::{ContactDraft, ContactFilter, ContactRecord, Field};
