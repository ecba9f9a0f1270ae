//! # Contact Book Core
//!
//! The contact model shared by the server and the CLI: records, the
//! id-unique collection with its matching rules, the XML document codec,
//! the store trait, and sample data generation.
//!
//! This crate performs no filesystem or network I/O and does not depend on
//! tokio.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `ContactRecord`, `ContactFilter`, `ContactDraft`, `Field` |
//! | [`validate`] | Email and phone shape validators |
//! | [`collection`] | `ContactCollection`: add, search, update, remove |
//! | [`codec`] | XML encode/decode of a collection |
//! | [`store`] | `Store` trait and the in-memory backend |
//! | [`generate`] | Random sample contacts |

pub mod codec;
pub mod collection;
pub mod generate;
pub mod models;
pub mod store;
pub mod validate;
