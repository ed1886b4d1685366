//! Versioned local record store.
//!
//! A database is a set of named collections, each keyed by a declared
//! natural-key field. The store is opened at a fixed name and integer
//! version; schema steps from `crate::migration` bring older databases up
//! to date during the open.

mod engine;
mod image;
mod versioned;

pub use engine::{JsonFileEngine, MemoryEngine, StorageEngine};
pub use image::{CollectionImage, DatabaseImage};
pub use versioned::VersionedStore;
