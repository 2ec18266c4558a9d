//! Structured store adapter for ESF Finanças.
//!
//! Small JSON-serializable collections (users, posts, lessons, media
//! metadata, the session user and the theme flag) are kept as text values in
//! a key-value store, one independent key per [`Slice`]. Large media payloads
//! never pass through here; they belong to the blob store.
//!
//! # Layers
//!
//! - [`KeyValueStore`] -- raw text `get/set/remove`, implemented by
//!   [`InMemoryKeyValueStore`] and [`FileKeyValueStore`]
//! - [`StructuredStore`] -- typed `load`/`save` per slice with JSON encoding
//!
//! # Rules
//!
//! 1. `load` never fails: missing keys, unreadable storage and malformed JSON
//!    all fall back to the caller's default.
//! 2. `save` never fails loudly: a rejected write (e.g. quota exceeded) is
//!    reported as `false` and logged only in development mode. The previous
//!    value stays in place.

pub mod error;
pub mod file;
pub mod memory;
pub mod slice;
pub mod structured;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use slice::Slice;
pub use structured::StructuredStore;
pub use traits::KeyValueStore;
