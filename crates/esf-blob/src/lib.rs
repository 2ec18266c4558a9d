//! Blob store adapter for ESF Finanças.
//!
//! Media payloads (base64 audio, video, PDFs and images) are too large for
//! the structured store, so each full [`MediaRecord`](esf_types::MediaRecord)
//! is kept here in a single record store keyed by asset id. The structured
//! store only ever sees the metadata.
//!
//! # Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`FileBlobStore`] -- a versioned database directory on local disk
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Rules
//!
//! 1. `put` is insert-or-replace by id and its failures reach the caller:
//!    metadata must not be recorded for a payload that was not written.
//! 2. `delete` of a missing id is not an error.
//! 3. No connection is held between operations.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{BlobError, BlobResult};
pub use file::{FileBlobStore, MEDIA_STORE, SCHEMA_VERSION};
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
