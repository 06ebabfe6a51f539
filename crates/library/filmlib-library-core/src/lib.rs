//! filmlib-library-core
//!
//! Storage for library entries. The internal library is one JSON document in
//! a [`DocumentSlot`]; the external library is a folder of JSON files. Reads
//! go through a merged cache that every write invalidates.

pub mod cache;
pub mod config;
pub mod error;
pub mod external;
pub mod library;
pub mod slot;

pub use cache::LibraryCache;
pub use config::{LibraryConfig, DEFAULT_INTERNAL_TEXT_NAME};
pub use error::LibraryError;
pub use external::{ExternalStore, CLIP_FILE_PREFIX};
pub use library::Library;
pub use slot::{DocumentSlot, FileSlot, MemorySlot};
