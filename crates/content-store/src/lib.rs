//! Swappable binary-content storage for the document archive.
//!
//! A document's content either lives inline in its relational row or in
//! an object store reached through a content descriptor. Which one is a
//! construction-time decision; callers only ever see [`ContentStore`].

mod descriptor;
mod error;
mod storage;
mod store;

pub use descriptor::{ContentDescriptor, StoredContent};
pub use error::{ContentStoreError, Result};
pub use store::{ContentStore, ContentStoreConfig};
