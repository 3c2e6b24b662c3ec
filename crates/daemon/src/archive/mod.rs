//! The archive core: who may see or change a document, how partial
//! updates merge, and how binary content is referenced instead of
//! embedded. Everything here is driven through the persistence and
//! content-store collaborators; there is no other durable state.

pub mod audit;
pub mod catalogs;
pub mod documents;
mod error;
pub mod permissions;
pub mod search;

pub use error::ArchiveError;
pub use permissions::{Capabilities, Requester};
