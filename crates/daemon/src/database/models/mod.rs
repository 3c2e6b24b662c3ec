mod audit;
mod catalog;
mod document;
mod permission;
mod session;
mod user;

pub use audit::AuditRecord;
pub use catalog::{CatalogEntry, CatalogTable, AUTHORS, DOCUMENT_TYPES, TAGS};
pub use document::{ContentColumns, Document, NewDocumentRow};
pub use permission::DocumentPermission;
pub use session::Session;
pub use user::User;
