//! The three name registries share one endpoint shape; each submodule
//! only picks the table.

pub mod authors;
pub mod document_types;
pub mod tags;

mod common;
