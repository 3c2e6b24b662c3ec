super::common::catalog_router!(crate::database::models::DOCUMENT_TYPES);
