super::common::catalog_router!(crate::database::models::TAGS);
