super::common::catalog_router!(crate::database::models::AUTHORS);
