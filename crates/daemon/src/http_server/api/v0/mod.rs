use axum::Router;

pub mod auth;
pub mod catalogs;
pub mod documents;
pub mod logs;

pub(crate) mod datetime;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/documents", documents::router(state.clone()))
        .nest("/tags", catalogs::tags::router(state.clone()))
        .nest("/authors", catalogs::authors::router(state.clone()))
        .nest(
            "/document_types",
            catalogs::document_types::router(state.clone()),
        )
        .nest("/logs", logs::router(state.clone()))
        .with_state(state)
}
