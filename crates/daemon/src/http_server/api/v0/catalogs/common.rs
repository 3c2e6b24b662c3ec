use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::archive::{catalogs, Requester};
use crate::database::models::{CatalogEntry, CatalogTable};
use crate::http_server::api::ApiError;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: i64,
    pub name: String,
}

impl From<CatalogEntry> for EntryResponse {
    fn from(entry: CatalogEntry) -> Self {
        EntryResponse {
            id: entry.id,
            name: entry.name,
        }
    }
}

pub(super) async fn create(
    state: &ServiceState,
    requester: &Requester,
    table: CatalogTable,
    req: NameRequest,
) -> Result<impl IntoResponse, ApiError> {
    let entry = catalogs::create_or_fetch(state.database(), requester, table, &req.name).await?;
    Ok((StatusCode::CREATED, Json(EntryResponse::from(entry))))
}

pub(super) async fn list(
    state: &ServiceState,
    table: CatalogTable,
) -> Result<impl IntoResponse, ApiError> {
    let entries = catalogs::list(state.database(), table).await?;
    let entries: Vec<EntryResponse> = entries.into_iter().map(EntryResponse::from).collect();
    Ok(Json(entries))
}

pub(super) async fn get(
    state: &ServiceState,
    table: CatalogTable,
    id: i64,
) -> Result<impl IntoResponse, ApiError> {
    let entry = catalogs::get(state.database(), table, id).await?;
    Ok(Json(EntryResponse::from(entry)))
}

pub(super) async fn rename(
    state: &ServiceState,
    requester: &Requester,
    table: CatalogTable,
    id: i64,
    req: NameRequest,
) -> Result<impl IntoResponse, ApiError> {
    let entry = catalogs::rename(state.database(), requester, table, id, &req.name).await?;
    Ok(Json(EntryResponse::from(entry)))
}

pub(super) async fn delete(
    state: &ServiceState,
    requester: &Requester,
    table: CatalogTable,
    id: i64,
) -> Result<impl IntoResponse, ApiError> {
    catalogs::delete(state.database(), requester, table, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stamps out the five handlers plus a `router()` for one registry.
macro_rules! catalog_router {
    ($table:expr) => {
        use axum::extract::{Path, State};
        use axum::response::IntoResponse;
        use axum::routing::{get, post};
        use axum::{Json, Router};

        use $crate::archive::Requester;
        use $crate::http_server::api::ApiError;
        use $crate::ServiceState;

        use super::common::{self, NameRequest};

        pub fn router(state: ServiceState) -> Router<ServiceState> {
            Router::new()
                .route("/", post(create_handler).get(list_handler))
                .route(
                    "/:id",
                    get(get_handler).put(rename_handler).delete(delete_handler),
                )
                .with_state(state)
        }

        pub async fn create_handler(
            State(state): State<ServiceState>,
            requester: Requester,
            Json(req): Json<NameRequest>,
        ) -> Result<impl IntoResponse, ApiError> {
            common::create(&state, &requester, $table, req).await
        }

        pub async fn list_handler(
            State(state): State<ServiceState>,
            _requester: Requester,
        ) -> Result<impl IntoResponse, ApiError> {
            common::list(&state, $table).await
        }

        pub async fn get_handler(
            State(state): State<ServiceState>,
            _requester: Requester,
            Path(id): Path<i64>,
        ) -> Result<impl IntoResponse, ApiError> {
            common::get(&state, $table, id).await
        }

        pub async fn rename_handler(
            State(state): State<ServiceState>,
            requester: Requester,
            Path(id): Path<i64>,
            Json(req): Json<NameRequest>,
        ) -> Result<impl IntoResponse, ApiError> {
            common::rename(&state, &requester, $table, id, req).await
        }

        pub async fn delete_handler(
            State(state): State<ServiceState>,
            requester: Requester,
            Path(id): Path<i64>,
        ) -> Result<impl IntoResponse, ApiError> {
            common::delete(&state, &requester, $table, id).await
        }
    };
}

pub(super) use catalog_router;
