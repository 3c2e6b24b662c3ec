use axum::extract::multipart::MultipartError;
use axum::routing::{get, post, put};
use axum::Router;

pub mod content;
pub mod create;
pub mod delete;
pub mod get;
pub mod permissions;
pub mod search;
pub mod update;

use crate::http_server::api::ApiError;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", post(create::handler).get(search::handler))
        .route(
            "/:document_id",
            get(get::handler)
                .patch(update::handler)
                .delete(delete::handler),
        )
        .route(
            "/:document_id/content",
            get(content::download_handler).put(content::replace_handler),
        )
        .route("/:document_id/permissions", put(permissions::set_handler))
        .route(
            "/:document_id/permissions/:user_id",
            axum::routing::delete(permissions::remove_handler),
        )
        .with_state(state)
}

pub(super) fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::bad_request("multipart", err.to_string())
}
