use axum::routing::post;
use axum::Router;

pub mod sign_in;
pub mod sign_up;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/sign_up", post(sign_up::handler))
        .route("/sign_in", post(sign_in::handler))
        .with_state(state)
}
