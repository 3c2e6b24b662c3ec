use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::time::timeout;

use crate::ServiceState;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

/// Liveness plus a database round trip: unhealthy means the service
/// cannot currently serve reads.
pub async fn healthz_handler(State(state): State<ServiceState>) -> Response {
    let ping = sqlx::query("SELECT 1").execute(&**state.database());

    match timeout(HEALTH_CHECK_TIMEOUT, ping).await {
        Ok(Ok(_)) => {
            let msg = serde_json::json!({"status": "ok"});
            (StatusCode::OK, Json(msg)).into_response()
        }
        Ok(Err(err)) => {
            tracing::error!("health check database ping failed: {err}");
            let msg = serde_json::json!({
                "status": "failure",
                "message": "database isn't available"
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
        }
        Err(_) => {
            let msg = serde_json::json!({
                "status": "failure",
                "message": "health check timed out"
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
        }
    }
}
