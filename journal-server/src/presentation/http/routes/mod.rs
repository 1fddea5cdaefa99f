use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::presentation::AppState;

pub(crate) mod categories;
pub(crate) mod favorites;
pub(crate) mod posts;
pub(crate) mod search;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api/posts", posts::router(state.clone()))
        .nest("/api/favorites", favorites::router(state.clone()))
        .nest("/api/categories", categories::router(state.clone()))
        .nest("/api/search", search::router())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
