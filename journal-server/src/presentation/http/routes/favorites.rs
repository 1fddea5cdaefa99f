use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::favorites::{
    create_favorite, delete_favorite, get_favorite, list_favorites, update_favorite,
};
use crate::presentation::http::middleware::auth::jwt_auth_middleware;

pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(create_favorite))
        .route(
            "/{id}",
            get(get_favorite).put(update_favorite).delete(delete_favorite),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ))
}
