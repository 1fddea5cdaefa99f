use axum::Router;
use axum::routing::get;

use crate::presentation::AppState;
use crate::presentation::http::handlers::search::{search_by_category, search_by_hashtag};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/hashtag", get(search_by_hashtag))
        .route("/category", get(search_by_category))
}
