use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::posts::{PostDto, post_dtos};
use crate::presentation::http::middleware::auth::MaybeUser;

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct HashtagQuery {
    pub(crate) tag: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct CategoryQuery {
    pub(crate) category_id: String,
}

#[utoipa::path(
    get,
    path = "/api/search/hashtag",
    tag = "search",
    params(("tag" = String, Query, description = "Hashtag, with or without marker")),
    responses(
        (status = 200, description = "Matching posts, newest first", body = [PostDto]),
        (status = 400, description = "Empty tag")
    )
)]
pub(crate) async fn search_by_hashtag(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Query(query): Query<HashtagQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state
        .search_service
        .search_by_hashtag(&query.tag, maybe_user.viewer())
        .await?;
    Ok(Json(post_dtos(&state, posts).await?))
}

#[utoipa::path(
    get,
    path = "/api/search/category",
    tag = "search",
    params(("category_id" = String, Query, description = "Category id")),
    responses(
        (status = 200, description = "Matching posts, newest first", body = [PostDto])
    )
)]
pub(crate) async fn search_by_category(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state
        .search_service
        .search_by_category(&query.category_id, maybe_user.viewer())
        .await?;
    Ok(Json(post_dtos(&state, posts).await?))
}
