use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use journal_core::domain::favorite::Favorite;
use journal_core::domain::image::ImageInput;

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::handlers::posts::ImageInputDto;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateFavoriteDto {
    #[validate(length(min = 1, max = 50))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) started_at: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) image: Option<ImageInputDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateFavoriteDto {
    #[validate(length(min = 1, max = 50))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) started_at: Option<NaiveDate>,
    #[serde(default)]
    pub(crate) image: Option<ImageInputDto>,
    /// Clears the stored image; wins over `image` when both are set.
    #[serde(default)]
    pub(crate) remove_image: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FavoriteDto {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) started_at: Option<NaiveDate>,
    /// Signed URL, freshly issued per read.
    pub(crate) image_url: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

async fn favorite_dto(state: &AppState, favorite: Favorite) -> AppResult<FavoriteDto> {
    let image_url = state.favorite_service.image_url(&favorite).await?;
    Ok(FavoriteDto {
        id: favorite.id,
        name: favorite.name,
        started_at: favorite.started_at,
        image_url,
        created_at: favorite.created_at,
        updated_at: favorite.updated_at,
    })
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "favorites",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own favorites listed", body = [FavoriteDto]),
        (status = 401, description = "Unauthorized")
    )
)]
pub(crate) async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<FavoriteDto>>> {
    let favorites = state.favorite_service.list_favorites(&user.user_id).await?;
    let mut dtos = Vec::with_capacity(favorites.len());
    for favorite in favorites {
        dtos.push(favorite_dto(&state, favorite).await?);
    }
    Ok(Json(dtos))
}

#[utoipa::path(
    get,
    path = "/api/favorites/{id}",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Favorite id")),
    responses(
        (status = 200, description = "Favorite found", body = FavoriteDto),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub(crate) async fn get_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<FavoriteDto>> {
    let favorite = state
        .favorite_service
        .get_favorite(&user.user_id, &id)
        .await?;
    Ok(Json(favorite_dto(&state, favorite).await?))
}

#[utoipa::path(
    post,
    path = "/api/favorites",
    tag = "favorites",
    security(("bearer_auth" = [])),
    request_body = CreateFavoriteDto,
    responses(
        (status = 201, description = "Favorite created", body = FavoriteDto),
        (status = 409, description = "Name already used"),
        (status = 413, description = "Image too large"),
        (status = 415, description = "Unsupported image type")
    )
)]
pub(crate) async fn create_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreateFavoriteDto>,
) -> AppResult<(StatusCode, Json<FavoriteDto>)> {
    dto.validate()?;
    let favorite = state
        .favorite_service
        .create_favorite(
            &user.user_id,
            &dto.name,
            dto.started_at,
            dto.image.map(ImageInput::from),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(favorite_dto(&state, favorite).await?),
    ))
}

#[utoipa::path(
    put,
    path = "/api/favorites/{id}",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Favorite id")),
    request_body = UpdateFavoriteDto,
    responses(
        (status = 200, description = "Favorite updated", body = FavoriteDto),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Name already used")
    )
)]
pub(crate) async fn update_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdateFavoriteDto>,
) -> AppResult<Json<FavoriteDto>> {
    dto.validate()?;
    let favorite = state
        .favorite_service
        .update_favorite(
            &user.user_id,
            &id,
            &dto.name,
            dto.started_at,
            dto.image.map(ImageInput::from),
            dto.remove_image,
        )
        .await?;
    Ok(Json(favorite_dto(&state, favorite).await?))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{id}",
    tag = "favorites",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Favorite id")),
    responses(
        (status = 204, description = "Favorite deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Still referenced by posts")
    )
)]
pub(crate) async fn delete_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state
        .favorite_service
        .delete_favorite(&user.user_id, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
