use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use journal_core::domain::image::ImageInput;
use journal_core::domain::post::{Post, PostDraft, Visibility};

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::{AuthenticatedUser, MaybeUser};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub(crate) enum VisibilityDto {
    Public,
    Private,
}

impl From<VisibilityDto> for Visibility {
    fn from(dto: VisibilityDto) -> Self {
        match dto {
            VisibilityDto::Public => Visibility::Public,
            VisibilityDto::Private => Visibility::Private,
        }
    }
}

impl From<Visibility> for VisibilityDto {
    fn from(visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => VisibilityDto::Public,
            Visibility::Private => VisibilityDto::Private,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ImageInputDto {
    /// New upload: base64 payload plus MIME type.
    Inline { data: String, content_type: String },
    /// Previously issued signed URL or a third-party URL.
    ExistingUrl { url: String },
    /// Raw blob path the client already holds.
    ExistingPath { path: String },
}

impl From<ImageInputDto> for ImageInput {
    fn from(dto: ImageInputDto) -> Self {
        match dto {
            ImageInputDto::Inline { data, content_type } => {
                ImageInput::Inline { data, content_type }
            }
            ImageInputDto::ExistingUrl { url } => ImageInput::ExistingUrl { url },
            ImageInputDto::ExistingPath { path } => ImageInput::ExistingPath { path },
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreatePostDto {
    #[validate(length(min = 1, max = 100))]
    pub(crate) title: String,
    #[validate(length(min = 1, max = 1000))]
    pub(crate) body: String,
    pub(crate) visibility: VisibilityDto,
    #[serde(default)]
    pub(crate) category_ids: Vec<String>,
    #[serde(default)]
    pub(crate) favorite_id: Option<String>,
    #[validate(length(max = 4))]
    #[serde(default)]
    pub(crate) images: Vec<ImageInputDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdatePostDto {
    #[validate(length(min = 1, max = 100))]
    pub(crate) title: String,
    #[validate(length(min = 1, max = 1000))]
    pub(crate) body: String,
    pub(crate) visibility: VisibilityDto,
    #[serde(default)]
    pub(crate) category_ids: Vec<String>,
    #[serde(default)]
    pub(crate) favorite_id: Option<String>,
    #[validate(length(max = 4))]
    #[serde(default)]
    pub(crate) images: Vec<ImageInputDto>,
    /// Signed URLs or raw paths of images to remove from storage.
    #[serde(default)]
    pub(crate) deleted_images: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct PaginationQuery {
    #[validate(range(min = 1, max = 100))]
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: String,
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) visibility: VisibilityDto,
    pub(crate) category_ids: Vec<String>,
    pub(crate) favorite_id: Option<String>,
    /// Display URLs: signed for stored blobs, verbatim for external images.
    pub(crate) image_urls: Vec<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ListPostsResponseDto {
    pub(crate) posts: Vec<PostDto>,
    pub(crate) limit: u32,
    pub(crate) offset: u32,
    pub(crate) total: usize,
}

pub(crate) async fn post_dto(state: &AppState, post: Post) -> AppResult<PostDto> {
    let image_urls = state.post_service.image_urls(&post).await?;
    Ok(PostDto {
        id: post.id,
        owner_id: post.owner_id,
        title: post.title,
        body: post.body,
        visibility: post.visibility.into(),
        category_ids: post.category_ids,
        favorite_id: post.favorite_id,
        image_urls,
        created_at: post.created_at,
        updated_at: post.updated_at,
    })
}

pub(crate) async fn post_dtos(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostDto>> {
    let mut dtos = Vec::with_capacity(posts.len());
    for post in posts {
        dtos.push(post_dto(state, post).await?);
    }
    Ok(dtos)
}

fn draft_from_create(dto: &CreatePostDto) -> PostDraft {
    PostDraft {
        title: dto.title.clone(),
        body: dto.body.clone(),
        visibility: dto.visibility.into(),
        category_ids: dto.category_ids.clone(),
        favorite_id: dto.favorite_id.clone(),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "posts",
    params(
        ("limit" = Option<u32>, Query, description = "Items per page (1..=100)"),
        ("offset" = Option<u32>, Query, description = "Offset from the beginning (>= 0)")
    ),
    responses(
        (status = 200, description = "Public posts listed", body = ListPostsResponseDto),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> AppResult<(StatusCode, Json<ListPostsResponseDto>)> {
    query.validate()?;
    let limit = query.limit.unwrap_or(20);
    let offset = query.offset.unwrap_or(0);
    let page = (offset / limit) + 1;

    let result = state.post_service.list_public(page, limit).await?;
    let posts = post_dtos(&state, result.posts).await?;

    Ok((
        StatusCode::OK,
        Json(ListPostsResponseDto {
            posts,
            limit,
            offset,
            total: result.total,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/posts/mine",
    tag = "posts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own posts listed", body = [PostDto]),
        (status = 401, description = "Unauthorized")
    )
)]
pub(crate) async fn my_posts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<PostDto>>> {
    let posts = state.post_service.list_mine(&user.user_id).await?;
    Ok(Json(post_dtos(&state, posts).await?))
}

#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    tag = "posts",
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post found", body = PostDto),
        (status = 404, description = "Not found")
    )
)]
pub(crate) async fn get_post(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostDto>> {
    let post = state
        .post_service
        .get_post(maybe_user.viewer(), &id)
        .await?;
    Ok(Json(post_dto(&state, post).await?))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "posts",
    security(("bearer_auth" = [])),
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = PostDto),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "Image too large"),
        (status = 415, description = "Unsupported image type")
    )
)]
pub(crate) async fn create_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(dto): Json<CreatePostDto>,
) -> AppResult<(StatusCode, Json<PostDto>)> {
    dto.validate()?;
    let draft = draft_from_create(&dto);
    let images = dto.images.into_iter().map(ImageInput::from).collect();

    let post = state
        .post_service
        .create_post(&user.user_id, draft, images)
        .await?;
    Ok((StatusCode::CREATED, Json(post_dto(&state, post).await?)))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = PostDto),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub(crate) async fn update_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Json(dto): Json<UpdatePostDto>,
) -> AppResult<Json<PostDto>> {
    dto.validate()?;
    let draft = PostDraft {
        title: dto.title,
        body: dto.body,
        visibility: dto.visibility.into(),
        category_ids: dto.category_ids,
        favorite_id: dto.favorite_id,
    };
    let images = dto.images.into_iter().map(ImageInput::from).collect();

    let post = state
        .post_service
        .update_post(&user.user_id, &id, draft, images, dto.deleted_images)
        .await?;
    Ok(Json(post_dto(&state, post).await?))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "posts",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Not found")
    )
)]
pub(crate) async fn delete_post(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.post_service.delete_post(&user.user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
