use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use journal_core::domain::category::Category;

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateCategoryDto {
    #[validate(length(min = 1, max = 50))]
    pub(crate) name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CategoryDto {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories listed", body = [CategoryDto])
    )
)]
pub(crate) async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<CategoryDto>>> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories.into_iter().map(CategoryDto::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "categories",
    security(("bearer_auth" = [])),
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 409, description = "Name already used")
    )
)]
pub(crate) async fn create_category(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(dto): Json<CreateCategoryDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    dto.validate()?;
    let category = state.category_service.create_category(&dto.name).await?;
    Ok((StatusCode::CREATED, Json(CategoryDto::from(category))))
}
