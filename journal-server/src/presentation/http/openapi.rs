use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::http::handlers::categories::{CategoryDto, CreateCategoryDto};
use crate::presentation::http::handlers::favorites::{
    CreateFavoriteDto, FavoriteDto, UpdateFavoriteDto,
};
use crate::presentation::http::handlers::posts::{
    CreatePostDto, ImageInputDto, ListPostsResponseDto, PaginationQuery, PostDto, UpdatePostDto,
    VisibilityDto,
};
use crate::presentation::http::handlers::search::{CategoryQuery, HashtagQuery};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::my_posts,
        crate::presentation::http::handlers::posts::get_post,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::update_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::favorites::list_favorites,
        crate::presentation::http::handlers::favorites::get_favorite,
        crate::presentation::http::handlers::favorites::create_favorite,
        crate::presentation::http::handlers::favorites::update_favorite,
        crate::presentation::http::handlers::favorites::delete_favorite,
        crate::presentation::http::handlers::categories::list_categories,
        crate::presentation::http::handlers::categories::create_category,
        crate::presentation::http::handlers::search::search_by_hashtag,
        crate::presentation::http::handlers::search::search_by_category
    ),
    components(
        schemas(
            CreatePostDto,
            UpdatePostDto,
            PaginationQuery,
            PostDto,
            ListPostsResponseDto,
            ImageInputDto,
            VisibilityDto,
            CreateFavoriteDto,
            UpdateFavoriteDto,
            FavoriteDto,
            CreateCategoryDto,
            CategoryDto,
            HashtagQuery,
            CategoryQuery
        )
    ),
    tags(
        (name = "posts", description = "Post endpoints"),
        (name = "favorites", description = "Favorite (oshi) endpoints"),
        (name = "categories", description = "Category endpoints"),
        (name = "search", description = "Search endpoints")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
