use std::sync::Arc;

use crate::application::category_service::CategoryService;
use crate::application::favorite_service::FavoriteService;
use crate::application::post_service::PostService;
use crate::application::search_service::SearchService;
use crate::data::repositories::document::category_repository::DocumentCategoryRepository;
use crate::data::repositories::document::favorite_repository::DocumentFavoriteRepository;
use crate::data::repositories::document::post_repository::DocumentPostRepository;
use crate::infrastructure::jwt::JwtService;

pub(crate) mod http;

pub(crate) type Posts =
    PostService<DocumentPostRepository, DocumentFavoriteRepository, DocumentCategoryRepository>;
pub(crate) type Favorites = FavoriteService<DocumentFavoriteRepository, DocumentPostRepository>;
pub(crate) type Categories = CategoryService<DocumentCategoryRepository>;
pub(crate) type Search = SearchService<DocumentPostRepository>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<Posts>,
    pub(crate) favorite_service: Arc<Favorites>,
    pub(crate) category_service: Arc<Categories>,
    pub(crate) search_service: Arc<Search>,
    pub(crate) jwt: Arc<JwtService>,
}

impl AppState {
    pub(crate) fn new(
        post_service: Arc<Posts>,
        favorite_service: Arc<Favorites>,
        category_service: Arc<Categories>,
        search_service: Arc<Search>,
        jwt: Arc<JwtService>,
    ) -> Self {
        Self {
            post_service,
            favorite_service,
            category_service,
            search_service,
            jwt,
        }
    }
}
