use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

mod application;
mod data;
mod infrastructure;
mod presentation;
mod server;

use application::MediaSettings;
use application::category_service::CategoryService;
use application::favorite_service::FavoriteService;
use application::post_service::PostService;
use application::search_service::SearchService;
use data::repositories::document::category_repository::DocumentCategoryRepository;
use data::repositories::document::favorite_repository::DocumentFavoriteRepository;
use data::repositories::document::post_repository::DocumentPostRepository;
use data::stores::memory::{MemoryBlobStore, MemoryDocumentStore};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level, settings.log_format)?;

    // The managed document/blob backend is an external collaborator; the
    // in-memory stores implement the same interfaces for local runs.
    let documents = Arc::new(MemoryDocumentStore::new());
    let blobs = Arc::new(MemoryBlobStore::new(settings.media_public_base.clone()));

    let post_repo = DocumentPostRepository::new(documents.clone());
    let favorite_repo = DocumentFavoriteRepository::new(documents.clone());
    let category_repo = DocumentCategoryRepository::new(documents.clone());

    let media = MediaSettings {
        public_base: settings.media_public_base.clone(),
        single_image_max_bytes: settings.single_image_max_bytes,
        signed_url_ttl: Duration::from_secs(settings.signed_url_ttl_secs),
    };
    let post_service = Arc::new(PostService::new(
        post_repo.clone(),
        favorite_repo.clone(),
        category_repo.clone(),
        blobs.clone(),
        media.clone(),
    ));
    let favorite_service = Arc::new(FavoriteService::new(
        favorite_repo,
        post_repo.clone(),
        blobs,
        media,
    ));
    let category_service = Arc::new(CategoryService::new(category_repo));
    let search_service = Arc::new(SearchService::new(post_repo));
    let jwt = Arc::new(JwtService::new(&settings.jwt_secret));

    let state = AppState::new(
        post_service,
        favorite_service,
        category_service,
        search_service,
        jwt,
    );

    server::run_http(&settings, state).await
}
