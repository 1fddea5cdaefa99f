use async_trait::async_trait;
use chrono::NaiveDate;

use journal_core::domain::error::DomainError;
use journal_core::domain::favorite::Favorite;

#[derive(Debug, Clone)]
pub(crate) struct NewFavorite {
    pub(crate) owner_id: String,
    pub(crate) name: String,
    pub(crate) started_at: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub(crate) struct FavoritePatch {
    pub(crate) name: String,
    pub(crate) started_at: Option<NaiveDate>,
}

#[async_trait]
pub(crate) trait FavoriteRepository: Send + Sync {
    async fn create_favorite(&self, input: NewFavorite) -> Result<Favorite, DomainError>;
    async fn get_favorite(&self, id: &str) -> Result<Option<Favorite>, DomainError>;
    async fn update_favorite(
        &self,
        id: &str,
        patch: FavoritePatch,
    ) -> Result<Option<Favorite>, DomainError>;
    async fn set_image_path(
        &self,
        id: &str,
        image_path: Option<String>,
    ) -> Result<Option<Favorite>, DomainError>;
    async fn delete_favorite(&self, id: &str) -> Result<bool, DomainError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Favorite>, DomainError>;
    /// Per-owner name uniqueness probe; `exclude_id` skips the favorite
    /// being updated.
    async fn name_exists(
        &self,
        owner_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, DomainError>;
}
