use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use journal_core::domain::error::DomainError;
use journal_core::domain::favorite::Favorite;
use journal_core::store::DocumentStore;

use super::{from_document, to_document};
use crate::data::favorite_repository::{FavoritePatch, FavoriteRepository, NewFavorite};

const COLLECTION: &str = "favorites";

#[derive(Clone)]
pub(crate) struct DocumentFavoriteRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentFavoriteRepository {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn all_favorites(&self) -> Result<Vec<Favorite>, DomainError> {
        self.store
            .list(COLLECTION)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    async fn load(&self, id: &str) -> Result<Option<Favorite>, DomainError> {
        self.store
            .get(COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn save(&self, favorite: &Favorite) -> Result<(), DomainError> {
        self.store
            .put(COLLECTION, &favorite.id, to_document(favorite)?)
            .await
    }
}

#[async_trait]
impl FavoriteRepository for DocumentFavoriteRepository {
    async fn create_favorite(&self, input: NewFavorite) -> Result<Favorite, DomainError> {
        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            owner_id: input.owner_id,
            name: input.name,
            started_at: input.started_at,
            image_path: None,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.save(&favorite).await?;
        Ok(favorite)
    }

    async fn get_favorite(&self, id: &str) -> Result<Option<Favorite>, DomainError> {
        self.load(id).await
    }

    async fn update_favorite(
        &self,
        id: &str,
        patch: FavoritePatch,
    ) -> Result<Option<Favorite>, DomainError> {
        let Some(mut favorite) = self.load(id).await? else {
            return Ok(None);
        };
        favorite.name = patch.name;
        favorite.started_at = patch.started_at;
        favorite.updated_at = Some(Utc::now());
        self.save(&favorite).await?;
        Ok(Some(favorite))
    }

    async fn set_image_path(
        &self,
        id: &str,
        image_path: Option<String>,
    ) -> Result<Option<Favorite>, DomainError> {
        let Some(mut favorite) = self.load(id).await? else {
            return Ok(None);
        };
        favorite.image_path = image_path;
        favorite.updated_at = Some(Utc::now());
        self.save(&favorite).await?;
        Ok(Some(favorite))
    }

    async fn delete_favorite(&self, id: &str) -> Result<bool, DomainError> {
        self.store.delete(COLLECTION, id).await
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Favorite>, DomainError> {
        let mut favorites: Vec<Favorite> = self
            .all_favorites()
            .await?
            .into_iter()
            .filter(|favorite| favorite.owner_id == owner_id)
            .collect();
        favorites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(favorites)
    }

    async fn name_exists(
        &self,
        owner_id: &str,
        name: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, DomainError> {
        Ok(self.all_favorites().await?.iter().any(|favorite| {
            favorite.owner_id == owner_id
                && favorite.name == name
                && exclude_id != Some(favorite.id.as_str())
        }))
    }
}
