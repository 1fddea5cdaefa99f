use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use journal_core::domain::error::DomainError;
use journal_core::domain::favorite::{Favorite, normalize_favorite_name};
use journal_core::domain::image::{ImageInput, ImageRef};
use journal_core::media;
use journal_core::store::BlobStore;

use crate::data::favorite_repository::{FavoritePatch, FavoriteRepository, NewFavorite};
use crate::data::post_repository::PostRepository;

use super::MediaSettings;

pub(crate) struct FavoriteService<F: FavoriteRepository, P: PostRepository> {
    favorites: F,
    posts: P,
    blobs: Arc<dyn BlobStore>,
    media: MediaSettings,
}

impl<F: FavoriteRepository, P: PostRepository> FavoriteService<F, P> {
    pub(crate) fn new(favorites: F, posts: P, blobs: Arc<dyn BlobStore>, media: MediaSettings) -> Self {
        Self {
            favorites,
            posts,
            blobs,
            media,
        }
    }

    pub(crate) async fn create_favorite(
        &self,
        owner_id: &str,
        name: &str,
        started_at: Option<NaiveDate>,
        image: Option<ImageInput>,
    ) -> Result<Favorite, DomainError> {
        let name = normalize_favorite_name(name)?;
        if let Some(image) = &image {
            self.precheck_image(image)?;
        }
        if self.favorites.name_exists(owner_id, &name, None).await? {
            return Err(DomainError::AlreadyExists(format!("favorite name: {name}")));
        }

        let favorite = self
            .favorites
            .create_favorite(NewFavorite {
                owner_id: owner_id.to_string(),
                name,
                started_at,
            })
            .await?;

        match image {
            Some(image) => self.store_image(&favorite, image).await,
            None => Ok(favorite),
        }
    }

    pub(crate) async fn get_favorite(
        &self,
        owner_id: &str,
        favorite_id: &str,
    ) -> Result<Favorite, DomainError> {
        let favorite = self
            .favorites
            .get_favorite(favorite_id)
            .await?
            .ok_or(DomainError::NotFound(format!("favorite id: {favorite_id}")))?;
        if favorite.owner_id != owner_id {
            return Err(DomainError::Forbidden);
        }
        Ok(favorite)
    }

    pub(crate) async fn update_favorite(
        &self,
        owner_id: &str,
        favorite_id: &str,
        name: &str,
        started_at: Option<NaiveDate>,
        image: Option<ImageInput>,
        remove_image: bool,
    ) -> Result<Favorite, DomainError> {
        // Ownership check; the loaded value itself is superseded below.
        self.get_favorite(owner_id, favorite_id).await?;

        let name = normalize_favorite_name(name)?;
        if !remove_image && let Some(image) = &image {
            self.precheck_image(image)?;
        }
        // Uniqueness re-check excludes the favorite being updated.
        if self
            .favorites
            .name_exists(owner_id, &name, Some(favorite_id))
            .await?
        {
            return Err(DomainError::AlreadyExists(format!("favorite name: {name}")));
        }

        let updated = self
            .favorites
            .update_favorite(favorite_id, FavoritePatch { name, started_at })
            .await?
            .ok_or(DomainError::NotFound(format!("favorite id: {favorite_id}")))?;

        if remove_image {
            return self.remove_image(updated).await;
        }
        match image {
            Some(image) => self.store_image(&updated, image).await,
            None => Ok(updated),
        }
    }

    /// Refuses while any post references the favorite; the check runs
    /// before any blob or document mutation.
    pub(crate) async fn delete_favorite(
        &self,
        owner_id: &str,
        favorite_id: &str,
    ) -> Result<(), DomainError> {
        let favorite = self.get_favorite(owner_id, favorite_id).await?;

        if self.posts.any_with_favorite(favorite_id).await? {
            return Err(DomainError::InUse(format!(
                "favorite '{}' is referenced by posts",
                favorite.name
            )));
        }

        if let Some(path) = &favorite.image_path
            && let Err(err) = self.blobs.delete(path).await
        {
            warn!(%path, error = %err, "blob delete failed during favorite delete");
        }

        let deleted = self.favorites.delete_favorite(favorite_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("favorite id: {favorite_id}")));
        }
        Ok(())
    }

    pub(crate) async fn list_favorites(&self, owner_id: &str) -> Result<Vec<Favorite>, DomainError> {
        self.favorites.list_by_owner(owner_id).await
    }

    pub(crate) async fn image_url(&self, favorite: &Favorite) -> Result<Option<String>, DomainError> {
        match &favorite.image_path {
            Some(path) => Ok(Some(
                self.blobs
                    .signed_read_url(path, self.media.signed_url_ttl)
                    .await?,
            )),
            None => Ok(None),
        }
    }

    /// Rejects payloads the reconciler would refuse, before any document
    /// write, so a bad image never leaves a half-applied create or rename.
    fn precheck_image(&self, image: &ImageInput) -> Result<(), DomainError> {
        match image {
            ImageInput::Inline { data, content_type } => media::validate_inline(
                data,
                content_type,
                Some(self.media.single_image_max_bytes),
            ),
            // Favorites only carry owned blobs; a foreign URL has no blob
            // behind it.
            ImageInput::ExistingUrl { url } => {
                match media::blob_path_from_url(url, &self.media.public_base) {
                    Some(_) => Ok(()),
                    None => Err(DomainError::InvalidMediaType(url.clone())),
                }
            }
            ImageInput::ExistingPath { .. } => Ok(()),
        }
    }

    async fn store_image(
        &self,
        favorite: &Favorite,
        image: ImageInput,
    ) -> Result<Favorite, DomainError> {
        let policy = self
            .media
            .favorite_policy(&favorite.owner_id, &favorite.id);
        let current: Vec<ImageRef> = favorite
            .image_path
            .iter()
            .map(|path| ImageRef::Path(path.clone()))
            .collect();

        let plan = media::plan(&current, &[image], &[], &policy)?;
        let final_refs = media::apply(plan, self.blobs.as_ref()).await?;

        let new_path = match final_refs.into_iter().next() {
            Some(ImageRef::Path(path)) => path,
            // A foreign URL has no blob behind it; favorites only carry
            // owned images.
            Some(ImageRef::External(url)) => {
                return Err(DomainError::InvalidMediaType(url));
            }
            None => {
                return Err(DomainError::Validation {
                    field: "image",
                    message: "image payload resolved to nothing",
                });
            }
        };

        // The fixed namespace overwrites in place, but a changed extension
        // leaves the old object behind.
        if let Some(old_path) = &favorite.image_path
            && old_path != &new_path
            && let Err(err) = self.blobs.delete(old_path).await
        {
            warn!(path = %old_path, error = %err, "stale favorite image delete failed");
        }

        self.favorites
            .set_image_path(&favorite.id, Some(new_path))
            .await?
            .ok_or(DomainError::NotFound(format!("favorite id: {}", favorite.id)))
    }

    async fn remove_image(&self, favorite: Favorite) -> Result<Favorite, DomainError> {
        let Some(path) = &favorite.image_path else {
            return Ok(favorite);
        };
        if let Err(err) = self.blobs.delete(path).await {
            warn!(%path, error = %err, "favorite image delete failed; clearing reference anyway");
        }
        self.favorites
            .set_image_path(&favorite.id, None)
            .await?
            .ok_or(DomainError::NotFound(format!("favorite id: {}", favorite.id)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;

    use journal_core::domain::error::DomainError;
    use journal_core::domain::image::ImageInput;
    use journal_core::domain::post::{PostDraft, Visibility};

    use super::FavoriteService;
    use crate::application::MediaSettings;
    use crate::application::post_service::PostService;
    use crate::data::repositories::document::category_repository::DocumentCategoryRepository;
    use crate::data::repositories::document::favorite_repository::DocumentFavoriteRepository;
    use crate::data::repositories::document::post_repository::DocumentPostRepository;
    use crate::data::stores::memory::{MemoryBlobStore, MemoryDocumentStore};

    const BASE: &str = "https://media.example.com/journal";

    struct Harness {
        service: FavoriteService<DocumentFavoriteRepository, DocumentPostRepository>,
        post_service:
            PostService<DocumentPostRepository, DocumentFavoriteRepository, DocumentCategoryRepository>,
        blobs: Arc<MemoryBlobStore>,
    }

    fn harness() -> Harness {
        let documents = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new(BASE.to_string()));
        let media = MediaSettings {
            public_base: BASE.to_string(),
            single_image_max_bytes: 5 * 1024 * 1024,
            signed_url_ttl: Duration::from_secs(3600),
        };
        let favorites = DocumentFavoriteRepository::new(documents.clone());
        let categories = DocumentCategoryRepository::new(documents.clone());
        let posts = DocumentPostRepository::new(documents);
        Harness {
            service: FavoriteService::new(
                favorites.clone(),
                posts.clone(),
                blobs.clone(),
                media.clone(),
            ),
            post_service: PostService::new(posts, favorites, categories, blobs.clone(), media),
            blobs,
        }
    }

    fn inline_png() -> ImageInput {
        ImageInput::Inline {
            data: BASE64.encode(b"png bytes"),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn create_favorite_with_image_uses_fixed_path() {
        let h = harness();
        let favorite = h
            .service
            .create_favorite("u1", "星野 アイ", None, Some(inline_png()))
            .await
            .expect("create must succeed");

        let path = favorite.image_path.expect("image path must be set");
        assert_eq!(path, format!("favorites/u1/{}.png", favorite.id));
        assert!(h.blobs.contains(&path));
    }

    #[tokio::test]
    async fn duplicate_name_per_owner_is_rejected_but_other_owners_may_reuse() {
        let h = harness();
        h.service
            .create_favorite("u1", "推し", None, None)
            .await
            .expect("first create must succeed");

        let err = h
            .service
            .create_favorite("u1", "  推し  ", None, None)
            .await
            .expect_err("duplicate must be rejected");
        assert!(matches!(err, DomainError::AlreadyExists(_)));

        h.service
            .create_favorite("u2", "推し", None, None)
            .await
            .expect("other owner may reuse the name");
    }

    #[tokio::test]
    async fn update_excludes_self_from_uniqueness_check() {
        let h = harness();
        let favorite = h
            .service
            .create_favorite("u1", "old name", None, None)
            .await
            .expect("create must succeed");

        // Re-saving under its own name is not a conflict.
        h.service
            .update_favorite("u1", &favorite.id, "old name", None, None, false)
            .await
            .expect("self-rename must succeed");

        h.service
            .create_favorite("u1", "taken", None, None)
            .await
            .expect("create must succeed");
        let err = h
            .service
            .update_favorite("u1", &favorite.id, "taken", None, None, false)
            .await
            .expect_err("rename onto a sibling must fail");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn delete_is_blocked_while_posts_reference_the_favorite() {
        let h = harness();
        let favorite = h
            .service
            .create_favorite("u1", "推し", None, Some(inline_png()))
            .await
            .expect("create must succeed");
        let image_path = favorite.image_path.clone().expect("image path set");

        let mut draft = PostDraft {
            title: "post".to_string(),
            body: "body".to_string(),
            visibility: Visibility::Public,
            category_ids: Vec::new(),
            favorite_id: Some(favorite.id.clone()),
        };
        h.post_service
            .create_post("u1", draft.clone(), Vec::new())
            .await
            .expect("post create must succeed");

        let err = h
            .service
            .delete_favorite("u1", &favorite.id)
            .await
            .expect_err("delete must be blocked");
        assert!(matches!(err, DomainError::InUse(_)));
        // Nothing was mutated: document and blob both survive.
        h.service
            .get_favorite("u1", &favorite.id)
            .await
            .expect("favorite must still exist");
        assert!(h.blobs.contains(&image_path));

        // Detach the post, then deletion goes through.
        let posts = h.post_service.list_mine("u1").await.expect("list");
        draft.favorite_id = None;
        h.post_service
            .update_post("u1", &posts[0].id, draft, Vec::new(), Vec::new())
            .await
            .expect("detach must succeed");

        h.service
            .delete_favorite("u1", &favorite.id)
            .await
            .expect("delete must succeed once unreferenced");
        assert!(!h.blobs.contains(&image_path));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_forbidden() {
        let h = harness();
        let favorite = h
            .service
            .create_favorite("u1", "mine", None, None)
            .await
            .expect("create must succeed");

        let err = h
            .service
            .delete_favorite("u2", &favorite.id)
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn remove_image_clears_reference_and_blob() {
        let h = harness();
        let favorite = h
            .service
            .create_favorite("u1", "推し", None, Some(inline_png()))
            .await
            .expect("create must succeed");
        let path = favorite.image_path.clone().expect("image path set");

        let updated = h
            .service
            .update_favorite("u1", &favorite.id, "推し", None, None, true)
            .await
            .expect("update must succeed");

        assert!(updated.image_path.is_none());
        assert!(!h.blobs.contains(&path));
    }

    #[tokio::test]
    async fn oversized_favorite_image_is_rejected() {
        let documents = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new(BASE.to_string()));
        let media = MediaSettings {
            public_base: BASE.to_string(),
            single_image_max_bytes: 4,
            signed_url_ttl: Duration::from_secs(3600),
        };
        let favorites = DocumentFavoriteRepository::new(documents.clone());
        let service = FavoriteService::new(
            favorites,
            DocumentPostRepository::new(documents),
            blobs,
            media,
        );

        let err = service
            .create_favorite("u1", "推し", None, Some(inline_png()))
            .await
            .expect_err("oversized image must be rejected");
        assert!(matches!(err, DomainError::PayloadTooLarge { limit: 4, .. }));

        // The rejection happens before the document write; nothing persists.
        let remaining = service.list_favorites("u1").await.expect("list");
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn rejected_image_on_update_leaves_the_favorite_untouched() {
        let h = harness();
        let favorite = h
            .service
            .create_favorite("u1", "old name", None, None)
            .await
            .expect("create must succeed");

        let bad_image = ImageInput::Inline {
            data: BASE64.encode(b"%PDF-1.4"),
            content_type: "application/pdf".to_string(),
        };
        let err = h
            .service
            .update_favorite("u1", &favorite.id, "new name", None, Some(bad_image), false)
            .await
            .expect_err("bad image must be rejected");
        assert!(matches!(err, DomainError::InvalidMediaType(_)));

        let reloaded = h
            .service
            .get_favorite("u1", &favorite.id)
            .await
            .expect("favorite must still exist");
        assert_eq!(reloaded.name, "old name");
        assert!(reloaded.updated_at.is_none());
    }
}
