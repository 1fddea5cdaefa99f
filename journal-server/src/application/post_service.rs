use std::sync::Arc;

use tracing::warn;

use journal_core::domain::error::DomainError;
use journal_core::domain::image::{ImageInput, ImageRef};
use journal_core::domain::post::{Post, PostDraft, validate_image_count};
use journal_core::media;
use journal_core::store::BlobStore;

use crate::data::category_repository::CategoryRepository;
use crate::data::favorite_repository::FavoriteRepository;
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};

use super::MediaSettings;

#[derive(Debug, Clone)]
pub(crate) struct ListPostsResult {
    pub(crate) posts: Vec<Post>,
    pub(crate) page: u32,
    pub(crate) page_size: u32,
    pub(crate) total: usize,
}

pub(crate) struct PostService<P: PostRepository, F: FavoriteRepository, C: CategoryRepository> {
    posts: P,
    favorites: F,
    categories: C,
    blobs: Arc<dyn BlobStore>,
    media: MediaSettings,
}

impl<P: PostRepository, F: FavoriteRepository, C: CategoryRepository> PostService<P, F, C> {
    pub(crate) fn new(
        posts: P,
        favorites: F,
        categories: C,
        blobs: Arc<dyn BlobStore>,
        media: MediaSettings,
    ) -> Self {
        Self {
            posts,
            favorites,
            categories,
            blobs,
            media,
        }
    }

    pub(crate) async fn create_post(
        &self,
        owner_id: &str,
        draft: PostDraft,
        images: Vec<ImageInput>,
    ) -> Result<Post, DomainError> {
        let draft = draft.validate()?;
        validate_image_count(images.len())?;
        self.check_favorite_ownership(owner_id, draft.favorite_id.as_deref())
            .await?;
        self.check_categories(&draft.category_ids).await?;

        let policy = self.media.post_policy(owner_id);
        let plan = media::plan(&[], &images, &[], &policy)?;
        let final_refs = media::apply(plan, self.blobs.as_ref()).await?;

        let created = self
            .posts
            .create_post(NewPost {
                owner_id: owner_id.to_string(),
                title: draft.title,
                body: draft.body,
                visibility: draft.visibility,
                category_ids: draft.category_ids,
                favorite_id: draft.favorite_id,
                images: final_refs,
            })
            .await;
        if created.is_err() {
            warn!(%owner_id, "post create failed after media upload; blobs may be orphaned");
        }
        created
    }

    pub(crate) async fn get_post(
        &self,
        viewer: Option<&str>,
        post_id: &str,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;

        // Private posts read as absent to everyone but their owner.
        if !post.visible_to(viewer) {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(post)
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: &str,
        post_id: &str,
        draft: PostDraft,
        images: Vec<ImageInput>,
        deleted_images: Vec<String>,
    ) -> Result<Post, DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;
        if post.owner_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }

        let draft = draft.validate()?;
        validate_image_count(images.len())?;
        self.check_favorite_ownership(actor_user_id, draft.favorite_id.as_deref())
            .await?;
        self.check_categories(&draft.category_ids).await?;

        let policy = self.media.post_policy(actor_user_id);
        let plan = media::plan(&post.images, &images, &deleted_images, &policy)?;
        let final_refs = media::apply(plan, self.blobs.as_ref()).await?;

        self.posts
            .update_post(
                post_id,
                PostPatch {
                    title: draft.title,
                    body: draft.body,
                    visibility: draft.visibility,
                    category_ids: draft.category_ids,
                    favorite_id: draft.favorite_id,
                    images: final_refs,
                },
            )
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: &str,
        post_id: &str,
    ) -> Result<(), DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;
        if post.owner_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        // Blob cleanup is best-effort; a missed delete is a leak, not a
        // failed operation.
        for image in &post.images {
            if let ImageRef::Path(path) = image
                && let Err(err) = self.blobs.delete(path).await
            {
                warn!(%path, error = %err, "blob delete failed during post delete");
            }
        }
        Ok(())
    }

    pub(crate) async fn list_public(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<ListPostsResult, DomainError> {
        let posts = self
            .posts
            .list_public(Pagination { page, page_size })
            .await?;
        let total = self.posts.total_public().await?;
        Ok(ListPostsResult {
            posts,
            page,
            page_size,
            total,
        })
    }

    pub(crate) async fn list_mine(&self, owner_id: &str) -> Result<Vec<Post>, DomainError> {
        self.posts.list_by_owner(owner_id).await
    }

    /// Resolves stored references for display: blob paths become signed
    /// URLs, external URLs pass through.
    pub(crate) async fn image_urls(&self, post: &Post) -> Result<Vec<String>, DomainError> {
        let mut urls = Vec::with_capacity(post.images.len());
        for image in &post.images {
            match image {
                ImageRef::Path(path) => {
                    urls.push(
                        self.blobs
                            .signed_read_url(path, self.media.signed_url_ttl)
                            .await?,
                    );
                }
                ImageRef::External(url) => urls.push(url.clone()),
            }
        }
        Ok(urls)
    }

    async fn check_favorite_ownership(
        &self,
        owner_id: &str,
        favorite_id: Option<&str>,
    ) -> Result<(), DomainError> {
        let Some(favorite_id) = favorite_id else {
            return Ok(());
        };
        let favorite = self
            .favorites
            .get_favorite(favorite_id)
            .await?
            .ok_or(DomainError::NotFound(format!("favorite id: {favorite_id}")))?;
        if favorite.owner_id != owner_id {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }

    async fn check_categories(&self, category_ids: &[String]) -> Result<(), DomainError> {
        for id in category_ids {
            if self.categories.get_category(id).await?.is_none() {
                return Err(DomainError::NotFound(format!("category id: {id}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use base64::Engine;
    use base64::engine::general_purpose::STANDARD as BASE64;

    use journal_core::domain::error::DomainError;
    use journal_core::domain::image::{ImageInput, ImageRef};
    use journal_core::domain::post::{PostDraft, Visibility};

    use super::PostService;
    use crate::application::MediaSettings;
    use crate::data::category_repository::CategoryRepository;
    use crate::data::favorite_repository::{FavoriteRepository, NewFavorite};
    use crate::data::repositories::document::category_repository::DocumentCategoryRepository;
    use crate::data::repositories::document::favorite_repository::DocumentFavoriteRepository;
    use crate::data::repositories::document::post_repository::DocumentPostRepository;
    use crate::data::stores::memory::{MemoryBlobStore, MemoryDocumentStore};

    const BASE: &str = "https://media.example.com/journal";

    fn media_settings() -> MediaSettings {
        MediaSettings {
            public_base: BASE.to_string(),
            single_image_max_bytes: 5 * 1024 * 1024,
            signed_url_ttl: Duration::from_secs(3600),
        }
    }

    struct Harness {
        service:
            PostService<DocumentPostRepository, DocumentFavoriteRepository, DocumentCategoryRepository>,
        blobs: Arc<MemoryBlobStore>,
        favorites: DocumentFavoriteRepository,
        categories: DocumentCategoryRepository,
    }

    fn harness() -> Harness {
        let documents = Arc::new(MemoryDocumentStore::new());
        let blobs = Arc::new(MemoryBlobStore::new(BASE.to_string()));
        let favorites = DocumentFavoriteRepository::new(documents.clone());
        let categories = DocumentCategoryRepository::new(documents.clone());
        let service = PostService::new(
            DocumentPostRepository::new(documents),
            favorites.clone(),
            categories.clone(),
            blobs.clone(),
            media_settings(),
        );
        Harness {
            service,
            blobs,
            favorites,
            categories,
        }
    }

    fn draft(title: &str, visibility: Visibility) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            body: "body".to_string(),
            visibility,
            category_ids: Vec::new(),
            favorite_id: None,
        }
    }

    fn inline_png() -> ImageInput {
        ImageInput::Inline {
            data: BASE64.encode(b"png bytes"),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn create_post_uploads_inline_images_and_stores_paths() {
        let h = harness();
        let post = h
            .service
            .create_post("u1", draft("first", Visibility::Public), vec![inline_png()])
            .await
            .expect("create must succeed");

        assert_eq!(post.images.len(), 1);
        let ImageRef::Path(path) = &post.images[0] else {
            panic!("inline upload must persist as a path");
        };
        assert!(path.starts_with("posts/u1/"));
        assert!(h.blobs.contains(path));
        assert!(post.updated_at.is_none());
    }

    #[tokio::test]
    async fn create_post_rejects_five_images() {
        let h = harness();
        let images = vec![inline_png(); 5];
        let err = h
            .service
            .create_post("u1", draft("too many", Visibility::Public), images)
            .await
            .expect_err("must reject");
        assert!(matches!(err, DomainError::Validation { field: "images", .. }));
    }

    #[tokio::test]
    async fn create_post_rejects_foreign_favorite() {
        let h = harness();
        let favorite = h
            .favorites
            .create_favorite(NewFavorite {
                owner_id: "someone-else".to_string(),
                name: "their oshi".to_string(),
                started_at: None,
            })
            .await
            .expect("favorite must be created");

        let mut d = draft("post", Visibility::Public);
        d.favorite_id = Some(favorite.id);
        let err = h
            .service
            .create_post("u1", d, Vec::new())
            .await
            .expect_err("must reject");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn create_post_rejects_unknown_category() {
        let h = harness();
        let known = h
            .categories
            .create_category("ライブ".to_string())
            .await
            .expect("category must be created");

        let mut d = draft("tagged", Visibility::Public);
        d.category_ids = vec![known.id.clone()];
        h.service
            .create_post("u1", d, Vec::new())
            .await
            .expect("known category must pass");

        let mut d = draft("mistagged", Visibility::Public);
        d.category_ids = vec![known.id, "no-such-category".to_string()];
        let err = h
            .service
            .create_post("u1", d, Vec::new())
            .await
            .expect_err("unknown category must fail");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_cannot_delete_another_owners_blob() {
        let h = harness();
        let theirs = h
            .service
            .create_post("u2", draft("theirs", Visibility::Public), vec![inline_png()])
            .await
            .expect("create must succeed");
        let their_path = theirs.images[0].as_str().to_string();

        let mine = h
            .service
            .create_post("u1", draft("mine", Visibility::Public), Vec::new())
            .await
            .expect("create must succeed");
        h.service
            .update_post(
                "u1",
                &mine.id,
                draft("mine", Visibility::Public),
                Vec::new(),
                vec![their_path.clone()],
            )
            .await
            .expect("update must succeed");

        assert!(h.blobs.contains(their_path.as_str()));
        let reloaded = h
            .service
            .get_post(Some("u2"), &theirs.id)
            .await
            .expect("their post must survive");
        assert_eq!(reloaded.images[0].as_str(), their_path);
    }

    #[tokio::test]
    async fn update_keeps_existing_image_and_adds_new_one() {
        let h = harness();
        let post = h
            .service
            .create_post("u1", draft("original", Visibility::Public), vec![inline_png()])
            .await
            .expect("create must succeed");
        let old_path = post.images[0].as_str().to_string();

        let updated = h
            .service
            .update_post(
                "u1",
                &post.id,
                draft("edited", Visibility::Public),
                vec![
                    ImageInput::ExistingPath {
                        path: old_path.clone(),
                    },
                    inline_png(),
                ],
                Vec::new(),
            )
            .await
            .expect("update must succeed");

        assert_eq!(updated.images.len(), 2);
        assert_eq!(updated.images[0].as_str(), old_path);
        assert_ne!(updated.images[1].as_str(), old_path);
        assert!(updated.updated_at.is_some());
        assert!(h.blobs.contains(old_path.as_str()));
    }

    #[tokio::test]
    async fn update_with_explicit_delete_removes_blob() {
        let h = harness();
        let post = h
            .service
            .create_post("u1", draft("original", Visibility::Public), vec![inline_png()])
            .await
            .expect("create must succeed");
        let old_path = post.images[0].as_str().to_string();

        let updated = h
            .service
            .update_post(
                "u1",
                &post.id,
                draft("edited", Visibility::Public),
                Vec::new(),
                vec![old_path.clone()],
            )
            .await
            .expect("update must succeed");

        assert!(updated.images.is_empty());
        assert!(!h.blobs.contains(old_path.as_str()));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_forbidden() {
        let h = harness();
        let post = h
            .service
            .create_post("u1", draft("mine", Visibility::Public), Vec::new())
            .await
            .expect("create must succeed");

        let err = h
            .service
            .update_post(
                "u2",
                &post.id,
                draft("stolen", Visibility::Public),
                Vec::new(),
                Vec::new(),
            )
            .await
            .expect_err("must be forbidden");
        assert!(matches!(err, DomainError::Forbidden));
    }

    #[tokio::test]
    async fn private_post_reads_as_absent_for_strangers() {
        let h = harness();
        let post = h
            .service
            .create_post("u1", draft("secret", Visibility::Private), Vec::new())
            .await
            .expect("create must succeed");

        let err = h
            .service
            .get_post(Some("u2"), &post.id)
            .await
            .expect_err("must be hidden");
        assert!(matches!(err, DomainError::NotFound(_)));

        h.service
            .get_post(Some("u1"), &post.id)
            .await
            .expect("owner must see it");
    }

    #[tokio::test]
    async fn delete_post_removes_document_and_blobs() {
        let h = harness();
        let post = h
            .service
            .create_post("u1", draft("to delete", Visibility::Public), vec![inline_png()])
            .await
            .expect("create must succeed");
        let path = post.images[0].as_str().to_string();

        h.service
            .delete_post("u1", &post.id)
            .await
            .expect("delete must succeed");

        assert!(!h.blobs.contains(path.as_str()));
        let err = h
            .service
            .get_post(Some("u1"), &post.id)
            .await
            .expect_err("post must be gone");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_public_excludes_private_posts() {
        let h = harness();
        h.service
            .create_post("u1", draft("open", Visibility::Public), Vec::new())
            .await
            .expect("create must succeed");
        h.service
            .create_post("u1", draft("hidden", Visibility::Private), Vec::new())
            .await
            .expect("create must succeed");

        let result = h.service.list_public(1, 10).await.expect("list");
        assert_eq!(result.total, 1);
        assert_eq!(result.posts.len(), 1);
        assert_eq!(result.posts[0].title, "open");
    }

    #[tokio::test]
    async fn image_urls_sign_paths_and_pass_external_through() {
        let h = harness();
        let mut post = h
            .service
            .create_post("u1", draft("pics", Visibility::Public), vec![inline_png()])
            .await
            .expect("create must succeed");
        post.images.push(ImageRef::External(
            "https://thirdparty.example/pic.png".to_string(),
        ));

        let urls = h.service.image_urls(&post).await.expect("must resolve");
        assert_eq!(urls.len(), 2);
        assert!(urls[0].starts_with(BASE));
        assert_eq!(urls[1], "https://thirdparty.example/pic.png");
    }
}
