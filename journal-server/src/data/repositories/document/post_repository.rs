use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use journal_core::domain::error::DomainError;
use journal_core::domain::post::{Post, Visibility};
use journal_core::store::DocumentStore;

use super::{from_document, to_document};
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};

const COLLECTION: &str = "posts";

#[derive(Clone)]
pub(crate) struct DocumentPostRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentPostRepository {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn all_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.store
            .list(COLLECTION)
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}

#[async_trait]
impl PostRepository for DocumentPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let post = Post {
            id: Uuid::new_v4().to_string(),
            owner_id: input.owner_id,
            title: input.title,
            body: input.body,
            visibility: input.visibility,
            category_ids: input.category_ids,
            favorite_id: input.favorite_id,
            images: input.images,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.store
            .put(COLLECTION, &post.id, to_document(&post)?)
            .await?;
        Ok(post)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, DomainError> {
        self.store
            .get(COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, DomainError> {
        let Some(document) = self.store.get(COLLECTION, id).await? else {
            return Ok(None);
        };
        let mut post: Post = from_document(document)?;

        post.title = patch.title;
        post.body = patch.body;
        post.visibility = patch.visibility;
        post.category_ids = patch.category_ids;
        post.favorite_id = patch.favorite_id;
        post.images = patch.images;
        post.updated_at = Some(Utc::now());

        self.store.put(COLLECTION, id, to_document(&post)?).await?;
        Ok(Some(post))
    }

    async fn delete_post(&self, id: &str) -> Result<bool, DomainError> {
        self.store.delete(COLLECTION, id).await
    }

    async fn list_public(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self
            .all_posts()
            .await?
            .into_iter()
            .filter(|post| post.visibility == Visibility::Public)
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = pagination
            .page
            .saturating_sub(1)
            .saturating_mul(pagination.page_size) as usize;
        Ok(posts
            .into_iter()
            .skip(offset)
            .take(pagination.page_size as usize)
            .collect())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self
            .all_posts()
            .await?
            .into_iter()
            .filter(|post| post.owner_id == owner_id)
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn list_all(&self) -> Result<Vec<Post>, DomainError> {
        self.all_posts().await
    }

    async fn any_with_favorite(&self, favorite_id: &str) -> Result<bool, DomainError> {
        Ok(self
            .all_posts()
            .await?
            .iter()
            .any(|post| post.favorite_id.as_deref() == Some(favorite_id)))
    }

    async fn total_public(&self) -> Result<usize, DomainError> {
        Ok(self
            .all_posts()
            .await?
            .iter()
            .filter(|post| post.visibility == Visibility::Public)
            .count())
    }
}
