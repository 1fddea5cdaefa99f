use async_trait::async_trait;

use journal_core::domain::error::DomainError;
use journal_core::domain::image::ImageRef;
use journal_core::domain::post::{Post, Visibility};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) owner_id: String,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) visibility: Visibility,
    pub(crate) category_ids: Vec<String>,
    pub(crate) favorite_id: Option<String>,
    pub(crate) images: Vec<ImageRef>,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) visibility: Visibility,
    pub(crate) category_ids: Vec<String>,
    pub(crate) favorite_id: Option<String>,
    pub(crate) images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: &str) -> Result<Option<Post>, DomainError>;
    /// Applies the patch and stamps `updated_at`. `None` when the post does
    /// not exist.
    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, DomainError>;
    async fn delete_post(&self, id: &str) -> Result<bool, DomainError>;
    async fn list_public(&self, pagination: Pagination) -> Result<Vec<Post>, DomainError>;
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Post>, DomainError>;
    /// The whole corpus, for the search scan.
    async fn list_all(&self) -> Result<Vec<Post>, DomainError>;
    /// Referential-integrity probe used before favorite deletion.
    async fn any_with_favorite(&self, favorite_id: &str) -> Result<bool, DomainError>;
    async fn total_public(&self) -> Result<usize, DomainError>;
}
