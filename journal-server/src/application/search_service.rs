use journal_core::domain::error::DomainError;
use journal_core::domain::post::Post;
use journal_core::search;

use crate::data::post_repository::PostRepository;

pub(crate) struct SearchService<P: PostRepository> {
    posts: P,
}

impl<P: PostRepository> SearchService<P> {
    pub(crate) fn new(posts: P) -> Self {
        Self { posts }
    }

    pub(crate) async fn search_by_hashtag(
        &self,
        tag: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<Post>, DomainError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(DomainError::Validation {
                field: "tag",
                message: "must not be empty",
            });
        }
        let corpus = self.posts.list_all().await?;
        Ok(search::search_by_hashtag(corpus, tag, viewer))
    }

    pub(crate) async fn search_by_category(
        &self,
        category_id: &str,
        viewer: Option<&str>,
    ) -> Result<Vec<Post>, DomainError> {
        let corpus = self.posts.list_all().await?;
        Ok(search::search_by_category(corpus, category_id, viewer))
    }
}
