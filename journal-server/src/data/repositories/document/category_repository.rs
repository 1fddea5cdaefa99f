use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use journal_core::domain::category::Category;
use journal_core::domain::error::DomainError;
use journal_core::store::DocumentStore;

use super::{from_document, to_document};
use crate::data::category_repository::CategoryRepository;

const COLLECTION: &str = "categories";

#[derive(Clone)]
pub(crate) struct DocumentCategoryRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentCategoryRepository {
    pub(crate) fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CategoryRepository for DocumentCategoryRepository {
    async fn create_category(&self, name: String) -> Result<Category, DomainError> {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
        };
        self.store
            .put(COLLECTION, &category.id, to_document(&category)?)
            .await?;
        Ok(category)
    }

    async fn get_category(&self, id: &str) -> Result<Option<Category>, DomainError> {
        self.store
            .get(COLLECTION, id)
            .await?
            .map(from_document)
            .transpose()
    }

    async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        let mut categories: Vec<Category> = self
            .store
            .list(COLLECTION)
            .await?
            .into_iter()
            .map(from_document)
            .collect::<Result<_, _>>()?;
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(categories)
    }

    async fn name_exists(&self, name: &str) -> Result<bool, DomainError> {
        let categories = self.list_categories().await?;
        Ok(categories.iter().any(|category| category.name == name))
    }
}
