use journal_core::domain::category::{Category, normalize_category_name};
use journal_core::domain::error::DomainError;

use crate::data::category_repository::CategoryRepository;

pub(crate) struct CategoryService<R: CategoryRepository> {
    categories: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub(crate) fn new(categories: R) -> Self {
        Self { categories }
    }

    pub(crate) async fn create_category(&self, name: &str) -> Result<Category, DomainError> {
        let name = normalize_category_name(name)?;
        if self.categories.name_exists(&name).await? {
            return Err(DomainError::AlreadyExists(format!("category name: {name}")));
        }
        self.categories.create_category(name).await
    }

    pub(crate) async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.categories.list_categories().await
    }
}
