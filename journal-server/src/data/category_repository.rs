use async_trait::async_trait;

use journal_core::domain::category::Category;
use journal_core::domain::error::DomainError;

#[async_trait]
pub(crate) trait CategoryRepository: Send + Sync {
    async fn create_category(&self, name: String) -> Result<Category, DomainError>;
    async fn get_category(&self, id: &str) -> Result<Option<Category>, DomainError>;
    async fn list_categories(&self) -> Result<Vec<Category>, DomainError>;
    async fn name_exists(&self, name: &str) -> Result<bool, DomainError>;
}
