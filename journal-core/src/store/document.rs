use async_trait::async_trait;
use serde_json::Value;

use crate::domain::error::DomainError;

/// Schemaless key-document storage collaborator. Typed repositories layer
/// their own (de)serialization and filtering on top; the store itself
/// enforces nothing beyond collection/id addressing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DomainError>;

    /// Upserts the document under `(collection, id)`.
    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DomainError>;

    /// Returns whether a document was actually removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DomainError>;

    /// Full-collection read; callers filter in memory. The intended scale is
    /// small, and repositories own any future indexing.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, DomainError>;
}
