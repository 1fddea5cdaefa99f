use std::time::Duration;

use async_trait::async_trait;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The object was already absent. Not an error for callers that delete
    /// best-effort.
    Missing,
}

/// Binary storage collaborator. The blob store is the system of record for
/// image bytes; documents reference blobs by path and never embed bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Writes must succeed or the enclosing operation fails; a document must
    /// never reference a path that was not written.
    async fn write(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError>;

    async fn delete(&self, path: &str) -> Result<DeleteOutcome, DomainError>;

    /// Issues a time-limited read URL for a stored path.
    async fn signed_read_url(&self, path: &str, ttl: Duration) -> Result<String, DomainError>;
}
