use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    #[error("forbidden")]
    Forbidden,

    #[error("resource is still referenced: {0}")]
    InUse(String),

    #[error("unsupported media type: {0}")]
    InvalidMediaType(String),

    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("blob write failed: {0}")]
    BlobWrite(String),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
