//! Typed repositories over the schemaless document store. Each repository
//! owns one collection and its (de)serialization; filtering happens in
//! memory over full-collection reads, which is fine at this scale.

pub(crate) mod category_repository;
pub(crate) mod favorite_repository;
pub(crate) mod post_repository;

use journal_core::domain::error::DomainError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(super) fn to_document<T: Serialize>(entity: &T) -> Result<Value, DomainError> {
    serde_json::to_value(entity).map_err(|err| DomainError::Unexpected(err.to_string()))
}

pub(super) fn from_document<T: DeserializeOwned>(document: Value) -> Result<T, DomainError> {
    serde_json::from_value(document).map_err(|err| DomainError::Unexpected(err.to_string()))
}
