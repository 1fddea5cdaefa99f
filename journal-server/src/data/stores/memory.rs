//! In-memory implementations of the document and blob store interfaces.
//! The managed backend-as-a-service is an external collaborator; these
//! stand in for it in tests and local runs.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use journal_core::domain::error::DomainError;
use journal_core::store::blob::{BlobStore, DeleteOutcome};
use journal_core::store::document::DocumentStore;

pub(crate) struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl MemoryDocumentStore {
    pub(crate) fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

fn poisoned(_: impl std::fmt::Debug) -> DomainError {
    DomainError::Unexpected("store lock poisoned".to_string())
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, DomainError> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), DomainError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, DomainError> {
        let mut collections = self.collections.write().map_err(poisoned)?;
        Ok(collections
            .get_mut(collection)
            .is_some_and(|documents| documents.remove(id).is_some()))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, DomainError> {
        let collections = self.collections.read().map_err(poisoned)?;
        Ok(collections
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }
}

pub(crate) struct MemoryBlobStore {
    objects: RwLock<HashMap<String, (Vec<u8>, String)>>,
    public_base: String,
}

impl MemoryBlobStore {
    pub(crate) fn new(public_base: String) -> Self {
        Self {
            objects: RwLock::new(HashMap::new()),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, path: &str) -> bool {
        self.objects
            .read()
            .expect("objects lock poisoned")
            .contains_key(path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn write(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), DomainError> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        objects.insert(path.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<DeleteOutcome, DomainError> {
        let mut objects = self.objects.write().map_err(poisoned)?;
        Ok(match objects.remove(path) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::Missing,
        })
    }

    /// URL shape matches the extraction rule: base, one token segment, the
    /// blob path, then the query.
    async fn signed_read_url(&self, path: &str, ttl: Duration) -> Result<String, DomainError> {
        let expires = Utc::now().timestamp() + ttl.as_secs() as i64;
        let token = Uuid::new_v4().simple();
        Ok(format!(
            "{}/{}/{}?expires={}",
            self.public_base, token, path, expires
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use journal_core::media::blob_path_from_url;
    use journal_core::store::blob::{BlobStore, DeleteOutcome};
    use journal_core::store::document::DocumentStore;

    use super::{MemoryBlobStore, MemoryDocumentStore};

    const BASE: &str = "https://media.example.com/journal";

    #[tokio::test]
    async fn document_store_put_get_delete_round_trip() {
        let store = MemoryDocumentStore::new();
        store
            .put("posts", "p1", json!({"title": "hello"}))
            .await
            .expect("put must succeed");

        let loaded = store.get("posts", "p1").await.expect("get must succeed");
        assert_eq!(loaded, Some(json!({"title": "hello"})));

        assert!(store.delete("posts", "p1").await.expect("delete"));
        assert!(!store.delete("posts", "p1").await.expect("second delete"));
        assert_eq!(store.get("posts", "p1").await.expect("get"), None);
    }

    #[tokio::test]
    async fn document_store_lists_whole_collection() {
        let store = MemoryDocumentStore::new();
        store.put("posts", "a", json!({"n": 1})).await.expect("put");
        store.put("posts", "b", json!({"n": 2})).await.expect("put");

        let all = store.list("posts").await.expect("list must succeed");
        assert_eq!(all.len(), 2);
        assert!(store.list("empty").await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn blob_delete_reports_missing_objects() {
        let store = MemoryBlobStore::new(BASE.to_string());
        store
            .write("posts/u1/a.jpg", b"bytes".to_vec(), "image/jpeg")
            .await
            .expect("write must succeed");

        assert_eq!(
            store.delete("posts/u1/a.jpg").await.expect("delete"),
            DeleteOutcome::Deleted
        );
        assert_eq!(
            store.delete("posts/u1/a.jpg").await.expect("delete"),
            DeleteOutcome::Missing
        );
    }

    #[tokio::test]
    async fn signed_urls_round_trip_through_path_extraction() {
        let store = MemoryBlobStore::new(BASE.to_string());
        let url = store
            .signed_read_url("posts/u1/a.jpg", Duration::from_secs(60))
            .await
            .expect("sign must succeed");

        assert_eq!(
            blob_path_from_url(&url, BASE).as_deref(),
            Some("posts/u1/a.jpg")
        );
    }
}
