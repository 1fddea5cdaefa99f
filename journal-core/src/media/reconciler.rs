use std::collections::HashSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures::future::{join_all, try_join_all};
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::image::{ImageInput, ImageRef};
use crate::store::blob::{BlobStore, DeleteOutcome};

use super::paths::{PathNamespace, blob_path_from_url, extension_for_mime};

/// Per-call-site reconciliation policy: where new blobs land, which signed
/// URLs are ours to unwrap, and the inline payload ceiling (None when the
/// outer boundary already enforces one).
#[derive(Debug, Clone)]
pub struct MediaPolicy {
    pub namespace: PathNamespace,
    pub public_base: String,
    pub max_bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobWrite {
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDelete {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    /// The ordered reference list to persist, in `submitted` order.
    pub final_refs: Vec<ImageRef>,
    pub writes: Vec<BlobWrite>,
    pub deletes: Vec<BlobDelete>,
}

/// Computes the blob write/delete plan for an image edit.
///
/// `current` is the persisted reference list before the edit; it is not
/// consulted for the outcome (only explicit deletes remove blobs) but lets
/// us notice references the edit silently drops. Callers cap `submitted`
/// at the boundary (four per post, one for single-image call sites); the
/// reconciler assumes that has happened.
pub fn plan(
    current: &[ImageRef],
    submitted: &[ImageInput],
    explicit_deletes: &[String],
    policy: &MediaPolicy,
) -> Result<ReconcilePlan, DomainError> {
    let mut deletes = Vec::new();
    let mut deleted_paths = HashSet::new();
    // Delete targets that name no blob of ours (foreign URLs, paths outside
    // the call site's namespace) schedule nothing; they still drop the
    // matching submitted entry.
    let mut dropped_targets: HashSet<String> = HashSet::new();

    for entry in explicit_deletes {
        match normalize_delete_target(entry, &policy.public_base) {
            Some(path) if policy.namespace.contains(&path) => {
                if deleted_paths.insert(path.clone()) {
                    deletes.push(BlobDelete { path });
                }
            }
            Some(path) => {
                debug!(%path, "delete target outside the namespace; no blob delete scheduled");
                dropped_targets.insert(path);
                dropped_targets.insert(entry.clone());
            }
            None => {
                dropped_targets.insert(entry.clone());
            }
        }
    }

    let mut final_refs = Vec::new();
    let mut writes = Vec::new();

    for input in submitted {
        match input {
            ImageInput::Inline { data, content_type } => {
                let (bytes, content_type) = decode_inline(data, content_type, policy.max_bytes)?;
                let ext = extension_for_mime(&content_type)
                    .ok_or_else(|| DomainError::InvalidMediaType(content_type.clone()))?;
                let path = policy.namespace.next_path(ext);
                writes.push(BlobWrite {
                    path: path.clone(),
                    bytes,
                    content_type,
                });
                final_refs.push(ImageRef::Path(path));
            }
            ImageInput::ExistingUrl { url } => {
                match blob_path_from_url(url, &policy.public_base) {
                    Some(path) => {
                        if !deleted_paths.contains(&path) && !dropped_targets.contains(&path) {
                            // Persist the stable path, never the signed URL:
                            // signed URLs expire and are re-issued on read.
                            final_refs.push(ImageRef::Path(path));
                        }
                    }
                    None => {
                        if !dropped_targets.contains(url.as_str()) {
                            final_refs.push(ImageRef::External(url.clone()));
                        }
                    }
                }
            }
            ImageInput::ExistingPath { path } => {
                if !deleted_paths.contains(path.as_str())
                    && !dropped_targets.contains(path.as_str())
                {
                    final_refs.push(ImageRef::Path(path.clone()));
                }
            }
        }
    }

    for reference in current {
        if let ImageRef::Path(path) = reference
            && !deleted_paths.contains(path.as_str())
            && !final_refs.iter().any(|r| r.as_str() == path)
        {
            debug!(%path, "image dropped from post without explicit delete; blob left in place");
        }
    }

    Ok(ReconcilePlan {
        final_refs,
        writes,
        deletes,
    })
}

/// Executes a plan against the blob store and returns the reference list to
/// persist.
///
/// All writes must land before the caller touches the document store; any
/// write failure aborts the whole operation so a document never references
/// a blob that was not written. Delete failures are logged and swallowed —
/// a missed cleanup is a leak to reconcile later, not a reason to fail the
/// edit.
pub async fn apply(
    plan: ReconcilePlan,
    store: &dyn BlobStore,
) -> Result<Vec<ImageRef>, DomainError> {
    try_join_all(plan.writes.into_iter().map(|write| async move {
        store
            .write(&write.path, write.bytes, &write.content_type)
            .await
            .map_err(|err| match err {
                DomainError::BlobWrite(_) => err,
                other => DomainError::BlobWrite(other.to_string()),
            })
    }))
    .await?;

    let outcomes = join_all(plan.deletes.iter().map(|delete| async move {
        (delete.path.as_str(), store.delete(&delete.path).await)
    }))
    .await;

    for (path, outcome) in outcomes {
        match outcome {
            Ok(DeleteOutcome::Deleted) => {}
            Ok(DeleteOutcome::Missing) => {
                debug!(%path, "blob already absent on delete");
            }
            Err(err) => {
                warn!(%path, error = %err, "blob delete failed; continuing");
            }
        }
    }

    Ok(plan.final_refs)
}

/// Decodes and checks an inline payload without planning any writes. Call
/// sites that persist a document before running the reconciler use this to
/// surface `InvalidMediaType`/`PayloadTooLarge` up front.
pub fn validate_inline(
    data: &str,
    declared_type: &str,
    max_bytes: Option<usize>,
) -> Result<(), DomainError> {
    let (_, content_type) = decode_inline(data, declared_type, max_bytes)?;
    extension_for_mime(&content_type).ok_or(DomainError::InvalidMediaType(content_type))?;
    Ok(())
}

fn normalize_delete_target(entry: &str, public_base: &str) -> Option<String> {
    if entry.starts_with("http://") || entry.starts_with("https://") {
        blob_path_from_url(entry, public_base)
    } else {
        Some(entry.to_string())
    }
}

fn decode_inline(
    data: &str,
    declared_type: &str,
    max_bytes: Option<usize>,
) -> Result<(Vec<u8>, String), DomainError> {
    // Tolerate data URLs: "data:image/png;base64,...."
    let (content_type, payload) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or(DomainError::Validation {
                field: "images",
                message: "malformed data URL",
            })?;
            let mime = header.trim_end_matches(";base64");
            let mime = if mime.is_empty() { declared_type } else { mime };
            (mime.to_string(), payload)
        }
        None => (declared_type.to_string(), data),
    };

    if !content_type.starts_with("image/") {
        return Err(DomainError::InvalidMediaType(content_type));
    }

    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|_| DomainError::Validation {
            field: "images",
            message: "invalid base64 image payload",
        })?;

    if let Some(limit) = max_bytes
        && bytes.len() > limit
    {
        return Err(DomainError::PayloadTooLarge {
            size: bytes.len(),
            limit,
        });
    }

    Ok((bytes, content_type))
}
