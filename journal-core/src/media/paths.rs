use chrono::Utc;
use uuid::Uuid;

/// Extracts the blob path from a signed URL we issued ourselves.
///
/// One parsing rule, applied everywhere: the URL must start with
/// `public_base`; the query string is stripped first; the first path segment
/// after the base (the signing token) is dropped; the remainder is the blob
/// path. Returns `None` for URLs we do not own, which callers keep verbatim.
pub fn blob_path_from_url(url: &str, public_base: &str) -> Option<String> {
    let base = public_base.trim_end_matches('/');
    let rest = url.strip_prefix(base)?;
    let rest = rest.strip_prefix('/')?;
    let rest = rest.split('?').next().unwrap_or(rest);

    let (_token, path) = rest.split_once('/')?;
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

/// Maps an image MIME type to a file extension. `None` means the type is
/// not an accepted image format.
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Where newly uploaded blobs land.
#[derive(Debug, Clone)]
pub enum PathNamespace {
    /// Multi-image call sites (posts): every upload gets a fresh
    /// `{kind}/{owner}/[{entity}/]{millis}-{uuid}.{ext}` path.
    Timestamped {
        kind: String,
        owner_id: String,
        entity_id: Option<String>,
    },
    /// Single-image call sites (favorite image, avatar): a well-known
    /// `{stem}.{ext}` path, overwritten in place on re-upload.
    Fixed { stem: String },
}

impl PathNamespace {
    /// True iff `path` lies inside this namespace. Delete targets outside
    /// the caller's namespace reference blobs the caller does not own.
    pub fn contains(&self, path: &str) -> bool {
        match self {
            PathNamespace::Timestamped {
                kind,
                owner_id,
                entity_id,
            } => {
                let prefix = match entity_id {
                    Some(entity) => format!("{kind}/{owner_id}/{entity}/"),
                    None => format!("{kind}/{owner_id}/"),
                };
                path.starts_with(&prefix)
            }
            PathNamespace::Fixed { stem } => path
                .strip_prefix(stem.as_str())
                .is_some_and(|rest| rest.starts_with('.')),
        }
    }

    pub fn next_path(&self, ext: &str) -> String {
        match self {
            PathNamespace::Timestamped {
                kind,
                owner_id,
                entity_id,
            } => {
                let millis = Utc::now().timestamp_millis();
                let nonce = Uuid::new_v4().simple();
                match entity_id {
                    Some(entity) => format!("{kind}/{owner_id}/{entity}/{millis}-{nonce}.{ext}"),
                    None => format!("{kind}/{owner_id}/{millis}-{nonce}.{ext}"),
                }
            }
            PathNamespace::Fixed { stem } => format!("{stem}.{ext}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PathNamespace, blob_path_from_url, extension_for_mime};

    const BASE: &str = "https://media.example.com/journal";

    #[test]
    fn signed_url_path_extraction_drops_token_and_query() {
        let url = format!("{BASE}/sig-abc123/posts/u1/old.jpg?expires=123&sig=xyz");
        assert_eq!(
            blob_path_from_url(&url, BASE).as_deref(),
            Some("posts/u1/old.jpg")
        );
    }

    #[test]
    fn extraction_tolerates_trailing_slash_on_base() {
        let url = format!("{BASE}/tok/favorites/u1/f1.png");
        assert_eq!(
            blob_path_from_url(&url, "https://media.example.com/journal/").as_deref(),
            Some("favorites/u1/f1.png")
        );
    }

    #[test]
    fn foreign_urls_are_not_extracted() {
        assert_eq!(
            blob_path_from_url("https://cdn.other.example/img.png", BASE),
            None
        );
        // Base matches but no path segment after the token.
        assert_eq!(blob_path_from_url(&format!("{BASE}/tok"), BASE), None);
        assert_eq!(blob_path_from_url(&format!("{BASE}/tok/"), BASE), None);
    }

    #[test]
    fn timestamped_paths_are_unique() {
        let ns = PathNamespace::Timestamped {
            kind: "posts".to_string(),
            owner_id: "u1".to_string(),
            entity_id: None,
        };
        let a = ns.next_path("jpg");
        let b = ns.next_path("jpg");
        assert!(a.starts_with("posts/u1/"));
        assert!(a.ends_with(".jpg"));
        assert_ne!(a, b);
    }

    #[test]
    fn fixed_namespace_is_deterministic() {
        let ns = PathNamespace::Fixed {
            stem: "favorites/u1/f1".to_string(),
        };
        assert_eq!(ns.next_path("png"), "favorites/u1/f1.png");
        assert_eq!(ns.next_path("png"), "favorites/u1/f1.png");
    }

    #[test]
    fn namespace_contains_only_its_own_paths() {
        let ns = PathNamespace::Timestamped {
            kind: "posts".to_string(),
            owner_id: "u1".to_string(),
            entity_id: None,
        };
        assert!(ns.contains("posts/u1/123-abc.jpg"));
        assert!(!ns.contains("posts/u2/123-abc.jpg"));
        assert!(!ns.contains("favorites/u1/f1.png"));
        // A bare owner prefix without a separator is another owner's id.
        assert!(!ns.contains("posts/u10/123-abc.jpg"));

        let fixed = PathNamespace::Fixed {
            stem: "favorites/u1/f1".to_string(),
        };
        assert!(fixed.contains("favorites/u1/f1.png"));
        assert!(fixed.contains("favorites/u1/f1.jpg"));
        assert!(!fixed.contains("favorites/u1/f2.png"));
        assert!(!fixed.contains("favorites/u1/f1plus.png"));
    }

    #[test]
    fn only_known_image_types_have_extensions() {
        assert_eq!(extension_for_mime("image/png"), Some("png"));
        assert_eq!(extension_for_mime("application/pdf"), None);
        assert_eq!(extension_for_mime("text/html"), None);
    }
}
