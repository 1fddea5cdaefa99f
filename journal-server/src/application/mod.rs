use std::time::Duration;

use journal_core::media::{MediaPolicy, PathNamespace};

pub(crate) mod category_service;
pub(crate) mod favorite_service;
pub(crate) mod post_service;
pub(crate) mod search_service;

/// Media knobs shared by the post and favorite services. Each call site
/// derives its own reconciliation policy from these.
#[derive(Debug, Clone)]
pub(crate) struct MediaSettings {
    pub(crate) public_base: String,
    pub(crate) single_image_max_bytes: usize,
    pub(crate) signed_url_ttl: Duration,
}

impl MediaSettings {
    /// Post images: timestamped multi-image namespace. The size ceiling is
    /// enforced by the HTTP body limit, not re-checked per image.
    pub(crate) fn post_policy(&self, owner_id: &str) -> MediaPolicy {
        MediaPolicy {
            namespace: PathNamespace::Timestamped {
                kind: "posts".to_string(),
                owner_id: owner_id.to_string(),
                entity_id: None,
            },
            public_base: self.public_base.clone(),
            max_bytes: None,
        }
    }

    /// Favorite image: one well-known path per favorite, overwritten in
    /// place, with the single-image ceiling applied.
    pub(crate) fn favorite_policy(&self, owner_id: &str, favorite_id: &str) -> MediaPolicy {
        MediaPolicy {
            namespace: PathNamespace::Fixed {
                stem: format!("favorites/{owner_id}/{favorite_id}"),
            },
            public_base: self.public_base.clone(),
            max_bytes: Some(self.single_image_max_bytes),
        }
    }
}
