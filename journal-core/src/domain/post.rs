use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::image::ImageRef;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_BODY_CHARS: usize = 1000;
pub const MAX_IMAGES_PER_POST: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub body: String,
    pub visibility: Visibility,
    pub category_ids: Vec<String>,
    pub favorite_id: Option<String>,
    pub images: Vec<ImageRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    /// True for posts the given viewer may see: public posts, or the
    /// viewer's own.
    pub fn visible_to(&self, viewer: Option<&str>) -> bool {
        self.visibility == Visibility::Public || viewer.is_some_and(|v| v == self.owner_id)
    }
}

#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub visibility: Visibility,
    pub category_ids: Vec<String>,
    pub favorite_id: Option<String>,
}

impl PostDraft {
    pub fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            title: normalize_title(&self.title)?,
            body: normalize_body(&self.body)?,
            visibility: self.visibility,
            category_ids: self.category_ids,
            favorite_id: self.favorite_id,
        })
    }
}

fn normalize_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    let chars = title.chars().count();
    if chars == 0 || chars > MAX_TITLE_CHARS {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be 1..=100 characters",
        });
    }
    Ok(title.to_string())
}

fn normalize_body(body: &str) -> Result<String, DomainError> {
    let body = body.trim();
    let chars = body.chars().count();
    if chars == 0 || chars > MAX_BODY_CHARS {
        return Err(DomainError::Validation {
            field: "body",
            message: "must be 1..=1000 characters",
        });
    }
    Ok(body.to_string())
}

/// Image-count cap for posts. Enforced at the request boundary; the media
/// reconciler assumes callers have already applied it.
pub fn validate_image_count(count: usize) -> Result<(), DomainError> {
    if count > MAX_IMAGES_PER_POST {
        return Err(DomainError::Validation {
            field: "images",
            message: "at most 4 images per post",
        });
    }
    Ok(())
}
