use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub const MAX_FAVORITE_NAME_CHARS: usize = 50;

/// A tracked "oshi". The image is stored as a blob path; the signed URL is
/// derived on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub started_at: Option<NaiveDate>,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Trims and bounds a favorite name. Per-owner uniqueness is checked by the
/// service against the repository, not here.
pub fn normalize_favorite_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    let chars = name.chars().count();
    if chars == 0 || chars > MAX_FAVORITE_NAME_CHARS {
        return Err(DomainError::Validation {
            field: "name",
            message: "must be 1..=50 characters",
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::{DomainError, normalize_favorite_name};

    #[test]
    fn name_is_trimmed() {
        let name = normalize_favorite_name("  星野 アイ  ").expect("must validate");
        assert_eq!(name, "星野 アイ");
    }

    #[test]
    fn name_rejects_empty_and_overlong() {
        assert!(matches!(
            normalize_favorite_name("   "),
            Err(DomainError::Validation { field: "name", .. })
        ));
        assert!(matches!(
            normalize_favorite_name(&"x".repeat(51)),
            Err(DomainError::Validation { field: "name", .. })
        ));
    }
}
