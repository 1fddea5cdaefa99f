use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub const MAX_CATEGORY_NAME_CHARS: usize = 50;

/// Globally shared, flat category. No hierarchy, not per-user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

pub fn normalize_category_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    let chars = name.chars().count();
    if chars == 0 || chars > MAX_CATEGORY_NAME_CHARS {
        return Err(DomainError::Validation {
            field: "name",
            message: "must be 1..=50 characters",
        });
    }
    Ok(name.to_string())
}
