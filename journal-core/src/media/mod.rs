pub mod paths;
pub mod reconciler;

pub use paths::{PathNamespace, blob_path_from_url, extension_for_mime};
pub use reconciler::{BlobDelete, BlobWrite, MediaPolicy, ReconcilePlan, apply, plan, validate_inline};
