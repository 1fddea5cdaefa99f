pub mod blob;
pub mod document;

pub use blob::{BlobStore, DeleteOutcome};
pub use document::DocumentStore;
