pub mod category;
pub mod error;
pub mod favorite;
pub mod image;
pub mod post;
