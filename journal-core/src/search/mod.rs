pub mod hashtag;

pub use hashtag::{extract_hashtags, matches_hashtag, search_by_category, search_by_hashtag};
