pub(crate) mod categories;
pub(crate) mod favorites;
pub(crate) mod posts;
pub(crate) mod search;
