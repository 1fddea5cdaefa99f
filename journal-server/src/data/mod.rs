pub(crate) mod category_repository;
pub(crate) mod favorite_repository;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod stores;
