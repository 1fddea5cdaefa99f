//! Core contracts of the fan-tracking journal: domain types, the media
//! reconciler that turns submitted image lists into blob-store plans, the
//! hashtag matcher behind search, and the abstract document/blob store
//! interfaces the surrounding services plug real backends into.

pub mod domain;
pub mod media;
pub mod search;
pub mod store;
