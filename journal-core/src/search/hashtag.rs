//! Hashtag extraction and corpus search.
//!
//! Both marker widths are recognized: half-width `#` and full-width `＃`.
//! Matching is a full-corpus scan; the intended scale is small and callers
//! needing more should add a denormalized hashtag index.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::post::Post;

static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[#＃]([^\s#＃]+)").expect("invalid hashtag regex"));

/// Code points that continue a hashtag word. A tag match must not be
/// followed by one of these, so searching for 推し does not hit 推しエイプリル.
/// Hangul and Cyrillic count as word characters too, same as the CJK sets.
const WORD_CLASS: &str = r"0-9A-Za-z_\p{Hiragana}\p{Katakana}\p{Han}\p{Hangul}\p{Cyrillic}";

/// Scans `text` left to right and yields each hashtag token with its marker
/// stripped. Tokens are not deduplicated.
pub fn extract_hashtags(text: &str) -> impl Iterator<Item = &str> {
    HASHTAG_REGEX
        .captures_iter(text)
        .filter_map(|capture| capture.get(1).map(|m| m.as_str()))
}

/// True iff `text` contains `tag` as a complete hashtag: a marker of either
/// width, the tag itself, and then end-of-text or a non-word code point.
/// A leading marker on `tag` is tolerated; the tag is escaped so special
/// characters match literally.
pub fn matches_hashtag(text: &str, tag: &str) -> bool {
    let tag = tag.trim().trim_start_matches(['#', '＃']);
    if tag.is_empty() {
        return false;
    }

    let pattern = format!(r"[#＃]{}(?:$|[^{WORD_CLASS}])", regex::escape(tag));
    Regex::new(&pattern)
        .expect("escaped hashtag pattern must compile")
        .is_match(text)
}

/// Visibility-filters `corpus` (public posts, plus the viewer's own) with
/// `predicate`, then sorts newest-first. Hashtag and category search are
/// both predicate swaps over this pipeline.
pub fn filter_posts<F>(corpus: Vec<Post>, viewer: Option<&str>, predicate: F) -> Vec<Post>
where
    F: Fn(&Post) -> bool,
{
    let mut matched: Vec<Post> = corpus
        .into_iter()
        .filter(|post| post.visible_to(viewer) && predicate(post))
        .collect();
    // Stable sort: equal timestamps keep their corpus order.
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matched
}

/// All posts visible to `viewer` that mention `tag` in title or body,
/// newest first.
pub fn search_by_hashtag(corpus: Vec<Post>, tag: &str, viewer: Option<&str>) -> Vec<Post> {
    filter_posts(corpus, viewer, |post| {
        matches_hashtag(&post.title, tag) || matches_hashtag(&post.body, tag)
    })
}

/// All posts visible to `viewer` carrying the category, newest first.
pub fn search_by_category(corpus: Vec<Post>, category_id: &str, viewer: Option<&str>) -> Vec<Post> {
    filter_posts(corpus, viewer, |post| {
        post.category_ids.iter().any(|id| id == category_id)
    })
}
