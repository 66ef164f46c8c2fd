//! Reddit public JSON API response shapes.

use premortem_core::RawThread;
use serde::Deserialize;

/// Post bodies are truncated at retrieval time to bound prompt size later.
const BODY_EXCERPT_CHARS: usize = 1500;

/// Reddit search listing wrapper.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
    pub(crate) data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingData {
    #[serde(default)]
    pub(crate) children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Post {
    #[serde(default)]
    pub(crate) data: PostData,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PostData {
    #[serde(default)]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) selftext: String,
    #[serde(default)]
    pub(crate) subreddit_name_prefixed: String,
    #[serde(default)]
    pub(crate) score: i64,
    #[serde(default)]
    pub(crate) num_comments: u32,
    #[serde(default)]
    pub(crate) permalink: String,
    #[serde(default)]
    pub(crate) created_utc: f64,
    #[serde(default)]
    pub(crate) upvote_ratio: f64,
}

/// Convert a listing post into a [`RawThread`], skipping posts without an id.
///
/// The thread URL is built against `base_url` so tests can point the client
/// at a mock server and comment fetches stay on the same host.
pub(crate) fn to_raw_thread(post: &Post, base_url: &str, source_query: &str) -> Option<RawThread> {
    if post.data.id.is_empty() {
        return None;
    }
    Some(RawThread {
        id: post.data.id.clone(),
        title: post.data.title.clone(),
        body_excerpt: truncate_chars(&post.data.selftext, BODY_EXCERPT_CHARS),
        community: post.data.subreddit_name_prefixed.clone(),
        popularity_score: post.data.score,
        comment_count: post.data.num_comments,
        url: format!("{}{}", base_url.trim_end_matches('/'), post.data.permalink),
        created_at: post.data.created_utc,
        upvote_ratio: post.data.upvote_ratio,
        source_query: source_query.to_owned(),
        top_comments: Vec::new(),
    })
}

/// Truncate on a character boundary (byte slicing can split UTF-8).
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_owned()
    } else {
        s.chars().take(max_chars).collect()
    }
}
