//! Seam between the engine and the discussion-board backend.

use async_trait::async_trait;

use premortem_core::{RawThread, SearchQuery};

use crate::client::RedditClient;

/// A searchable discussion source.
///
/// The engine only needs two operations: search for threads and fetch top
/// comments. Implemented by [`RedditClient`] in production and by scripted
/// stubs in the engine's scenario tests. Both operations are degradation
/// paths, not error paths — a failing backend yields empty results.
#[async_trait]
pub trait DiscussionSource: Send + Sync {
    /// Search for threads matching `query`, up to `limit` per source target.
    async fn search(&self, query: &SearchQuery, limit: usize) -> Vec<RawThread>;

    /// Fetch up to `cap` top comments for the thread at `thread_url`.
    async fn top_comments(&self, thread_url: &str, cap: usize) -> Vec<String>;
}

#[async_trait]
impl DiscussionSource for RedditClient {
    async fn search(&self, query: &SearchQuery, limit: usize) -> Vec<RawThread> {
        RedditClient::search(self, &query.query_text, &query.community_hints, limit).await
    }

    async fn top_comments(&self, thread_url: &str, cap: usize) -> Vec<String> {
        RedditClient::top_comments(self, thread_url, cap).await
    }
}
