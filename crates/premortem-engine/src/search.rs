//! Round execution: run a batch of queries against the discussion source and
//! selectively enrich promising threads with top comments.

use std::collections::HashMap;

use futures::future;

use premortem_core::{RawThread, SearchQuery};
use premortem_reddit::DiscussionSource;

/// Per-query result cap.
const RESULTS_PER_QUERY: usize = 10;
/// Threads below this engagement bar are not worth a comment fetch.
const ENRICH_MIN_COMMENTS: u32 = 5;
const ENRICH_MIN_POPULARITY: i64 = 10;
/// Comments fetched per qualifying thread.
const COMMENTS_PER_THREAD: usize = 5;

/// Execute all queries for one round.
///
/// Queries run in order; threads that clear the popularity bar get up to
/// [`COMMENTS_PER_THREAD`] top comments attached, fetched concurrently under
/// the source's own concurrency gate. Returns results keyed by query text.
pub(crate) async fn execute_round<S>(
    source: &S,
    queries: &[SearchQuery],
) -> HashMap<String, Vec<RawThread>>
where
    S: DiscussionSource + ?Sized,
{
    let mut results = HashMap::new();

    for query in queries {
        let mut threads = source.search(query, RESULTS_PER_QUERY).await;

        let comment_batches = future::join_all(threads.iter().map(|thread| async {
            if qualifies_for_enrichment(thread) {
                source
                    .top_comments(&thread.url, COMMENTS_PER_THREAD)
                    .await
            } else {
                Vec::new()
            }
        }))
        .await;
        for (thread, comments) in threads.iter_mut().zip(comment_batches) {
            thread.top_comments = comments;
        }

        tracing::info!(
            query = %query.query_text,
            intent = %query.intent,
            threads = threads.len(),
            "round query complete"
        );
        results.insert(query.query_text.clone(), threads);
    }

    results
}

fn qualifies_for_enrichment(thread: &RawThread) -> bool {
    thread.comment_count >= ENRICH_MIN_COMMENTS && thread.popularity_score >= ENRICH_MIN_POPULARITY
}
