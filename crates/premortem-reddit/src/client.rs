//! HTTP client for Reddit's public JSON search API.
//!
//! No authentication is required; instead the client owns a counting
//! semaphore that caps simultaneous requests against reddit.com, keeping the
//! process under the unauthenticated rate ceiling no matter how many queries
//! the engine fans out. Construct one client per process and share it.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio::sync::Semaphore;

use premortem_core::{AppConfig, RawThread};

use crate::error::RedditError;
use crate::retry::RetryPolicy;
use crate::wire::{to_raw_thread, truncate_chars, Listing};

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
/// Subreddit hints used per query; an unscoped search is always added.
const MAX_COMMUNITY_HINTS: usize = 3;
/// Reddit ignores larger values on the public endpoint.
const PAGE_LIMIT_CAP: usize = 25;
const SEARCH_SORT: &str = "relevance";
const SEARCH_TIME_FILTER: &str = "all";
const COMMENT_EXCERPT_CHARS: usize = 500;
const DEFAULT_RETRY_AFTER_SECS: u64 = 3;

/// Client for Reddit's public JSON API.
///
/// Holds the HTTP client, base URL, and the owned concurrency gate. Use
/// [`RedditClient::new`] for production or [`RedditClient::with_base_url`]
/// to point at a mock server in tests.
pub struct RedditClient {
    client: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
    retry: RetryPolicy,
}

impl RedditClient {
    /// Creates a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, RedditError> {
        let base_url = config
            .reddit_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self::with_base_url(
            &base_url,
            &config.reddit_user_agent,
            config.request_timeout_secs,
            config.max_concurrent_requests,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`RedditError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        user_agent: &str,
        timeout_secs: u64,
        max_concurrent: usize,
    ) -> Result<Self, RedditError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            retry: RetryPolicy::default(),
        })
    }

    /// Search Reddit for threads matching `query_text`.
    ///
    /// Fans out over up to [`MAX_COMMUNITY_HINTS`] subreddit-scoped searches
    /// plus one unscoped search, all concurrent under the semaphore, then
    /// deduplicates by thread id (first occurrence wins). Sub-request
    /// failures are logged and contribute zero threads; this method itself
    /// never fails.
    pub async fn search(
        &self,
        query_text: &str,
        community_hints: &[String],
        limit: usize,
    ) -> Vec<RawThread> {
        let mut targets: Vec<(String, bool)> = community_hints
            .iter()
            .filter(|hint| !hint.trim().is_empty())
            .take(MAX_COMMUNITY_HINTS)
            .map(|hint| {
                let sub = hint.trim().trim_start_matches("r/");
                (format!("{}/r/{sub}/search.json", self.base_url), true)
            })
            .collect();
        targets.push((format!("{}/search.json", self.base_url), false));

        let fetches = targets.iter().map(|(url, restrict)| {
            self.search_target(url, query_text, *restrict, limit.min(PAGE_LIMIT_CAP))
        });
        let batches = future::join_all(fetches).await;

        let mut seen = std::collections::HashSet::new();
        let mut threads = Vec::new();
        for (batch, (url, _)) in batches.into_iter().zip(&targets) {
            match batch {
                Ok(page) => {
                    for thread in page {
                        if seen.insert(thread.id.clone()) {
                            threads.push(thread);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(url = %url, query = query_text, error = %e, "Reddit sub-request failed");
                }
            }
        }

        tracing::debug!(
            query = query_text,
            targets = targets.len(),
            threads = threads.len(),
            "Reddit search complete"
        );
        threads
    }

    /// Single search request, semaphore-gated and retry-wrapped.
    async fn search_target(
        &self,
        url: &str,
        query_text: &str,
        restrict_sr: bool,
        limit: usize,
    ) -> Result<Vec<RawThread>, RedditError> {
        let _permit = self.semaphore.acquire().await;
        let limit_param = limit.to_string();

        let listing = self
            .retry
            .run(|| async {
                let response = self
                    .client
                    .get(url)
                    .query(&[
                        ("q", query_text),
                        ("restrict_sr", if restrict_sr { "on" } else { "off" }),
                        ("sort", SEARCH_SORT),
                        ("t", SEARCH_TIME_FILTER),
                        ("type", "link"),
                        ("limit", limit_param.as_str()),
                    ])
                    .send()
                    .await?;
                Self::check_status(response, url)?
                    .json::<Listing>()
                    .await
                    .map_err(|e| RedditError::Deserialize {
                        url: url.to_owned(),
                        reason: e.to_string(),
                    })
            })
            .await?;

        Ok(listing
            .data
            .children
            .iter()
            .filter_map(|post| to_raw_thread(post, &self.base_url, query_text))
            .collect())
    }

    /// Fetch up to `cap` top comments for a thread.
    ///
    /// Failures of any kind yield an empty list — comment enrichment is
    /// best-effort and must never sink a round.
    pub async fn top_comments(&self, thread_url: &str, cap: usize) -> Vec<String> {
        let json_url = format!("{}.json", thread_url.trim_end_matches('/'));
        let _permit = self.semaphore.acquire().await;
        let cap_param = cap.to_string();

        let result = self
            .retry
            .run(|| async {
                let response = self
                    .client
                    .get(&json_url)
                    .query(&[("limit", cap_param.as_str()), ("sort", "top")])
                    .send()
                    .await?;
                Self::check_status(response, &json_url)?
                    .json::<serde_json::Value>()
                    .await
                    .map_err(|e| RedditError::Deserialize {
                        url: json_url.clone(),
                        reason: e.to_string(),
                    })
            })
            .await;

        match result {
            Ok(value) => extract_comment_bodies(&value, cap),
            Err(e) => {
                tracing::warn!(url = %json_url, error = %e, "comment fetch failed");
                Vec::new()
            }
        }
    }

    /// Map a 429 to [`RedditError::RateLimited`] (honoring `Retry-After`)
    /// and any other non-2xx to [`RedditError::UnexpectedStatus`].
    fn check_status(
        response: reqwest::Response,
        url: &str,
    ) -> Result<reqwest::Response, RedditError> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(RedditError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(RedditError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response)
    }
}

/// Pull comment bodies out of a thread's `.json` payload.
///
/// The payload is `[post listing, comment listing]`; comment children of
/// kind `more` have no body and are skipped, as are deleted/removed
/// placeholders. Bodies are truncated to [`COMMENT_EXCERPT_CHARS`].
fn extract_comment_bodies(value: &serde_json::Value, cap: usize) -> Vec<String> {
    let Some(children) = value
        .get(1)
        .and_then(|listing| listing.get("data"))
        .and_then(|data| data.get("children"))
        .and_then(serde_json::Value::as_array)
    else {
        return Vec::new();
    };

    let mut comments = Vec::new();
    for child in children {
        let Some(body) = child
            .get("data")
            .and_then(|data| data.get("body"))
            .and_then(serde_json::Value::as_str)
        else {
            continue;
        };
        if body.is_empty() || body == "[deleted]" || body == "[removed]" {
            continue;
        }
        comments.push(truncate_chars(body, COMMENT_EXCERPT_CHARS));
        if comments.len() >= cap {
            break;
        }
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_comments_filters_deleted_and_caps() {
        let payload = json!([
            {"data": {"children": []}},
            {"data": {"children": [
                {"data": {"body": "first comment"}},
                {"data": {"body": "[deleted]"}},
                {"data": {"body": "[removed]"}},
                {"kind": "more", "data": {"count": 12}},
                {"data": {"body": "second comment"}},
                {"data": {"body": "third comment"}},
            ]}}
        ]);
        let comments = extract_comment_bodies(&payload, 2);
        assert_eq!(comments, vec!["first comment", "second comment"]);
    }

    #[test]
    fn extract_comments_handles_short_payload() {
        let payload = json!([{"data": {"children": []}}]);
        assert!(extract_comment_bodies(&payload, 5).is_empty());
    }
}
