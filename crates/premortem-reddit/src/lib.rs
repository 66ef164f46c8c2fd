//! Reddit search collaborator for the pre-mortem signal engine.
//!
//! Talks to Reddit's public JSON API (no auth required), with an owned
//! bounded-concurrency semaphore to stay under the unauthenticated rate
//! ceiling, a retry-once policy for 429 responses, and per-request timeouts.
//! "No results" is never an error; degraded sub-requests contribute zero
//! threads and the round continues.

pub mod client;
pub mod error;
pub mod retry;
pub mod source;

mod wire;

pub use client::RedditClient;
pub use error::RedditError;
pub use retry::RetryPolicy;
pub use source::DiscussionSource;
