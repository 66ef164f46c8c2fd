//! Thread relevance analysis: score and classify a batch of retrieved
//! threads against the founder's idea, then merge the model's judgment with
//! trusted metadata from the original records.

use std::collections::HashMap;

use serde::Serialize;

use premortem_core::{RawThread, SignalThread, SignalType, StartupContext};
use premortem_llm::{normalize_response, LlmError, TextGenerator};

use crate::decode::{decode_analyzed_entries, AnalyzedEntry};
use crate::prompts;

/// Body excerpt cap inside the analysis prompt.
const PROMPT_BODY_CHARS: usize = 800;
/// Comments included per thread inside the analysis prompt.
const PROMPT_COMMENT_CAP: usize = 3;

/// Compact projection of a thread for the analysis prompt.
#[derive(Debug, Serialize)]
struct ThreadDigest<'a> {
    id: &'a str,
    title: &'a str,
    body: String,
    community: &'a str,
    popularity: i64,
    comment_count: u32,
    top_comments: &'a [String],
}

impl<'a> ThreadDigest<'a> {
    fn from_thread(thread: &'a RawThread) -> Self {
        let body = if thread.body_excerpt.chars().count() > PROMPT_BODY_CHARS {
            thread.body_excerpt.chars().take(PROMPT_BODY_CHARS).collect()
        } else {
            thread.body_excerpt.clone()
        };
        Self {
            id: &thread.id,
            title: &thread.title,
            body,
            community: &thread.community,
            popularity: thread.popularity_score,
            comment_count: thread.comment_count,
            top_comments: &thread.top_comments[..thread.top_comments.len().min(PROMPT_COMMENT_CAP)],
        }
    }
}

/// Score and classify one query's threads.
///
/// Short-circuits on empty input to avoid a wasted model call. Entries the
/// model scored below the relevance floor are already dropped at decode
/// time; entries whose thread id does not match any input thread are
/// discarded rather than kept with fabricated metadata.
///
/// # Errors
///
/// Propagates [`LlmError`] — fatal to the run.
pub(crate) async fn analyze_threads<G>(
    generator: &G,
    context: &StartupContext,
    query: &str,
    intent: SignalType,
    threads: &[RawThread],
) -> Result<Vec<SignalThread>, LlmError>
where
    G: TextGenerator + ?Sized,
{
    if threads.is_empty() {
        return Ok(Vec::new());
    }

    let digests: Vec<ThreadDigest<'_>> = threads.iter().map(ThreadDigest::from_thread).collect();
    let threads_json =
        serde_json::to_string_pretty(&digests).unwrap_or_else(|_| "[]".to_owned());

    let raw = generator
        .generate(
            prompts::ANALYSIS_SYSTEM,
            &prompts::analysis_user(context, query, intent, &threads_json),
            prompts::STRUCTURED_TEMPERATURE,
        )
        .await?;
    let entries = decode_analyzed_entries(&normalize_response(&raw));

    let by_id: HashMap<&str, &RawThread> = threads.iter().map(|t| (t.id.as_str(), t)).collect();
    let mut analyzed = Vec::with_capacity(entries.len());
    for entry in entries {
        match by_id.get(entry.thread_id.as_str()) {
            Some(original) => analyzed.push(merge(entry, original, query)),
            None => {
                tracing::warn!(
                    thread_id = %entry.thread_id,
                    query,
                    "model referenced a thread id not in the input, dropping"
                );
            }
        }
    }

    tracing::info!(query, analyzed = analyzed.len(), "thread analysis complete");
    Ok(analyzed)
}

/// Merge the model's judgment with the original thread record.
///
/// Factual fields are always taken from the `RawThread`, never from the
/// model, so hallucinated metadata cannot corrupt the record.
fn merge(entry: AnalyzedEntry, original: &RawThread, source_query: &str) -> SignalThread {
    SignalThread {
        // Model-provided judgment.
        relevance_score: entry.clamped_relevance(),
        signal_type: entry.signal_type,
        insight: entry.insight,
        competing_products: entry.competing_products,
        unmet_needs: entry.unmet_needs,
        key_quotes: entry.key_quotes,
        // Source-of-truth fields from the retrieved thread.
        thread_id: original.id.clone(),
        title: original.title.clone(),
        url: original.url.clone(),
        community: original.community.clone(),
        popularity_score: original.popularity_score,
        comment_count: original.comment_count,
        source_query: source_query.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_thread(id: &str) -> RawThread {
        RawThread {
            id: id.to_owned(),
            title: format!("title for {id}"),
            url: format!("https://www.reddit.com/r/test/comments/{id}/"),
            community: "r/test".to_owned(),
            popularity_score: 55,
            comment_count: 12,
            body_excerpt: "x".repeat(1200),
            top_comments: vec![
                "c1".to_owned(),
                "c2".to_owned(),
                "c3".to_owned(),
                "c4".to_owned(),
            ],
            ..RawThread::default()
        }
    }

    #[test]
    fn digest_truncates_body_and_comments() {
        let thread = raw_thread("abc");
        let digest = ThreadDigest::from_thread(&thread);
        assert_eq!(digest.body.chars().count(), 800);
        assert_eq!(digest.top_comments.len(), 3);
    }

    #[test]
    fn merge_takes_factual_fields_from_original() {
        let entry: AnalyzedEntry = serde_json::from_value(json!({
            "thread_id": "abc",
            "relevance_score": 88,
            "signal_type": "pain_point",
            "insight": "strong complaint",
            "competing_products": ["ToolX"],
        }))
        .unwrap();
        let original = raw_thread("abc");
        let signal = merge(entry, &original, "the query");

        assert_eq!(signal.thread_id, "abc");
        assert_eq!(signal.title, "title for abc");
        assert_eq!(signal.community, "r/test");
        assert_eq!(signal.popularity_score, 55);
        assert_eq!(signal.comment_count, 12);
        assert_eq!(signal.source_query, "the query");
        assert_eq!(signal.relevance_score, 88);
        assert_eq!(signal.signal_type, SignalType::PainPoint);
        assert_eq!(signal.competing_products, vec!["ToolX"]);
    }
}
