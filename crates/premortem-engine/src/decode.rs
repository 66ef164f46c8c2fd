//! Decode-with-defaults for generative JSON.
//!
//! The model is asked for specific shapes but routinely omits fields, mixes
//! types, or returns the wrong envelope. Every message type the engine
//! consumes is decoded exactly once here, with the full set of optional
//! fields and their defaults, so downstream code only ever sees fully
//! populated structures.

use serde::Deserialize;
use serde_json::Value;

use premortem_core::{Scores, SearchQuery, SignalType};

/// Analyzer output below this relevance is discarded.
pub(crate) const RELEVANCE_FLOOR: u8 = 20;
/// At most this many quotes are kept per thread.
const MAX_KEY_QUOTES: usize = 2;

fn default_intent() -> SignalType {
    SignalType::Demand
}

#[derive(Debug, Deserialize)]
struct QueryPlan {
    #[serde(default, alias = "query")]
    query_text: String,
    #[serde(default = "default_intent")]
    intent: SignalType,
    #[serde(default, alias = "subreddits")]
    community_hints: Vec<String>,
}

/// Decode a normalized generation result into search queries.
///
/// Non-array input (the generator mis-shaped its answer) decodes to an empty
/// list, which the orchestrator treats as a stop condition. Elements that
/// fail to decode or carry an empty query string are skipped.
pub(crate) fn decode_query_plans(value: &Value) -> Vec<SearchQuery> {
    let Some(items) = value.as_array() else {
        tracing::error!(got = %value_kind(value), "expected a JSON array of queries");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match QueryPlan::deserialize(item) {
            Ok(plan) if !plan.query_text.trim().is_empty() => Some(SearchQuery {
                query_text: plan.query_text,
                intent: plan.intent,
                community_hints: plan.community_hints,
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable query plan");
                None
            }
        })
        .collect()
}

/// The model's judgment on one thread, before merging with trusted metadata.
#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzedEntry {
    #[serde(default)]
    pub(crate) thread_id: String,
    #[serde(default)]
    relevance_score: f64,
    #[serde(default)]
    pub(crate) signal_type: SignalType,
    #[serde(default)]
    pub(crate) insight: String,
    #[serde(default)]
    pub(crate) competing_products: Vec<String>,
    #[serde(default)]
    pub(crate) unmet_needs: Vec<String>,
    #[serde(default)]
    pub(crate) key_quotes: Vec<String>,
}

impl AnalyzedEntry {
    /// Relevance clamped into [0, 100]; out-of-range model values never
    /// propagate into scores.
    pub(crate) fn clamped_relevance(&self) -> u8 {
        clamp_score(self.relevance_score)
    }
}

/// Decode a normalized analysis result.
///
/// Non-array input decodes to an empty list. Entries without a thread id or
/// below [`RELEVANCE_FLOOR`] are dropped; `key_quotes` are truncated to
/// [`MAX_KEY_QUOTES`].
pub(crate) fn decode_analyzed_entries(value: &Value) -> Vec<AnalyzedEntry> {
    let Some(items) = value.as_array() else {
        tracing::error!(got = %value_kind(value), "expected a JSON array of analyzed threads");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match AnalyzedEntry::deserialize(item) {
            Ok(mut entry) => {
                if entry.thread_id.is_empty() {
                    tracing::warn!("dropping analyzed entry without thread_id");
                    return None;
                }
                if entry.clamped_relevance() < RELEVANCE_FLOOR {
                    return None;
                }
                entry.key_quotes.truncate(MAX_KEY_QUOTES);
                Some(entry)
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable analyzed entry");
                None
            }
        })
        .collect()
}

/// The final report plus scores, as decoded from the synthesis stage.
#[derive(Debug, Default)]
pub(crate) struct SynthesisOutput {
    pub(crate) report: String,
    pub(crate) scores: Scores,
}

#[derive(Debug, Default, Deserialize)]
struct RawSynthesis {
    #[serde(default)]
    report: String,
    #[serde(default)]
    scores: RawScores,
}

#[derive(Debug, Default, Deserialize)]
struct RawScores {
    #[serde(default)]
    demand_score: f64,
    #[serde(default)]
    pain_validation: f64,
    #[serde(default)]
    competition_risk: f64,
    #[serde(default)]
    overall_failure_probability: f64,
}

/// Decode a normalized synthesis result.
///
/// An object decodes as report + clamped scores. Anything else (a bare
/// string, an array the normalizer unwrapped) becomes the report body with
/// zeroed scores — this path never fails.
pub(crate) fn decode_synthesis(value: &Value) -> SynthesisOutput {
    if value.is_object() {
        match RawSynthesis::deserialize(value) {
            Ok(raw) => {
                return SynthesisOutput {
                    report: raw.report,
                    scores: Scores {
                        demand_score: clamp_score(raw.scores.demand_score),
                        pain_validation: clamp_score(raw.scores.pain_validation),
                        competition_risk: clamp_score(raw.scores.competition_risk),
                        overall_failure_probability: clamp_score(
                            raw.scores.overall_failure_probability,
                        ),
                    },
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "synthesis object failed to decode, degrading");
            }
        }
    }

    let report = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    SynthesisOutput {
        report,
        scores: Scores::default(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(v: f64) -> u8 {
    v.clamp(0.0, 100.0).round() as u8
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_plans_default_missing_fields() {
        let value = json!([
            { "query": "why is meal planning hard" },
            { "query_text": "meal planner alternatives", "intent": "competition",
              "subreddits": ["r/mealprep"] },
        ]);
        let queries = decode_query_plans(&value);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].query_text, "why is meal planning hard");
        assert_eq!(queries[0].intent, SignalType::Demand);
        assert!(queries[0].community_hints.is_empty());
        assert_eq!(queries[1].intent, SignalType::Competition);
        assert_eq!(queries[1].community_hints, vec!["r/mealprep"]);
    }

    #[test]
    fn query_plans_skip_empty_strings_and_non_objects() {
        let value = json!([{ "query": "  " }, "just a string", { "query": "real" }]);
        let queries = decode_query_plans(&value);
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query_text, "real");
    }

    #[test]
    fn query_plans_reject_non_array() {
        assert!(decode_query_plans(&json!({"oops": true})).is_empty());
    }

    #[test]
    fn analyzed_entries_enforce_relevance_floor() {
        let value = json!([
            { "thread_id": "low", "relevance_score": 19, "signal_type": "demand" },
            { "thread_id": "edge", "relevance_score": 20, "signal_type": "demand" },
            { "thread_id": "high", "relevance_score": 95, "signal_type": "pain_point" },
        ]);
        let entries = decode_analyzed_entries(&value);
        let ids: Vec<&str> = entries.iter().map(|e| e.thread_id.as_str()).collect();
        assert_eq!(ids, vec!["edge", "high"]);
    }

    #[test]
    fn analyzed_entries_clamp_out_of_range_relevance() {
        let value = json!([
            { "thread_id": "hot", "relevance_score": 450, "signal_type": "demand" },
        ]);
        let entries = decode_analyzed_entries(&value);
        assert_eq!(entries[0].clamped_relevance(), 100);
    }

    #[test]
    fn analyzed_entries_drop_missing_thread_id() {
        let value = json!([{ "relevance_score": 80, "signal_type": "demand" }]);
        assert!(decode_analyzed_entries(&value).is_empty());
    }

    #[test]
    fn analyzed_entries_truncate_quotes() {
        let value = json!([
            { "thread_id": "q", "relevance_score": 50,
              "key_quotes": ["one", "two", "three"] },
        ]);
        let entries = decode_analyzed_entries(&value);
        assert_eq!(entries[0].key_quotes, vec!["one", "two"]);
    }

    #[test]
    fn unknown_signal_type_counts_as_irrelevant() {
        let value = json!([
            { "thread_id": "odd", "relevance_score": 60, "signal_type": "vibes" },
        ]);
        let entries = decode_analyzed_entries(&value);
        assert_eq!(entries[0].signal_type, SignalType::Irrelevant);
    }

    #[test]
    fn synthesis_object_decodes_with_clamped_scores() {
        let value = json!({
            "report": "## Report",
            "scores": {
                "demand_score": 70,
                "pain_validation": 130,
                "competition_risk": -5,
                "overall_failure_probability": 55.6
            }
        });
        let out = decode_synthesis(&value);
        assert_eq!(out.report, "## Report");
        assert_eq!(out.scores.demand_score, 70);
        assert_eq!(out.scores.pain_validation, 100);
        assert_eq!(out.scores.competition_risk, 0);
        assert_eq!(out.scores.overall_failure_probability, 56);
    }

    #[test]
    fn synthesis_degrades_non_object_to_report_body() {
        let out = decode_synthesis(&json!("just prose"));
        assert_eq!(out.report, "just prose");
        assert_eq!(out.scores, Scores::default());

        let out = decode_synthesis(&json!([1, 2]));
        assert_eq!(out.report, "[1,2]");
        assert_eq!(out.scores, Scores::default());
    }
}
