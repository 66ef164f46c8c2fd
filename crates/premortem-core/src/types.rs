//! Domain types shared across the engine crates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What the founder provides. Read-only for the engine's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupContext {
    /// One-line startup idea.
    pub idea: String,
    /// The problem being solved. May be empty depending on intake mode.
    pub problem: String,
    /// How the product solves it. May be empty depending on intake mode.
    pub solution: String,
    /// Technical details, features, target platform, etc.
    pub product_specs: String,
}

/// Category of market signal a thread carries.
///
/// Unrecognized strings deserialize to `Irrelevant` so a sloppy model cannot
/// break decoding; `Irrelevant` threads stay in the result set but are
/// excluded from coverage counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    PainPoint,
    Demand,
    Competition,
    Skepticism,
    #[serde(other)]
    Irrelevant,
}

impl SignalType {
    /// The four categories that participate in coverage/gap analysis.
    pub const MEANINGFUL: [SignalType; 4] = [
        SignalType::PainPoint,
        SignalType::Demand,
        SignalType::Competition,
        SignalType::Skepticism,
    ];

    /// Snake-case label, matching the wire/prompt vocabulary.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SignalType::PainPoint => "pain_point",
            SignalType::Demand => "demand",
            SignalType::Competition => "competition",
            SignalType::Skepticism => "skepticism",
            SignalType::Irrelevant => "irrelevant",
        }
    }
}

impl Default for SignalType {
    fn default() -> Self {
        SignalType::Irrelevant
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A search query produced by the generator or refiner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The search string sent to the discussion source.
    pub query_text: String,
    /// What kind of signal this query hunts for.
    pub intent: SignalType,
    /// Suggested communities ("r/startups", ...). Capped at 3 at use time;
    /// an unscoped search is always added alongside.
    pub community_hints: Vec<String>,
}

/// A raw discussion thread as returned by the search collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawThread {
    /// Source-unique thread id. Dedup key across the whole run.
    pub id: String,
    pub title: String,
    /// Post body, truncated at retrieval time.
    pub body_excerpt: String,
    /// Community identifier, e.g. "r/selfhosted".
    pub community: String,
    /// Net upvote score of the post.
    pub popularity_score: i64,
    pub comment_count: u32,
    pub url: String,
    /// Creation time as a unix epoch (seconds), as reported by the source.
    pub created_at: f64,
    pub upvote_ratio: f64,
    /// The query string that retrieved this thread.
    pub source_query: String,
    /// Up to 5 top comments, attached only for threads that clear the
    /// enrichment popularity bar.
    #[serde(default)]
    pub top_comments: Vec<String>,
}

/// An analyzed thread: the model's judgment merged with source-of-truth
/// metadata from the original [`RawThread`].
///
/// `relevance_score`, `signal_type`, `insight`, `competing_products`,
/// `unmet_needs`, and `key_quotes` come from the model. Everything else is
/// always copied from the original thread so hallucinated metadata cannot
/// corrupt the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalThread {
    pub thread_id: String,
    pub title: String,
    pub url: String,
    pub community: String,
    pub popularity_score: i64,
    pub comment_count: u32,
    /// 0–100, clamped at decode time.
    pub relevance_score: u8,
    #[serde(default)]
    pub signal_type: SignalType,
    /// Short rationale for why this thread matters to the founder.
    pub insight: String,
    pub competing_products: Vec<String>,
    pub unmet_needs: Vec<String>,
    /// At most 2 short quotes.
    pub key_quotes: Vec<String>,
    pub source_query: String,
}

/// Signal distribution over the accumulated threads, plus detected gaps.
///
/// Always recomputed from the current thread collection; never stored
/// incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    /// Count per meaningful category (`irrelevant` excluded). `BTreeMap`
    /// keeps output ordering deterministic.
    pub counts: BTreeMap<String, usize>,
    /// Distinct competing-product names seen so far, sorted.
    pub competitors: Vec<String>,
    /// One human-readable shortfall line per deficient category.
    pub gaps: Vec<String>,
    pub has_gaps: bool,
}

/// Risk scores produced by synthesis. Each 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub demand_score: u8,
    #[serde(default)]
    pub pain_validation: u8,
    #[serde(default)]
    pub competition_risk: u8,
    #[serde(default)]
    pub overall_failure_probability: u8,
}

/// How much evidence backs the final result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultConfidence {
    /// At least one signal thread survived analysis and deduplication.
    Conclusive,
    /// The run produced zero usable signals; scores are zeroed rather than
    /// defaulted to a mid-point.
    InsufficientEvidence,
}

/// Terminal output of the signal engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResult {
    /// Markdown market-signal report.
    pub report: String,
    pub scores: Scores,
    /// Deduplicated signal threads, sorted by relevance descending.
    pub threads: Vec<SignalThread>,
    /// Iterations actually performed.
    pub iterations: u32,
    /// Every query executed, in emission order. Duplicates across rounds are
    /// expected and informative.
    pub queries_used: Vec<String>,
    /// Coverage recomputed over the deduplicated population.
    pub coverage: Coverage,
    pub elapsed_seconds: f64,
    pub confidence: ResultConfidence,
}
