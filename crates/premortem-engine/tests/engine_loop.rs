//! Scenario tests for the loop orchestrator, driven by scripted stub
//! collaborators — no network involved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use premortem_core::{RawThread, ResultConfidence, Scores, SearchQuery, StartupContext};
use premortem_engine::{run_signal_engine, EngineError, EngineParams};
use premortem_llm::{LlmError, TextGenerator};
use premortem_reddit::DiscussionSource;

/// One scripted generator response.
enum Script {
    Reply(String),
    AuthFailure,
}

/// Pops scripted responses in order; extra calls get an empty JSON array.
struct StubGenerator {
    script: Mutex<Vec<Script>>,
    calls: AtomicUsize,
}

impl StubGenerator {
    fn new(script: Vec<Script>) -> Self {
        let mut script = script;
        script.reverse();
        Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        }
    }

    fn reply(json: serde_json::Value) -> Script {
        Script::Reply(json.to_string())
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, _s: &str, _u: &str, _t: f32) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop() {
            Some(Script::Reply(text)) => Ok(text),
            Some(Script::AuthFailure) => Err(LlmError::Auth("bad key".to_owned())),
            None => Ok("[]".to_owned()),
        }
    }
}

/// Returns canned threads per query text; counts calls.
struct StubSource {
    threads_by_query: HashMap<String, Vec<RawThread>>,
    search_calls: AtomicUsize,
    comment_calls: AtomicUsize,
}

impl StubSource {
    fn new(threads_by_query: HashMap<String, Vec<RawThread>>) -> Self {
        Self {
            threads_by_query,
            search_calls: AtomicUsize::new(0),
            comment_calls: AtomicUsize::new(0),
        }
    }

    fn empty() -> Self {
        Self::new(HashMap::new())
    }
}

#[async_trait]
impl DiscussionSource for StubSource {
    async fn search(&self, query: &SearchQuery, _limit: usize) -> Vec<RawThread> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.threads_by_query
            .get(&query.query_text)
            .cloned()
            .unwrap_or_default()
    }

    async fn top_comments(&self, _thread_url: &str, _cap: usize) -> Vec<String> {
        self.comment_calls.fetch_add(1, Ordering::SeqCst);
        vec!["stub comment".to_owned()]
    }
}

fn context() -> StartupContext {
    StartupContext {
        idea: "AI meal planner".to_owned(),
        problem: "meal planning is tedious".to_owned(),
        solution: "automatic weekly plans".to_owned(),
        product_specs: "mobile app".to_owned(),
    }
}

fn thread(id: &str) -> RawThread {
    RawThread {
        id: id.to_owned(),
        title: format!("thread {id}"),
        url: format!("https://www.reddit.com/r/test/comments/{id}/"),
        community: "r/test".to_owned(),
        ..RawThread::default()
    }
}

fn query_json(text: &str, intent: &str) -> serde_json::Value {
    serde_json::json!({ "query": text, "intent": intent, "subreddits": [] })
}

fn analysis_json(entries: &[(&str, u8, &str)]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, relevance, signal_type)| {
            serde_json::json!({
                "thread_id": id,
                "relevance_score": relevance,
                "signal_type": signal_type,
                "insight": "because",
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

fn synthesis_json() -> serde_json::Value {
    serde_json::json!({
        "report": "## Market Signal Report",
        "scores": {
            "demand_score": 60,
            "competition_risk": 40,
            "pain_validation": 70,
            "overall_failure_probability": 35
        }
    })
}

#[tokio::test]
async fn stops_after_round_one_when_coverage_is_sufficient() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([
            query_json("pain query", "pain_point"),
            query_json("demand query", "demand"),
        ])),
        StubGenerator::reply(analysis_json(&[
            ("p1", 80, "pain_point"),
            ("p2", 75, "pain_point"),
            ("p3", 70, "competition"),
            ("p4", 65, "competition"),
        ])),
        StubGenerator::reply(analysis_json(&[
            ("d1", 80, "demand"),
            ("d2", 75, "demand"),
            ("d3", 70, "skepticism"),
            ("d4", 65, "skepticism"),
        ])),
        StubGenerator::reply(synthesis_json()),
    ]);

    let mut threads_by_query = HashMap::new();
    threads_by_query.insert(
        "pain query".to_owned(),
        vec![thread("p1"), thread("p2"), thread("p3"), thread("p4")],
    );
    threads_by_query.insert(
        "demand query".to_owned(),
        vec![thread("d1"), thread("d2"), thread("d3"), thread("d4")],
    );
    let source = StubSource::new(threads_by_query);

    let result = run_signal_engine(&generator, &source, &context(), EngineParams::default(), None)
        .await
        .expect("run should succeed");

    assert_eq!(result.iterations, 1);
    assert!(!result.coverage.has_gaps);
    assert_eq!(result.threads.len(), 8);
    assert_eq!(result.queries_used, vec!["pain query", "demand query"]);
    assert_eq!(result.report, "## Market Signal Report");
    assert_eq!(result.scores.demand_score, 60);
    assert_eq!(result.confidence, ResultConfidence::Conclusive);
    // generate + 2 analyses + synthesis, no refinement call
    assert_eq!(generator.call_count(), 4);
}

#[tokio::test]
async fn exhausts_iteration_budget_when_gaps_persist() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([query_json("round one", "pain_point")])),
        StubGenerator::reply(analysis_json(&[("r1", 80, "pain_point")])),
        StubGenerator::reply(serde_json::json!([query_json("round two", "demand")])),
        StubGenerator::reply(analysis_json(&[("r2", 80, "demand")])),
        StubGenerator::reply(serde_json::json!([query_json("round three", "competition")])),
        StubGenerator::reply(analysis_json(&[("r3", 80, "competition")])),
        StubGenerator::reply(synthesis_json()),
    ]);

    let mut threads_by_query = HashMap::new();
    threads_by_query.insert("round one".to_owned(), vec![thread("r1")]);
    threads_by_query.insert("round two".to_owned(), vec![thread("r2")]);
    threads_by_query.insert("round three".to_owned(), vec![thread("r3")]);
    let source = StubSource::new(threads_by_query);

    let result = run_signal_engine(&generator, &source, &context(), EngineParams::default(), None)
        .await
        .expect("run should succeed");

    assert_eq!(result.iterations, 3);
    assert!(result.coverage.has_gaps);
    assert_eq!(result.threads.len(), 3);
    assert_eq!(
        result.queries_used,
        vec!["round one", "round two", "round three"]
    );
    assert_eq!(generator.call_count(), 7);
}

#[tokio::test]
async fn fatal_auth_failure_propagates_with_no_result() {
    let generator = StubGenerator::new(vec![Script::AuthFailure]);
    let source = StubSource::empty();

    let err = run_signal_engine(&generator, &source, &context(), EngineParams::default(), None)
        .await
        .expect_err("auth failure must propagate");

    assert!(matches!(err, EngineError::Llm(LlmError::Auth(_))));
    assert_eq!(source.search_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_generator_output_exits_gracefully() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([])),
        StubGenerator::reply(synthesis_json()),
    ]);
    let source = StubSource::empty();

    let result = run_signal_engine(&generator, &source, &context(), EngineParams::default(), None)
        .await
        .expect("run should still produce a result");

    assert_eq!(result.iterations, 1);
    assert!(result.threads.is_empty());
    assert!(result.queries_used.is_empty());
    assert_eq!(source.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(result.confidence, ResultConfidence::InsufficientEvidence);
    // Zero-signal runs are flagged, not scored from thin air.
    assert_eq!(result.scores, Scores::default());
    // Synthesis still runs on the empty set.
    assert_eq!(result.report, "## Market Signal Report");
}

#[tokio::test]
async fn duplicate_threads_across_queries_keep_first_occurrence() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([
            query_json("query a", "pain_point"),
            query_json("query b", "demand"),
        ])),
        StubGenerator::reply(analysis_json(&[("dup", 80, "pain_point")])),
        StubGenerator::reply(analysis_json(&[("dup", 60, "demand")])),
        StubGenerator::reply(synthesis_json()),
    ]);

    let mut threads_by_query = HashMap::new();
    threads_by_query.insert("query a".to_owned(), vec![thread("dup")]);
    threads_by_query.insert("query b".to_owned(), vec![thread("dup")]);
    let source = StubSource::new(threads_by_query);

    let params = EngineParams {
        max_iterations: 1,
        ..EngineParams::default()
    };
    let result = run_signal_engine(&generator, &source, &context(), params, None)
        .await
        .expect("run should succeed");

    // First occurrence wins; the later demand classification is discarded.
    assert_eq!(result.threads.len(), 1);
    assert_eq!(result.threads[0].relevance_score, 80);
    assert_eq!(result.coverage.counts["pain_point"], 1);
    assert_eq!(result.coverage.counts["demand"], 0);
    // Both queries ran and are logged.
    assert_eq!(result.queries_used, vec!["query a", "query b"]);
}

#[tokio::test]
async fn final_threads_are_sorted_by_relevance() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([query_json("one query", "demand")])),
        StubGenerator::reply(analysis_json(&[
            ("low", 30, "demand"),
            ("high", 95, "pain_point"),
            ("mid", 60, "competition"),
        ])),
        StubGenerator::reply(synthesis_json()),
    ]);

    let mut threads_by_query = HashMap::new();
    threads_by_query.insert(
        "one query".to_owned(),
        vec![thread("low"), thread("high"), thread("mid")],
    );
    let source = StubSource::new(threads_by_query);

    let params = EngineParams {
        max_iterations: 1,
        ..EngineParams::default()
    };
    let result = run_signal_engine(&generator, &source, &context(), params, None)
        .await
        .expect("run should succeed");

    let ids: Vec<&str> = result.threads.iter().map(|t| t.thread_id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid", "low"]);
}

#[tokio::test]
async fn popular_threads_get_comment_enrichment() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([query_json("busy query", "demand")])),
        StubGenerator::reply(analysis_json(&[("busy", 80, "demand")])),
        StubGenerator::reply(synthesis_json()),
    ]);

    let mut busy = thread("busy");
    busy.comment_count = 9;
    busy.popularity_score = 50;
    let mut quiet = thread("quiet");
    quiet.comment_count = 1;
    quiet.popularity_score = 2;

    let mut threads_by_query = HashMap::new();
    threads_by_query.insert("busy query".to_owned(), vec![busy, quiet]);
    let source = StubSource::new(threads_by_query);

    let params = EngineParams {
        max_iterations: 1,
        ..EngineParams::default()
    };
    run_signal_engine(&generator, &source, &context(), params, None)
        .await
        .expect("run should succeed");

    // Only the thread clearing the popularity bar is enriched.
    assert_eq!(source.comment_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn progress_events_are_emitted_in_stage_order() {
    let generator = StubGenerator::new(vec![
        StubGenerator::reply(serde_json::json!([])),
        StubGenerator::reply(synthesis_json()),
    ]);
    let source = StubSource::empty();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    run_signal_engine(
        &generator,
        &source,
        &context(),
        EngineParams::default(),
        Some(tx),
    )
    .await
    .expect("run should succeed");

    let mut stages = Vec::new();
    while let Ok(update) = rx.try_recv() {
        stages.push(update.stage);
    }
    assert_eq!(
        stages,
        vec![
            "iteration",
            "generating_queries",
            "warning",
            "synthesizing",
            "complete"
        ]
    );
}
