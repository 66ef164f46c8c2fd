//! The loop orchestrator: generate → search → analyze → evaluate →
//! (refine → search → analyze)* → dedupe → synthesize.

use std::collections::HashSet;
use std::time::Instant;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use premortem_core::{
    AppConfig, EngineResult, ResultConfidence, Scores, SignalThread, StartupContext,
};
use premortem_llm::{LlmError, TextGenerator};
use premortem_reddit::DiscussionSource;

use crate::coverage::evaluate_coverage;
use crate::progress::StatusUpdate;
use crate::{analyze, queries, search, synthesis};

#[derive(Debug, Error)]
pub enum EngineError {
    /// Transport/auth/quota failure of the text-generation collaborator.
    /// Fatal: no partial result is produced.
    #[error("text generation failed: {0}")]
    Llm(#[from] LlmError),
}

/// Loop tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    /// Max feedback-loop cycles.
    pub max_iterations: u32,
    /// Queries generated in round 1.
    pub initial_queries: usize,
    /// Queries generated per refinement round.
    pub refinement_queries: usize,
    /// Minimum threads needed per signal type before the loop stops early.
    pub min_signals_per_type: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            initial_queries: 6,
            refinement_queries: 4,
            min_signals_per_type: 2,
        }
    }
}

impl From<&AppConfig> for EngineParams {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
            initial_queries: config.initial_queries,
            refinement_queries: config.refinement_queries,
            min_signals_per_type: config.min_signals_per_type,
        }
    }
}

/// Run the full agentic loop and produce an [`EngineResult`].
///
/// Iterations execute strictly sequentially; within a round the search
/// collaborator fans out concurrently under its own gate. The loop stops
/// early when coverage is sufficient or a generation step yields no queries;
/// both are success paths that still synthesize from whatever accumulated.
///
/// Progress events are sent through `progress` (if any) and logged; the
/// observer can neither block nor fail the run.
///
/// # Errors
///
/// Returns [`EngineError::Llm`] if any text-generation call fails at the
/// transport/auth/quota level. Search degradation never aborts the run.
pub async fn run_signal_engine<G, S>(
    generator: &G,
    source: &S,
    context: &StartupContext,
    params: EngineParams,
    progress: Option<UnboundedSender<StatusUpdate>>,
) -> Result<EngineResult, EngineError>
where
    G: TextGenerator + ?Sized,
    S: DiscussionSource + ?Sized,
{
    let start = Instant::now();
    let mut all_signals: Vec<SignalThread> = Vec::new();
    let mut queries_used: Vec<String> = Vec::new();
    let mut iteration: u32 = 0;

    let emit = |stage: &str, detail: String| {
        tracing::info!(stage, detail = %detail, "engine status");
        if let Some(tx) = &progress {
            let _ = tx.send(StatusUpdate {
                stage: stage.to_owned(),
                detail,
            });
        }
    };

    while iteration < params.max_iterations {
        iteration += 1;
        emit(
            "iteration",
            format!("Starting iteration {iteration}/{}", params.max_iterations),
        );

        // Step 1: generate (round 1) or refine against current coverage.
        let round_queries = if iteration == 1 {
            emit(
                "generating_queries",
                "Generating initial search queries...".to_owned(),
            );
            queries::generate_queries(generator, context, params.initial_queries).await?
        } else {
            let coverage = evaluate_coverage(&all_signals, params.min_signals_per_type);
            if !coverage.has_gaps {
                emit(
                    "coverage_complete",
                    "All signal types have sufficient coverage".to_owned(),
                );
                break;
            }
            emit(
                "refining_queries",
                format!("Refining queries (iteration {iteration})..."),
            );
            queries::refine_queries(
                generator,
                context,
                &coverage,
                all_signals.len(),
                params.refinement_queries,
            )
            .await?
        };

        if round_queries.is_empty() {
            emit("warning", "No queries generated, stopping loop".to_owned());
            break;
        }

        // Step 2: search the discussion source.
        emit(
            "searching",
            format!("Searching with {} queries...", round_queries.len()),
        );
        let round_results = search::execute_round(source, &round_queries).await;

        // Step 3: analyze each query's batch, in generation order.
        for query in &round_queries {
            let Some(threads) = round_results.get(&query.query_text) else {
                continue;
            };
            if threads.is_empty() {
                continue;
            }
            queries_used.push(query.query_text.clone());
            emit(
                "analyzing",
                format!(
                    "Analyzing {} threads for: '{}'",
                    threads.len(),
                    query.query_text
                ),
            );
            let analyzed =
                analyze::analyze_threads(generator, context, &query.query_text, query.intent, threads)
                    .await?;
            all_signals.extend(analyzed);
        }

        // Step 4: evaluate coverage; stop early if every category is filled.
        let coverage = evaluate_coverage(&all_signals, params.min_signals_per_type);
        emit(
            "evaluation",
            format!(
                "Signals: pain={}, comp={}, demand={}, skepticism={} | Gaps: {}",
                coverage.counts.get("pain_point").copied().unwrap_or(0),
                coverage.counts.get("competition").copied().unwrap_or(0),
                coverage.counts.get("demand").copied().unwrap_or(0),
                coverage.counts.get("skepticism").copied().unwrap_or(0),
                coverage.gaps.len(),
            ),
        );
        if !coverage.has_gaps {
            break;
        }
    }

    // Deduplicate by thread id; first occurrence wins, accumulation order kept.
    let mut seen_ids: HashSet<String> = HashSet::new();
    all_signals.retain(|s| !s.thread_id.is_empty() && seen_ids.insert(s.thread_id.clone()));

    emit(
        "synthesizing",
        format!("Synthesizing report from {} signals...", all_signals.len()),
    );
    let report_data = synthesis::synthesize_report(generator, context, &all_signals).await?;

    // Final coverage must reflect the deduplicated population.
    let final_coverage = evaluate_coverage(&all_signals, params.min_signals_per_type);
    all_signals.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

    let confidence = if all_signals.is_empty() {
        ResultConfidence::InsufficientEvidence
    } else {
        ResultConfidence::Conclusive
    };
    // A zero-signal run is flagged, never scored from thin air.
    let scores = match confidence {
        ResultConfidence::Conclusive => report_data.scores,
        ResultConfidence::InsufficientEvidence => Scores::default(),
    };

    let elapsed_seconds = (start.elapsed().as_secs_f64() * 10.0).round() / 10.0;
    emit(
        "complete",
        format!(
            "Done in {elapsed_seconds}s - {iteration} iterations, {} signals",
            all_signals.len()
        ),
    );

    Ok(EngineResult {
        report: report_data.report,
        scores,
        threads: all_signals,
        iterations: iteration,
        queries_used,
        coverage: final_coverage,
        elapsed_seconds,
        confidence,
    })
}
