//! Query generation (round 1) and gap-driven refinement (later rounds).

use premortem_core::{Coverage, SearchQuery, StartupContext};
use premortem_llm::{normalize_response, LlmError, TextGenerator};

use crate::decode::decode_query_plans;
use crate::prompts;

/// Generate the initial batch of search queries from the founder's idea.
///
/// An empty result is a valid outcome (the orchestrator stops gracefully),
/// not an error.
///
/// # Errors
///
/// Propagates [`LlmError`] — fatal to the run.
pub(crate) async fn generate_queries<G>(
    generator: &G,
    context: &StartupContext,
    num_queries: usize,
) -> Result<Vec<SearchQuery>, LlmError>
where
    G: TextGenerator + ?Sized,
{
    let raw = generator
        .generate(
            prompts::QUERY_GENERATION_SYSTEM,
            &prompts::query_generation_user(context, num_queries),
            prompts::STRUCTURED_TEMPERATURE,
        )
        .await?;
    let queries = decode_query_plans(&normalize_response(&raw));
    tracing::info!(count = queries.len(), "generated search queries");
    Ok(queries)
}

/// Generate new, gap-targeted queries from the current coverage snapshot.
///
/// # Errors
///
/// Propagates [`LlmError`] — fatal to the run.
pub(crate) async fn refine_queries<G>(
    generator: &G,
    context: &StartupContext,
    coverage: &Coverage,
    total_signals: usize,
    num_queries: usize,
) -> Result<Vec<SearchQuery>, LlmError>
where
    G: TextGenerator + ?Sized,
{
    let raw = generator
        .generate(
            prompts::REFINEMENT_SYSTEM,
            &prompts::refinement_user(context, coverage, total_signals, num_queries),
            prompts::STRUCTURED_TEMPERATURE,
        )
        .await?;
    let queries = decode_query_plans(&normalize_response(&raw));
    tracing::info!(count = queries.len(), "refinement generated new queries");
    Ok(queries)
}
