//! Final synthesis: turn the accumulated signal set into a narrative report
//! and risk scores.

use premortem_core::{SignalThread, StartupContext};
use premortem_llm::{normalize_response, LlmError, TextGenerator};

use crate::decode::{decode_synthesis, SynthesisOutput};
use crate::prompts;

/// Threads included in the synthesis prompt, by relevance.
const SYNTHESIS_THREAD_CAP: usize = 30;

/// Write the final market-signal report from the deduplicated signal set.
///
/// Only the top [`SYNTHESIS_THREAD_CAP`] threads by relevance are embedded
/// in the prompt to bound its size. A mis-shaped synthesis answer degrades
/// to a report body with zeroed scores; it never fails on shape.
///
/// # Errors
///
/// Propagates [`LlmError`] — fatal to the run.
pub(crate) async fn synthesize_report<G>(
    generator: &G,
    context: &StartupContext,
    signals: &[SignalThread],
) -> Result<SynthesisOutput, LlmError>
where
    G: TextGenerator + ?Sized,
{
    let mut top: Vec<&SignalThread> = signals.iter().collect();
    top.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    top.truncate(SYNTHESIS_THREAD_CAP);

    let signals_json = serde_json::to_string_pretty(&top).unwrap_or_else(|_| "[]".to_owned());
    let raw = generator
        .generate(
            prompts::SYNTHESIS_SYSTEM,
            &prompts::synthesis_user(context, &signals_json),
            prompts::NARRATIVE_TEMPERATURE,
        )
        .await?;

    Ok(decode_synthesis(&normalize_response(&raw)))
}
