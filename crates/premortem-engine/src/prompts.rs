//! Prompt templates for every generation stage. All model-facing wording
//! lives here for easy tuning.

use premortem_core::{Coverage, SignalType, StartupContext};

/// Low temperature for structured output stages.
pub(crate) const STRUCTURED_TEMPERATURE: f32 = 0.4;
/// Slightly higher temperature for the narrative report.
pub(crate) const NARRATIVE_TEMPERATURE: f32 = 0.5;

pub(crate) const QUERY_GENERATION_SYSTEM: &str = "\
You are a startup market-research analyst specializing in early-stage idea validation.
Your job is to generate Reddit search queries that will surface:
  1. Pain points / complaints that the startup idea could solve
  2. Existing products or tools that overlap with the idea
  3. Organic demand signals - people asking for something like this
  4. Skepticism or criticism about similar approaches

You must think like a founder doing competitive research on Day Zero.";

pub(crate) fn query_generation_user(context: &StartupContext, num_queries: usize) -> String {
    format!(
        "A founder has described their startup idea below.\n\n\
         --- STARTUP INPUT ---\n\
         Idea:          {idea}\n\
         Problem:       {problem}\n\
         Solution:      {solution}\n\
         Product Specs: {product_specs}\n\
         --- END ---\n\n\
         Generate {num_queries} diverse Reddit search queries that will help us find:\n\
         - Threads where people complain about the exact problem this startup solves\n\
         - Threads discussing competing / similar products\n\
         - Threads where people explicitly ask for a tool like this\n\
         - Threads expressing skepticism about this category of product\n\n\
         For each query also suggest 1-3 subreddits that are most likely to contain results.\n\n\
         Return your answer as a JSON array. Each element must have:\n\
         \"query\": \"<search string>\",\n\
         \"intent\": \"pain_point\" | \"competition\" | \"demand\" | \"skepticism\",\n\
         \"subreddits\": [\"r/sub1\", \"r/sub2\"]\n\n\
         Return ONLY valid JSON - no markdown fences, no commentary.",
        idea = context.idea,
        problem = context.problem,
        solution = context.solution,
        product_specs = context.product_specs,
    )
}

pub(crate) const ANALYSIS_SYSTEM: &str = "\
You are a startup analyst. You receive raw Reddit threads retrieved for a specific \
startup idea. Your job is to:
  1. Score each thread's relevance to the startup idea (0-100).
  2. Classify the signal type: pain_point, competition, demand, skepticism, or irrelevant.
  3. Extract a concise insight explaining WHY this thread matters for the founder.
  4. Flag any specific competing products or tools mentioned.
  5. Identify unmet needs or feature requests that validate (or invalidate) the idea.

Be brutally honest. If a thread is irrelevant, say so. Founders need truth, not comfort.";

pub(crate) fn analysis_user(
    context: &StartupContext,
    query: &str,
    intent: SignalType,
    threads_json: &str,
) -> String {
    format!(
        "--- STARTUP CONTEXT ---\n\
         Idea:          {idea}\n\
         Problem:       {problem}\n\
         Solution:      {solution}\n\
         Product Specs: {product_specs}\n\
         --- END STARTUP CONTEXT ---\n\n\
         Below are Reddit threads retrieved for the search query: \"{query}\"\n\
         Intent of this search: {intent}\n\n\
         --- THREADS ---\n\
         {threads_json}\n\
         --- END THREADS ---\n\n\
         For each thread, return a JSON object with:\n\
         \"thread_id\": \"<the id from input>\",\n\
         \"relevance_score\": <0-100>,\n\
         \"signal_type\": \"pain_point\" | \"competition\" | \"demand\" | \"skepticism\" | \"irrelevant\",\n\
         \"insight\": \"<1-3 sentence explanation of why this matters>\",\n\
         \"competing_products\": [\"product1\", \"product2\"],\n\
         \"unmet_needs\": [\"need1\", \"need2\"],\n\
         \"key_quotes\": [\"<most relevant quote from thread>\"]\n\n\
         Return a JSON array. Only include threads with relevance_score >= 20.\n\
         Return ONLY valid JSON - no markdown fences, no commentary.",
        idea = context.idea,
        problem = context.problem,
        solution = context.solution,
        product_specs = context.product_specs,
    )
}

pub(crate) const REFINEMENT_SYSTEM: &str = "\
You are a startup research strategist reviewing the results of a Reddit signal search.
You identify GAPS in the research and generate NEW, more targeted search queries
that will fill those gaps. Think about:
  - Signal types we haven't found enough of (pain points, competition, demand, skepticism)
  - Angles we haven't explored (adjacent markets, alternative keywords, niche communities)
  - Specific competitors mentioned that deserve deeper investigation";

pub(crate) fn refinement_user(
    context: &StartupContext,
    coverage: &Coverage,
    total_threads: usize,
    num_queries: usize,
) -> String {
    let count = |label: &str| coverage.counts.get(label).copied().unwrap_or(0);
    let competitors = if coverage.competitors.is_empty() {
        "None found yet".to_owned()
    } else {
        coverage
            .competitors
            .iter()
            .take(10)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    let gaps = if coverage.gaps.is_empty() {
        "None".to_owned()
    } else {
        coverage.gaps.join("; ")
    };

    format!(
        "--- STARTUP CONTEXT ---\n\
         Idea:          {idea}\n\
         Problem:       {problem}\n\
         Solution:      {solution}\n\
         Product Specs: {product_specs}\n\
         --- END STARTUP CONTEXT ---\n\n\
         Here is a summary of what we've found so far across {total_threads} threads:\n\n\
         Signal distribution:\n\
         - Pain points found:  {pain_count}\n\
         - Competition found:  {comp_count}\n\
         - Demand signals:     {demand_count}\n\
         - Skepticism found:   {skepticism_count}\n\n\
         Top competing products mentioned: {competitors}\n\n\
         Key gaps or weak areas: {gaps}\n\n\
         Generate {num_queries} NEW search queries to fill the gaps. Focus on areas where we have\n\
         the fewest signals. Try different keyword angles, synonyms, and niche subreddits.\n\n\
         Return your answer as a JSON array with the same schema:\n\
         \"query\": \"<search string>\",\n\
         \"intent\": \"pain_point\" | \"competition\" | \"demand\" | \"skepticism\",\n\
         \"subreddits\": [\"r/sub1\", \"r/sub2\"]\n\n\
         Return ONLY valid JSON - no markdown fences, no commentary.",
        idea = context.idea,
        problem = context.problem,
        solution = context.solution,
        product_specs = context.product_specs,
        pain_count = count("pain_point"),
        comp_count = count("competition"),
        demand_count = count("demand"),
        skepticism_count = count("skepticism"),
    )
}

pub(crate) const SYNTHESIS_SYSTEM: &str = "\
You are a senior startup advisor writing a final market signal report.
Synthesize all Reddit signals into an actionable brief for the founder.
Be evidence-based, cite specific threads, and be brutally honest.";

pub(crate) fn synthesis_user(context: &StartupContext, all_signals_json: &str) -> String {
    format!(
        "--- STARTUP CONTEXT ---\n\
         Idea:          {idea}\n\
         Problem:       {problem}\n\
         Solution:      {solution}\n\
         Product Specs: {product_specs}\n\
         --- END STARTUP CONTEXT ---\n\n\
         Below are ALL analyzed Reddit signals (already scored and classified):\n\n\
         {all_signals_json}\n\n\
         Write a structured market signal report with these sections:\n\n\
         1. **Executive Summary** (2-3 sentences: overall signal strength)\n\
         2. **Demand Signals** - Evidence that people want this. Cite threads.\n\
         3. **Competition Landscape** - What already exists. Cite threads + products.\n\
         4. **Pain Points Validated** - Real complaints that this idea could solve.\n\
         5. **Red Flags & Skepticism** - Why this might fail. Cite threads.\n\
         6. **Unmet Needs & Opportunities** - Gaps competitors haven't filled.\n\
         7. **Recommendation** - Go / Pivot / Kill with reasoning.\n\n\
         Also return structured scores:\n\
         - demand_score (0-100)\n\
         - competition_risk (0-100)\n\
         - pain_validation (0-100)\n\
         - overall_failure_probability (0-100)\n\n\
         Return your response as JSON with:\n\
         \"report\": \"<the markdown report above>\",\n\
         \"scores\": {{\n\
         \"demand_score\": <int>,\n\
         \"competition_risk\": <int>,\n\
         \"pain_validation\": <int>,\n\
         \"overall_failure_probability\": <int>\n\
         }}\n\n\
         Return ONLY valid JSON - no markdown fences outside the report field.",
        idea = context.idea,
        problem = context.problem,
        solution = context.solution,
        product_specs = context.product_specs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use premortem_core::Coverage;

    fn context() -> StartupContext {
        StartupContext {
            idea: "AI meal planner".to_owned(),
            problem: "planning meals is tedious".to_owned(),
            solution: "generate weekly plans automatically".to_owned(),
            product_specs: "mobile app".to_owned(),
        }
    }

    #[test]
    fn query_generation_embeds_context_and_count() {
        let prompt = query_generation_user(&context(), 6);
        assert!(prompt.contains("AI meal planner"));
        assert!(prompt.contains("Generate 6 diverse Reddit search queries"));
    }

    #[test]
    fn refinement_uses_placeholders_when_nothing_found() {
        let prompt = refinement_user(&context(), &Coverage::default(), 0, 4);
        assert!(prompt.contains("Top competing products mentioned: None found yet"));
        assert!(prompt.contains("Key gaps or weak areas: None"));
    }

    #[test]
    fn refinement_caps_competitors_at_ten() {
        let coverage = Coverage {
            competitors: (0..15).map(|i| format!("tool{i}")).collect(),
            ..Coverage::default()
        };
        let prompt = refinement_user(&context(), &coverage, 30, 4);
        assert!(prompt.contains("tool9"));
        assert!(!prompt.contains("tool10,"));
    }
}
