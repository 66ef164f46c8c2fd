//! Agentic Reddit signal engine.
//!
//! Implements the multi-stage feedback loop:
//!
//! 1. GENERATE   — the model creates search queries from the founder's input
//! 2. SEARCH     — the discussion source retrieves threads for each query
//! 3. ANALYZE    — the model scores and classifies every thread
//! 4. EVALUATE   — check signal coverage; if gaps exist, go to step 5
//! 5. REFINE     — the model generates new queries to fill gaps, back to 2
//! 6. SYNTHESIZE — the model writes the final market-signal report
//!
//! The loop runs at most `max_iterations` times (default 3). Model-output
//! noise and search degradation are recovered locally; transport/auth
//! failures of the text-generation collaborator abort the whole run.

pub mod coverage;
pub mod engine;
pub mod progress;

mod analyze;
mod decode;
mod prompts;
mod queries;
mod search;
mod synthesis;

pub use coverage::evaluate_coverage;
pub use engine::{run_signal_engine, EngineError, EngineParams};
pub use progress::StatusUpdate;
