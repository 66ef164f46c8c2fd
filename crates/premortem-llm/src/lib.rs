//! Text-generation collaborator for the pre-mortem signal engine.
//!
//! Defines the [`TextGenerator`] contract the engine calls (prompt pair in,
//! JSON-shaped text out), an OpenAI chat-completions implementation, and the
//! response normalizer that turns noisy model output into structured JSON.
//! Transport, auth, and quota failures are fatal to a run; malformed JSON
//! text is expected and recovered by the normalizer.

pub mod error;
pub mod normalize;
pub mod openai;
pub mod provider;

pub use error::LlmError;
pub use normalize::normalize_response;
pub use openai::OpenAiClient;
pub use provider::TextGenerator;
