//! The contract the engine needs from a text-generation backend.

use async_trait::async_trait;

use crate::error::LlmError;

/// A role-tagged text-generation call.
///
/// Implementations send `system` + `user` as a two-message conversation with
/// the given sampling temperature, requesting JSON-shaped output, and return
/// the raw assistant text. The text is *intended* to be JSON but is not
/// guaranteed to be — callers run it through the normalizer.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LlmError`] on transport, auth, or quota failure. All such
    /// errors are fatal to the engine run.
    async fn generate(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}
