//! Generative Model Port
//!
//! Abstract interface for a hosted generative model. One call in, one
//! structured response out: implementations must not retry, stream or cache.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::{ComposedPrompt, OutputSchema};
use crate::domain::errors::FlowError;

/// Hosted generative model
///
/// # Example
///
/// ```rust,ignore
/// use artvaani::ports::GenerativeModel;
///
/// struct GeminiModel { /* ... */ }
///
/// #[async_trait]
/// impl GenerativeModel for GeminiModel {
///     async fn generate(&self, prompt: &ComposedPrompt, output: &OutputSchema)
///         -> Result<Value, FlowError> {
///         // Call generateContent with a response schema
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send the prompt and the declared output shape, return the raw JSON
    /// object the model produced.
    ///
    /// Transport failures map to [`FlowError::ModelUnavailable`]; a body
    /// that is not JSON maps to [`FlowError::MalformedOutput`].
    async fn generate(&self, prompt: &ComposedPrompt, output: &OutputSchema)
        -> Result<Value, FlowError>;

    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
