//! Model Invoker
//!
//! Issues exactly one model request per step and gates the result through
//! the response validator. No retry, no streaming, no cache.

use std::sync::Arc;

use crate::domain::entities::{ComposedPrompt, FlowRequest, FlowResponse, OutputSchema, PromptTemplate};
use crate::domain::errors::FlowError;
use crate::domain::services::{compose_prompt, validate_response};
use crate::ports::GenerativeModel;

/// Explicit handle on the hosted model, passed into every flow
#[derive(Clone)]
pub struct ModelInvoker {
    model: Arc<dyn GenerativeModel>,
}

impl ModelInvoker {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn GenerativeModel {
        self.model.as_ref()
    }

    /// Send one composed prompt and validate the single response
    pub async fn invoke(
        &self,
        step: &str,
        prompt: &ComposedPrompt,
        schema: &OutputSchema,
    ) -> Result<FlowResponse, FlowError> {
        tracing::debug!(
            step,
            provider = self.model.provider_name(),
            model = self.model.model_id(),
            media_parts = prompt.media().count(),
            "Invoking model"
        );

        let raw = self.model.generate(prompt, schema).await.map_err(|e| {
            tracing::warn!(step, error = %e, "Model call failed");
            e
        })?;

        validate_response(schema, &raw).map_err(|e| {
            tracing::warn!(step, error = %e, "Model output rejected");
            e
        })
    }

    /// Compose the step's prompt, then invoke
    pub async fn run_step(
        &self,
        step: &str,
        template: &PromptTemplate,
        request: &FlowRequest,
        schema: &OutputSchema,
    ) -> Result<FlowResponse, FlowError> {
        let prompt = compose_prompt(template, request)?;
        self.invoke(step, &prompt, schema).await
    }
}
