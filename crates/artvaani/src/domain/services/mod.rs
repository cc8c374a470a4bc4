//! Domain Services
//!
//! Stateless steps of a flow pipeline:
//! - input validator: raw fields -> FlowRequest
//! - prompt composer: FlowRequest + PromptTemplate -> ComposedPrompt
//! - response validator: raw model output -> FlowResponse

pub mod input_validator;
pub mod prompt_composer;
pub mod response_validator;

pub use input_validator::validate_input;
pub use prompt_composer::compose_prompt;
pub use response_validator::validate_response;
