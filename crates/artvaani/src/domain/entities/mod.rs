//! Domain Entities
//!
//! Transient records owned by a single flow invocation.
//! - Schema: declared input/output shapes per flow
//! - FlowRequest / FlowResponse: validated input and output records
//! - PromptTemplate: immutable template with named placeholders
//! - ComposedPrompt: a rendered prompt ready for the model

mod composed_prompt;
mod flow_request;
mod flow_response;
mod prompt_template;
mod schema;

pub use composed_prompt::*;
pub use flow_request::*;
pub use flow_response::*;
pub use prompt_template::*;
pub use schema::*;
