//! Cultural Insights Flow
//!
//! Craft name -> origins and history of the craft, in the requested language.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use super::{flow_span, ModelInvoker};
use crate::domain::entities::{FieldSpec, InputSchema, OutputField, OutputSchema, PromptTemplate};
use crate::domain::errors::FlowError;
use crate::domain::services::validate_input;

const FLOW: &str = "get_cultural_insights";

const TEMPLATE: &str = "You are an expert in cultural heritage and history. Give detailed, engaging cultural insights about the following craft, including its origins and history. Answer in {{language}}.

Craft: {{craftName}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalInsightsInput {
    pub craft_name: String,
    /// Two-letter ISO language code
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalInsightsOutput {
    pub cultural_insights: String,
}

pub fn input_schema() -> &'static InputSchema {
    static SCHEMA: OnceLock<InputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        InputSchema::new(
            FLOW,
            vec![
                FieldSpec::text("craftName").min_len(2),
                FieldSpec::text("language").min_len(2),
            ],
        )
    })
}

pub fn output_schema() -> &'static OutputSchema {
    static SCHEMA: OnceLock<OutputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        OutputSchema::new(
            FLOW,
            vec![OutputField::text(
                "culturalInsights",
                "Cultural insights about the craft, including its origins and history.",
            )],
        )
    })
}

fn template() -> &'static PromptTemplate {
    static TEMPLATE_CELL: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE_CELL.get_or_init(|| PromptTemplate::new(FLOW, TEMPLATE))
}

#[derive(Clone)]
pub struct CulturalInsightsFlow {
    invoker: ModelInvoker,
}

impl CulturalInsightsFlow {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    pub async fn run(&self, raw: &Map<String, Value>) -> Result<CulturalInsightsOutput, FlowError> {
        async move {
            let request = validate_input(input_schema(), raw)?;
            let response = self
                .invoker
                .run_step(FLOW, template(), &request, output_schema())
                .await?;
            response.into_record()
        }
        .instrument(flow_span(FLOW))
        .await
    }
}
