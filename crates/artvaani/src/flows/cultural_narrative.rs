//! Cultural Narrative Flow
//!
//! Two steps: transcribe the artisan's recording, then turn the
//! transcription into a narrative in the target language. An empty
//! transcription stops the flow before the second model call.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use super::{flow_span, ModelInvoker};
use crate::domain::entities::{
    FieldSpec, FlowRequest, InputSchema, OutputField, OutputSchema, PromptTemplate,
};
use crate::domain::errors::FlowError;
use crate::domain::services::validate_input;

const FLOW: &str = "create_cultural_narrative";
const TRANSCRIBE_STEP: &str = "narrative_transcription";
const NARRATE_STEP: &str = "narrative";

const TRANSCRIBE_TEMPLATE: &str =
    "Transcribe the following audio recording to text: {{media audioDataUri}}";

const NARRATE_TEMPLATE: &str = "You are a storytelling assistant helping artisans create engaging cultural narratives.
Turn the transcription of the artisan's voice recording into a cultural narrative in the requested language.
Transcription: {{transcription}}
Language: {{language}}
Narrative:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalNarrativeInput {
    pub audio_data_uri: String,
    /// e.g. hi-IN, bn-IN, te-IN, mr-IN, ta-IN
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalNarrativeOutput {
    pub narrative: String,
}

pub fn input_schema() -> &'static InputSchema {
    static SCHEMA: OnceLock<InputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        InputSchema::new(
            FLOW,
            vec![
                FieldSpec::audio("audioDataUri"),
                FieldSpec::text("language").min_len(2),
            ],
        )
    })
}

fn transcription_schema() -> &'static OutputSchema {
    static SCHEMA: OnceLock<OutputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        OutputSchema::new(
            TRANSCRIBE_STEP,
            vec![OutputField::text("text", "The transcribed text of the recording.")],
        )
    })
}

pub fn output_schema() -> &'static OutputSchema {
    static SCHEMA: OnceLock<OutputSchema> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        OutputSchema::new(
            NARRATE_STEP,
            vec![OutputField::text(
                "narrative",
                "The generated cultural narrative in the specified language.",
            )],
        )
    })
}

fn transcribe_template() -> &'static PromptTemplate {
    static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| PromptTemplate::new(TRANSCRIBE_STEP, TRANSCRIBE_TEMPLATE))
}

fn narrate_template() -> &'static PromptTemplate {
    static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| PromptTemplate::new(NARRATE_STEP, NARRATE_TEMPLATE))
}

#[derive(Clone)]
pub struct CulturalNarrativeFlow {
    invoker: ModelInvoker,
}

impl CulturalNarrativeFlow {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    pub async fn run(&self, raw: &Map<String, Value>) -> Result<CulturalNarrativeOutput, FlowError> {
        async move {
            let request = validate_input(input_schema(), raw)?;

            let transcribed = self
                .invoker
                .run_step(TRANSCRIBE_STEP, transcribe_template(), &request, transcription_schema())
                .await?;
            let transcription = transcribed.required_text("text")?.trim();
            if transcription.is_empty() {
                return Err(FlowError::TranscriptionFailed);
            }
            tracing::debug!(chars = transcription.len(), "Recording transcribed");

            let narrate_request = FlowRequest::new()
                .with("transcription", transcription)
                .with("language", request.require_text("language")?);

            let narrated = self
                .invoker
                .run_step(NARRATE_STEP, narrate_template(), &narrate_request, output_schema())
                .await?;
            let narrative = narrated.required_text("narrative")?;
            if narrative.trim().is_empty() {
                return Err(FlowError::empty_result(NARRATE_STEP));
            }

            tracing::info!("Cultural narrative generated");
            Ok(CulturalNarrativeOutput {
                narrative: narrative.to_string(),
            })
        }
        .instrument(flow_span(FLOW))
        .await
    }
}
