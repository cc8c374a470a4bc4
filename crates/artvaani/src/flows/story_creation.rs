//! Story Creation Flow
//!
//! Transcribes a recording with a language hint, then writes a cultural
//! story from it. Returns both the transcription and the story.

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

const FLOW: &str = "create_story_from_audio";
const TRANSCRIBE_STEP: &str = "story_transcription";
const STORY_STEP: &str = "story";

const TRANSCRIBE_TEMPLATE: &str =
    "{{media audioDataUri}}Transcribe the following audio recording. The language is {{language}}.";

const STORY_TEMPLATE: &str = "You are a masterful storyteller who specializes in cultural narratives.
An artisan has provided the text below, transcribed from their voice.
Transform this raw transcription into a beautiful, engaging and culturally rich story that captures the artisan's message, their craft and their heritage.
Write the story in the following language: {{language}}.

Transcription:
{{transcription}}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCreationInput {
    pub audio_data_uri: String,
    /// Language of the recording and of the story
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryCreationOutput {
    pub transcription: String,
    pub story: String,
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
            STORY_STEP,
            vec![OutputField::text(
                "story",
                "The generated cultural narrative based on the transcription.",
            )],
        )
    })
}

fn transcribe_template() -> &'static PromptTemplate {
    static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| PromptTemplate::new(TRANSCRIBE_STEP, TRANSCRIBE_TEMPLATE))
}

fn story_template() -> &'static PromptTemplate {
    static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();
    TEMPLATE.get_or_init(|| PromptTemplate::new(STORY_STEP, STORY_TEMPLATE))
}

#[derive(Clone)]
pub struct StoryCreationFlow {
    invoker: ModelInvoker,
}

impl StoryCreationFlow {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    pub async fn run(&self, raw: &Map<String, Value>) -> Result<StoryCreationOutput, FlowError> {
        async move {
            let request = validate_input(input_schema(), raw)?;

            let transcribed = self
                .invoker
                .run_step(TRANSCRIBE_STEP, transcribe_template(), &request, transcription_schema())
                .await?;
            let transcription = transcribed.required_text("text")?.trim().to_string();
            if transcription.is_empty() {
                return Err(FlowError::TranscriptionFailed);
            }

            let story_request = FlowRequest::new()
                .with("transcription", transcription.clone())
                .with("language", request.require_text("language")?);

            let story = self
                .invoker
                .run_step(STORY_STEP, story_template(), &story_request, output_schema())
                .await?
                .required_text("story")?
                .to_string();

            tracing::info!("Story created from audio");
            Ok(StoryCreationOutput {
                transcription,
                story,
            })
        }
        .instrument(flow_span(FLOW))
        .await
    }
}
