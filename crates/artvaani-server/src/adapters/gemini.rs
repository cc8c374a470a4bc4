//! Gemini generative model adapter
//!
//! Sends a composed prompt (text + inline media) to Gemini's
//! `generateContent` with a JSON response schema. One request per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Map, Value};

use artvaani::{
    ComposedPrompt, FieldKind, FlowError, GenerativeModel, OutputSchema, PromptPart,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini-backed implementation of [`GenerativeModel`]
#[derive(Clone)]
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiModel {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    async fn generate(
        &self,
        prompt: &ComposedPrompt,
        output: &OutputSchema,
    ) -> Result<Value, FlowError> {
        let url = format!("{}/{}:generateContent", BASE_URL, self.model);
        let request = build_request(prompt, output);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|err| FlowError::ModelUnavailable(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| FlowError::MalformedOutput(err.to_string()))?;

        let text = extract_text(&payload).ok_or_else(|| {
            FlowError::MalformedOutput("Gemini returned no candidate text".to_string())
        })?;

        parse_json_output(&text)
    }

    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// ============================================
// Request Types
// ============================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

// ============================================
// Helper Functions
// ============================================

fn build_request(prompt: &ComposedPrompt, output: &OutputSchema) -> GenerateContentRequest {
    let parts = prompt
        .parts()
        .iter()
        .map(|part| match part {
            PromptPart::Text(text) => Part::Text(text.clone()),
            PromptPart::Media(media) => Part::InlineData(InlineData {
                mime_type: media.content_type().to_string(),
                data: media.payload().to_string(),
            }),
        })
        .collect();

    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(output),
        },
    }
}

/// Gemini's OpenAPI-subset schema for the declared output
fn response_schema(output: &OutputSchema) -> Value {
    let mut properties = Map::new();
    for field in &output.fields {
        let mut property = json!({
            "type": gemini_type(field.kind),
            "description": field.description,
        });
        if let Some(values) = field.one_of {
            property["enum"] = json!(values);
        }
        properties.insert(field.name.to_string(), property);
    }

    let required: Vec<&str> = output.required_fields().map(|f| f.name).collect();
    let ordering: Vec<&str> = output.fields.iter().map(|f| f.name).collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
        "propertyOrdering": ordering,
    })
}

fn gemini_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Media(_) => "STRING",
        FieldKind::Number => "NUMBER",
        FieldKind::Bool => "BOOLEAN",
    }
}

fn extract_text(root: &Value) -> Option<String> {
    let parts = root
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the model's JSON text, tolerating a Markdown code fence
fn parse_json_output(text: &str) -> Result<Value, FlowError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim())
        .map_err(|err| FlowError::MalformedOutput(format!("model output is not JSON: {}", err)))
}

fn map_http_error(status: StatusCode, body: String) -> FlowError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return FlowError::ModelUnavailable(format!("rate limited: {}", message));
    }

    FlowError::ModelUnavailable(format!("API error ({}): {}", status.as_u16(), message))
}
